use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::source::{CaliforniaHousing, SourceFormat};
use crate::error::Result;
use crate::model::config::ModelConfig;
use crate::session::commands::Session;
use crate::train::progress::ProgressMode;

/// Environment variable naming the dataset file.
pub const DATA_ENV_VAR: &str = "HOUSING_DATA";

/// Settings of a studio session, loadable from a JSON file.
///
/// Every field has a default, so a config file only needs the fields it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    /// Local copy of the California housing data.
    pub data_path: PathBuf,
    /// `None` picks the format from the file extension.
    pub data_format: Option<SourceFormat>,
    pub progress: ProgressMode,
    /// Hyperparameters the session starts with.
    pub model: ModelConfig,
    /// Where scatter plots are written.
    pub plot_dir: PathBuf,
}

impl Default for StudioConfig {
    fn default() -> Self {
        StudioConfig {
            data_path: PathBuf::from("cal_housing.data"),
            data_format: None,
            progress: ProgressMode::default(),
            model: ModelConfig::default(),
            plot_dir: PathBuf::from("plots"),
        }
    }
}

impl StudioConfig {
    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a config from a JSON file and validates its model section.
    pub fn load_json(path: impl AsRef<Path>) -> Result<StudioConfig> {
        let reader = BufReader::new(File::open(path)?);
        let config: StudioConfig = serde_json::from_reader(reader)?;
        config.model.validate()?;
        Ok(config)
    }

    pub fn provider(&self) -> CaliforniaHousing {
        match self.data_format {
            Some(format) => CaliforniaHousing::new(&self.data_path, format),
            None => CaliforniaHousing::from_path(&self.data_path),
        }
    }

    /// A fresh session over this config's data, model and progress settings.
    pub fn session(&self) -> Result<Session> {
        Session::new(Box::new(self.provider()))
            .with_progress_mode(self.progress)
            .with_model_config(self.model.clone())
    }
}
