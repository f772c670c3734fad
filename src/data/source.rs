use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use crate::data::dataset::Dataset;
use crate::error::{Error, Result};

/// Feature columns of the California housing dataset, in load order.
pub const FEATURE_NAMES: [&str; 8] = [
    "MedInc",
    "HouseAge",
    "AveRooms",
    "AveBedrms",
    "Population",
    "AveOccup",
    "Latitude",
    "Longitude",
];

/// Median house value of the block, in units of $100,000.
pub const TARGET_NAME: &str = "MedHouseVal";

/// Number of census blocks in the dataset.
pub const N_ROWS: usize = 20_640;

/// Supplies the session's dataset.
pub trait DatasetProvider {
    /// Returns an immutable snapshot of the dataset. Every call on the same
    /// provider yields the same rows.
    fn load(&self) -> Result<Dataset>;

    /// Short human-readable name of where the rows come from.
    fn source_name(&self) -> String;
}

/// On-disk layout of a California housing file.
///
/// - `Raw`: the published `cal_housing.data`: nine comma-separated columns
///   without a header (longitude, latitude, housingMedianAge, totalRooms,
///   totalBedrooms, population, households, medianIncome, medianHouseValue).
/// - `Csv`: a headered CSV with the eight feature columns in
///   `FEATURE_NAMES` order followed by the target column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    Raw,
    Csv,
}

impl SourceFormat {
    /// `.data` files are raw, anything else is treated as CSV.
    pub fn from_path(path: &Path) -> SourceFormat {
        match path.extension().and_then(|e| e.to_str()) {
            Some("data") => SourceFormat::Raw,
            _ => SourceFormat::Csv,
        }
    }
}

/// The fixed California housing dataset read from a local copy.
#[derive(Debug, Clone)]
pub struct CaliforniaHousing {
    path: PathBuf,
    format: SourceFormat,
}

impl CaliforniaHousing {
    pub fn new(path: impl Into<PathBuf>, format: SourceFormat) -> CaliforniaHousing {
        CaliforniaHousing { path: path.into(), format }
    }

    /// Picks the format from the file extension.
    pub fn from_path(path: impl Into<PathBuf>) -> CaliforniaHousing {
        let path = path.into();
        let format = SourceFormat::from_path(&path);
        CaliforniaHousing { path, format }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn unavailable(&self, reason: impl std::fmt::Display) -> Error {
        Error::DataUnavailable(format!("{}: {}", self.path.display(), reason))
    }

    fn read_raw(&self) -> Result<(Vec<Vec<f64>>, Vec<f64>)> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(|e| self.unavailable(e))?;

        let mut features = Vec::with_capacity(N_ROWS);
        let mut targets = Vec::with_capacity(N_ROWS);
        for (row, record) in reader.records().enumerate() {
            let record = record.map_err(|e| self.unavailable(e))?;
            let v = parse_record(&record, 9, row).map_err(|e| self.unavailable(e))?;
            let (longitude, latitude, age, rooms, bedrooms, population, households, income, value) =
                (v[0], v[1], v[2], v[3], v[4], v[5], v[6], v[7], v[8]);

            features.push(vec![
                income,
                age,
                rooms / households,
                bedrooms / households,
                population,
                population / households,
                latitude,
                longitude,
            ]);
            targets.push(value / 100_000.0);
        }
        Ok((features, targets))
    }

    fn read_csv(&self) -> Result<(Vec<Vec<f64>>, Vec<f64>)> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(|e| self.unavailable(e))?;

        let headers = reader.headers().map_err(|e| self.unavailable(e))?.clone();
        let names: Vec<&str> = headers.iter().collect();
        if names.len() != FEATURE_NAMES.len() + 1 || names[..FEATURE_NAMES.len()] != FEATURE_NAMES {
            return Err(self.unavailable(format!(
                "expected columns {} followed by a target, found {}",
                FEATURE_NAMES.join(","),
                names.join(",")
            )));
        }

        let mut features = Vec::with_capacity(N_ROWS);
        let mut targets = Vec::with_capacity(N_ROWS);
        for (row, record) in reader.records().enumerate() {
            let record = record.map_err(|e| self.unavailable(e))?;
            let mut v = parse_record(&record, FEATURE_NAMES.len() + 1, row).map_err(|e| self.unavailable(e))?;
            targets.push(v.pop().unwrap_or_default());
            features.push(v);
        }
        Ok((features, targets))
    }
}

impl DatasetProvider for CaliforniaHousing {
    fn load(&self) -> Result<Dataset> {
        let (features, targets) = match self.format {
            SourceFormat::Raw => self.read_raw()?,
            SourceFormat::Csv => self.read_csv()?,
        };

        if targets.len() != N_ROWS {
            return Err(self.unavailable(format!("expected {} rows, found {}", N_ROWS, targets.len())));
        }

        let names = FEATURE_NAMES.iter().map(|s| s.to_string()).collect();
        let dataset = Dataset::new(names, TARGET_NAME, features, targets)?;
        info!(
            "loaded {} rows x {} features from {}",
            dataset.n_rows(),
            dataset.n_features(),
            self.path.display()
        );
        Ok(dataset)
    }

    fn source_name(&self) -> String {
        format!("California housing ({})", self.path.display())
    }
}

/// Serves an already built dataset; no shape requirements.
#[derive(Debug, Clone)]
pub struct InMemorySource {
    name: String,
    dataset: Dataset,
}

impl InMemorySource {
    pub fn new(name: impl Into<String>, dataset: Dataset) -> InMemorySource {
        InMemorySource { name: name.into(), dataset }
    }
}

impl DatasetProvider for InMemorySource {
    fn load(&self) -> Result<Dataset> {
        Ok(self.dataset.clone())
    }

    fn source_name(&self) -> String {
        self.name.clone()
    }
}

/// Parses every cell of a record as `f64`, reporting the 1-based row on failure.
fn parse_record(record: &csv::StringRecord, expected: usize, row: usize) -> std::result::Result<Vec<f64>, String> {
    if record.len() != expected {
        return Err(format!("row {}: expected {} columns, got {}", row + 1, expected, record.len()));
    }
    record.iter()
        .map(|cell| {
            cell.parse::<f64>()
                .map_err(|_| format!("row {}: '{}' is not a valid number", row + 1, cell))
        })
        .collect()
}
