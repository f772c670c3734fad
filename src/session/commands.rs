use log::{info, warn};

use crate::data::dataset::Dataset;
use crate::data::describe::{describe, DatasetSummary};
use crate::data::source::DatasetProvider;
use crate::data::split::{train_test_split, SPLIT_SEED, TEST_FRACTION};
use crate::error::{Error, Result};
use crate::model::config::ModelConfig;
use crate::model::configurator::ModelConfigurator;
use crate::model::metrics::{evaluate, RegressionMetricsOutput};
use crate::model::regressor::Regressor;
use crate::preprocessing::scaler::StandardScaler;
use crate::session::plots::{PlotLabels, FEATURE_PLOTS};
use crate::session::state::{FlashMessage, SessionKey, SessionState};
use crate::train::progress::{Progress, ProgressMode};
use crate::train::trainer::TrainingController;

/// User actions a front end can send to its session.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    ShowDataset,
    ShowGraphs,
    Configure(ModelConfig),
    StartTraining,
    Evaluate,
}

/// Rendering side of a session. Implementations decide how things look;
/// the session decides what is shown and when.
pub trait Frontend {
    fn show_dataset(&mut self, dataset: &Dataset);

    fn show_summary(&mut self, summary: &DatasetSummary);

    /// Draws `y` against `x` as a scatter plot.
    fn plot(&mut self, x: &[f64], y: &[f64], labels: &PlotLabels) -> Result<()>;

    fn progress(&mut self, progress: &Progress);

    fn show_metrics(&mut self, metrics: &RegressionMetricsOutput);

    fn flash(&mut self, message: &FlashMessage);
}

/// One interactive session: the data source, everything derived from it, and
/// the model configuration the next training run will use.
pub struct Session {
    provider: Box<dyn DatasetProvider>,
    dataset: Option<Dataset>,
    state: SessionState,
    model_config: ModelConfig,
    configurator: ModelConfigurator,
    controller: TrainingController,
}

impl Session {
    pub fn new(provider: Box<dyn DatasetProvider>) -> Session {
        Session {
            provider,
            dataset: None,
            state: SessionState::new(),
            model_config: ModelConfig::default(),
            configurator: ModelConfigurator::new(),
            controller: TrainingController::default(),
        }
    }

    pub fn with_progress_mode(mut self, mode: ProgressMode) -> Session {
        self.controller = TrainingController::new(mode);
        self
    }

    /// Starts the session from `config` instead of the defaults.
    pub fn with_model_config(mut self, config: ModelConfig) -> Result<Session> {
        config.validate()?;
        self.model_config = config;
        Ok(self)
    }

    pub fn with_configurator(mut self, configurator: ModelConfigurator) -> Session {
        self.configurator = configurator;
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn model_config(&self) -> &ModelConfig {
        &self.model_config
    }

    pub fn progress_mode(&self) -> ProgressMode {
        self.controller.mode()
    }

    pub fn source_name(&self) -> String {
        self.provider.source_name()
    }

    /// Loads the dataset once; later calls reuse the snapshot.
    pub fn dataset(&mut self) -> Result<&Dataset> {
        if self.dataset.is_none() {
            let dataset = self.provider.load()?;
            info!("dataset loaded from {}", self.provider.source_name());
            self.dataset = Some(dataset);
        }
        self.dataset.as_ref().ok_or_else(|| Error::DataUnavailable(self.provider.source_name()))
    }

    /// Load → split → fit scaler on train → scale test → store.
    ///
    /// Idempotent: once the scaler state is stored, the pipeline is never
    /// recomputed, so the scaler is fitted at most once per session.
    pub fn prepare(&mut self) -> Result<()> {
        if self.state.is_initialized(SessionKey::ScalerState) {
            return Ok(());
        }

        let split = {
            let dataset = self.dataset()?;
            train_test_split(dataset, TEST_FRACTION, SPLIT_SEED)?
        };

        let mut scaler = StandardScaler::new();
        scaler.fit(split.train.features())?;
        let test_scaled = scaler.transform(split.test.features())?;

        self.state.set_train_set(split.train);
        self.state.set_test_set(split.test);
        self.state.set_scaler_state(scaler.into_state()?);
        self.state.set_test_features_scaled(test_scaled);
        info!("session prepared: {:?} initialized", self.state.initialized_keys());
        Ok(())
    }

    /// Training features passed through the stored scaler.
    pub fn train_features_scaled(&self) -> Result<Vec<Vec<f64>>> {
        self.state.scaler_state()?.transform(self.state.train_set()?.features())
    }

    /// Runs one command to completion. Errors abort the command and are both
    /// flashed to the front end and returned.
    pub fn dispatch(&mut self, command: Command, frontend: &mut dyn Frontend) -> Result<()> {
        let result = match command {
            Command::ShowDataset => self.show_dataset(frontend),
            Command::ShowGraphs => self.show_graphs(frontend),
            Command::Configure(config) => self.configure(config),
            Command::StartTraining => self.start_training(frontend),
            Command::Evaluate => self.evaluate(frontend),
        };
        if let Err(e) = &result {
            warn!("command failed: {}", e);
            self.state.set_flash(FlashMessage::error(e.to_string()));
        }
        if let Some(flash) = self.state.take_flash() {
            frontend.flash(&flash);
        }
        result
    }

    fn show_dataset(&mut self, frontend: &mut dyn Frontend) -> Result<()> {
        self.prepare()?;
        let dataset = self.dataset()?;
        frontend.show_dataset(dataset);
        frontend.show_summary(&describe(dataset));
        Ok(())
    }

    fn show_graphs(&mut self, frontend: &mut dyn Frontend) -> Result<()> {
        let dataset = self.dataset()?;
        for plot in FEATURE_PLOTS.iter() {
            let x = dataset.column(plot.feature).ok_or_else(|| {
                Error::DataUnavailable(format!("dataset has no `{}` column", plot.feature))
            })?;
            frontend.plot(&x, dataset.targets(), &plot.labels())?;
        }
        Ok(())
    }

    fn configure(&mut self, config: ModelConfig) -> Result<()> {
        // A dry build validates every field.
        self.configurator.build(&config)?;
        self.state.set_flash(FlashMessage::success(format!("Model configured: {}", config)));
        self.model_config = config;
        Ok(())
    }

    fn start_training(&mut self, frontend: &mut dyn Frontend) -> Result<()> {
        self.prepare()?;
        let model = self.configurator.build(&self.model_config)?;
        let features = self.train_features_scaled()?;

        // The previous model is not kept once a new run starts.
        if self.state.take_model().is_some() {
            info!("discarded previously trained model");
        }

        let train_set = self.state.train_set()?;
        let (model, report) = self.controller.train(model, &features, train_set.targets(), &mut |p| {
            frontend.progress(p)
        })?;

        self.state.set_model(model);
        self.state.set_flash(FlashMessage::success(format!(
            "Regressor training completed! {} iterations, final loss {:.4}{}. \
             The Performance page is now available.",
            report.iterations,
            report.final_loss,
            if report.converged { "" } else { " (iteration limit reached)" }
        )));
        Ok(())
    }

    fn evaluate(&mut self, frontend: &mut dyn Frontend) -> Result<()> {
        let model = self.state.model()?;
        let features = self.state.test_features_scaled()?;
        let test_set = self.state.test_set()?;

        let predictions = model.predict(features)?;
        let metrics = evaluate(&predictions, test_set.targets());
        info!(
            "test metrics: mse {:.4}, rmse {:.4}, mae {:.4}, r2 {:.4}",
            metrics.mse, metrics.rmse, metrics.mae, metrics.r2
        );
        frontend.show_metrics(&metrics);
        frontend.plot(test_set.targets(), &predictions, &PlotLabels::predicted_vs_actual())?;
        Ok(())
    }
}
