pub mod config;
pub mod configurator;
pub mod metrics;
pub mod regressor;

pub use config::{FitOptions, ModelConfig};
pub use configurator::ModelConfigurator;
pub use metrics::{evaluate, RegressionMetrics, RegressionMetricsOutput};
pub use regressor::{FitSummary, MlpRegressor, Regressor};
