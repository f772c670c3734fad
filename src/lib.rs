pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod optim;
pub mod train;
pub mod data;
pub mod preprocessing;
pub mod model;
pub mod session;
pub mod config;
pub mod error;

// Convenience re-exports
pub use error::{Error, FitError, Result};
pub use config::StudioConfig;
pub use data::{CaliforniaHousing, Dataset, DatasetProvider, InMemorySource, SourceFormat};
pub use preprocessing::{ScalerState, StandardScaler};
pub use activation::activation::ActivationFunction;
pub use optim::solver::Solver;
pub use model::{MlpRegressor, ModelConfig, ModelConfigurator, Regressor};
pub use train::{Progress, ProgressMode, TrainingController, TrainingReport};
pub use session::{Command, Frontend, Session, SessionKey, SessionState};
