pub mod commands;
pub mod plots;
pub mod state;

pub use commands::{Command, Frontend, Session};
pub use plots::{FeaturePlot, PlotLabels, FEATURE_PLOTS};
pub use state::{FlashKind, FlashMessage, Page, SessionKey, SessionState};
