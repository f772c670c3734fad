pub mod iteration_stats;
pub mod loop_fn;
pub mod progress;
pub mod train_config;
pub mod trainer;

pub use iteration_stats::IterationStats;
pub use loop_fn::{train_lbfgs, train_loop};
pub use progress::{Progress, ProgressMode};
pub use train_config::{LoopOutcome, TrainConfig};
pub use trainer::{TrainingController, TrainingReport};
