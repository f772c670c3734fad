use serde::{Deserialize, Serialize};

/// Statistics of one completed solver iteration.
///
/// For `adam`/`sgd` an iteration is one epoch over the shuffled training
/// rows; for `lbfgs` it is one accepted line-search step. The fit procedure
/// hands one value to its callback after every iteration, which is what the
/// `iterations` progress mode is driven by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationStats {
    /// 1-based iteration number.
    pub iteration: usize,
    /// Iteration cap of this run (`max_iter`).
    pub total_iterations: usize,
    /// Regularized training loss after this iteration.
    pub loss: f64,
    /// Wall-clock duration of this single iteration in milliseconds.
    pub elapsed_ms: u64,
}
