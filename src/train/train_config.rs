/// Solver-loop settings for one fit.
///
/// # Fields
/// - `max_iter`        : epochs (stochastic solvers) or iterations (lbfgs)
/// - `batch_size`      : rows per mini-batch, clipped to the row count
/// - `tol`             : minimum loss improvement that resets the patience
///                        counter; also the lbfgs gradient tolerance
/// - `n_iter_no_change`: epochs without `tol` improvement tolerated before stopping
/// - `alpha`           : L2 penalty strength
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainConfig {
    pub max_iter: usize,
    pub batch_size: usize,
    pub tol: f64,
    pub n_iter_no_change: usize,
    pub alpha: f64,
}

impl TrainConfig {
    /// Batch size actually used for `n_rows` training rows.
    pub fn effective_batch_size(&self, n_rows: usize) -> usize {
        self.batch_size.clamp(1, n_rows.max(1))
    }
}

/// How a solver loop ended.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopOutcome {
    pub iterations: usize,
    pub final_loss: f64,
    /// False when the loop hit `max_iter` first.
    pub converged: bool,
    /// Loss after every iteration, in order.
    pub loss_curve: Vec<f64>,
}
