pub mod adam;
pub mod lbfgs;
pub mod sgd;
pub mod solver;

pub use adam::Adam;
pub use lbfgs::Lbfgs;
pub use sgd::Sgd;
pub use solver::Solver;

/// A first-order update rule applied once per mini-batch.
pub trait Optimizer {
    /// Updates `params` in place from the batch gradient `grad`.
    ///
    /// # Panics
    /// Panics if the two slices or the optimizer state differ in length.
    fn update_params(&mut self, grad: &[f64], params: &mut [f64]);
}
