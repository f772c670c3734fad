use log::info;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::{Error, FitError, Result};
use crate::math::matrix::Matrix;
use crate::model::config::{FitOptions, ModelConfig};
use crate::network::network::Network;
use crate::network::spec::NetworkSpec;
use crate::optim::{Adam, Optimizer, Sgd, Solver};
use crate::train::iteration_stats::IterationStats;
use crate::train::loop_fn::{train_lbfgs, train_loop};
use crate::train::train_config::TrainConfig;

/// What a successful fit reports back.
#[derive(Debug, Clone, PartialEq)]
pub struct FitSummary {
    pub iterations: usize,
    pub final_loss: f64,
    pub converged: bool,
}

/// Opaque supervised regression capability.
pub trait Regressor {
    /// Learns from `features`/`targets`. Runs at most once per model:
    /// a trained model refuses to fit again.
    fn fit(
        &mut self,
        features: &[Vec<f64>],
        targets: &[f64],
        on_iteration: &mut dyn FnMut(&IterationStats),
    ) -> std::result::Result<FitSummary, FitError>;

    /// One prediction per row. `NotFitted` before `fit`.
    fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<f64>>;

    fn is_fitted(&self) -> bool;
}

/// Multilayer perceptron regressor with a single hidden layer.
#[derive(Debug, Clone)]
pub struct MlpRegressor {
    config: ModelConfig,
    options: FitOptions,
    network: Option<Network>,
    loss_curve: Vec<f64>,
}

impl MlpRegressor {
    /// An untrained model. Prefer `ModelConfigurator::build`, which validates.
    pub fn new(config: ModelConfig, options: FitOptions) -> MlpRegressor {
        MlpRegressor { config, options, network: None, loss_curve: Vec::new() }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn options(&self) -> &FitOptions {
        &self.options
    }

    /// Training loss per iteration of the completed fit.
    pub fn loss_curve(&self) -> &[f64] {
        &self.loss_curve
    }

    pub fn n_iter(&self) -> usize {
        self.loss_curve.len()
    }

    pub fn network(&self) -> Option<&Network> {
        self.network.as_ref()
    }

    fn train_config(&self) -> TrainConfig {
        TrainConfig {
            max_iter: self.config.max_iter,
            batch_size: self.options.batch_size,
            tol: self.options.tol,
            n_iter_no_change: self.options.n_iter_no_change,
            alpha: self.config.alpha,
        }
    }
}

impl Regressor for MlpRegressor {
    fn fit(
        &mut self,
        features: &[Vec<f64>],
        targets: &[f64],
        on_iteration: &mut dyn FnMut(&IterationStats),
    ) -> std::result::Result<FitSummary, FitError> {
        if self.network.is_some() {
            return Err(FitError::AlreadyTrained);
        }
        let n_features = check_fit_input(features, targets)?;

        let activation = self.config.activation;
        let spec = NetworkSpec::regressor(n_features, self.config.hidden_layer_width, activation);
        // One generator drives initialization and then batch shuffling.
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.random_state);
        let mut network = Network::new(&spec, activation.glorot_factor(), &mut rng);
        let train_config = self.train_config();
        let o = &self.options;

        info!(
            "fitting MLP ({}) on {} rows x {} features, {} parameters",
            self.config,
            features.len(),
            n_features,
            network.n_params()
        );

        let outcome = match self.config.solver {
            Solver::Lbfgs => train_lbfgs(&mut network, features, targets, &train_config, on_iteration)?,
            solver => {
                let mut optimizer: Box<dyn Optimizer> = match solver {
                    Solver::Sgd => Box::new(Sgd::new(network.n_params(), o.learning_rate_init, o.momentum)),
                    _ => Box::new(Adam::new(network.n_params(), o.learning_rate_init, o.beta_1, o.beta_2, o.epsilon)),
                };
                train_loop(
                    &mut network,
                    features,
                    targets,
                    optimizer.as_mut(),
                    &train_config,
                    &mut rng,
                    on_iteration,
                )?
            }
        };

        info!(
            "fit finished after {} iterations, loss {:.6} (converged: {})",
            outcome.iterations, outcome.final_loss, outcome.converged
        );
        self.network = Some(network);
        self.loss_curve = outcome.loss_curve;
        Ok(FitSummary {
            iterations: outcome.iterations,
            final_loss: outcome.final_loss,
            converged: outcome.converged,
        })
    }

    fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<f64>> {
        let network = self.network.as_ref().ok_or(Error::NotFitted)?;
        let width = network.input_size();
        if let Some((row, r)) = features.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(Error::ShapeMismatch {
                expected: format!("{} features per row", width),
                actual: format!("{} features in row {}", r.len(), row),
            });
        }
        if features.is_empty() {
            return Ok(Vec::new());
        }
        Ok(network.predict(&Matrix::from_rows(features)))
    }

    fn is_fitted(&self) -> bool {
        self.network.is_some()
    }
}

/// Validates the shapes a fit needs and returns the feature width.
fn check_fit_input(features: &[Vec<f64>], targets: &[f64]) -> std::result::Result<usize, FitError> {
    if features.is_empty() {
        return Err(FitError::EmptyInput);
    }
    if features.len() != targets.len() {
        return Err(FitError::ShapeMismatch { features: features.len(), targets: targets.len() });
    }
    let expected = features[0].len();
    if let Some((row, r)) = features.iter().enumerate().find(|(_, r)| r.len() != expected) {
        return Err(FitError::RaggedRow { row, expected, actual: r.len() });
    }
    Ok(expected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::activation::ActivationFunction;

    fn data() -> (Vec<Vec<f64>>, Vec<f64>) {
        let x: Vec<Vec<f64>> = (0..300)
            .map(|i| {
                let t = i as f64 / 150.0 - 1.0;
                vec![t, t * t]
            })
            .collect();
        let y = x.iter().map(|r| 1.5 * r[0] - r[1] + 0.25).collect();
        (x, y)
    }

    fn model(solver: Solver, activation: ActivationFunction) -> MlpRegressor {
        let config = ModelConfig { solver, activation, max_iter: 150, alpha: 0.001, ..ModelConfig::default() };
        MlpRegressor::new(config, FitOptions::default())
    }

    #[test]
    fn every_solver_fits_and_predicts() {
        let (x, y) = data();
        for solver in Solver::ALL {
            let mut m = model(solver, ActivationFunction::Tanh);
            assert!(!m.is_fitted());
            let summary = m.fit(&x, &y, &mut |_| {}).unwrap();
            assert!(m.is_fitted());
            assert_eq!(summary.iterations, m.n_iter());
            assert!(summary.final_loss.is_finite());
            assert!(summary.final_loss <= m.loss_curve()[0], "{}", solver);
            assert_eq!(m.predict(&x).unwrap().len(), x.len());
        }
    }

    #[test]
    fn same_seed_gives_identical_models() {
        let (x, y) = data();
        let mut a = model(Solver::Adam, ActivationFunction::Relu);
        let mut b = model(Solver::Adam, ActivationFunction::Relu);
        a.fit(&x, &y, &mut |_| {}).unwrap();
        b.fit(&x, &y, &mut |_| {}).unwrap();
        assert_eq!(a.loss_curve(), b.loss_curve());
        assert_eq!(a.predict(&x).unwrap(), b.predict(&x).unwrap());
    }

    #[test]
    fn predict_before_fit_is_not_fitted() {
        let m = model(Solver::Adam, ActivationFunction::Relu);
        assert!(matches!(m.predict(&[vec![0.0, 0.0]]), Err(Error::NotFitted)));
    }

    #[test]
    fn fit_rejects_bad_shapes_and_second_fit() {
        let mut m = model(Solver::Sgd, ActivationFunction::Logistic);
        assert_eq!(m.fit(&[], &[], &mut |_| {}).unwrap_err(), FitError::EmptyInput);
        assert_eq!(
            m.fit(&[vec![1.0]], &[1.0, 2.0], &mut |_| {}).unwrap_err(),
            FitError::ShapeMismatch { features: 1, targets: 2 }
        );
        assert_eq!(
            m.fit(&[vec![1.0], vec![1.0, 2.0]], &[1.0, 2.0], &mut |_| {}).unwrap_err(),
            FitError::RaggedRow { row: 1, expected: 1, actual: 2 }
        );
        assert!(!m.is_fitted());

        let (x, y) = data();
        m.fit(&x, &y, &mut |_| {}).unwrap();
        assert_eq!(m.fit(&x, &y, &mut |_| {}).unwrap_err(), FitError::AlreadyTrained);
        assert!(matches!(m.predict(&[vec![1.0]]), Err(Error::ShapeMismatch { .. })));
    }
}
