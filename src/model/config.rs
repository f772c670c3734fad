use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::activation::activation::ActivationFunction;
use crate::error::{Error, Result};
use crate::optim::solver::Solver;

pub const HIDDEN_LAYER_WIDTH_RANGE: RangeInclusive<usize> = 5..=250;
pub const ALPHA_RANGE: RangeInclusive<f64> = 0.001..=1.0;
pub const MAX_ITER_RANGE: RangeInclusive<usize> = 100..=300;
pub const MAX_ITER_STEP: usize = 10;

/// Seed of weight initialization and batch shuffling. Not user-configurable.
pub const RANDOM_STATE: u64 = 42;

/// User-facing hyperparameters of the regressor.
///
/// A training run takes its own copy; editing the session's config afterwards
/// never touches a model that was already built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub activation: ActivationFunction,
    pub solver: Solver,
    pub hidden_layer_width: usize,
    /// L2 regularization strength.
    pub alpha: f64,
    pub max_iter: usize,
    pub random_state: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig {
            activation: ActivationFunction::Relu,
            solver: Solver::Adam,
            hidden_layer_width: 10,
            alpha: 0.1,
            max_iter: 120,
            random_state: RANDOM_STATE,
        }
    }
}

impl ModelConfig {
    /// Checks every field against the offered choices and ranges.
    pub fn validate(&self) -> Result<()> {
        if !ActivationFunction::HIDDEN.contains(&self.activation) {
            return Err(Error::invalid_config(
                "activation",
                format!("must be one of relu, tanh, logistic (got `{}`)", self.activation),
            ));
        }
        if !HIDDEN_LAYER_WIDTH_RANGE.contains(&self.hidden_layer_width) {
            return Err(Error::invalid_config(
                "hidden_layer_width",
                format!(
                    "must lie in {}..={} (got {})",
                    HIDDEN_LAYER_WIDTH_RANGE.start(),
                    HIDDEN_LAYER_WIDTH_RANGE.end(),
                    self.hidden_layer_width
                ),
            ));
        }
        if !ALPHA_RANGE.contains(&self.alpha) {
            return Err(Error::invalid_config(
                "alpha",
                format!("must lie in {}..={} (got {})", ALPHA_RANGE.start(), ALPHA_RANGE.end(), self.alpha),
            ));
        }
        if !MAX_ITER_RANGE.contains(&self.max_iter) || self.max_iter % MAX_ITER_STEP != 0 {
            return Err(Error::invalid_config(
                "max_iter",
                format!(
                    "must be a multiple of {} in {}..={} (got {})",
                    MAX_ITER_STEP,
                    MAX_ITER_RANGE.start(),
                    MAX_ITER_RANGE.end(),
                    self.max_iter
                ),
            ));
        }
        Ok(())
    }

    /// Sets one field from its textual form, as typed at the `set` prompt.
    /// The config is left untouched unless the result validates.
    pub fn set_field(&mut self, field: &str, value: &str) -> Result<()> {
        let mut next = self.clone();
        match field.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "activation" => next.activation = value.parse()?,
            "solver" => next.solver = value.parse()?,
            "hidden_layer_width" | "width" | "hidden" => {
                next.hidden_layer_width = parse_number("hidden_layer_width", value)?
            }
            "alpha" => next.alpha = parse_number("alpha", value)?,
            "max_iter" | "max_iterations" | "iterations" => next.max_iter = parse_number("max_iter", value)?,
            other => {
                return Err(Error::invalid_config(
                    "field",
                    format!(
                        "unknown field `{}`; expected activation, solver, hidden_layer_width, alpha or max_iter",
                        other
                    ),
                ))
            }
        }
        next.validate()?;
        *self = next;
        Ok(())
    }
}

impl fmt::Display for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "activation={} solver={} hidden_layer_width={} alpha={} max_iter={}",
            self.activation, self.solver, self.hidden_layer_width, self.alpha, self.max_iter
        )
    }
}

fn parse_number<T: std::str::FromStr>(field: &'static str, value: &str) -> Result<T> {
    value.trim()
        .parse()
        .map_err(|_| Error::invalid_config(field, format!("`{}` is not a valid number", value.trim())))
}

/// Solver settings that are fixed rather than user-configurable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitOptions {
    pub learning_rate_init: f64,
    pub batch_size: usize,
    pub tol: f64,
    pub n_iter_no_change: usize,
    /// Nesterov momentum of `sgd`.
    pub momentum: f64,
    pub beta_1: f64,
    pub beta_2: f64,
    pub epsilon: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        FitOptions {
            learning_rate_init: 0.001,
            batch_size: 200,
            tol: 1e-4,
            n_iter_no_change: 10,
            momentum: 0.9,
            beta_1: 0.9,
            beta_2: 0.999,
            epsilon: 1e-8,
        }
    }
}
