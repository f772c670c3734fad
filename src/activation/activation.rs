use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Element-wise activation of a dense layer.
///
/// `Relu`, `Tanh` and `Logistic` are the hidden-layer choices offered to the
/// user; `Identity` is the fixed output activation of the regressor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationFunction {
    Identity,
    Relu,
    Tanh,
    Logistic,
}

impl ActivationFunction {
    /// Activations selectable for the hidden layer, in menu order.
    pub const HIDDEN: [ActivationFunction; 3] = [
        ActivationFunction::Relu,
        ActivationFunction::Tanh,
        ActivationFunction::Logistic,
    ];

    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Identity => x,
            ActivationFunction::Relu => if x > 0.0 { x } else { 0.0 },
            ActivationFunction::Tanh => x.tanh(),
            ActivationFunction::Logistic => 1.0 / (1.0 + (-x).exp()),
        }
    }

    /// Derivative evaluated at the pre-activation `x`.
    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Identity => 1.0,
            ActivationFunction::Relu => if x > 0.0 { 1.0 } else { 0.0 },
            ActivationFunction::Tanh => {
                let t = x.tanh();
                1.0 - t * t
            }
            ActivationFunction::Logistic => {
                let fx = self.function(x);
                fx * (1.0 - fx)
            }
        }
    }

    /// Numerator of the Glorot bound; the logistic function saturates sooner
    /// and gets the narrower range.
    pub fn glorot_factor(&self) -> f64 {
        match self {
            ActivationFunction::Logistic => 2.0,
            _ => 6.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivationFunction::Identity => "identity",
            ActivationFunction::Relu => "relu",
            ActivationFunction::Tanh => "tanh",
            ActivationFunction::Logistic => "logistic",
        }
    }
}

impl fmt::Display for ActivationFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a user-facing hidden activation. `identity` is not offered.
impl FromStr for ActivationFunction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "relu" => Ok(ActivationFunction::Relu),
            "tanh" => Ok(ActivationFunction::Tanh),
            "logistic" => Ok(ActivationFunction::Logistic),
            other => Err(Error::invalid_config(
                "activation",
                format!("must be one of relu, tanh, logistic (got `{}`)", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivatives_match_finite_differences() {
        let h = 1e-6;
        for act in ActivationFunction::HIDDEN {
            for &x in &[-1.3, -0.2, 0.4, 2.0] {
                let numeric = (act.function(x + h) - act.function(x - h)) / (2.0 * h);
                assert!(
                    (numeric - act.derivative(x)).abs() < 1e-5,
                    "{} at {}: {} vs {}", act, x, numeric, act.derivative(x)
                );
            }
        }
    }

    #[test]
    fn parses_menu_values_only() {
        assert_eq!("ReLU".parse::<ActivationFunction>().unwrap(), ActivationFunction::Relu);
        assert_eq!("logistic".parse::<ActivationFunction>().unwrap(), ActivationFunction::Logistic);
        let err = "identity".parse::<ActivationFunction>().unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { field: "activation", .. }));
    }
}
