use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Weight optimization strategy of the regressor.
///
/// - `Adam` : mini-batch Adam
/// - `Lbfgs`: full-batch limited-memory BFGS
/// - `Sgd`  : mini-batch SGD with Nesterov momentum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Solver {
    Adam,
    Lbfgs,
    Sgd,
}

impl Solver {
    pub const ALL: [Solver; 3] = [Solver::Adam, Solver::Lbfgs, Solver::Sgd];

    pub fn as_str(&self) -> &'static str {
        match self {
            Solver::Adam => "adam",
            Solver::Lbfgs => "lbfgs",
            Solver::Sgd => "sgd",
        }
    }
}

impl fmt::Display for Solver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Solver {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "adam" => Ok(Solver::Adam),
            "lbfgs" | "l-bfgs" => Ok(Solver::Lbfgs),
            "sgd" => Ok(Solver::Sgd),
            other => Err(Error::invalid_config(
                "solver",
                format!("must be one of adam, lbfgs, sgd (got `{}`)", other),
            )),
        }
    }
}
