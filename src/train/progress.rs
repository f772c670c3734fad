use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// One progress notification of a training run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// 0..=100, never decreasing within a run.
    pub percent: u8,
    pub message: String,
}

impl Progress {
    pub fn new(percent: u8, message: impl Into<String>) -> Progress {
        Progress { percent: percent.min(100), message: message.into() }
    }

    pub fn is_complete(&self) -> bool {
        self.percent == 100
    }
}

/// How progress events are produced.
///
/// - `Cosmetic`  : a 0% event before fitting, then `steps` evenly spaced
///                  ticks `interval_ms` apart once fit has returned
/// - `Iterations`: one event per solver iteration, scaled to 0..=99,
///                  then 100% once fit has returned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ProgressMode {
    Cosmetic { steps: u32, interval_ms: u64 },
    Iterations,
}

impl ProgressMode {
    pub const DEFAULT_STEPS: u32 = 100;
    pub const DEFAULT_INTERVAL_MS: u64 = 10;

    pub fn cosmetic() -> ProgressMode {
        ProgressMode::Cosmetic {
            steps: Self::DEFAULT_STEPS,
            interval_ms: Self::DEFAULT_INTERVAL_MS,
        }
    }

    pub(crate) fn tick_interval(&self) -> Duration {
        match self {
            ProgressMode::Cosmetic { interval_ms, .. } => Duration::from_millis(*interval_ms),
            ProgressMode::Iterations => Duration::ZERO,
        }
    }
}

impl Default for ProgressMode {
    fn default() -> Self {
        ProgressMode::cosmetic()
    }
}

impl fmt::Display for ProgressMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressMode::Cosmetic { .. } => f.write_str("cosmetic"),
            ProgressMode::Iterations => f.write_str("iterations"),
        }
    }
}

impl FromStr for ProgressMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cosmetic" => Ok(ProgressMode::cosmetic()),
            "iterations" => Ok(ProgressMode::Iterations),
            other => Err(Error::invalid_config(
                "progress",
                format!("must be cosmetic or iterations (got `{}`)", other),
            )),
        }
    }
}

/// Percent shown for a completed solver iteration; 100 is held back for
/// after fit returns.
pub fn iteration_percent(iteration: usize, max_iter: usize) -> u8 {
    if max_iter == 0 {
        return 0;
    }
    (iteration.min(max_iter) * 99 / max_iter) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iteration_percent_stays_below_100() {
        assert_eq!(iteration_percent(0, 120), 0);
        assert_eq!(iteration_percent(60, 120), 49);
        assert_eq!(iteration_percent(120, 120), 99);
        assert_eq!(iteration_percent(500, 120), 99);
        assert_eq!(iteration_percent(3, 0), 0);
    }

    #[test]
    fn mode_parses_and_serializes_with_tag() {
        assert_eq!("Iterations".parse::<ProgressMode>().unwrap(), ProgressMode::Iterations);
        assert_eq!("cosmetic".parse::<ProgressMode>().unwrap(), ProgressMode::default());
        assert!(matches!(
            "bar".parse::<ProgressMode>(),
            Err(Error::InvalidConfig { field: "progress", .. })
        ));

        let json = serde_json::to_string(&ProgressMode::default()).unwrap();
        assert_eq!(json, r#"{"mode":"cosmetic","steps":100,"interval_ms":10}"#);
    }
}
