//! Feature standardization: `(x - mean) / scale` per column.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Fitted per-feature parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerState {
    mean: Vec<f64>,
    /// Population standard deviation; 1.0 for constant features.
    scale: Vec<f64>,
    n_samples_seen: usize,
}

impl ScalerState {
    /// Computes the parameters from training features only.
    pub fn fit(features: &[Vec<f64>]) -> Result<ScalerState> {
        let n_features = check_rectangular(features, None)?;
        if features.is_empty() {
            return Err(Error::ShapeMismatch {
                expected: "at least one training row".into(),
                actual: "0 rows".into(),
            });
        }

        let n = features.len() as f64;
        let mut mean = vec![0.0; n_features];
        for row in features {
            for (m, x) in mean.iter_mut().zip(row) {
                *m += x;
            }
        }
        mean.iter_mut().for_each(|m| *m /= n);

        let mut var = vec![0.0; n_features];
        for row in features {
            for ((v, x), m) in var.iter_mut().zip(row).zip(&mean) {
                *v += (x - m).powi(2);
            }
        }
        let scale = var.into_iter()
            .map(|v| {
                let std = (v / n).sqrt();
                if std == 0.0 { 1.0 } else { std }
            })
            .collect();

        debug!("fitted scaler on {} rows x {} features", features.len(), n_features);
        Ok(ScalerState { mean, scale, n_samples_seen: features.len() })
    }

    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    pub fn scale(&self) -> &[f64] {
        &self.scale
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    pub fn n_samples_seen(&self) -> usize {
        self.n_samples_seen
    }

    /// Applies the fitted parameters; never changes them.
    pub fn transform(&self, features: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        check_rectangular(features, Some(self.n_features()))?;
        Ok(features.iter()
            .map(|row| {
                row.iter().zip(&self.mean).zip(&self.scale)
                    .map(|((x, m), s)| (x - m) / s)
                    .collect()
            })
            .collect())
    }

    pub fn inverse_transform(&self, scaled: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        check_rectangular(scaled, Some(self.n_features()))?;
        Ok(scaled.iter()
            .map(|row| {
                row.iter().zip(&self.mean).zip(&self.scale)
                    .map(|((z, m), s)| z * s + m)
                    .collect()
            })
            .collect())
    }
}

/// Standard scaler that is fitted at most once.
#[derive(Debug, Clone, Default)]
pub struct StandardScaler {
    state: Option<ScalerState>,
}

impl StandardScaler {
    pub fn new() -> StandardScaler {
        StandardScaler { state: None }
    }

    /// Fits on training features. A fitted scaler refuses to refit so that no
    /// later data (test rows in particular) can leak into the parameters.
    pub fn fit(&mut self, train_features: &[Vec<f64>]) -> Result<&ScalerState> {
        if self.state.is_some() {
            return Err(Error::AlreadyFitted);
        }
        Ok(self.state.insert(ScalerState::fit(train_features)?))
    }

    pub fn is_fitted(&self) -> bool {
        self.state.is_some()
    }

    pub fn state(&self) -> Result<&ScalerState> {
        self.state.as_ref().ok_or(Error::NotFitted)
    }

    pub fn into_state(self) -> Result<ScalerState> {
        self.state.ok_or(Error::NotFitted)
    }

    pub fn transform(&self, features: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        self.state()?.transform(features)
    }

    pub fn inverse_transform(&self, scaled: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        self.state()?.inverse_transform(scaled)
    }
}

/// Returns the common row width, checking it against `expected` when given.
fn check_rectangular(rows: &[Vec<f64>], expected: Option<usize>) -> Result<usize> {
    let width = expected.or_else(|| rows.first().map(|r| r.len())).unwrap_or(0);
    match rows.iter().position(|r| r.len() != width) {
        Some(i) => Err(Error::ShapeMismatch {
            expected: format!("{} features per row", width),
            actual: format!("{} features in row {}", rows[i].len(), i),
        }),
        None => Ok(width),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn train() -> Vec<Vec<f64>> {
        vec![vec![1.0, 10.0, 5.0], vec![3.0, 20.0, 5.0], vec![5.0, 60.0, 5.0]]
    }

    #[test]
    fn standardizes_training_columns() {
        let state = ScalerState::fit(&train()).unwrap();
        assert_eq!(state.mean(), &[3.0, 30.0, 5.0]);
        assert!((state.scale()[0] - (8.0f64 / 3.0).sqrt()).abs() < 1e-12);
        // Constant column keeps unit scale.
        assert_eq!(state.scale()[2], 1.0);

        let scaled = state.transform(&train()).unwrap();
        for j in 0..2 {
            let col: Vec<f64> = scaled.iter().map(|r| r[j]).collect();
            let mean = col.iter().sum::<f64>() / 3.0;
            let var = col.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / 3.0;
            assert!(mean.abs() < 1e-12);
            assert!((var - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn transform_is_pure() {
        let mut scaler = StandardScaler::new();
        scaler.fit(&train()).unwrap();
        let before = scaler.state().unwrap().clone();

        let test = vec![vec![2.0, 15.0, 7.0], vec![100.0, -3.0, 0.0]];
        let first = scaler.transform(&test).unwrap();
        let second = scaler.transform(&test).unwrap();
        assert_eq!(first, second);
        assert_eq!(scaler.state().unwrap(), &before);

        let restored = scaler.inverse_transform(&first).unwrap();
        for (a, b) in restored.iter().flatten().zip(test.iter().flatten()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn transform_before_fit_is_not_fitted() {
        let scaler = StandardScaler::new();
        assert!(matches!(scaler.transform(&train()), Err(Error::NotFitted)));
        assert!(matches!(scaler.state(), Err(Error::NotFitted)));
    }

    #[test]
    fn refit_is_refused() {
        let mut scaler = StandardScaler::new();
        scaler.fit(&train()).unwrap();
        assert!(matches!(scaler.fit(&[vec![0.0, 0.0, 0.0]]), Err(Error::AlreadyFitted)));
        assert_eq!(scaler.state().unwrap().n_samples_seen(), 3);
    }

    #[test]
    fn width_mismatch_is_reported() {
        let state = ScalerState::fit(&train()).unwrap();
        assert!(matches!(state.transform(&[vec![1.0]]), Err(Error::ShapeMismatch { .. })));
        assert!(matches!(ScalerState::fit(&[]), Err(Error::ShapeMismatch { .. })));
    }
}
