/// Half mean squared error, the regression loss of the MLP.
pub struct MseLoss;

impl MseLoss {
    /// Scalar loss: 0.5 · mean((predicted - expected)²)
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        let n = predicted.len() as f64;
        predicted.iter().zip(expected.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f64>() / (2.0 * n)
    }

    /// Per-sample gradient w.r.t. the prediction: predicted - expected.
    /// The 1/n averaging is applied by the caller together with the
    /// regularization term.
    pub fn derivative(predicted: &[f64], expected: &[f64]) -> Vec<f64> {
        predicted.iter().zip(expected.iter())
            .map(|(a, b)| a - b)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_mean_squared_error() {
        let loss = MseLoss::loss(&[1.0, 3.0], &[0.0, 1.0]);
        assert!((loss - 1.25).abs() < 1e-12);
        assert_eq!(MseLoss::derivative(&[1.0, 3.0], &[0.0, 1.0]), vec![1.0, 2.0]);
    }
}
