use serde::{Deserialize, Serialize};

/// Running accumulator of regression errors against labels.
///
/// The label variance is tracked with Welford's update so that the baseline
/// (always predicting the label mean) comes out of the same pass.
#[derive(Debug, Default)]
pub struct RegressionMetrics {
    n: u64,
    label_mean: f64,
    label_m2: f64,
    absolute_error: f64,
    squared_error: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetricsOutput {
    pub n: u64,
    pub mse: f64,
    pub rmse: f64,
    pub mae: f64,
    pub r2: f64,
    pub baseline_mse: f64,
    pub baseline_rmse: f64,
}

impl RegressionMetrics {
    pub fn new() -> RegressionMetrics {
        RegressionMetrics::default()
    }

    pub fn update(&mut self, predictions: &[f64], labels: &[f64]) {
        for (prediction, label) in predictions.iter().zip(labels) {
            self.n += 1;
            let delta = label - self.label_mean;
            self.label_mean += delta / self.n as f64;
            self.label_m2 += delta * (label - self.label_mean);

            let error = prediction - label;
            self.absolute_error += error.abs();
            self.squared_error += error * error;
        }
    }

    pub fn finalize(self) -> RegressionMetricsOutput {
        let n = self.n as f64;
        let variance = if self.n > 0 { self.label_m2 / n } else { f64::NAN };
        let mse = self.squared_error / n;
        RegressionMetricsOutput {
            n: self.n,
            mse,
            rmse: mse.sqrt(),
            mae: self.absolute_error / n,
            r2: 1.0 - self.squared_error / (variance * n),
            baseline_mse: variance,
            baseline_rmse: variance.sqrt(),
        }
    }
}

/// Scores `predictions` against `labels` in one call.
pub fn evaluate(predictions: &[f64], labels: &[f64]) -> RegressionMetricsOutput {
    let mut metrics = RegressionMetrics::new();
    metrics.update(predictions, labels);
    metrics.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hand_computed_metrics() {
        let labels = [1.0, 2.0, 3.0, 4.0];
        let predictions = [1.5, 2.0, 2.0, 4.5];
        let out = evaluate(&predictions, &labels);

        // errors: 0.5, 0, -1, 0.5
        assert_eq!(out.n, 4);
        assert!((out.mae - 0.5).abs() < 1e-12);
        assert!((out.mse - 0.375).abs() < 1e-12);
        assert!((out.rmse - 0.375f64.sqrt()).abs() < 1e-12);
        assert!((out.baseline_mse - 1.25).abs() < 1e-12);
        assert!((out.r2 - (1.0 - 0.375 / 1.25)).abs() < 1e-12);
    }

    #[test]
    fn mean_predictor_scores_zero_r2() {
        let labels = [2.0, 4.0, 9.0];
        let out = evaluate(&[5.0, 5.0, 5.0], &labels);
        assert!(out.r2.abs() < 1e-12);
        assert!((out.mse - out.baseline_mse).abs() < 1e-12);
    }

    #[test]
    fn batches_accumulate_like_one_pass() {
        let mut running = RegressionMetrics::new();
        running.update(&[1.0, 2.0], &[1.5, 1.0]);
        running.update(&[0.0], &[3.0]);
        assert_eq!(running.finalize(), evaluate(&[1.0, 2.0, 0.0], &[1.5, 1.0, 3.0]));
    }
}
