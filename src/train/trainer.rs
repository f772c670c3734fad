use std::thread;
use std::time::{Duration, Instant};

use log::{error, info};

use crate::error::{Error, Result};
use crate::model::regressor::Regressor;
use crate::train::progress::{iteration_percent, Progress, ProgressMode};

/// Outcome of a successful training run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingReport {
    pub iterations: usize,
    pub final_loss: f64,
    pub converged: bool,
    /// Wall-clock time spent inside fit.
    pub elapsed: Duration,
}

/// Runs one fit per call and reports progress along the way.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrainingController {
    mode: ProgressMode,
}

impl TrainingController {
    pub fn new(mode: ProgressMode) -> TrainingController {
        TrainingController { mode }
    }

    pub fn mode(&self) -> ProgressMode {
        self.mode
    }

    /// Fits `model` on scaled training rows and hands it back trained.
    ///
    /// Fit is invoked exactly once, synchronously. Progress events never go
    /// backwards and the 100% event is sent only after fit has returned
    /// successfully. A fit error is surfaced as `TrainingFailed`; the model is
    /// dropped with it and nothing is retried.
    pub fn train<M: Regressor>(
        &self,
        mut model: M,
        features: &[Vec<f64>],
        targets: &[f64],
        on_progress: &mut dyn FnMut(&Progress),
    ) -> Result<(M, TrainingReport)> {
        info!("training on {} rows ({} progress)", features.len(), self.mode);
        on_progress(&Progress::new(0, "Training started"));

        let mut last = 0u8;
        let started = Instant::now();
        let fitted = match self.mode {
            ProgressMode::Cosmetic { .. } => model.fit(features, targets, &mut |_| {}),
            ProgressMode::Iterations => model.fit(features, targets, &mut |stats| {
                let percent = iteration_percent(stats.iteration, stats.total_iterations);
                if percent > last {
                    last = percent;
                    on_progress(&Progress::new(
                        percent,
                        format!("Iteration {}/{}, loss {:.4}", stats.iteration, stats.total_iterations, stats.loss),
                    ));
                }
            }),
        };
        let elapsed = started.elapsed();

        let summary = fitted.map_err(|e| {
            error!("training failed after {:?}: {}", elapsed, e);
            Error::TrainingFailed(e)
        })?;

        if let ProgressMode::Cosmetic { steps, .. } = self.mode {
            let interval = self.mode.tick_interval();
            for i in 1..steps {
                thread::sleep(interval);
                let percent = (u64::from(i) * 100 / u64::from(steps)) as u8;
                if percent > last {
                    last = percent;
                    on_progress(&Progress::new(percent, "Training in progress"));
                }
            }
            thread::sleep(interval);
        }
        on_progress(&Progress::new(100, "Training complete"));

        info!(
            "training complete: {} iterations in {:.2?}, final loss {:.6}",
            summary.iterations, elapsed, summary.final_loss
        );
        let report = TrainingReport {
            iterations: summary.iterations,
            final_loss: summary.final_loss,
            converged: summary.converged,
            elapsed,
        };
        Ok((model, report))
    }
}
