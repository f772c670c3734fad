use std::time::Instant;

use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::FitError;
use crate::math::matrix::Matrix;
use crate::network::network::Network;
use crate::optim::lbfgs::{Lbfgs, LbfgsStop};
use crate::optim::Optimizer;
use crate::train::iteration_stats::IterationStats;
use crate::train::train_config::{LoopOutcome, TrainConfig};

// ---------------------------------------------------------------------------
// Mini-batch solvers (adam, sgd)
// ---------------------------------------------------------------------------

/// Trains `network` with a first-order `optimizer` over shuffled mini-batches.
///
/// Every epoch reshuffles the row order with `rng`, applies one update per
/// batch and records the row-weighted mean batch loss. The loop stops after
/// `config.max_iter` epochs, or earlier once the epoch loss has failed to
/// improve on the best loss so far by `config.tol` for more than
/// `config.n_iter_no_change` consecutive epochs.
///
/// # Arguments
/// - `network`      : modified in place
/// - `train_inputs` : scaled training rows, each of length `network.input_size()`
/// - `train_targets`: one target per row
/// - `optimizer`    : update rule sized for `network.n_params()`
/// - `on_iteration` : called once per completed epoch
///
/// # Errors
/// `Diverged` as soon as an epoch loss is not finite.
pub fn train_loop<R: Rng>(
    network: &mut Network,
    train_inputs: &[Vec<f64>],
    train_targets: &[f64],
    optimizer: &mut dyn Optimizer,
    config: &TrainConfig,
    rng: &mut R,
    on_iteration: &mut dyn FnMut(&IterationStats),
) -> Result<LoopOutcome, FitError> {
    let n = train_inputs.len();
    let batch_size = config.effective_batch_size(n);

    let mut order: Vec<usize> = (0..n).collect();
    let mut params = network.flat_params();
    let mut loss_curve = Vec::with_capacity(config.max_iter);
    let mut best_loss = f64::INFINITY;
    let mut no_improvement = 0;
    let mut converged = false;

    for epoch in 1..=config.max_iter {
        let t_start = Instant::now();

        // ── One full pass over the shuffled training rows ──────────────────
        order.shuffle(rng);
        let mut accumulated = 0.0;
        for batch in order.chunks(batch_size) {
            let x = Matrix::gather_rows(train_inputs, batch);
            let y: Vec<f64> = batch.iter().map(|&i| train_targets[i]).collect();

            let (loss, grad) = network.loss_and_gradient(&x, &y, config.alpha);
            optimizer.update_params(&grad, &mut params);
            network.set_flat_params(&params);
            accumulated += loss * batch.len() as f64;
        }
        let loss = accumulated / n as f64;
        if !loss.is_finite() {
            return Err(FitError::Diverged { iteration: epoch });
        }
        loss_curve.push(loss);

        // ── Emit progress ─────────────────────────────────────────────────
        let stats = IterationStats {
            iteration: epoch,
            total_iterations: config.max_iter,
            loss,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };
        debug!("iteration {}/{}: loss {:.6}", epoch, config.max_iter, loss);
        on_iteration(&stats);

        // ── Patience ──────────────────────────────────────────────────────
        if loss > best_loss - config.tol {
            no_improvement += 1;
        } else {
            no_improvement = 0;
        }
        if loss < best_loss {
            best_loss = loss;
        }
        if no_improvement > config.n_iter_no_change {
            debug!(
                "training loss did not improve more than tol={} for {} consecutive epochs; stopping",
                config.tol,
                no_improvement
            );
            converged = true;
            break;
        }
    }

    if !converged {
        warn!(
            "stochastic optimizer: maximum iterations ({}) reached and the optimization hasn't converged yet",
            config.max_iter
        );
    }

    Ok(LoopOutcome {
        iterations: loss_curve.len(),
        final_loss: loss_curve.last().copied().unwrap_or(f64::NAN),
        converged,
        loss_curve,
    })
}

// ---------------------------------------------------------------------------
// Full-batch solver (lbfgs)
// ---------------------------------------------------------------------------

/// Trains `network` with full-batch L-BFGS. `config.tol` is the gradient
/// tolerance; `batch_size` and `n_iter_no_change` do not apply.
pub fn train_lbfgs(
    network: &mut Network,
    train_inputs: &[Vec<f64>],
    train_targets: &[f64],
    config: &TrainConfig,
    on_iteration: &mut dyn FnMut(&IterationStats),
) -> Result<LoopOutcome, FitError> {
    let x = Matrix::from_rows(train_inputs);
    let solver = Lbfgs::new(config.max_iter, config.tol);

    let mut probe = network.clone();
    let mut loss_curve = Vec::with_capacity(config.max_iter);
    let mut t_start = Instant::now();

    let outcome = solver.minimize(
        network.flat_params(),
        |params| {
            probe.set_flat_params(params);
            probe.loss_and_gradient(&x, train_targets, config.alpha)
        },
        |iteration, loss| {
            loss_curve.push(loss);
            debug!("iteration {}/{}: loss {:.6}", iteration, config.max_iter, loss);
            on_iteration(&IterationStats {
                iteration,
                total_iterations: config.max_iter,
                loss,
                elapsed_ms: t_start.elapsed().as_millis() as u64,
            });
            t_start = Instant::now();
        },
    )?;

    network.set_flat_params(&outcome.params);
    let converged = match outcome.stop {
        LbfgsStop::Converged => true,
        LbfgsStop::LineSearchFailed => {
            warn!("lbfgs: line search found no decrease after {} iterations", outcome.iterations);
            false
        }
        LbfgsStop::MaxIter => {
            warn!(
                "lbfgs: maximum iterations ({}) reached and the optimization hasn't converged yet",
                config.max_iter
            );
            false
        }
    };

    Ok(LoopOutcome {
        iterations: outcome.iterations,
        final_loss: outcome.loss,
        converged,
        loss_curve,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::activation::ActivationFunction;
    use crate::network::spec::NetworkSpec;
    use crate::optim::{Adam, Sgd};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn linear_problem(n: usize) -> (Vec<Vec<f64>>, Vec<f64>) {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let x: Vec<Vec<f64>> = (0..n)
            .map(|_| vec![rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)])
            .collect();
        let y = x.iter().map(|r| 0.8 * r[0] - 0.5 * r[1] + 0.1).collect();
        (x, y)
    }

    fn network(rng: &mut ChaCha8Rng) -> Network {
        let spec = NetworkSpec::regressor(2, 8, ActivationFunction::Tanh);
        Network::new(&spec, ActivationFunction::Tanh.glorot_factor(), rng)
    }

    fn config(max_iter: usize) -> TrainConfig {
        TrainConfig { max_iter, batch_size: 32, tol: 1e-4, n_iter_no_change: 10, alpha: 1e-4 }
    }

    #[test]
    fn adam_reduces_loss_and_reports_every_epoch() {
        let (x, y) = linear_problem(256);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut net = network(&mut rng);
        let mut adam = Adam::new(net.n_params(), 0.01, 0.9, 0.999, 1e-8);

        let mut seen = Vec::new();
        let out = train_loop(&mut net, &x, &y, &mut adam, &config(60), &mut rng, &mut |s| seen.push(s.iteration))
            .unwrap();

        assert_eq!(seen, (1..=out.iterations).collect::<Vec<_>>());
        assert_eq!(out.loss_curve.len(), out.iterations);
        assert!(out.final_loss < out.loss_curve[0] * 0.5, "{:?}", out.loss_curve);
    }

    #[test]
    fn patience_stops_after_n_iter_no_change_plus_one() {
        let (x, y) = linear_problem(64);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut net = network(&mut rng);
        let mut sgd = Sgd::new(net.n_params(), 0.001, 0.9);
        // An enormous tolerance means no epoch after the first counts as progress.
        let cfg = TrainConfig { tol: 1e9, ..config(100) };

        let out = train_loop(&mut net, &x, &y, &mut sgd, &cfg, &mut rng, &mut |_| {}).unwrap();
        assert!(out.converged);
        assert_eq!(out.iterations, cfg.n_iter_no_change + 2);
    }

    #[test]
    fn non_finite_targets_diverge_in_first_epoch() {
        let (x, mut y) = linear_problem(16);
        y[3] = f64::NAN;
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut net = network(&mut rng);
        let mut adam = Adam::new(net.n_params(), 0.001, 0.9, 0.999, 1e-8);

        let err = train_loop(&mut net, &x, &y, &mut adam, &config(10), &mut rng, &mut |_| {}).unwrap_err();
        assert_eq!(err, FitError::Diverged { iteration: 1 });
    }

    #[test]
    fn lbfgs_fits_linear_target() {
        let (x, y) = linear_problem(128);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut net = network(&mut rng);

        let mut calls = 0;
        let out = train_lbfgs(&mut net, &x, &y, &config(200), &mut |_| calls += 1).unwrap();
        assert_eq!(calls, out.iterations);
        assert!(out.final_loss < 5e-3, "final loss {}", out.final_loss);

        let predicted = net.predict(&Matrix::from_rows(&x));
        let sse: f64 = predicted.iter().zip(&y).map(|(p, t)| (p - t).powi(2)).sum();
        assert!(sse / (x.len() as f64) < 1e-2);
    }
}
