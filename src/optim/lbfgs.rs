use std::collections::VecDeque;

use crate::error::FitError;

/// Why an L-BFGS run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LbfgsStop {
    /// Gradient or relative loss change fell below tolerance.
    Converged,
    /// No step along the search direction decreased the loss.
    LineSearchFailed,
    MaxIter,
}

#[derive(Debug, Clone)]
pub struct LbfgsOutcome {
    pub params: Vec<f64>,
    pub loss: f64,
    pub iterations: usize,
    pub stop: LbfgsStop,
}

/// Limited-memory BFGS over a flat parameter vector, with a backtracking
/// Armijo line search.
#[derive(Debug, Clone)]
pub struct Lbfgs {
    /// Number of correction pairs kept.
    pub history: usize,
    pub max_iter: usize,
    /// Stop once `max |g_i|` is at most this.
    pub gtol: f64,
    /// Stop once the relative loss decrease of an iteration is at most this.
    pub ftol: f64,
    pub max_line_search: usize,
}

const ARMIJO_C1: f64 = 1e-4;

impl Lbfgs {
    pub fn new(max_iter: usize, gtol: f64) -> Lbfgs {
        Lbfgs {
            history: 10,
            max_iter,
            gtol,
            ftol: 1e7 * f64::EPSILON,
            max_line_search: 30,
        }
    }

    /// Minimizes `fg`, which returns the loss and gradient at a point.
    /// `on_iter` sees `(iteration, loss)` after every accepted step.
    pub fn minimize<F, C>(&self, x0: Vec<f64>, mut fg: F, mut on_iter: C) -> Result<LbfgsOutcome, FitError>
    where
        F: FnMut(&[f64]) -> (f64, Vec<f64>),
        C: FnMut(usize, f64),
    {
        let mut x = x0;
        let (mut f, mut g) = fg(&x);
        if !f.is_finite() {
            return Err(FitError::Diverged { iteration: 0 });
        }

        let mut s_hist: VecDeque<Vec<f64>> = VecDeque::with_capacity(self.history);
        let mut y_hist: VecDeque<Vec<f64>> = VecDeque::with_capacity(self.history);
        let mut rho_hist: VecDeque<f64> = VecDeque::with_capacity(self.history);

        let finish = |x: Vec<f64>, f: f64, iterations: usize, stop: LbfgsStop| {
            Ok(LbfgsOutcome { params: x, loss: f, iterations, stop })
        };

        for iter in 1..=self.max_iter {
            if inf_norm(&g) <= self.gtol {
                return finish(x, f, iter - 1, LbfgsStop::Converged);
            }

            // Two-loop recursion: d = -H·g
            let mut q = g.clone();
            let mut alphas = vec![0.0; s_hist.len()];
            for i in (0..s_hist.len()).rev() {
                alphas[i] = rho_hist[i] * dot(&s_hist[i], &q);
                axpy(-alphas[i], &y_hist[i], &mut q);
            }
            let gamma = match (s_hist.back(), y_hist.back()) {
                (Some(s), Some(y)) => dot(s, y) / dot(y, y),
                _ => 1.0 / dot(&g, &g).sqrt().max(1.0),
            };
            q.iter_mut().for_each(|v| *v *= gamma);
            for i in 0..s_hist.len() {
                let beta = rho_hist[i] * dot(&y_hist[i], &q);
                axpy(alphas[i] - beta, &s_hist[i], &mut q);
            }
            let mut d: Vec<f64> = q.into_iter().map(|v| -v).collect();

            let mut gd = dot(&g, &d);
            if gd >= 0.0 {
                // Not a descent direction; restart from steepest descent.
                d = g.iter().map(|v| -v).collect();
                gd = -dot(&g, &g);
                s_hist.clear();
                y_hist.clear();
                rho_hist.clear();
            }

            let mut step = 1.0;
            let mut accepted = None;
            for _ in 0..self.max_line_search {
                let candidate: Vec<f64> = x.iter().zip(&d).map(|(xi, di)| xi + step * di).collect();
                let (f_new, g_new) = fg(&candidate);
                if f_new.is_finite() && f_new <= f + ARMIJO_C1 * step * gd {
                    accepted = Some((candidate, f_new, g_new));
                    break;
                }
                step *= 0.5;
            }
            let Some((x_new, f_new, g_new)) = accepted else {
                return finish(x, f, iter - 1, LbfgsStop::LineSearchFailed);
            };

            let s: Vec<f64> = x_new.iter().zip(&x).map(|(a, b)| a - b).collect();
            let y: Vec<f64> = g_new.iter().zip(&g).map(|(a, b)| a - b).collect();
            let sy = dot(&s, &y);
            if sy > 1e-10 {
                if s_hist.len() == self.history {
                    s_hist.pop_front();
                    y_hist.pop_front();
                    rho_hist.pop_front();
                }
                s_hist.push_back(s);
                y_hist.push_back(y);
                rho_hist.push_back(1.0 / sy);
            }

            let relative_decrease = (f - f_new) / f.abs().max(f_new.abs()).max(1.0);
            x = x_new;
            f = f_new;
            g = g_new;
            on_iter(iter, f);

            if relative_decrease <= self.ftol {
                return finish(x, f, iter, LbfgsStop::Converged);
            }
        }

        finish(x, f, self.max_iter, LbfgsStop::MaxIter)
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn axpy(alpha: f64, x: &[f64], y: &mut [f64]) {
    for (yi, xi) in y.iter_mut().zip(x) {
        *yi += alpha * xi;
    }
}

fn inf_norm(v: &[f64]) -> f64 {
    v.iter().fold(0.0, |m, x| m.max(x.abs()))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Rosenbrock in two dimensions, minimum at (1, 1).
    fn rosenbrock(p: &[f64]) -> (f64, Vec<f64>) {
        let (x, y) = (p[0], p[1]);
        let f = (1.0 - x).powi(2) + 100.0 * (y - x * x).powi(2);
        let gx = -2.0 * (1.0 - x) - 400.0 * x * (y - x * x);
        let gy = 200.0 * (y - x * x);
        (f, vec![gx, gy])
    }

    #[test]
    fn finds_rosenbrock_minimum() {
        let mut solver = Lbfgs::new(500, 1e-8);
        solver.ftol = 0.0;
        let mut seen = Vec::new();
        let out = solver.minimize(vec![-1.2, 1.0], rosenbrock, |i, f| seen.push((i, f))).unwrap();

        assert!((out.params[0] - 1.0).abs() < 1e-3, "{:?}", out);
        assert!((out.params[1] - 1.0).abs() < 1e-3, "{:?}", out);
        assert_eq!(seen.len(), out.iterations);
        // Armijo steps never increase the loss.
        assert!(seen.windows(2).all(|w| w[1].1 <= w[0].1));
    }

    #[test]
    fn stops_at_iteration_cap() {
        let solver = Lbfgs::new(3, 0.0);
        let out = solver.minimize(vec![-1.2, 1.0], rosenbrock, |_, _| {}).unwrap();
        assert!(out.iterations <= 3);
    }

    #[test]
    fn non_finite_start_is_divergence() {
        let solver = Lbfgs::new(10, 1e-4);
        let err = solver.minimize(vec![0.0], |_| (f64::NAN, vec![0.0]), |_, _| {}).unwrap_err();
        assert_eq!(err, FitError::Diverged { iteration: 0 });
    }
}
