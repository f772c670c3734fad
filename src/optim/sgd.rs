use crate::optim::Optimizer;

/// Stochastic gradient descent with Nesterov momentum.
pub struct Sgd {
    pub learning_rate: f64,
    pub momentum: f64,
    velocity: Vec<f64>,
}

impl Sgd {
    pub fn new(len: usize, learning_rate: f64, momentum: f64) -> Sgd {
        Sgd { learning_rate, momentum, velocity: vec![0.0; len] }
    }
}

impl Optimizer for Sgd {
    fn update_params(&mut self, grad: &[f64], params: &mut [f64]) {
        assert_eq!(grad.len(), params.len());
        assert_eq!(grad.len(), self.velocity.len());
        let (lr, mu) = (self.learning_rate, self.momentum);

        for ((p, g), v) in params.iter_mut().zip(grad).zip(self.velocity.iter_mut()) {
            *v = mu * *v - lr * g;
            // Nesterov look-ahead.
            *p += mu * *v - lr * g;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_step_is_lookahead_scaled_gradient() {
        let mut sgd = Sgd::new(2, 0.1, 0.9);
        let mut params = vec![1.0, -1.0];
        sgd.update_params(&[1.0, -2.0], &mut params);
        // v = -0.1·g, update = 0.9·v - 0.1·g = -0.19·g
        assert!((params[0] - (1.0 - 0.19)).abs() < 1e-12);
        assert!((params[1] - (-1.0 + 0.38)).abs() < 1e-12);
    }
}
