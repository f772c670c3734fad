use crate::optim::Optimizer;

/// Adam with bias-corrected step size.
///
/// The correction is folded into the learning rate each step,
/// `lr_t = lr·√(1-β₂ᵗ)/(1-β₁ᵗ)`, so the moment buffers stay uncorrected.
#[derive(Debug)]
pub struct Adam {
    pub learning_rate: f64,
    pub beta_1: f64,
    pub beta_2: f64,
    pub epsilon: f64,
    /// Completed updates.
    t: i32,
    first_moment: Vec<f64>,
    second_moment: Vec<f64>,
}

impl Adam {
    pub fn new(len: usize, learning_rate: f64, beta_1: f64, beta_2: f64, epsilon: f64) -> Adam {
        Adam {
            learning_rate,
            beta_1,
            beta_2,
            epsilon,
            t: 0,
            first_moment: vec![0.0; len],
            second_moment: vec![0.0; len],
        }
    }

    fn step_size(&self) -> f64 {
        let correction_1 = 1.0 - self.beta_1.powi(self.t);
        let correction_2 = 1.0 - self.beta_2.powi(self.t);
        self.learning_rate * correction_2.sqrt() / correction_1
    }
}

impl Optimizer for Adam {
    fn update_params(&mut self, grad: &[f64], params: &mut [f64]) {
        assert_eq!(grad.len(), params.len());
        assert_eq!(grad.len(), self.first_moment.len());

        self.t += 1;
        let lr_t = self.step_size();
        let (b1, b2, eps) = (self.beta_1, self.beta_2, self.epsilon);

        for (i, (p, g)) in params.iter_mut().zip(grad).enumerate() {
            let m = &mut self.first_moment[i];
            let v = &mut self.second_moment[i];
            *m = b1 * *m + (1.0 - b1) * g;
            *v = b2 * *v + (1.0 - b2) * g * g;
            *p -= lr_t * *m / (v.sqrt() + eps);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_step_moves_by_learning_rate() {
        let mut adam = Adam::new(2, 0.001, 0.9, 0.999, 1e-8);
        let mut params = vec![0.5, 0.5];
        adam.update_params(&[3.0, -0.2], &mut params);
        // Bias-corrected first step is lr·sign(g) up to epsilon.
        assert!((params[0] - 0.499).abs() < 1e-6);
        assert!((params[1] - 0.501).abs() < 1e-6);
    }

    #[test]
    fn constant_gradient_keeps_a_constant_step() {
        let mut adam = Adam::new(1, 0.01, 0.9, 0.999, 1e-8);
        let mut params = vec![0.0];
        for _ in 0..3 {
            adam.update_params(&[2.5], &mut params);
        }
        // m and v track g and g² exactly once corrected, so each step is lr.
        assert!((params[0] + 0.03).abs() < 1e-6, "{}", params[0]);
        assert_eq!(adam.t, 3);
    }
}
