use rand::Rng;

use crate::{
    layers::dense::{Layer, LayerOutput},
    loss::mse::MseLoss,
    math::matrix::Matrix,
    network::spec::NetworkSpec,
};

#[derive(Debug, Clone)]
pub struct Network {
    pub layers: Vec<Layer>,
}

impl Network {
    /// Builds a network from its spec. Every layer uses the same Glorot
    /// `init_factor`, chosen from the hidden activation.
    pub fn new<R: Rng>(spec: &NetworkSpec, init_factor: f64, rng: &mut R) -> Network {
        let layers = spec.layers.iter()
            .map(|l| Layer::new(l.size, l.input_size, l.activation, init_factor, rng))
            .collect();
        Network { layers }
    }

    pub fn input_size(&self) -> usize {
        self.layers.first().map(|l| l.input_size()).unwrap_or(0)
    }

    /// Batched forward pass; returns every layer's `(z, a)` for backprop.
    pub fn forward(&self, input: &Matrix) -> Vec<LayerOutput> {
        let mut outputs: Vec<LayerOutput> = Vec::with_capacity(self.layers.len());
        for layer in &self.layers {
            let out = match outputs.last() {
                Some(prev) => layer.feed_from(&prev.act),
                None => layer.feed_from(input),
            };
            outputs.push(out);
        }
        outputs
    }

    /// Output of the single regression unit for every row of `input`.
    pub fn predict(&self, input: &Matrix) -> Vec<f64> {
        match self.forward(input).pop() {
            Some(out) => out.act.into_vec(),
            None => vec![0.0; input.rows],
        }
    }

    pub fn n_params(&self) -> usize {
        self.layers.iter().map(|l| l.n_params()).sum()
    }

    /// All weights and biases, layer by layer, as one flat vector.
    pub fn flat_params(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.n_params());
        for layer in &self.layers {
            layer.write_params(&mut out);
        }
        out
    }

    pub fn set_flat_params(&mut self, params: &[f64]) {
        assert_eq!(params.len(), self.n_params(), "parameter vector length mismatch");
        let mut offset = 0;
        for layer in &mut self.layers {
            offset += layer.read_params(&params[offset..]);
        }
    }

    /// Regularized loss and its gradient over one batch.
    ///
    /// Loss is `0.5·mean((ŷ - y)²) + 0.5·alpha·Σ‖W‖² / n`; the gradient is
    /// laid out like `flat_params`.
    pub fn loss_and_gradient(&self, input: &Matrix, targets: &[f64], alpha: f64) -> (f64, Vec<f64>) {
        let n = input.rows as f64;
        let outputs = self.forward(input);
        let predicted = match outputs.last() {
            Some(out) => out.act.as_slice(),
            None => return (0.0, Vec::new()),
        };

        let penalty: f64 = self.layers.iter().map(|l| l.weights.squared_sum()).sum();
        let loss = MseLoss::loss(predicted, targets) + 0.5 * alpha * penalty / n;

        // Initial delta: ∂L/∂a_output
        let error = MseLoss::derivative(predicted, targets);
        let mut upstream = Matrix::from_vec(input.rows, 1, error);

        let mut per_layer: Vec<(Matrix, Vec<f64>)> = Vec::with_capacity(self.layers.len());
        for i in (0..self.layers.len()).rev() {
            let layer = &self.layers[i];
            let layer_input = if i == 0 { input } else { &outputs[i - 1].act };

            let grads = layer.compute_gradients(upstream, &outputs[i].pre, layer_input);

            // Propagate δ_i through the weights to get ∂L/∂a_{i-1}.
            upstream = if i > 0 { grads.delta.dot_t(&layer.weights) } else { Matrix::default() };

            let mut w_grad = grads.weights;
            for (g, w) in w_grad.as_mut_slice().iter_mut().zip(layer.weights.as_slice()) {
                *g = (*g + alpha * w) / n;
            }
            let b_grad = grads.biases.into_iter().map(|g| g / n).collect();
            per_layer.push((w_grad, b_grad));
        }

        let mut gradient = Vec::with_capacity(self.n_params());
        for (w_grad, b_grad) in per_layer.into_iter().rev() {
            gradient.extend_from_slice(w_grad.as_slice());
            gradient.extend(b_grad);
        }
        (loss, gradient)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::activation::ActivationFunction;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn toy() -> (Network, Matrix, Vec<f64>) {
        let spec = NetworkSpec::regressor(3, 4, ActivationFunction::Tanh);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let net = Network::new(&spec, 6.0, &mut rng);
        let x = Matrix::from_rows(&[
            vec![0.1, -0.4, 1.2],
            vec![-1.0, 0.3, 0.0],
            vec![0.5, 0.5, -0.7],
        ]);
        (net, x, vec![0.3, -1.1, 0.8])
    }

    #[test]
    fn gradient_matches_finite_differences() {
        let (mut net, x, y) = toy();
        let alpha = 0.1;
        let (_, analytic) = net.loss_and_gradient(&x, &y, alpha);
        let base = net.flat_params();
        let h = 1e-6;

        for k in 0..base.len() {
            let mut plus = base.clone();
            plus[k] += h;
            net.set_flat_params(&plus);
            let (lp, _) = net.loss_and_gradient(&x, &y, alpha);

            let mut minus = base.clone();
            minus[k] -= h;
            net.set_flat_params(&minus);
            let (lm, _) = net.loss_and_gradient(&x, &y, alpha);

            let numeric = (lp - lm) / (2.0 * h);
            assert!((numeric - analytic[k]).abs() < 1e-6, "param {}: {} vs {}", k, numeric, analytic[k]);
        }
    }

    #[test]
    fn flat_params_round_trip_through_layers() {
        let (mut net, x, _) = toy();
        assert_eq!(net.n_params(), 3 * 4 + 4 + 4 + 1);
        let before = net.predict(&x);
        let params = net.flat_params();
        net.set_flat_params(&params);
        assert_eq!(net.predict(&x), before);
    }
}
