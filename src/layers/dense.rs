use rand::Rng;

use crate::{activation::activation::ActivationFunction, math::matrix::Matrix};

/// Fully connected layer: `a = σ(x·W + b)`.
#[derive(Debug, Clone)]
pub struct Layer {
    pub size: usize,
    /// Shape `(input_size, size)`.
    pub weights: Matrix,
    pub biases: Vec<f64>,
    pub activator: ActivationFunction,
}

/// Values kept from a batched forward pass for the backward pass.
pub struct LayerOutput {
    /// Pre-activation `z = x·W + b`.
    pub pre: Matrix,
    /// Activation `σ(z)`.
    pub act: Matrix,
}

/// Gradients of one layer for one batch, already summed over the batch rows.
pub struct LayerGradients {
    pub weights: Matrix,
    pub biases: Vec<f64>,
    /// `∂L/∂z` for this layer; the caller propagates it through `weights`.
    pub delta: Matrix,
}

impl Layer {
    /// Glorot-uniform weights and biases drawn from the same bound.
    pub fn new<R: Rng>(
        size: usize,
        input_size: usize,
        activation: ActivationFunction,
        init_factor: f64,
        rng: &mut R,
    ) -> Layer {
        let weights = Matrix::glorot_uniform(input_size, size, init_factor, rng);
        let bound = (init_factor / (input_size + size) as f64).sqrt();
        let biases = (0..size).map(|_| rng.gen_range(-bound..bound)).collect();

        Layer { size, weights, biases, activator: activation }
    }

    pub fn input_size(&self) -> usize {
        self.weights.rows
    }

    pub fn n_params(&self) -> usize {
        self.weights.rows * self.weights.cols + self.biases.len()
    }

    pub fn feed_from(&self, input: &Matrix) -> LayerOutput {
        let mut pre = input.dot(&self.weights);
        pre.add_row(&self.biases);
        let act = pre.map(|x| self.activator.function(x));
        LayerOutput { pre, act }
    }

    /// `upstream` is ∂L/∂a for this layer (error in activation space),
    /// `inputs` is what was fed into the layer on the forward pass.
    pub fn compute_gradients(&self, mut upstream: Matrix, pre: &Matrix, inputs: &Matrix) -> LayerGradients {
        // δ = error ⊙ σ'(z)
        upstream.hadamard_assign(&pre.map(|x| self.activator.derivative(x)));
        let delta = upstream;

        LayerGradients {
            weights: inputs.t_dot(&delta),
            biases: delta.column_sums(),
            delta,
        }
    }

    /// Appends weights (row-major) then biases to `out`.
    pub fn write_params(&self, out: &mut Vec<f64>) {
        out.extend_from_slice(self.weights.as_slice());
        out.extend_from_slice(&self.biases);
    }

    /// Reads the layout written by `write_params`; returns the values consumed.
    pub fn read_params(&mut self, src: &[f64]) -> usize {
        let w = self.weights.rows * self.weights.cols;
        self.weights.as_mut_slice().copy_from_slice(&src[..w]);
        self.biases.copy_from_slice(&src[w..w + self.size]);
        w + self.size
    }
}
