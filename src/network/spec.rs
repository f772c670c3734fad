use serde::{Deserialize, Serialize};

use crate::activation::activation::ActivationFunction;

/// Describes one layer in a network specification.
///
/// Fields:
/// - `size`      : number of neurons in this layer
/// - `input_size`: output size of the previous layer, or the raw input
///                  dimension for the first layer
/// - `activation`: activation function applied after the linear transform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub size: usize,
    pub input_size: usize,
    pub activation: ActivationFunction,
}

/// Architecture of a network, independent of its weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Ordered list of layer descriptions (input → output).
    pub layers: Vec<LayerSpec>,
}

impl NetworkSpec {
    /// One hidden layer of `hidden_width` units followed by a single
    /// identity output unit.
    pub fn regressor(n_features: usize, hidden_width: usize, activation: ActivationFunction) -> NetworkSpec {
        NetworkSpec {
            layers: vec![
                LayerSpec { size: hidden_width, input_size: n_features, activation },
                LayerSpec { size: 1, input_size: hidden_width, activation: ActivationFunction::Identity },
            ],
        }
    }
}
