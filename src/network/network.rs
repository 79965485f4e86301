use log::debug;

use crate::{
    activation::activation::ActivationFunction,
    layers::dense::Dense,
    math::{error::MatrixError, matrix::Matrix},
    network::digit::Digit,
};

/// Number of dense layers in the classifier.
pub const LAYER_COUNT: usize = 4;

/// Fixed four-layer perceptron: three ReLU layers followed by a softmax
/// output layer.
///
/// Holds no per-call state, so one instance can serve any number of
/// `infer` calls, including from several threads at once.
#[derive(Debug, Clone)]
pub struct MlpNetwork {
    layers: [Dense; LAYER_COUNT],
}

impl MlpNetwork {
    /// Builds the network from `(weights, bias)` pairs, input side first.
    ///
    /// Shapes are not cross-checked here; a broken chain surfaces as
    /// `DimensionMismatch` from the first `infer` call that reaches it.
    pub fn new(weights: [Matrix; LAYER_COUNT], biases: [Matrix; LAYER_COUNT]) -> MlpNetwork {
        let [w1, w2, w3, w4] = weights;
        let [b1, b2, b3, b4] = biases;
        MlpNetwork::from_layers([
            Dense::new(w1, b1, ActivationFunction::ReLU),
            Dense::new(w2, b2, ActivationFunction::ReLU),
            Dense::new(w3, b3, ActivationFunction::ReLU),
            Dense::new(w4, b4, ActivationFunction::Softmax),
        ])
    }

    pub fn from_layers(layers: [Dense; LAYER_COUNT]) -> MlpNetwork {
        MlpNetwork { layers }
    }

    pub fn layers(&self) -> &[Dense; LAYER_COUNT] {
        &self.layers
    }

    /// Length of the input the first layer expects once vectorized.
    pub fn input_size(&self) -> usize {
        self.layers[0].input_size()
    }

    pub fn class_count(&self) -> usize {
        self.layers[LAYER_COUNT - 1].size()
    }

    /// Runs the forward pass and returns the full output column.
    ///
    /// `input` may have any shape; it is copied and vectorized first.
    pub fn infer_probabilities(&self, input: &Matrix) -> Result<Matrix, MatrixError> {
        let mut current = input.clone();
        current.vectorize();
        for (i, layer) in self.layers.iter().enumerate() {
            current = layer.apply(&current)?;
            debug!("layer {} output {:?}", i + 1, current.shape());
        }
        Ok(current)
    }

    /// Classifies one sample.
    pub fn infer(&self, input: &Matrix) -> Result<Digit, MatrixError> {
        let output = self.infer_probabilities(input)?;
        Digit::from_output(&output)
    }
}
