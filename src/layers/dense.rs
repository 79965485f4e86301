use log::trace;

use crate::activation::activation::ActivationFunction;
use crate::math::{error::MatrixError, matrix::Matrix};

/// One affine-then-activate unit: `activation(weights * x + bias)`.
///
/// Weights are `out x in`, bias is `out x 1`. Immutable once built.
#[derive(Debug, Clone)]
pub struct Dense {
    weights: Matrix,
    bias: Matrix,
    activator: ActivationFunction,
}

impl Dense {
    pub fn new(weights: Matrix, bias: Matrix, activation: ActivationFunction) -> Dense {
        Dense {
            weights,
            bias,
            activator: activation,
        }
    }

    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    pub fn bias(&self) -> &Matrix {
        &self.bias
    }

    pub fn activation(&self) -> ActivationFunction {
        self.activator
    }

    pub fn input_size(&self) -> usize {
        self.weights.cols()
    }

    pub fn size(&self) -> usize {
        self.weights.rows()
    }

    /// Forward pass for one column vector.
    ///
    /// Fails with `DimensionMismatch` unless `input` has `weights.cols()` rows
    /// and the bias is an `out x 1` column.
    pub fn apply(&self, input: &Matrix) -> Result<Matrix, MatrixError> {
        if self.bias.cols() != 1 || self.bias.rows() != self.weights.rows() {
            let (weights, bias) = (self.weights.shape(), self.bias.shape());
            return Err(MatrixError::mismatch("dense bias", weights, bias));
        }
        let mut z = self.weights.multiply(input)?;
        z.add_assign(&self.bias)?;
        trace!("dense {:?} -> {:?} ({:?})", input.shape(), z.shape(), self.activator);
        Ok(self.activator.apply(&z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn col(values: &[f32]) -> Matrix {
        Matrix::from_vec(values.len(), 1, values.to_vec()).unwrap()
    }

    #[test]
    fn relu_layer_computes_affine_then_clamps() {
        let w = Matrix::from_rows(vec![vec![1.0, -1.0], vec![2.0, 0.5]]).unwrap();
        let b = col(&[0.5, -10.0]);
        let layer = Dense::new(w, b, ActivationFunction::ReLU);

        let out = layer.apply(&col(&[3.0, 1.0])).unwrap();
        assert_eq!(out, col(&[2.5, 0.0]));
    }

    #[test]
    fn softmax_layer_normalizes_output() {
        let w = Matrix::identity(3).unwrap();
        let b = col(&[0.0, 0.0, 0.0]);
        let layer = Dense::new(w, b, ActivationFunction::Softmax);

        let out = layer.apply(&col(&[1.0, 1.0, 1.0])).unwrap();
        for k in 0..3 {
            assert_abs_diff_eq!(out.flat(k).unwrap(), 1.0 / 3.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn rejects_input_of_wrong_height() {
        let layer = Dense::new(
            Matrix::zeros(2, 3).unwrap(),
            Matrix::zeros(2, 1).unwrap(),
            ActivationFunction::ReLU,
        );
        assert!(matches!(
            layer.apply(&col(&[1.0, 2.0])).unwrap_err(),
            MatrixError::DimensionMismatch { op: "multiply", .. }
        ));
    }

    #[test]
    fn rejects_bias_that_is_not_a_matching_column() {
        let wide = Dense::new(
            Matrix::zeros(2, 2).unwrap(),
            Matrix::zeros(2, 2).unwrap(),
            ActivationFunction::ReLU,
        );
        assert!(matches!(
            wide.apply(&col(&[1.0, 2.0])).unwrap_err(),
            MatrixError::DimensionMismatch { op: "dense bias", .. }
        ));

        let short = Dense::new(
            Matrix::zeros(2, 2).unwrap(),
            Matrix::zeros(3, 1).unwrap(),
            ActivationFunction::ReLU,
        );
        assert!(short.apply(&col(&[1.0, 2.0])).is_err());
    }

    #[test]
    fn keeps_independent_copies() {
        let mut w = Matrix::identity(2).unwrap();
        let layer = Dense::new(w.clone(), Matrix::zeros(2, 1).unwrap(), ActivationFunction::ReLU);
        *w.at_mut(0, 0).unwrap() = 5.0;
        assert_eq!(layer.weights().at(0, 0).unwrap(), 1.0);
        assert_eq!(layer.bias().shape(), (2, 1));
        assert_eq!(layer.activation(), ActivationFunction::ReLU);
        assert_eq!((layer.size(), layer.input_size()), (2, 2));
    }
}
