use serde::Serialize;

use crate::math::{error::MatrixError, matrix::Matrix};

/// Outcome of one inference: the predicted class and the softmax probability
/// the network assigned to it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Digit {
    pub class_index: usize,
    pub probability: f32,
}

impl Digit {
    /// Reads the winning class out of a network output column.
    pub fn from_output(output: &Matrix) -> Result<Digit, MatrixError> {
        let class_index = output.argmax();
        Ok(Digit {
            class_index,
            probability: output.flat(class_index)?,
        })
    }
}
