use crate::math::matrix::Matrix;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationFunction {
    ReLU,
    /// Normalizes the whole matrix as one flat vector, so it cannot be
    /// applied element by element.
    Softmax,
}

impl ActivationFunction {
    pub fn apply(&self, mat: &Matrix) -> Matrix {
        match self {
            ActivationFunction::ReLU => relu(mat),
            ActivationFunction::Softmax => softmax(mat),
        }
    }
}

/// Element-wise `max(0, x)`.
pub fn relu(mat: &Matrix) -> Matrix {
    mat.map(|x| if x > 0.0 { x } else { 0.0 })
}

/// `exp(x_k) / sum_j exp(x_j)` over every element of `mat`, regardless of
/// its shape. The output sums to 1.
///
/// The maximum is subtracted before exponentiating; this leaves the result
/// unchanged and keeps large logits from overflowing to `inf`.
pub fn softmax(mat: &Matrix) -> Matrix {
    let max = mat.as_slice().iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps = mat.map(|x| (x - max).exp());
    let total = exps.sum();
    exps.scale(1.0 / total)
}
