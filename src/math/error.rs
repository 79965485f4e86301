use thiserror::Error;

/// Failures raised by [`Matrix`](crate::math::matrix::Matrix) operations and
/// propagated unchanged through layers and the network.
#[derive(Debug, Error)]
pub enum MatrixError {
    /// A dimension was zero or negative at construction.
    #[error("invalid matrix dimensions: {rows}x{cols}")]
    InvalidDimension { rows: i64, cols: i64 },

    /// Operand shapes are incompatible for `op`.
    #[error("dimension mismatch in {op}: {left:?} vs {right:?}")]
    DimensionMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    /// Indexed access outside the matrix. `index` is `(i, j)` for 2-D access
    /// and `(k, 0)` for flat access.
    #[error("index {index:?} out of range for {shape:?} matrix")]
    OutOfRange {
        index: (usize, usize),
        shape: (usize, usize),
    },

    /// Fewer bytes were available than the target shape requires.
    #[error("stream too short: expected {expected} bytes, got {actual}")]
    StreamTooShort { expected: usize, actual: usize },

    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),
}

impl MatrixError {
    pub(crate) fn mismatch(op: &'static str, left: (usize, usize), right: (usize, usize)) -> Self {
        MatrixError::DimensionMismatch { op, left, right }
    }
}

impl PartialEq for MatrixError {
    /// Structural equality; two `Io` errors compare equal when their kinds do.
    fn eq(&self, other: &Self) -> bool {
        use MatrixError::*;
        match (self, other) {
            (InvalidDimension { rows: a, cols: b }, InvalidDimension { rows: c, cols: d }) => {
                a == c && b == d
            }
            (
                DimensionMismatch { op: a, left: b, right: c },
                DimensionMismatch { op: d, left: e, right: f },
            ) => a == d && b == e && c == f,
            (OutOfRange { index: a, shape: b }, OutOfRange { index: c, shape: d }) => {
                a == c && b == d
            }
            (
                StreamTooShort { expected: a, actual: b },
                StreamTooShort { expected: c, actual: d },
            ) => a == c && b == d,
            (Io(a), Io(b)) => a.kind() == b.kind(),
            _ => false,
        }
    }
}
