pub mod error;
pub mod matrix;

pub use error::MatrixError;
pub use matrix::{Matrix, PRINT_THRESHOLD};
