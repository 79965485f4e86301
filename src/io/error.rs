use std::path::PathBuf;

use thiserror::Error;

use crate::math::error::MatrixError;

/// Failures while reading network parameters or input samples from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is {actual} bytes, expected exactly {expected}", path.display())]
    FileSize {
        path: PathBuf,
        expected: usize,
        actual: u64,
    },

    #[error("bad matrix data in {}: {source}", path.display())]
    Matrix {
        path: PathBuf,
        #[source]
        source: MatrixError,
    },

    #[error("cannot decode image {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("invalid topology: {0}")]
    Topology(#[from] serde_json::Error),

    #[error("invalid shape: {0}")]
    Shape(#[from] MatrixError),
}
