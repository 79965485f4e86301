//! Loading of raw network parameters.
//!
//! Each weight or bias file is a bare run of little-endian `f32`s in row-major
//! order, with no header. The target shape comes from an [`MlpTopology`], and
//! the file length must match it exactly.
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::info;

use crate::io::error::LoadError;
use crate::math::matrix::Matrix;
use crate::network::{network::{MlpNetwork, LAYER_COUNT}, spec::MlpTopology};

/// Reads a `rows x cols` matrix from a file of raw floats.
///
/// The file length is checked against the shape before the matrix is
/// allocated, so a bogus shape paired with a small file costs nothing.
pub fn read_matrix_file<P: AsRef<Path>>(
    path: P,
    rows: usize,
    cols: usize,
) -> Result<Matrix, LoadError> {
    let path = path.as_ref();
    let io_err = |source: std::io::Error| LoadError::Io { path: path.to_owned(), source };

    let expected = Matrix::element_count(rows, cols)? * std::mem::size_of::<f32>();
    let file = File::open(path).map_err(io_err)?;
    let actual = file.metadata().map_err(io_err)?.len();
    if actual != expected as u64 {
        return Err(LoadError::FileSize {
            path: path.to_owned(),
            expected,
            actual,
        });
    }

    let mut target = Matrix::zeros(rows, cols)?;
    target
        .load_from_bytes(BufReader::new(file))
        .map_err(|source| LoadError::Matrix { path: path.to_owned(), source })?;
    Ok(target)
}

/// Builds the classifier from four weight files and four bias files, input
/// layer first, shaped by `topology`.
pub fn load_network<P: AsRef<Path>>(
    weight_paths: &[P; LAYER_COUNT],
    bias_paths: &[P; LAYER_COUNT],
    topology: &MlpTopology,
) -> Result<MlpNetwork, LoadError> {
    topology.validate()?;

    let load = |k: usize| -> Result<(Matrix, Matrix), LoadError> {
        let (rows, cols) = topology.layers[k].dims()?;
        let w = read_matrix_file(&weight_paths[k], rows, cols)?;
        let b = read_matrix_file(&bias_paths[k], rows, 1)?;
        Ok((w, b))
    };
    let (w1, b1) = load(0)?;
    let (w2, b2) = load(1)?;
    let (w3, b3) = load(2)?;
    let (w4, b4) = load(3)?;

    let network = MlpNetwork::new([w1, w2, w3, w4], [b1, b2, b3, b4]);
    info!(
        "loaded network: {} inputs, {} classes",
        network.input_size(),
        network.class_count()
    );
    Ok(network)
}
