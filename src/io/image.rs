//! Input sample loading.
//!
//! A sample is either a raw float file in the same format as the weights, or
//! an ordinary image (PNG/JPEG/BMP/GIF) that is converted to grayscale,
//! resized to the input shape and normalized to [0, 1].
use std::path::Path;

use image::GenericImageView;
use log::{debug, warn};

use crate::io::{error::LoadError, weights::read_matrix_file};
use crate::math::matrix::Matrix;
use crate::network::spec::MlpTopology;

const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "gif"];

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| IMAGE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
        .unwrap_or(false)
}

/// Loads one sample shaped `input_rows x input_cols`, choosing the decoder
/// from the file extension.
pub fn load_input<P: AsRef<Path>>(path: P, topology: &MlpTopology) -> Result<Matrix, LoadError> {
    let path = path.as_ref();
    let (rows, cols) = topology.input_dims()?;
    if is_image_file(path) {
        debug!("decoding {} as an image", path.display());
        load_grayscale_image(path, rows, cols)
    } else {
        read_matrix_file(path, rows, cols)
    }
}

/// Decodes an image file, converts it to grayscale and returns a
/// `rows x cols` matrix of pixels in [0, 1], resizing when needed.
pub fn load_grayscale_image<P: AsRef<Path>>(
    path: P,
    rows: usize,
    cols: usize,
) -> Result<Matrix, LoadError> {
    let path = path.as_ref();
    let mut input = Matrix::zeros(rows, cols)?;
    let img = image::open(path)
        .map_err(|source| LoadError::Image { path: path.to_owned(), source })?;

    let (width, height) = (cols as u32, rows as u32);
    let (actual_width, actual_height) = img.dimensions();
    let img = if (actual_width, actual_height) != (width, height) {
        warn!(
            "{} is {}x{}, resizing to {}x{}",
            path.display(),
            actual_width,
            actual_height,
            width,
            height
        );
        img.resize_exact(width, height, image::imageops::FilterType::Lanczos3)
    } else {
        img
    };

    for (k, p) in img.to_luma8().pixels().enumerate() {
        *input.flat_mut(k)? = p.0[0] as f32 / 255.0;
    }
    Ok(input)
}
