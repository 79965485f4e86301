use serde::{Serialize, Deserialize};

use crate::math::{error::MatrixError, matrix::Matrix};
use crate::network::network::LAYER_COUNT;

/// Weight shape of one layer: `rows` outputs, `cols` inputs. The matching
/// bias is a `rows x 1` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerShape {
    pub rows: i64,
    pub cols: i64,
}

impl LayerShape {
    /// Checked `(rows, cols)` of the weight matrix. Nothing is allocated.
    pub fn dims(&self) -> Result<(usize, usize), MatrixError> {
        Matrix::checked_dims(self.rows, self.cols)
    }
}

/// Shapes of the input sample and of the four layers, as read by the loader.
///
/// Dimensions are signed so that a hand-edited file with a negative size is
/// reported as `InvalidDimension` rather than a parse error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MlpTopology {
    pub input_rows: i64,
    pub input_cols: i64,
    pub layers: [LayerShape; LAYER_COUNT],
}

impl Default for MlpTopology {
    /// 28x28 grayscale digit in, 10 classes out.
    fn default() -> Self {
        MlpTopology {
            input_rows: 28,
            input_cols: 28,
            layers: [
                LayerShape { rows: 128, cols: 784 },
                LayerShape { rows: 64, cols: 128 },
                LayerShape { rows: 20, cols: 64 },
                LayerShape { rows: 10, cols: 20 },
            ],
        }
    }
}

impl MlpTopology {
    /// Checked `(rows, cols)` of one input sample.
    pub fn input_dims(&self) -> Result<(usize, usize), MatrixError> {
        Matrix::checked_dims(self.input_rows, self.input_cols)
    }

    pub fn class_count(&self) -> i64 {
        self.layers[LAYER_COUNT - 1].rows
    }

    /// Checks every dimension is positive and that each layer consumes what
    /// the previous one (or the vectorized input) produces.
    ///
    /// Works on the dimensions alone, so a huge but well-formed topology is
    /// accepted here without allocating anything.
    pub fn validate(&self) -> Result<(), MatrixError> {
        let (rows, cols) = self.input_dims()?;
        let mut expected = Matrix::element_count(rows, cols)?;
        for shape in &self.layers {
            let (rows, cols) = shape.dims()?;
            if cols != expected {
                return Err(MatrixError::mismatch("topology", (rows, cols), (expected, 1)));
            }
            expected = rows;
        }
        Ok(())
    }

    /// Serializes the topology to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> std::io::Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }

    /// Deserializes a topology from a JSON file.
    pub fn load_json(path: &str) -> Result<MlpTopology, serde_json::Error> {
        let file = std::fs::File::open(path).map_err(serde_json::Error::io)?;
        let reader = std::io::BufReader::new(file);
        serde_json::from_reader(reader)
    }
}
