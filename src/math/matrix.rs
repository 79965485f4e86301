use std::fmt;
use std::io::Read;
use std::ops::Mul;

use crate::math::error::MatrixError;

/// Threshold used when rendering input samples to the terminal.
pub const PRINT_THRESHOLD: f32 = 0.1;

const FLOAT_BYTES: usize = std::mem::size_of::<f32>();

/// Dense 2-D matrix of `f32` stored row-major in a single buffer.
///
/// `data.len() == rows * cols` holds after every public operation, and both
/// dimensions are always positive. Cloning deep-copies the buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl Matrix {
    /// Number of elements in a `rows x cols` matrix.
    ///
    /// Fails with `InvalidDimension` when a dimension is zero, or when the
    /// element count or its size in bytes does not fit in `usize`.
    pub fn element_count(rows: usize, cols: usize) -> Result<usize, MatrixError> {
        let invalid = || MatrixError::InvalidDimension {
            rows: i64::try_from(rows).unwrap_or(i64::MAX),
            cols: i64::try_from(cols).unwrap_or(i64::MAX),
        };
        if rows == 0 || cols == 0 {
            return Err(invalid());
        }
        rows.checked_mul(cols)
            .filter(|&n| n <= usize::MAX / FLOAT_BYTES)
            .ok_or_else(invalid)
    }

    /// Converts signed dimensions, as found in config files, to a checked
    /// `(rows, cols)` pair. Negative or oversized values are `InvalidDimension`.
    pub fn checked_dims(rows: i64, cols: i64) -> Result<(usize, usize), MatrixError> {
        let invalid = MatrixError::InvalidDimension { rows, cols };
        match (usize::try_from(rows), usize::try_from(cols)) {
            (Ok(r), Ok(c)) => {
                Matrix::element_count(r, c).map_err(|_| invalid)?;
                Ok((r, c))
            }
            _ => Err(invalid),
        }
    }

    /// Zero-filled `rows x cols` matrix.
    pub fn zeros(rows: usize, cols: usize) -> Result<Matrix, MatrixError> {
        let len = Matrix::element_count(rows, cols)?;
        Ok(Matrix {
            rows,
            cols,
            data: vec![0.0; len],
        })
    }

    /// Same as [`Matrix::zeros`], for dimensions coming from signed sources
    /// (config files, user input). Negative sizes are `InvalidDimension`.
    pub fn with_dims(rows: i64, cols: i64) -> Result<Matrix, MatrixError> {
        let (rows, cols) = Matrix::checked_dims(rows, cols)?;
        Matrix::zeros(rows, cols)
    }

    pub fn identity(n: usize) -> Result<Matrix, MatrixError> {
        let mut res = Matrix::zeros(n, n)?;
        for i in 0..n {
            res.data[i * n + i] = 1.0;
        }
        Ok(res)
    }

    /// Wraps a row-major buffer. Fails if `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f32>) -> Result<Matrix, MatrixError> {
        let mut res = Matrix::zeros(rows, cols)?;
        if data.len() != res.data.len() {
            return Err(MatrixError::mismatch("from_vec", (rows, cols), (data.len(), 1)));
        }
        res.data = data;
        Ok(res)
    }

    /// Builds a matrix from nested rows. All rows must share one length.
    pub fn from_rows(data: Vec<Vec<f32>>) -> Result<Matrix, MatrixError> {
        let rows = data.len();
        let cols = data.first().map_or(0, Vec::len);
        let mut res = Matrix::zeros(rows, cols)?;
        for (i, row) in data.into_iter().enumerate() {
            if row.len() != cols {
                return Err(MatrixError::mismatch("from_rows", (rows, cols), (i, row.len())));
            }
            res.data[i * cols..(i + 1) * cols].copy_from_slice(&row);
        }
        Ok(res)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false; a matrix has at least one element.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The row-major buffer.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    fn offset(&self, i: usize, j: usize) -> Result<usize, MatrixError> {
        if i >= self.rows || j >= self.cols {
            return Err(MatrixError::OutOfRange {
                index: (i, j),
                shape: self.shape(),
            });
        }
        Ok(i * self.cols + j)
    }

    fn check_flat(&self, k: usize) -> Result<usize, MatrixError> {
        if k >= self.data.len() {
            return Err(MatrixError::OutOfRange {
                index: (k, 0),
                shape: self.shape(),
            });
        }
        Ok(k)
    }

    /// Element at row `i`, column `j`.
    pub fn at(&self, i: usize, j: usize) -> Result<f32, MatrixError> {
        let k = self.offset(i, j)?;
        Ok(self.data[k])
    }

    pub fn at_mut(&mut self, i: usize, j: usize) -> Result<&mut f32, MatrixError> {
        let k = self.offset(i, j)?;
        Ok(&mut self.data[k])
    }

    /// Element at row-major position `k`.
    pub fn flat(&self, k: usize) -> Result<f32, MatrixError> {
        let k = self.check_flat(k)?;
        Ok(self.data[k])
    }

    pub fn flat_mut(&mut self, k: usize) -> Result<&mut f32, MatrixError> {
        let k = self.check_flat(k)?;
        Ok(&mut self.data[k])
    }

    /// Transposes in place. Works for any shape: the buffer is rebuilt in the
    /// transposed row-major layout.
    pub fn transpose(&mut self) -> &mut Matrix {
        let (rows, cols) = self.shape();
        let mut data = vec![0.0; self.data.len()];
        for i in 0..rows {
            for j in 0..cols {
                data[j * rows + i] = self.data[i * cols + j];
            }
        }
        self.data = data;
        self.rows = cols;
        self.cols = rows;
        self
    }

    /// Relabels the matrix as a single `rows*cols x 1` column. The buffer is
    /// untouched, so elements keep their row-major order.
    pub fn vectorize(&mut self) -> &mut Matrix {
        self.rows *= self.cols;
        self.cols = 1;
        self
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f32) -> f32,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&x| functor(x)).collect(),
        }
    }

    fn zip_with<F>(&self, other: &Matrix, op: &'static str, f: F) -> Result<Matrix, MatrixError>
    where
        F: Fn(f32, f32) -> f32,
    {
        if self.shape() != other.shape() {
            return Err(MatrixError::mismatch(op, self.shape(), other.shape()));
        }
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().zip(&other.data).map(|(&a, &b)| f(a, b)).collect(),
        })
    }

    /// Hadamard (element-wise) product.
    pub fn dot(&self, other: &Matrix) -> Result<Matrix, MatrixError> {
        self.zip_with(other, "dot", |a, b| a * b)
    }

    /// Euclidean norm over every element.
    pub fn norm(&self) -> f32 {
        self.data.iter().map(|x| x * x).sum::<f32>().sqrt()
    }

    /// Row-major index of the largest element; the first one wins on ties.
    pub fn argmax(&self) -> usize {
        let mut best = 0;
        for (k, &x) in self.data.iter().enumerate().skip(1) {
            if x > self.data[best] {
                best = k;
            }
        }
        best
    }

    pub fn sum(&self) -> f32 {
        self.data.iter().sum()
    }

    pub fn add(&self, other: &Matrix) -> Result<Matrix, MatrixError> {
        self.zip_with(other, "add", |a, b| a + b)
    }

    pub fn add_assign(&mut self, other: &Matrix) -> Result<&mut Matrix, MatrixError> {
        if self.shape() != other.shape() {
            return Err(MatrixError::mismatch("add_assign", self.shape(), other.shape()));
        }
        for (a, b) in self.data.iter_mut().zip(&other.data) {
            *a += b;
        }
        Ok(self)
    }

    /// Standard matrix product; `self.cols` must equal `other.rows`.
    pub fn multiply(&self, other: &Matrix) -> Result<Matrix, MatrixError> {
        if self.cols != other.rows {
            return Err(MatrixError::mismatch("multiply", self.shape(), other.shape()));
        }

        let mut res = Matrix::zeros(self.rows, other.cols)?;

        for i in 0..res.rows {
            for j in 0..res.cols {
                let mut sum = 0.0;

                for k in 0..self.cols {
                    sum += self.data[i * self.cols + k] * other.data[k * other.cols + j];
                }

                res.data[i * res.cols + j] = sum;
            }
        }

        Ok(res)
    }

    pub fn scale(&self, c: f32) -> Matrix {
        self.map(|x| x * c)
    }

    /// Fills the buffer from `rows*cols` little-endian `f32`s read from
    /// `reader`. Extra bytes beyond that are left unread.
    ///
    /// On `StreamTooShort` the buffer keeps whatever it held before.
    pub fn load_from_bytes<R: Read>(&mut self, reader: R) -> Result<(), MatrixError> {
        let expected = self.data.len() * FLOAT_BYTES;
        let mut bytes = Vec::with_capacity(expected);
        reader.take(expected as u64).read_to_end(&mut bytes)?;
        if bytes.len() < expected {
            return Err(MatrixError::StreamTooShort {
                expected,
                actual: bytes.len(),
            });
        }
        for (dst, chunk) in self.data.iter_mut().zip(bytes.chunks_exact(FLOAT_BYTES)) {
            *dst = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Ok(())
    }

    /// Encodes the buffer in the layout `load_from_bytes` reads.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.data.iter().flat_map(|x| x.to_le_bytes()).collect()
    }

    /// ASCII picture of the matrix: `**` for elements above `threshold`,
    /// two spaces otherwise, one line per row.
    ///
    /// The first row is not drawn. Existing consumers expect that output, so
    /// it is kept as is.
    pub fn render_thresholded(&self, threshold: f32) -> String {
        let mut out = String::with_capacity((self.rows - 1) * (self.cols * 2 + 1));
        for row in self.data.chunks(self.cols).skip(1) {
            for &x in row {
                out.push_str(if x > threshold { "**" } else { "  " });
            }
            out.push('\n');
        }
        out
    }
}

/// Plain print: values separated by spaces, one row per line.
impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.data.chunks(self.cols) {
            for x in row {
                write!(f, "{} ", x)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Mul<f32> for Matrix {
    type Output = Matrix;

    fn mul(self, rhs: f32) -> Self::Output {
        self.scale(rhs)
    }
}

impl Mul<Matrix> for f32 {
    type Output = Matrix;

    fn mul(self, rhs: Matrix) -> Self::Output {
        rhs.scale(self)
    }
}

impl Mul<f32> for &Matrix {
    type Output = Matrix;

    fn mul(self, rhs: f32) -> Self::Output {
        self.scale(rhs)
    }
}

impl Mul<&Matrix> for f32 {
    type Output = Matrix;

    fn mul(self, rhs: &Matrix) -> Self::Output {
        rhs.scale(self)
    }
}
