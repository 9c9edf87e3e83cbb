use std::error::Error;
use std::fmt;
use std::ops::{Index, IndexMut};

/// Row-major dense matrix. Rows are samples, columns are features.
#[derive(Clone, Debug, PartialEq)]
pub struct Array2<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T> Array2<T> {
    pub fn from_shape_vec(shape: (usize, usize), data: Vec<T>) -> Result<Self, ShapeError> {
        let (rows, cols) = shape;
        if data.len() != rows * cols {
            return Err(ShapeError {
                rows,
                cols,
                len: data.len(),
            });
        }
        Ok(Self { data, rows, cols })
    }

    pub fn nrows(&self) -> usize {
        self.rows
    }

    pub fn ncols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    fn offset(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    pub fn row_slice(&self, row: usize) -> &[T] {
        let start = self.offset(row, 0);
        &self.data[start..start + self.cols]
    }

    /// Iterate over rows as slices.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        (0..self.rows).map(move |r| self.row_slice(r))
    }

    pub fn select_rows(&self, indices: &[usize]) -> Array2<T>
    where
        T: Clone,
    {
        let mut data = Vec::with_capacity(indices.len() * self.cols);
        for &row in indices {
            data.extend_from_slice(self.row_slice(row));
        }
        Array2 {
            data,
            rows: indices.len(),
            cols: self.cols,
        }
    }

    /// Return a copy with `value` appended as a new last column.
    pub fn append_column(&self, value: T) -> Array2<T>
    where
        T: Clone,
    {
        let cols = self.cols + 1;
        let mut data = Vec::with_capacity(self.rows * cols);
        for row in self.rows() {
            data.extend_from_slice(row);
            data.push(value.clone());
        }
        Array2 {
            data,
            rows: self.rows,
            cols,
        }
    }
}

impl Array2<f32> {
    /// Copy into an `ndarray` matrix with `f64` elements for linear algebra.
    pub fn to_ndarray(&self) -> ndarray::Array2<f64> {
        ndarray::Array2::from_shape_fn((self.rows, self.cols), |(r, c)| self[(r, c)] as f64)
    }

    pub fn from_ndarray(x: &ndarray::Array2<f64>) -> Array2<f32> {
        let (rows, cols) = x.dim();
        Array2 {
            data: x.iter().map(|&v| v as f32).collect(),
            rows,
            cols,
        }
    }
}

impl<T> Index<(usize, usize)> for Array2<T> {
    type Output = T;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        let offset = self.offset(index.0, index.1);
        &self.data[offset]
    }
}

impl<T> IndexMut<(usize, usize)> for Array2<T> {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Self::Output {
        let offset = self.offset(index.0, index.1);
        &mut self.data[offset]
    }
}

#[derive(Debug, Clone)]
pub struct ShapeError {
    rows: usize,
    cols: usize,
    len: usize,
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid shape ({}, {}) for buffer of length {}",
            self.rows, self.cols, self.len
        )
    }
}

impl Error for ShapeError {}
