use crate::dtype::{DType, Element};
use crate::error::{MemError, Result};
use crate::view::{MatrixView, MatrixViewMut};

/// An owned row-major matrix of kernel elements.
///
/// Operands are passed to the kernels as borrowed [`MatrixView`]s and results
/// come back as fresh matrices; the kernels never retain storage beyond a
/// call.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T: Element> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T: Element> Matrix<T> {
    /// Create a matrix from row-major data.
    ///
    /// # Errors
    ///
    /// Returns `MemError::SizeMismatch` if `data.len() != rows * cols`.
    pub fn from_vec(data: Vec<T>, rows: usize, cols: usize) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(MemError::SizeMismatch {
                len: data.len(),
                rows,
                cols,
                expected: rows * cols,
            });
        }
        Ok(Matrix { data, rows, cols })
    }

    /// Create a matrix filled with zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Matrix {
            data: vec![T::ZERO; rows * cols],
            rows,
            cols,
        }
    }

    /// Create the `n x n` identity matrix.
    pub fn identity(n: usize) -> Self {
        let mut matrix = Self::zeros(n, n);
        for i in 0..n {
            matrix.data[i * n + i] = T::ONE;
        }
        matrix
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The dtype tag of the element type.
    pub fn dtype(&self) -> DType {
        T::DTYPE
    }

    /// Row-major element slice.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutable row-major element slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the matrix and return its row-major storage.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Element at `(row, col)`.
    ///
    /// # Errors
    ///
    /// Returns `MemError::OutOfRange` if the position is outside the matrix.
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        self.view().get(row, col)
    }

    /// Read-only view of the whole matrix.
    pub fn view(&self) -> MatrixView<'_, T> {
        MatrixView::raw(&self.data, self.rows, self.cols)
    }

    /// Mutable view of the whole matrix.
    pub fn view_mut(&mut self) -> MatrixViewMut<'_, T> {
        MatrixViewMut::raw(&mut self.data, self.rows, self.cols)
    }
}
