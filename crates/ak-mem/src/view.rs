use std::ops::Range;

use crate::dtype::Element;
use crate::error::{MemError, Result};

/// Read-only row-major view of a 2-D region.
///
/// Views are how the kernels address external memory: operands stay owned by
/// the caller, and the kernels copy rectangular blocks in and out through
/// bounds-checked transfers. An address range that leaves the declared extent
/// is a `MemError`, never silent corruption.
#[derive(Debug, Clone, Copy)]
pub struct MatrixView<'a, T: Element> {
    data: &'a [T],
    rows: usize,
    cols: usize,
}

impl<'a, T: Element> MatrixView<'a, T> {
    /// Create a view over row-major data.
    ///
    /// # Errors
    ///
    /// Returns `MemError::SizeMismatch` if `data.len() != rows * cols`.
    pub fn new(data: &'a [T], rows: usize, cols: usize) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(MemError::SizeMismatch {
                len: data.len(),
                rows,
                cols,
                expected: rows * cols,
            });
        }
        Ok(MatrixView { data, rows, cols })
    }

    pub(crate) fn raw(data: &'a [T], rows: usize, cols: usize) -> Self {
        debug_assert_eq!(data.len(), rows * cols);
        MatrixView { data, rows, cols }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The underlying row-major slice.
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Element at `(row, col)`.
    ///
    /// # Errors
    ///
    /// Returns `MemError::OutOfRange` if the position is outside the view.
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        check_range("row", row..row + 1, self.rows)?;
        check_range("col", col..col + 1, self.cols)?;
        Ok(self.data[row * self.cols + col])
    }

    /// Copy the rectangular block `rows x cols` into `dst`, row by row.
    ///
    /// `dst` is filled in row-major order and must hold exactly the block's
    /// element count.
    ///
    /// # Errors
    ///
    /// Returns `MemError::OutOfRange` if either range leaves the view, or
    /// `MemError::SizeMismatch` if `dst` has the wrong length.
    pub fn read_block(&self, rows: Range<usize>, cols: Range<usize>, dst: &mut [T]) -> Result<()> {
        check_range("row", rows.clone(), self.rows)?;
        check_range("col", cols.clone(), self.cols)?;
        let width = cols.end - cols.start;
        let height = rows.end - rows.start;
        if dst.len() != height * width {
            return Err(MemError::SizeMismatch {
                len: dst.len(),
                rows: height,
                cols: width,
                expected: height * width,
            });
        }
        for (i, r) in rows.enumerate() {
            let base = r * self.cols;
            dst[i * width..(i + 1) * width]
                .copy_from_slice(&self.data[base + cols.start..base + cols.end]);
        }
        Ok(())
    }
}

/// Mutable row-major view of a 2-D region.
#[derive(Debug)]
pub struct MatrixViewMut<'a, T: Element> {
    data: &'a mut [T],
    rows: usize,
    cols: usize,
}

impl<'a, T: Element> MatrixViewMut<'a, T> {
    /// Create a mutable view over row-major data.
    ///
    /// # Errors
    ///
    /// Returns `MemError::SizeMismatch` if `data.len() != rows * cols`.
    pub fn new(data: &'a mut [T], rows: usize, cols: usize) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(MemError::SizeMismatch {
                len: data.len(),
                rows,
                cols,
                expected: rows * cols,
            });
        }
        Ok(MatrixViewMut { data, rows, cols })
    }

    pub(crate) fn raw(data: &'a mut [T], rows: usize, cols: usize) -> Self {
        debug_assert_eq!(data.len(), rows * cols);
        MatrixViewMut { data, rows, cols }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Overwrite the rectangular block `rows x cols` from `src`, row by row.
    ///
    /// `src` is read in row-major order and must hold exactly the block's
    /// element count.
    ///
    /// # Errors
    ///
    /// Returns `MemError::OutOfRange` if either range leaves the view, or
    /// `MemError::SizeMismatch` if `src` has the wrong length.
    pub fn write_block(&mut self, rows: Range<usize>, cols: Range<usize>, src: &[T]) -> Result<()> {
        check_range("row", rows.clone(), self.rows)?;
        check_range("col", cols.clone(), self.cols)?;
        let width = cols.end - cols.start;
        let height = rows.end - rows.start;
        if src.len() != height * width {
            return Err(MemError::SizeMismatch {
                len: src.len(),
                rows: height,
                cols: width,
                expected: height * width,
            });
        }
        for (i, r) in rows.enumerate() {
            let base = r * self.cols;
            self.data[base + cols.start..base + cols.end]
                .copy_from_slice(&src[i * width..(i + 1) * width]);
        }
        Ok(())
    }

    /// Downgrade to a read-only view of the same region.
    pub fn as_view(&self) -> MatrixView<'_, T> {
        MatrixView::raw(self.data, self.rows, self.cols)
    }
}

fn check_range(axis: &'static str, range: Range<usize>, extent: usize) -> Result<()> {
    if range.start > range.end || range.end > extent {
        return Err(MemError::OutOfRange {
            axis,
            start: range.start,
            end: range.end,
            extent,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<i32> {
        // 3x4 row-major:
        //  0  1  2  3
        //  4  5  6  7
        //  8  9 10 11
        (0..12).collect()
    }

    #[test]
    fn test_new_checks_length() {
        let data = sample();
        assert!(MatrixView::new(&data, 3, 4).is_ok());
        let err = MatrixView::new(&data, 4, 4).unwrap_err();
        assert!(matches!(err, MemError::SizeMismatch { len: 12, .. }));
    }

    #[test]
    fn test_get() {
        let data = sample();
        let view = MatrixView::new(&data, 3, 4).unwrap();
        assert_eq!(view.get(0, 0).unwrap(), 0);
        assert_eq!(view.get(2, 3).unwrap(), 11);
        assert!(view.get(3, 0).is_err());
        assert!(view.get(0, 4).is_err());
    }

    #[test]
    fn test_read_block_interior() {
        let data = sample();
        let view = MatrixView::new(&data, 3, 4).unwrap();
        let mut dst = [0_i32; 4];
        view.read_block(1..3, 1..3, &mut dst).unwrap();
        assert_eq!(dst, [5, 6, 9, 10]);
    }

    #[test]
    fn test_read_block_full() {
        let data = sample();
        let view = MatrixView::new(&data, 3, 4).unwrap();
        let mut dst = vec![0_i32; 12];
        view.read_block(0..3, 0..4, &mut dst).unwrap();
        assert_eq!(dst, data);
    }

    #[test]
    fn test_read_block_out_of_range() {
        let data = sample();
        let view = MatrixView::new(&data, 3, 4).unwrap();
        let mut dst = [0_i32; 8];
        let err = view.read_block(2..4, 0..4, &mut dst).unwrap_err();
        assert!(matches!(
            err,
            MemError::OutOfRange {
                axis: "row",
                start: 2,
                end: 4,
                extent: 3,
            }
        ));
        let err = view.read_block(0..2, 2..6, &mut dst).unwrap_err();
        assert!(matches!(err, MemError::OutOfRange { axis: "col", .. }));
    }

    #[test]
    fn test_read_block_wrong_dst_len() {
        let data = sample();
        let view = MatrixView::new(&data, 3, 4).unwrap();
        let mut dst = [0_i32; 3];
        let err = view.read_block(0..2, 0..2, &mut dst).unwrap_err();
        assert!(matches!(err, MemError::SizeMismatch { len: 3, .. }));
    }

    #[test]
    fn test_write_block() {
        let mut data = vec![0_i32; 12];
        let mut view = MatrixViewMut::new(&mut data, 3, 4).unwrap();
        view.write_block(1..3, 2..4, &[1, 2, 3, 4]).unwrap();
        assert_eq!(data, vec![0, 0, 0, 0, 0, 0, 1, 2, 0, 0, 3, 4]);
    }

    #[test]
    fn test_write_block_rejects_bad_args() {
        let mut data = vec![0_i32; 12];
        let mut view = MatrixViewMut::new(&mut data, 3, 4).unwrap();
        assert!(view.write_block(0..4, 0..1, &[1, 2, 3, 4]).is_err());
        assert!(view.write_block(0..2, 0..2, &[1, 2, 3]).is_err());
        // Failed writes leave the region untouched.
        assert!(data.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_empty_block_is_ok() {
        let data = sample();
        let view = MatrixView::new(&data, 3, 4).unwrap();
        let mut dst: [i32; 0] = [];
        view.read_block(1..1, 0..4, &mut dst).unwrap();
    }

    #[test]
    fn test_view_mut_as_view() {
        let mut data = sample();
        let view = MatrixViewMut::new(&mut data, 3, 4).unwrap();
        let ro = view.as_view();
        assert_eq!(ro.get(1, 1).unwrap(), 5);
        assert_eq!(ro.rows(), 3);
        assert_eq!(ro.cols(), 4);
    }
}
