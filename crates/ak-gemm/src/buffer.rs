use std::ops::Range;

use ak_mem::{Element, MatrixView, MatrixViewMut};

use crate::compute;
use crate::error::{KernelError, Result};
use crate::tiling::TileConfig;

/// One staged block and its extent.
#[derive(Debug)]
struct Staged<V> {
    data: Vec<V>,
    rows: usize,
    cols: usize,
}

impl<V> Staged<V> {
    fn empty() -> Self {
        Staged {
            data: Vec::new(),
            rows: 0,
            cols: 0,
        }
    }
}

/// Fixed-capacity staging buffers for one output tile.
///
/// Holds one block of each operand plus the accumulator tile for the output.
/// The accumulator keeps running sums across every inner block of one output
/// tile and narrows to the element type only at flush, so the result sees
/// the plain left-to-right reduction order over the inner dimension no
/// matter how the product was blocked.
#[derive(Debug)]
pub struct TileBuffer<T: Element> {
    capacity: usize,
    a: Staged<T>,
    b: Staged<T>,
    acc: Staged<T::Acc>,
    out: Vec<T>,
}

impl<T: Element> TileBuffer<T> {
    /// Buffers sized for `config`.
    pub fn new(config: &TileConfig) -> Self {
        let capacity = config.capacity();
        TileBuffer {
            capacity,
            a: Staged::empty(),
            b: Staged::empty(),
            acc: Staged::empty(),
            out: Vec::with_capacity(capacity),
        }
    }

    /// Element capacity of each buffer.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Start a fresh `rows x cols` output tile with a zeroed accumulator.
    ///
    /// # Errors
    ///
    /// Returns `KernelError::CapacityExceeded` if the tile holds more
    /// elements than the buffer capacity.
    pub fn begin_tile(&mut self, rows: usize, cols: usize) -> Result<()> {
        let needed = rows * cols;
        if needed > self.capacity {
            return Err(KernelError::CapacityExceeded {
                needed,
                capacity: self.capacity,
            });
        }
        self.acc.data.clear();
        self.acc.data.resize(needed, T::acc_zero());
        self.acc.rows = rows;
        self.acc.cols = cols;
        Ok(())
    }

    /// Stage a block of the left operand.
    ///
    /// # Errors
    ///
    /// Returns `KernelError::CapacityExceeded` if the block holds more
    /// elements than the buffer capacity, or a `MemError` if the ranges
    /// leave the source view.
    pub fn load_a(
        &mut self,
        src: &MatrixView<'_, T>,
        rows: Range<usize>,
        cols: Range<usize>,
    ) -> Result<()> {
        Self::stage(&mut self.a, self.capacity, src, rows, cols)
    }

    /// Stage a block of the right operand.
    ///
    /// # Errors
    ///
    /// Same conditions as [`TileBuffer::load_a`].
    pub fn load_b(
        &mut self,
        src: &MatrixView<'_, T>,
        rows: Range<usize>,
        cols: Range<usize>,
    ) -> Result<()> {
        Self::stage(&mut self.b, self.capacity, src, rows, cols)
    }

    fn stage(
        slot: &mut Staged<T>,
        capacity: usize,
        src: &MatrixView<'_, T>,
        rows: Range<usize>,
        cols: Range<usize>,
    ) -> Result<()> {
        let height = rows.len();
        let width = cols.len();
        let needed = height * width;
        if needed > capacity {
            return Err(KernelError::CapacityExceeded { needed, capacity });
        }
        slot.data.clear();
        slot.data.resize(needed, T::ZERO);
        src.read_block(rows, cols, &mut slot.data)?;
        slot.rows = height;
        slot.cols = width;
        Ok(())
    }

    /// Multiply the staged blocks into the accumulator tile.
    ///
    /// # Errors
    ///
    /// Returns `KernelError::DimensionMismatch` if the staged extents do not
    /// form an `m x k` by `k x n` product onto the current `m x n` tile.
    pub fn accumulate(&mut self) -> Result<()> {
        if self.a.cols != self.b.rows
            || self.a.rows != self.acc.rows
            || self.b.cols != self.acc.cols
        {
            return Err(KernelError::DimensionMismatch {
                a_rows: self.a.rows,
                a_cols: self.a.cols,
                b_rows: self.b.rows,
                b_cols: self.b.cols,
            });
        }
        compute::accumulate(
            &self.a.data,
            &self.b.data,
            &mut self.acc.data,
            self.a.rows,
            self.a.cols,
            self.b.cols,
        );
        Ok(())
    }

    /// Narrow the finished accumulator tile to the element type and write it
    /// to `dst` at `rows x cols`.
    ///
    /// # Errors
    ///
    /// Returns a `MemError` if the ranges leave `dst` or do not match the
    /// tile extent.
    pub fn flush(
        &mut self,
        dst: &mut MatrixViewMut<'_, T>,
        rows: Range<usize>,
        cols: Range<usize>,
    ) -> Result<()> {
        self.out.clear();
        self.out
            .extend(self.acc.data.iter().map(|&sum| T::narrow(sum)));
        dst.write_block(rows, cols, &self.out)?;
        Ok(())
    }
}
