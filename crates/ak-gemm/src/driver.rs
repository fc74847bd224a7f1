use ak_mem::{Element, Matrix, MatrixView};

use crate::buffer::TileBuffer;
use crate::error::{KernelError, Result};
use crate::tiling::{BlockSchedule, TileConfig};

/// Multiply `a` by `b` through fixed-capacity tile buffers.
///
/// Output tiles are produced in row-major order; for each tile the inner
/// dimension is consumed in ascending blocks and partial sums stay in the
/// accumulator until the tile completes. For a given element type the result
/// is identical to the plain triple loop, whatever capacity is configured.
///
/// # Errors
///
/// Returns `KernelError::DimensionMismatch` if `a.cols() != b.rows()`; no
/// output is produced in that case.
pub fn multiply<T: Element>(
    a: &MatrixView<'_, T>,
    b: &MatrixView<'_, T>,
    config: &TileConfig,
) -> Result<Matrix<T>> {
    if a.cols() != b.rows() {
        return Err(KernelError::DimensionMismatch {
            a_rows: a.rows(),
            a_cols: a.cols(),
            b_rows: b.rows(),
            b_cols: b.cols(),
        });
    }

    let schedule = BlockSchedule::new(a.rows(), a.cols(), b.cols(), config);
    let mut out = Matrix::zeros(a.rows(), b.cols());
    let mut buf = TileBuffer::new(config);
    let mut dst = out.view_mut();
    for tile in schedule.output_tiles() {
        buf.begin_tile(tile.rows.len(), tile.cols.len())?;
        for kb in schedule.k_blocks() {
            buf.load_a(a, tile.rows.clone(), kb.clone())?;
            buf.load_b(b, kb, tile.cols.clone())?;
            buf.accumulate()?;
        }
        buf.flush(&mut dst, tile.rows, tile.cols)?;
    }
    Ok(out)
}

/// Fixed-shape 4x4 integer multiply.
///
/// Mirrors the smallest hardware configuration: both operands must be 4x4
/// and the whole product runs as a single tile pass.
///
/// # Errors
///
/// Returns `KernelError::DimensionMismatch` unless both operands are 4x4.
pub fn multiply_4x4(a: &MatrixView<'_, i32>, b: &MatrixView<'_, i32>) -> Result<Matrix<i32>> {
    if a.rows() != 4 || a.cols() != 4 || b.rows() != 4 || b.cols() != 4 {
        return Err(KernelError::DimensionMismatch {
            a_rows: a.rows(),
            a_cols: a.cols(),
            b_rows: b.rows(),
            b_cols: b.cols(),
        });
    }
    let config = TileConfig::new(16)?;
    multiply(a, b, &config)
}
