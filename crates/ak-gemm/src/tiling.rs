use std::ops::Range;

use crate::error::{KernelError, Result};

/// Default per-buffer element capacity: a 16x16 tile.
pub const DEFAULT_TILE_CAPACITY: usize = 256;

/// Capacity of the on-chip staging buffers, in elements.
///
/// Each of the three tile buffers (left operand, right operand, accumulator)
/// holds at most `capacity` elements. Tiles are square with side
/// `floor(sqrt(capacity))`, so every clipped tile is guaranteed to fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileConfig {
    capacity: usize,
    side: usize,
}

impl TileConfig {
    /// Configuration for buffers of `capacity` elements.
    ///
    /// # Errors
    ///
    /// Returns `KernelError::CapacityExceeded` if `capacity` is zero; no
    /// tile fits such a buffer.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(KernelError::CapacityExceeded {
                needed: 1,
                capacity: 0,
            });
        }
        Ok(TileConfig {
            capacity,
            side: isqrt(capacity),
        })
    }

    /// Element capacity of each buffer.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Side length of the square tiles cut from this capacity (at least 1).
    pub fn tile_side(&self) -> usize {
        self.side
    }
}

impl Default for TileConfig {
    fn default() -> Self {
        TileConfig {
            capacity: DEFAULT_TILE_CAPACITY,
            side: 16,
        }
    }
}

/// Floor of the square root.
fn isqrt(n: usize) -> usize {
    if n < 2 {
        return n;
    }
    let mut x = n;
    let mut next = (x + 1) / 2;
    while next < x {
        x = next;
        next = (x + n / x) / 2;
    }
    x
}

/// Tile walk for one `rows x inner` by `inner x cols` product.
///
/// Output tiles are visited row-major over the tile grid; within each output
/// tile the inner dimension is consumed in ascending blocks. Edge tiles are
/// clipped to the matrix extents.
#[derive(Debug, Clone, Copy)]
pub struct BlockSchedule {
    rows: usize,
    inner: usize,
    cols: usize,
    side: usize,
}

/// One clipped output tile of the result matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTile {
    pub rows: Range<usize>,
    pub cols: Range<usize>,
}

impl BlockSchedule {
    /// Schedule for a `rows x cols` output with `inner` as the shared
    /// dimension.
    pub fn new(rows: usize, inner: usize, cols: usize, config: &TileConfig) -> Self {
        BlockSchedule {
            rows,
            inner,
            cols,
            side: config.tile_side(),
        }
    }

    /// Output tiles in row-major order over the tile grid.
    pub fn output_tiles(&self) -> impl Iterator<Item = OutputTile> {
        let BlockSchedule {
            rows, cols, side, ..
        } = *self;
        (0..rows).step_by(side).flat_map(move |i| {
            (0..cols).step_by(side).map(move |j| OutputTile {
                rows: i..(i + side).min(rows),
                cols: j..(j + side).min(cols),
            })
        })
    }

    /// Ascending blocks of the inner dimension.
    pub fn k_blocks(&self) -> impl Iterator<Item = Range<usize>> {
        let BlockSchedule { inner, side, .. } = *self;
        (0..inner)
            .step_by(side)
            .map(move |k| k..(k + side).min(inner))
    }

    /// True when the whole product fits a single tile triple, so the walk
    /// degenerates to one load of each operand.
    pub fn is_single_pass(&self) -> bool {
        self.rows <= self.side && self.inner <= self.side && self.cols <= self.side
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_side_is_floor_sqrt() {
        assert_eq!(TileConfig::new(256).unwrap().tile_side(), 16);
        assert_eq!(TileConfig::new(100).unwrap().tile_side(), 10);
        assert_eq!(TileConfig::new(50).unwrap().tile_side(), 7);
        assert_eq!(TileConfig::new(17).unwrap().tile_side(), 4);
        assert_eq!(TileConfig::new(16).unwrap().tile_side(), 4);
        assert_eq!(TileConfig::new(1).unwrap().tile_side(), 1);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(
            TileConfig::new(0),
            Err(KernelError::CapacityExceeded {
                needed: 1,
                capacity: 0,
            })
        ));
    }

    #[test]
    fn test_default_config() {
        let config = TileConfig::default();
        assert_eq!(config.capacity(), DEFAULT_TILE_CAPACITY);
        assert_eq!(config.tile_side(), 16);
    }

    #[test]
    fn test_output_tiles_row_major_with_clipping() {
        let config = TileConfig::new(4).unwrap(); // 2x2 tiles
        let schedule = BlockSchedule::new(5, 3, 5, &config);
        let tiles: Vec<OutputTile> = schedule.output_tiles().collect();
        assert_eq!(tiles.len(), 9);
        assert_eq!(
            tiles[0],
            OutputTile {
                rows: 0..2,
                cols: 0..2,
            }
        );
        assert_eq!(
            tiles[1],
            OutputTile {
                rows: 0..2,
                cols: 2..4,
            }
        );
        assert_eq!(
            tiles[2],
            OutputTile {
                rows: 0..2,
                cols: 4..5,
            }
        );
        assert_eq!(
            tiles[3],
            OutputTile {
                rows: 2..4,
                cols: 0..2,
            }
        );
        assert_eq!(
            tiles[8],
            OutputTile {
                rows: 4..5,
                cols: 4..5,
            }
        );
    }

    #[test]
    fn test_output_tiles_exact_grid() {
        let config = TileConfig::new(4).unwrap();
        let schedule = BlockSchedule::new(4, 4, 4, &config);
        let tiles: Vec<OutputTile> = schedule.output_tiles().collect();
        assert_eq!(tiles.len(), 4);
        assert!(tiles
            .iter()
            .all(|t| t.rows.len() == 2 && t.cols.len() == 2));
    }

    #[test]
    fn test_k_blocks_ascending_and_clipped() {
        let config = TileConfig::new(4).unwrap();
        let schedule = BlockSchedule::new(2, 5, 2, &config);
        let blocks: Vec<_> = schedule.k_blocks().collect();
        assert_eq!(blocks, vec![0..2, 2..4, 4..5]);
    }

    #[test]
    fn test_single_pass() {
        let config = TileConfig::new(16).unwrap(); // 4x4 tiles
        assert!(BlockSchedule::new(4, 4, 4, &config).is_single_pass());
        assert!(!BlockSchedule::new(5, 4, 4, &config).is_single_pass());
        assert!(!BlockSchedule::new(4, 9, 2, &config).is_single_pass());
    }

    #[test]
    fn test_empty_axes() {
        let config = TileConfig::default();
        let schedule = BlockSchedule::new(0, 4, 4, &config);
        assert_eq!(schedule.output_tiles().count(), 0);
        let schedule = BlockSchedule::new(4, 0, 4, &config);
        assert_eq!(schedule.k_blocks().count(), 0);
        // The output grid still exists when only the inner dimension is empty.
        assert_eq!(schedule.output_tiles().count(), 1);
    }
}
