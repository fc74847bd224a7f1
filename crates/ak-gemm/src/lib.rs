//! `ak-gemm` - Blocked matrix-multiply kernels for accel-kernels.
//!
//! This crate provides:
//! - `TileConfig` / `BlockSchedule`, describing how an output matrix is
//!   covered by fixed-capacity square tiles
//! - `TileBuffer`, the staging buffers and accumulator tile for one output
//!   tile
//! - The `multiply` kernel driver for arbitrary shapes and the fixed-shape
//!   `multiply_4x4` variant
//! - `AddConstantKernel`, an element-wise kernel with the same staging
//!   discipline

pub mod buffer;
pub mod compute;
pub mod driver;
pub mod elementwise;
pub mod error;
pub mod tiling;

// Re-export primary types at the crate root for convenience.
pub use buffer::TileBuffer;
pub use driver::{multiply, multiply_4x4};
pub use elementwise::{AddConstantKernel, DEFAULT_ADD_CAPACITY};
pub use error::{KernelError, Result};
pub use tiling::{BlockSchedule, OutputTile, TileConfig, DEFAULT_TILE_CAPACITY};
