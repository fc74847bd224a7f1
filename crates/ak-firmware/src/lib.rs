//! `ak-firmware` - Memory-image firmware programs for accel-kernels.
//!
//! Models the embedded variant of the kernels: a flat little-endian memory
//! image with the problem size and operand pointers stored at fixed
//! addresses in the top words of memory. Host-side helpers stage operands
//! into an image and read results back; the `run_*` programs execute
//! against the image the way the firmware loops do on the core.

pub mod error;
pub mod image;
pub mod params;
pub mod programs;

pub use error::{FirmwareError, Result};
pub use image::{MemoryImage, DEFAULT_IMAGE_BYTES, PARAM_BLOCK_BYTES};
pub use params::{ParamBlock, ParamLayout};
pub use programs::{
    read_result_matrix, read_result_vector, run_matrix_mul, run_vector_mul, stage_matrix_mul,
    stage_vector_mul,
};
