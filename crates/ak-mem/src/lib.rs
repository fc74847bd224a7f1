//! `ak-mem` - Matrix data model and memory interface for accel-kernels.
//!
//! This crate provides:
//! - An owned row-major `Matrix` type and borrowed `MatrixView` /
//!   `MatrixViewMut` views with bounds-checked block transfers
//! - The sealed `Element` trait covering the two supported element kinds
//!   (`i32`, `f32`) and their multiply-accumulate rule
//! - Data type tags and the memory error taxonomy

pub mod dtype;
pub mod error;
pub mod matrix;
pub mod view;

// Re-export primary types at the crate root for convenience.
pub use dtype::{DType, Element};
pub use error::{MemError, Result};
pub use matrix::Matrix;
pub use view::{MatrixView, MatrixViewMut};
