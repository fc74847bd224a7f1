use thiserror::Error;

#[derive(Error, Debug)]
pub enum KernelError {
    #[error("dimension mismatch: [{a_rows}x{a_cols}] @ [{b_rows}x{b_cols}]")]
    DimensionMismatch {
        a_rows: usize,
        a_cols: usize,
        b_rows: usize,
        b_cols: usize,
    },
    #[error("block of {needed} elements exceeds buffer capacity {capacity}")]
    CapacityExceeded { needed: usize, capacity: usize },
    #[error("memory error: {0}")]
    Mem(#[from] ak_mem::MemError),
}

pub type Result<T> = std::result::Result<T, KernelError>;
