use thiserror::Error;

#[derive(Error, Debug)]
pub enum FirmwareError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("address {addr:#x} out of range for {len} byte image")]
    AddressOutOfRange { addr: usize, len: usize },
    #[error("unaligned word address {addr:#x}")]
    UnalignedAddress { addr: usize },
    #[error("invalid image size {len}: expected a word-aligned size of at least {min} bytes")]
    ImageSize { len: usize, min: usize },
    #[error("operand shape mismatch: a is {a_rows}x{a_cols}, b is {b_rows}x{b_cols}")]
    OperandShape {
        a_rows: usize,
        a_cols: usize,
        b_rows: usize,
        b_cols: usize,
    },
    #[error("memory error: {0}")]
    Mem(#[from] ak_mem::MemError),
}

pub type Result<T> = std::result::Result<T, FirmwareError>;
