use ak_gemm::KernelError;
use ak_mem::MemError;

/// Status codes returned by all FFI functions.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AkStatus {
    Ok = 0,
    ErrorInvalidArgument = 1,
    ErrorDimensionMismatch = 2,
    ErrorCapacityExceeded = 3,
    ErrorOutOfRange = 4,
    ErrorInternal = 5,
}

impl From<&KernelError> for AkStatus {
    fn from(err: &KernelError) -> Self {
        match err {
            KernelError::DimensionMismatch { .. } => AkStatus::ErrorDimensionMismatch,
            KernelError::CapacityExceeded { .. } => AkStatus::ErrorCapacityExceeded,
            KernelError::Mem(MemError::OutOfRange { .. }) => AkStatus::ErrorOutOfRange,
            KernelError::Mem(MemError::SizeMismatch { .. }) => AkStatus::ErrorInvalidArgument,
        }
    }
}
