use ak_mem::MemError;

use crate::error::{KernelError, Result};

/// Default element capacity of the add-constant kernel.
pub const DEFAULT_ADD_CAPACITY: usize = 50;

/// Element-wise add-constant kernel with a fixed staging capacity.
///
/// Stages up to `capacity` elements on chip, adds the constant, and writes
/// the block back. Addition wraps on overflow, matching a 32-bit datapath.
#[derive(Debug, Clone)]
pub struct AddConstantKernel {
    capacity: usize,
    staging: Vec<i32>,
}

impl AddConstantKernel {
    /// Kernel with an explicit staging capacity.
    pub fn new(capacity: usize) -> Self {
        AddConstantKernel {
            capacity,
            staging: Vec::with_capacity(capacity),
        }
    }

    /// Element capacity of the staging buffer.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Add `constant` to `values[..size]` in place; elements past `size`
    /// stay untouched.
    ///
    /// # Errors
    ///
    /// Returns `KernelError::CapacityExceeded` if `size` exceeds the staging
    /// capacity, or an out-of-range `MemError` if `size` exceeds the buffer
    /// length. `values` is untouched on error.
    pub fn run(&mut self, values: &mut [i32], constant: i32, size: usize) -> Result<()> {
        if size > self.capacity {
            return Err(KernelError::CapacityExceeded {
                needed: size,
                capacity: self.capacity,
            });
        }
        if size > values.len() {
            return Err(KernelError::Mem(MemError::OutOfRange {
                axis: "element",
                start: 0,
                end: size,
                extent: values.len(),
            }));
        }
        self.staging.clear();
        self.staging.extend_from_slice(&values[..size]);
        for v in &mut self.staging {
            *v = v.wrapping_add(constant);
        }
        values[..size].copy_from_slice(&self.staging);
        Ok(())
    }
}

impl Default for AddConstantKernel {
    fn default() -> Self {
        Self::new(DEFAULT_ADD_CAPACITY)
    }
}
