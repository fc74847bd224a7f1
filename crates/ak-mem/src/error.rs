use thiserror::Error;

/// Errors raised by the matrix data model and block transfers.
#[derive(Error, Debug)]
pub enum MemError {
    /// An address range fell outside the extent of the addressed axis.
    #[error("{axis} range {start}..{end} out of bounds (extent {extent})")]
    OutOfRange {
        axis: &'static str,
        start: usize,
        end: usize,
        extent: usize,
    },

    /// A buffer length did not match the region it was paired with.
    #[error("buffer of {len} elements does not match {rows}x{cols} region ({expected} elements)")]
    SizeMismatch {
        len: usize,
        rows: usize,
        cols: usize,
        expected: usize,
    },
}

/// Convenience alias for memory-interface results.
pub type Result<T> = std::result::Result<T, MemError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_display() {
        let err = MemError::OutOfRange {
            axis: "row",
            start: 2,
            end: 6,
            extent: 4,
        };
        assert_eq!(err.to_string(), "row range 2..6 out of bounds (extent 4)");
    }

    #[test]
    fn test_size_mismatch_display() {
        let err = MemError::SizeMismatch {
            len: 5,
            rows: 2,
            cols: 3,
            expected: 6,
        };
        assert_eq!(
            err.to_string(),
            "buffer of 5 elements does not match 2x3 region (6 elements)"
        );
    }
}
