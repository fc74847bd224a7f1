mod error;
mod types;

pub use error::*;
pub use types::*;

use std::os::raw::c_char;
use std::slice;

use ak_gemm::{AddConstantKernel, KernelError, TileConfig};
use ak_mem::{Element, MatrixView, MatrixViewMut};

/// Execute a closure that returns an `AkStatus`, catching any panics
/// and converting them into `AkStatus::ErrorInternal`.
fn catch_panic<F: FnOnce() -> AkStatus + std::panic::UnwindSafe>(f: F) -> AkStatus {
    match std::panic::catch_unwind(f) {
        Ok(status) => status,
        Err(_) => {
            set_last_error("internal panic");
            AkStatus::ErrorInternal
        }
    }
}

/// Record `err` and return its status code.
fn fail(err: KernelError) -> AkStatus {
    let status = AkStatus::from(&err);
    set_last_error(err);
    status
}

fn multiply_into<T: Element>(
    a: &[T],
    b: &[T],
    c: &mut [T],
    m: usize,
    k: usize,
    n: usize,
) -> ak_gemm::Result<()> {
    let a_view = MatrixView::new(a, m, k)?;
    let b_view = MatrixView::new(b, k, n)?;
    let result = ak_gemm::multiply(&a_view, &b_view, &TileConfig::default())?;
    let mut c_view = MatrixViewMut::new(c, m, n)?;
    c_view.write_block(0..m, 0..n, result.as_slice())?;
    Ok(())
}

/// Shared body of the typed mmult entry points; validates the raw arguments
/// and bridges into the kernel driver.
unsafe fn mmult<T: Element>(
    a: *const T,
    b: *const T,
    c: *mut T,
    a_row: i32,
    a_col: i32,
    b_col: i32,
) -> AkStatus {
    if a.is_null() || b.is_null() || c.is_null() {
        set_last_error("null argument");
        return AkStatus::ErrorInvalidArgument;
    }
    if a_row < 0 || a_col < 0 || b_col < 0 {
        set_last_error(format!(
            "negative dimension: a_row={}, a_col={}, b_col={}",
            a_row, a_col, b_col
        ));
        return AkStatus::ErrorInvalidArgument;
    }
    let (m, k, n) = (a_row as usize, a_col as usize, b_col as usize);
    let a = unsafe { slice::from_raw_parts(a, m * k) };
    let b = unsafe { slice::from_raw_parts(b, k * n) };
    let c = unsafe { slice::from_raw_parts_mut(c, m * n) };
    match multiply_into(a, b, c, m, k, n) {
        Ok(()) => AkStatus::Ok,
        Err(e) => fail(e),
    }
}

/// Multiply two row-major i32 matrices: writes `a @ b` into `c`.
///
/// `a` must point to `a_row * a_col` elements, `b` to `a_col * b_col`, and
/// `c` to `a_row * b_col`. On any error `c` is untouched and `ak_last_error`
/// describes the failure.
#[no_mangle]
pub unsafe extern "C" fn ak_mmult_i32(
    a: *const i32,
    b: *const i32,
    c: *mut i32,
    a_row: i32,
    a_col: i32,
    b_col: i32,
) -> AkStatus {
    catch_panic(|| unsafe { mmult(a, b, c, a_row, a_col, b_col) })
}

/// Multiply two row-major f32 matrices: writes `a @ b` into `c`.
///
/// Same contract as `ak_mmult_i32`. Accumulation is single precision in a
/// fixed order, so results are bit-identical across runs.
#[no_mangle]
pub unsafe extern "C" fn ak_mmult_f32(
    a: *const f32,
    b: *const f32,
    c: *mut f32,
    a_row: i32,
    a_col: i32,
    b_col: i32,
) -> AkStatus {
    catch_panic(|| unsafe { mmult(a, b, c, a_row, a_col, b_col) })
}

/// Fixed-shape 4x4 integer multiply: writes `a @ b` into `c`.
///
/// All three pointers must reference 16 row-major elements.
#[no_mangle]
pub unsafe extern "C" fn ak_gemm_4x4(a: *const i32, b: *const i32, c: *mut i32) -> AkStatus {
    catch_panic(|| unsafe { mmult(a, b, c, 4, 4, 4) })
}

/// Add `constant` to the first `size` elements of `values` in place.
///
/// `values` must point to at least `size` elements; at most the kernel's
/// staging capacity (50 elements) is processed per call.
#[no_mangle]
pub unsafe extern "C" fn ak_add_constant(
    values: *mut i32,
    constant: i32,
    size: i32,
) -> AkStatus {
    catch_panic(|| {
        if values.is_null() {
            set_last_error("null argument");
            return AkStatus::ErrorInvalidArgument;
        }
        if size < 0 {
            set_last_error(format!("negative size: {}", size));
            return AkStatus::ErrorInvalidArgument;
        }
        let n = size as usize;
        let values = unsafe { slice::from_raw_parts_mut(values, n) };
        let mut kernel = AddConstantKernel::default();
        match kernel.run(values, constant, n) {
            Ok(()) => AkStatus::Ok,
            Err(e) => fail(e),
        }
    })
}

/// Retrieve the last error message.
///
/// Returns a pointer to a C string describing the most recent error, or
/// null if no error has occurred. The caller must free the returned string
/// with `ak_free_string`.
#[no_mangle]
pub extern "C" fn ak_last_error() -> *const c_char {
    match error::take_last_error() {
        Some(e) => e.into_raw(),
        None => std::ptr::null(),
    }
}

/// Free a string previously returned by `ak_last_error`.
#[no_mangle]
pub unsafe extern "C" fn ak_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(std::ffi::CString::from_raw(s));
    }
}
