use std::cell::RefCell;
use std::ffi::CString;
use std::fmt::Display;

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Record an error for later retrieval via `ak_last_error`.
///
/// Accepts anything printable, so call sites pass errors and literals
/// directly. Interior NUL bytes cannot occur in the kernel error messages;
/// if one ever did, the message is dropped rather than truncated.
pub fn set_last_error(err: impl Display) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(err.to_string()).ok();
    });
}

/// Take the last error message, leaving `None` in its place.
pub fn take_last_error() -> Option<CString> {
    LAST_ERROR.with(|e| e.borrow_mut().take())
}
