//! C ABI for callers that hold versions as raw byte buffers.
//!
//! # Safety
//!
//! Callers must pass pointers to at least `count` readable bytes. The
//! buffers do not need to be NUL-terminated and may contain NUL bytes.
//! A null pointer or a count of zero or less is read as an empty version.

use crate::version::compare_versions;
use std::os::raw::{c_char, c_int};

/// View a caller-owned buffer as a byte slice.
///
/// # Safety
/// If `ptr` is non-null it must point to `count` readable bytes that stay
/// alive and unmodified for `'a`.
unsafe fn bytes_from_raw<'a>(ptr: *const c_char, count: c_int) -> &'a [u8] {
    let Ok(len) = usize::try_from(count) else {
        return &[];
    };
    if ptr.is_null() || len == 0 {
        return &[];
    }
    // SAFETY: non-null and `len` bytes readable per the caller contract
    unsafe { std::slice::from_raw_parts(ptr.cast::<u8>(), len) }
}

/// Compare two package versions. Returns a negative number, zero, or a
/// positive number when `version1` is older than, the same as, or newer
/// than `version2`.
///
/// # Safety
/// See the module documentation.
#[allow(non_snake_case)]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn compareVersion(
    version1: *const c_char,
    version1Count: c_int,
    version2: *const c_char,
    version2Count: c_int,
) -> c_int {
    // SAFETY: forwarded caller contract
    let (a, b) = unsafe {
        (
            bytes_from_raw(version1, version1Count),
            bytes_from_raw(version2, version2Count),
        )
    };
    compare_versions(a, b) as c_int
}
