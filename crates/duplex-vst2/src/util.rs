//! C string helpers for host-provided buffers.

use std::ffi::{c_char, c_void, CStr};

/// Longest prefix of `s` that fits in `max_bytes` without splitting a
/// character.
pub fn truncate_bytes(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Copy `s` into a fixed C array, truncating and always null terminating.
pub fn copy_str_to_char_array(s: &str, dest: &mut [c_char]) {
    if dest.is_empty() {
        return;
    }
    let text = truncate_bytes(s, dest.len() - 1);
    for (slot, &b) in dest.iter_mut().zip(text.as_bytes()) {
        *slot = b as c_char;
    }
    dest[text.len()] = 0;
}

/// Write `s` to a host buffer as at most `max_bytes` bytes plus terminator.
///
/// Returns `false` when `dest` is null.
///
/// # Safety
///
/// A non-null `dest` must be writable for `max_bytes + 1` bytes.
pub unsafe fn write_c_string(dest: *mut c_void, s: &str, max_bytes: usize) -> bool {
    if dest.is_null() {
        return false;
    }
    // SAFETY: caller guarantees `max_bytes + 1` writable bytes.
    let buffer = unsafe { std::slice::from_raw_parts_mut(dest as *mut c_char, max_bytes + 1) };
    copy_str_to_char_array(s, buffer);
    true
}

/// Read a null-terminated host string, replacing invalid UTF-8.
///
/// # Safety
///
/// A non-null `src` must point to a null-terminated string.
pub unsafe fn read_c_string(src: *const c_void) -> Option<String> {
    if src.is_null() {
        return None;
    }
    // SAFETY: caller guarantees termination.
    let text = unsafe { CStr::from_ptr(src as *const c_char) };
    Some(text.to_string_lossy().into_owned())
}
