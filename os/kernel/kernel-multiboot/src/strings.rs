//! # Bounded Loader String Reads
//!
//! Loader strings (command line, loader name, module tags) are
//! NUL-terminated byte runs at physical addresses the kernel has no way
//! to pre-verify. The scan is bounded by [`MAX_STRING_LEN`] so a
//! corrupt pointer cannot send the kernel walking unbounded physical
//! memory looking for a terminator, and it advances one byte at a time
//! so no read ever reaches past the terminator of an intact string.

use crate::phys::PhysMapper;
use crate::{ParseError, PhysAddr};

/// Upper bound on a loader string, terminator included. One page: a
/// longer "command line" is corruption in practice.
pub const MAX_STRING_LEN: usize = 4096;

/// Read the NUL-terminated string at `pa` through `mapper`.
///
/// # Errors
/// [`ParseError::MalformedString`] if no terminator appears within
/// [`MAX_STRING_LEN`] bytes or the bytes are not valid UTF-8.
///
/// # Safety
/// `pa` must be readable through `mapper` up to and including the
/// terminator (or up to [`MAX_STRING_LEN`] bytes if unterminated).
pub(crate) unsafe fn read_str<'a, M: PhysMapper>(
    mapper: &M,
    pa: PhysAddr,
) -> Result<&'a str, ParseError> {
    let mut len = 0usize;
    while len < MAX_STRING_LEN {
        // SAFETY: single byte inside the caller-guaranteed range.
        let byte = unsafe { *mapper.phys_to_ref::<u8>(pa + len as u64) };
        if byte == 0 {
            // SAFETY: all `len` bytes were just read individually.
            let bytes = unsafe { mapper.phys_to_slice(pa, len) };
            return core::str::from_utf8(bytes).map_err(|_| ParseError::MalformedString);
        }
        len += 1;
    }
    Err(ParseError::MalformedString)
}
