//! Guarded reads and writes by raw address.
//!
//! Every access asks the address map first and only touches memory when the
//! address is covered. A covered address is not proof that the access is
//! safe: with `BoundsPolicy::StartOnly` the length is never checked against
//! the end of the range, and writes are never checked against the segment's
//! protections. A write to a read-only page still faults.

use std::{mem, ptr};

use tracing::trace;

use crate::error::AccessError;
use crate::loader::ImageSource;
use crate::process::view::ProcessView;

/// Returned by `read_string_lossy` when the start address is not mapped.
pub const INVALID_POINTER_TEXT: &str = "Invalid Pointer!!";

/// Types that may be materialized from arbitrary bytes.
///
/// # Safety
/// Every bit pattern of `size_of::<Self>()` bytes, all zeroes included, must
/// be a valid value of the type.
pub unsafe trait Plain: Copy + 'static {
    /// The all-zero value.
    fn zeroed() -> Self {
        // SAFETY: all-zero is a valid bit pattern per the trait contract
        unsafe { mem::zeroed() }
    }
}

macro_rules! impl_plain {
    ($($ty:ty),* $(,)?) => {
        $(unsafe impl Plain for $ty {})*
    };
}

impl_plain!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64);

unsafe impl<T: Plain, const N: usize> Plain for [T; N] {}

/// Address-validated memory access.
///
/// Implementors answer the two questions; the typed operations come for free.
pub trait GuardedMemory {
    /// Is `address` inside some known segment?
    fn is_valid(&self, address: usize) -> bool;

    /// May `len` bytes starting at `address` be copied?
    fn permits(&self, address: usize, len: usize) -> bool;

    /// Validate an access of `len` bytes at `address`.
    fn check(&self, address: usize, len: usize) -> Result<(), AccessError> {
        if !self.is_valid(address) {
            trace!(address = format_args!("{:#x}", address), "address not mapped");
            return Err(AccessError::NotMapped { address });
        }
        if !self.permits(address, len) {
            trace!(address = format_args!("{:#x}", address), len, "copy refused");
            return Err(AccessError::CopyFailed { address, len });
        }
        Ok(())
    }

    /// Read `len` bytes starting at `address`.
    fn read_bytes(&self, address: usize, len: usize) -> Result<Vec<u8>, AccessError> {
        self.check(address, len)?;
        let mut buf = vec![0u8; len];
        // SAFETY: the address map covers `address`; see the module docs for
        // what that does and does not guarantee
        unsafe { ptr::copy_nonoverlapping(address as *const u8, buf.as_mut_ptr(), len) };
        Ok(buf)
    }

    /// Read a `T` from `address`. No alignment is required.
    fn read<T: Plain>(&self, address: usize) -> Result<T, AccessError> {
        self.check(address, mem::size_of::<T>())?;
        // SAFETY: validated as above; `T: Plain` accepts any bit pattern
        Ok(unsafe { ptr::read_unaligned(address as *const T) })
    }

    /// Read a `T`, or the all-zero `T` when the access is refused.
    fn read_or_default<T: Plain>(&self, address: usize) -> T {
        self.read(address).unwrap_or_else(|_| T::zeroed())
    }

    /// Read a NUL-terminated string of at most `max_len` bytes.
    ///
    /// Exactly `max_len` bytes are copied into a zeroed buffer of
    /// `max_len + 1` bytes, then the buffer is cut at its first NUL. Invalid
    /// UTF-8 is replaced. The bounds policy is applied before the buffer is
    /// allocated.
    fn read_string(&self, address: usize, max_len: usize) -> Result<String, AccessError> {
        if !self.is_valid(address) {
            return Err(AccessError::NotMapped { address });
        }
        let refused = AccessError::CopyFailed {
            address,
            len: max_len,
        };
        if !self.permits(address, max_len) {
            trace!(address = format_args!("{:#x}", address), max_len, "string copy refused");
            return Err(refused);
        }
        let buf_len = max_len.checked_add(1).ok_or(refused)?;

        let mut chars = vec![0u8; buf_len];
        // SAFETY: checked above; the last byte stays zero
        unsafe { ptr::copy_nonoverlapping(address as *const u8, chars.as_mut_ptr(), max_len) };

        let end = memchr::memchr(0, &chars).unwrap_or(max_len);
        Ok(String::from_utf8_lossy(&chars[..end]).into_owned())
    }

    /// `read_string` with the failure kinds folded into sentinel strings:
    /// `INVALID_POINTER_TEXT` when the address is not mapped, `""` when the
    /// copy is refused.
    fn read_string_lossy(&self, address: usize, max_len: usize) -> String {
        match self.read_string(address, max_len) {
            Ok(text) => text,
            Err(AccessError::NotMapped { .. }) => INVALID_POINTER_TEXT.to_string(),
            Err(AccessError::CopyFailed { .. }) => String::new(),
        }
    }

    /// Copy `bytes` to `address`. Nothing is written when the check fails.
    fn write_bytes(&self, address: usize, bytes: &[u8]) -> Result<(), AccessError> {
        self.check(address, bytes.len())?;
        // SAFETY: validated as above; write permission is not checked
        unsafe { ptr::copy_nonoverlapping(bytes.as_ptr(), address as *mut u8, bytes.len()) };
        Ok(())
    }

    /// Write `value` to `address`. Nothing is written when the check fails.
    fn write<T: Plain>(&self, address: usize, value: T) -> Result<(), AccessError> {
        self.check(address, mem::size_of::<T>())?;
        // SAFETY: validated as above; write permission is not checked
        unsafe { ptr::write_unaligned(address as *mut T, value) };
        Ok(())
    }
}

impl<S: ImageSource> GuardedMemory for ProcessView<S> {
    fn is_valid(&self, address: usize) -> bool {
        self.address_map().contains(address)
    }

    fn permits(&self, address: usize, len: usize) -> bool {
        ProcessView::<S>::permits(self, address, len)
    }
}
