//! Utility functions for Mach-O parsing
//!
//! Images are read from this process's own memory, so every field is in host
//! byte order.

use crate::formats::macho::types::{MachError, Result};

fn field<const N: usize>(data: &[u8], offset: usize) -> Result<[u8; N]> {
    offset
        .checked_add(N)
        .and_then(|end| data.get(offset..end))
        .and_then(|bytes| <[u8; N]>::try_from(bytes).ok())
        .ok_or(MachError::Truncated { offset, needed: N })
}

/// Trait for reading host-order values with bounds checking
pub trait NativeRead {
    fn read_u32(&self, offset: usize) -> Result<u32>;
    fn read_i32(&self, offset: usize) -> Result<i32>;
    fn read_u64(&self, offset: usize) -> Result<u64>;
}

impl NativeRead for [u8] {
    fn read_u32(&self, offset: usize) -> Result<u32> {
        field::<4>(self, offset).map(u32::from_ne_bytes)
    }

    fn read_i32(&self, offset: usize) -> Result<i32> {
        field::<4>(self, offset).map(i32::from_ne_bytes)
    }

    fn read_u64(&self, offset: usize) -> Result<u64> {
        field::<8>(self, offset).map(u64::from_ne_bytes)
    }
}

/// Decode a fixed 16-byte name field, stopping at the first NUL.
pub fn read_fixed_name(data: &[u8], offset: usize) -> Result<String> {
    let raw = field::<16>(data, offset)?;
    let len = memchr::memchr(0, &raw).unwrap_or(raw.len());
    Ok(String::from_utf8_lossy(&raw[..len]).into_owned())
}
