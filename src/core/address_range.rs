//! AddressRange type for mapped segments.
//!
//! This module provides the AddressRange type that represents a half-open
//! region `[start, end)` of the current process's virtual address space.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A half-open contiguous region of virtual memory.
///
/// Ranges are produced by the address-map builder from segment load
/// commands and are immutable afterwards. `end >= start` always holds; an
/// empty range (`start == end`) contains no address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AddressRange {
    start: usize,
    end: usize,
}

impl AddressRange {
    /// Create a new AddressRange.
    ///
    /// # Errors
    /// Returns an error if `end < start`.
    pub fn new(start: usize, end: usize) -> Result<Self, String> {
        if end < start {
            return Err(format!(
                "range end {:#x} is below its start {:#x}",
                end, start
            ));
        }
        Ok(Self { start, end })
    }

    /// Create a range from a start address and a size.
    ///
    /// A size that would run past the top of the address space is clamped
    /// to `usize::MAX`.
    pub fn from_start_size(start: usize, size: usize) -> Self {
        Self {
            start,
            end: start.saturating_add(size),
        }
    }

    /// First address of the range (inclusive).
    pub fn start(&self) -> usize {
        self.start
    }

    /// One past the last address of the range (exclusive).
    pub fn end(&self) -> usize {
        self.end
    }

    /// Size of the range in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True when the range covers no address.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Check if this range contains the given address.
    pub fn contains(&self, address: usize) -> bool {
        address >= self.start && address < self.end
    }

    /// Check if `[address, address + len)` lies entirely inside this range.
    ///
    /// A zero-length span is contained when its address is.
    pub fn contains_span(&self, address: usize, len: usize) -> bool {
        if !self.contains(address) {
            return false;
        }
        match address.checked_add(len) {
            Some(span_end) => span_end <= self.end,
            None => false,
        }
    }
}

impl fmt::Display for AddressRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:#x}, {:#x})", self.start, self.end)
    }
}
