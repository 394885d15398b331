//! Segment type for mapped load-time units.
//!
//! A segment is one loadable region of a loaded image together with where it
//! sits in this process and which protections it was mapped with.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::address_range::AddressRange;

/// Permission flags for memory segments.
///
/// The bit layout matches both Mach-O `vm_prot_t` and ELF `p_flags` once
/// normalized: read=1, write=2, execute=4.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Perms {
    /// Raw permission bits: read=1, write=2, execute=4
    pub bits: u8,
}

impl Perms {
    pub const NONE: Perms = Perms { bits: 0 };

    /// Create a new Perms instance
    pub fn new(read: bool, write: bool, execute: bool) -> Self {
        let mut bits = 0u8;
        if read {
            bits |= 1;
        }
        if write {
            bits |= 2;
        }
        if execute {
            bits |= 4;
        }
        Self { bits }
    }

    /// Build from a Mach-O `vm_prot_t` value.
    pub fn from_vm_prot(prot: i32) -> Self {
        Self {
            bits: (prot & 0x7) as u8,
        }
    }

    /// Check if segment has read permission
    pub fn has_read(&self) -> bool {
        (self.bits & 1) != 0
    }

    /// Check if segment has write permission
    pub fn has_write(&self) -> bool {
        (self.bits & 2) != 0
    }

    /// Check if segment has execute permission
    pub fn has_execute(&self) -> bool {
        (self.bits & 4) != 0
    }

    /// No access of any kind.
    pub fn is_none(&self) -> bool {
        self.bits & 0x7 == 0
    }
}

impl fmt::Display for Perms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut perms = String::new();
        perms.push(if self.has_read() { 'r' } else { '-' });
        perms.push(if self.has_write() { 'w' } else { '-' });
        perms.push(if self.has_execute() { 'x' } else { '-' });
        write!(f, "{}", perms)
    }
}

/// One loadable segment of a loaded image, relocated into this process.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Segment {
    /// Segment name (`__TEXT`, `__DATA`, ...) when the format records one
    pub name: Option<String>,
    /// Slid virtual address range
    pub range: AddressRange,
    /// Protections the segment was mapped with
    pub perms: Perms,
    /// Upper bound on protections, when known
    pub max_perms: Option<Perms>,
    /// Index of the owning image in loader order
    pub image: usize,
}

impl Segment {
    pub fn new(name: Option<String>, range: AddressRange, perms: Perms, image: usize) -> Self {
        Self {
            name,
            range,
            perms,
            max_perms: None,
            image,
        }
    }

    pub fn with_max_perms(mut self, max_perms: Perms) -> Self {
        self.max_perms = Some(max_perms);
        self
    }

    /// Get the segment size in bytes
    pub fn size(&self) -> usize {
        self.range.len()
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name.as_deref().unwrap_or("unnamed");
        write!(
            f,
            "#{:<3} {:<16} {} {}",
            self.image, name, self.perms, self.range
        )
    }
}
