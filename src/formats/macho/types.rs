//! Core Mach-O types and constants

use thiserror::Error;

/// Mach-O parsing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MachError {
    #[error("unknown Mach-O magic {0:#x}")]
    UnknownMagic(u32),
    #[error("truncated at {offset:#x}, needed {needed} bytes")]
    Truncated { offset: usize, needed: usize },
    #[error("load command {index} at {offset:#x} has invalid size {cmdsize}")]
    BadCommandSize {
        index: u32,
        offset: usize,
        cmdsize: u32,
    },
}

pub type Result<T> = std::result::Result<T, MachError>;

/// 32-bit header magic, host byte order
pub const MH_MAGIC: u32 = 0xfeed_face;
/// 32-bit header magic, swapped byte order
pub const MH_CIGAM: u32 = 0xcefa_edfe;
/// 64-bit header magic, host byte order
pub const MH_MAGIC_64: u32 = 0xfeed_facf;
/// 64-bit header magic, swapped byte order
pub const MH_CIGAM_64: u32 = 0xcffa_edfe;

/// `sizeof(struct mach_header)`
pub const MACH_HEADER_SIZE: usize = 28;
/// `sizeof(struct mach_header_64)`
pub const MACH_HEADER_64_SIZE: usize = 32;
/// `sizeof(struct load_command)`
pub const LOAD_COMMAND_SIZE: usize = 8;

pub const LC_SEGMENT: u32 = 0x1;
pub const LC_SYMTAB: u32 = 0x2;
pub const LC_SEGMENT_64: u32 = 0x19;
pub const LC_UUID: u32 = 0x1b;

/// `sizeof(struct segment_command)`
pub const SEGMENT_COMMAND_SIZE: usize = 56;
/// `sizeof(struct segment_command_64)`
pub const SEGMENT_COMMAND_64_SIZE: usize = 72;

pub const VM_PROT_NONE: i32 = 0x0;
pub const VM_PROT_READ: i32 = 0x1;
pub const VM_PROT_WRITE: i32 = 0x2;
pub const VM_PROT_EXECUTE: i32 = 0x4;

/// Header layout selected by the magic value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderKind {
    Mach32,
    Mach64,
}

impl HeaderKind {
    pub fn from_magic(magic: u32) -> Result<Self> {
        match magic {
            MH_MAGIC => Ok(HeaderKind::Mach32),
            MH_MAGIC_64 => Ok(HeaderKind::Mach64),
            other => Err(MachError::UnknownMagic(other)),
        }
    }

    pub fn magic(&self) -> u32 {
        match self {
            HeaderKind::Mach32 => MH_MAGIC,
            HeaderKind::Mach64 => MH_MAGIC_64,
        }
    }

    /// Size of the fixed header; load commands start right after it.
    pub fn header_size(&self) -> usize {
        match self {
            HeaderKind::Mach32 => MACH_HEADER_SIZE,
            HeaderKind::Mach64 => MACH_HEADER_64_SIZE,
        }
    }
}

/// Fixed Mach-O header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MachHeader {
    pub kind: HeaderKind,
    pub cputype: i32,
    pub cpusubtype: i32,
    pub filetype: u32,
    pub ncmds: u32,
    pub sizeofcmds: u32,
    pub flags: u32,
}

impl MachHeader {
    pub fn header_size(&self) -> usize {
        self.kind.header_size()
    }

    /// Bytes covered by the header plus its load command table.
    pub fn total_size(&self) -> usize {
        self.header_size().saturating_add(self.sizeofcmds as usize)
    }
}

/// Which segment command variant a load command holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Segment32,
    Segment64,
}

impl SegmentKind {
    pub fn from_cmd(cmd: u32) -> Option<Self> {
        match cmd {
            LC_SEGMENT => Some(SegmentKind::Segment32),
            LC_SEGMENT_64 => Some(SegmentKind::Segment64),
            _ => None,
        }
    }

    pub fn command_size(&self) -> usize {
        match self {
            SegmentKind::Segment32 => SEGMENT_COMMAND_SIZE,
            SegmentKind::Segment64 => SEGMENT_COMMAND_64_SIZE,
        }
    }
}

/// Decoded `segment_command` / `segment_command_64`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentCommand {
    pub kind: SegmentKind,
    pub segname: String,
    pub vmaddr: u64,
    pub vmsize: u64,
    pub fileoff: u64,
    pub filesize: u64,
    pub maxprot: i32,
    pub initprot: i32,
    pub nsects: u32,
    pub flags: u32,
}
