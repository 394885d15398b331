//! Mach-O header parsing

use crate::formats::macho::types::*;
use crate::formats::macho::utils::NativeRead;

/// Parse the fixed Mach-O header.
///
/// Only host-order `MH_MAGIC` and `MH_MAGIC_64` are accepted; anything else,
/// including byte-swapped and fat magics, is `UnknownMagic`.
pub fn parse_header(data: &[u8]) -> Result<MachHeader> {
    let magic = data.read_u32(0)?;
    let kind = HeaderKind::from_magic(magic)?;

    let header_size = kind.header_size();
    if data.len() < header_size {
        return Err(MachError::Truncated {
            offset: 0,
            needed: header_size,
        });
    }

    Ok(MachHeader {
        kind,
        cputype: data.read_i32(4)?,
        cpusubtype: data.read_i32(8)?,
        filetype: data.read_u32(12)?,
        ncmds: data.read_u32(16)?,
        sizeofcmds: data.read_u32(20)?,
        flags: data.read_u32(24)?,
    })
}
