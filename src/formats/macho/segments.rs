//! Segment load command decoding

use crate::formats::macho::commands::LoadCommand;
use crate::formats::macho::types::*;
use crate::formats::macho::utils::{read_fixed_name, NativeRead};

/// Decode a segment command.
///
/// Returns `Ok(None)` for load commands that are not `LC_SEGMENT` or
/// `LC_SEGMENT_64`.
pub fn parse_segment(command: &LoadCommand<'_>) -> Result<Option<SegmentCommand>> {
    let Some(kind) = SegmentKind::from_cmd(command.cmd) else {
        return Ok(None);
    };

    let data = command.data;
    if data.len() < kind.command_size() {
        return Err(MachError::Truncated {
            offset: command.offset,
            needed: kind.command_size(),
        });
    }

    let segname = read_fixed_name(data, 8)?;
    let segment = match kind {
        SegmentKind::Segment64 => SegmentCommand {
            kind,
            segname,
            vmaddr: data.read_u64(24)?,
            vmsize: data.read_u64(32)?,
            fileoff: data.read_u64(40)?,
            filesize: data.read_u64(48)?,
            maxprot: data.read_i32(56)?,
            initprot: data.read_i32(60)?,
            nsects: data.read_u32(64)?,
            flags: data.read_u32(68)?,
        },
        SegmentKind::Segment32 => SegmentCommand {
            kind,
            segname,
            vmaddr: data.read_u32(24)? as u64,
            vmsize: data.read_u32(28)? as u64,
            fileoff: data.read_u32(32)? as u64,
            filesize: data.read_u32(36)? as u64,
            maxprot: data.read_i32(40)?,
            initprot: data.read_i32(44)?,
            nsects: data.read_u32(48)?,
            flags: data.read_u32(52)?,
        },
    };
    Ok(Some(segment))
}
