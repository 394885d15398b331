//! Load command table walking
//!
//! Commands are variable length and self-delimiting, so the table is walked
//! sequentially: each command's `cmdsize` gives the offset of the next one.

use crate::formats::macho::types::*;
use crate::formats::macho::utils::NativeRead;

/// One raw load command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadCommand<'data> {
    /// Position in the table, starting at 0
    pub index: u32,
    /// Offset of the command from the start of the image
    pub offset: usize,
    pub cmd: u32,
    pub cmdsize: u32,
    /// The whole command, `cmdsize` bytes
    pub data: &'data [u8],
}

/// Iterator over exactly `ncmds` load commands.
///
/// Every step is bounds checked against the image buffer. The first
/// malformed command is yielded as an error and ends the iteration.
pub struct LoadCommands<'data> {
    data: &'data [u8],
    offset: usize,
    index: u32,
    ncmds: u32,
    done: bool,
}

impl<'data> LoadCommands<'data> {
    pub fn new(data: &'data [u8], header: &MachHeader) -> Self {
        Self {
            data,
            offset: header.header_size(),
            index: 0,
            ncmds: header.ncmds,
            done: false,
        }
    }

    fn next_command(&mut self) -> Result<LoadCommand<'data>> {
        let offset = self.offset;
        let cmd = self.data.read_u32(offset)?;
        let cmdsize = self.data.read_u32(offset + 4)?;

        if (cmdsize as usize) < LOAD_COMMAND_SIZE {
            return Err(MachError::BadCommandSize {
                index: self.index,
                offset,
                cmdsize,
            });
        }

        let data = offset
            .checked_add(cmdsize as usize)
            .and_then(|end| self.data.get(offset..end))
            .ok_or(MachError::Truncated {
                offset,
                needed: cmdsize as usize,
            })?;

        let command = LoadCommand {
            index: self.index,
            offset,
            cmd,
            cmdsize,
            data,
        };
        self.offset += cmdsize as usize;
        self.index += 1;
        Ok(command)
    }
}

impl<'data> Iterator for LoadCommands<'data> {
    type Item = Result<LoadCommand<'data>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.index >= self.ncmds {
            return None;
        }
        let result = self.next_command();
        if result.is_err() {
            self.done = true;
        }
        Some(result)
    }
}
