//! Mach-O header and load command parser
//!
//! Works over an owned copy of an image's header and load command table, with
//! offset arithmetic checked against the buffer at every step.

pub mod builder;
pub mod commands;
pub mod header;
pub mod segments;
pub mod types;
pub mod utils;

pub use builder::MachImageBuilder;
pub use commands::{LoadCommand, LoadCommands};
use header::parse_header;
use segments::parse_segment;
pub use types::*;

/// Parsed view over a Mach-O header buffer
pub struct MachImage<'data> {
    data: &'data [u8],
    header: MachHeader,
}

impl<'data> MachImage<'data> {
    /// Parse the fixed header; commands are decoded lazily.
    pub fn parse(data: &'data [u8]) -> Result<Self> {
        let header = parse_header(data)?;
        Ok(Self { data, header })
    }

    pub fn header(&self) -> &MachHeader {
        &self.header
    }

    pub fn load_commands(&self) -> LoadCommands<'data> {
        LoadCommands::new(self.data, &self.header)
    }

    /// Segment commands of either width, in table order.
    ///
    /// A malformed command yields one error and ends the sequence.
    pub fn segments(&self) -> impl Iterator<Item = Result<SegmentCommand>> + 'data {
        let mut failed = false;
        self.load_commands().filter_map(move |command| {
            if failed {
                return None;
            }
            let parsed = command.and_then(|cmd| parse_segment(&cmd));
            if parsed.is_err() {
                failed = true;
            }
            parsed.transpose()
        })
    }
}
