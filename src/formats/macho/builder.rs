//! Synthetic Mach-O image construction.
//!
//! Produces header + load command tables in host byte order, the same shape
//! the loader maps into memory. Used to feed `StaticImages` and to exercise
//! the parser with well-formed and deliberately broken inputs.

use crate::formats::macho::types::*;

/// Builder for in-memory Mach-O header images
#[derive(Debug, Clone)]
pub struct MachImageBuilder {
    kind: HeaderKind,
    magic: Option<u32>,
    filetype: u32,
    ncmds: Option<u32>,
    commands: Vec<Vec<u8>>,
}

impl MachImageBuilder {
    /// `MH_MAGIC_64` image of type `MH_EXECUTE`.
    pub fn new_64() -> Self {
        Self::new(HeaderKind::Mach64)
    }

    /// `MH_MAGIC` image of type `MH_EXECUTE`.
    pub fn new_32() -> Self {
        Self::new(HeaderKind::Mach32)
    }

    fn new(kind: HeaderKind) -> Self {
        Self {
            kind,
            magic: None,
            filetype: 0x2,
            ncmds: None,
            commands: Vec::new(),
        }
    }

    /// Override the magic written into the header. The header layout stays
    /// the one chosen at construction.
    pub fn with_magic(mut self, magic: u32) -> Self {
        self.magic = Some(magic);
        self
    }

    pub fn filetype(mut self, filetype: u32) -> Self {
        self.filetype = filetype;
        self
    }

    /// Override the `ncmds` field instead of counting added commands.
    pub fn ncmds(mut self, ncmds: u32) -> Self {
        self.ncmds = Some(ncmds);
        self
    }

    /// Append an `LC_SEGMENT_64` command. `maxprot` equals `initprot`.
    pub fn segment_64(self, name: &str, vmaddr: u64, vmsize: u64, prot: i32) -> Self {
        let mut body = Vec::with_capacity(SEGMENT_COMMAND_64_SIZE - LOAD_COMMAND_SIZE);
        body.extend_from_slice(&segname(name));
        body.extend_from_slice(&vmaddr.to_ne_bytes());
        body.extend_from_slice(&vmsize.to_ne_bytes());
        body.extend_from_slice(&0u64.to_ne_bytes()); // fileoff
        body.extend_from_slice(&vmsize.to_ne_bytes()); // filesize
        body.extend_from_slice(&prot.to_ne_bytes());
        body.extend_from_slice(&prot.to_ne_bytes());
        body.extend_from_slice(&0u32.to_ne_bytes()); // nsects
        body.extend_from_slice(&0u32.to_ne_bytes()); // flags
        self.command(LC_SEGMENT_64, &body)
    }

    /// Append an `LC_SEGMENT` command. `maxprot` equals `initprot`.
    pub fn segment_32(self, name: &str, vmaddr: u32, vmsize: u32, prot: i32) -> Self {
        let mut body = Vec::with_capacity(SEGMENT_COMMAND_SIZE - LOAD_COMMAND_SIZE);
        body.extend_from_slice(&segname(name));
        body.extend_from_slice(&vmaddr.to_ne_bytes());
        body.extend_from_slice(&vmsize.to_ne_bytes());
        body.extend_from_slice(&0u32.to_ne_bytes()); // fileoff
        body.extend_from_slice(&vmsize.to_ne_bytes()); // filesize
        body.extend_from_slice(&prot.to_ne_bytes());
        body.extend_from_slice(&prot.to_ne_bytes());
        body.extend_from_slice(&0u32.to_ne_bytes()); // nsects
        body.extend_from_slice(&0u32.to_ne_bytes()); // flags
        self.command(LC_SEGMENT, &body)
    }

    /// Append a command with the given payload, padded to a multiple of 8.
    pub fn command(mut self, cmd: u32, payload: &[u8]) -> Self {
        let padded = (LOAD_COMMAND_SIZE + payload.len()).next_multiple_of(8);
        let mut raw = Vec::with_capacity(padded);
        raw.extend_from_slice(&cmd.to_ne_bytes());
        raw.extend_from_slice(&(padded as u32).to_ne_bytes());
        raw.extend_from_slice(payload);
        raw.resize(padded, 0);
        self.commands.push(raw);
        self
    }

    /// Append bytes verbatim as one command, whatever its `cmdsize` says.
    pub fn raw_command(mut self, raw: &[u8]) -> Self {
        self.commands.push(raw.to_vec());
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let sizeofcmds: usize = self.commands.iter().map(Vec::len).sum();
        let ncmds = self.ncmds.unwrap_or(self.commands.len() as u32);

        let mut out = Vec::with_capacity(self.kind.header_size() + sizeofcmds);
        out.extend_from_slice(&self.magic.unwrap_or(self.kind.magic()).to_ne_bytes());
        out.extend_from_slice(&0x0100_0007i32.to_ne_bytes()); // CPU_TYPE_X86_64
        out.extend_from_slice(&3i32.to_ne_bytes());
        out.extend_from_slice(&self.filetype.to_ne_bytes());
        out.extend_from_slice(&ncmds.to_ne_bytes());
        out.extend_from_slice(&(sizeofcmds as u32).to_ne_bytes());
        out.extend_from_slice(&0u32.to_ne_bytes()); // flags
        if self.kind == HeaderKind::Mach64 {
            out.extend_from_slice(&0u32.to_ne_bytes()); // reserved
        }
        for raw in &self.commands {
            out.extend_from_slice(raw);
        }
        out
    }
}

fn segname(name: &str) -> [u8; 16] {
    let mut out = [0u8; 16];
    let len = name.len().min(16);
    out[..len].copy_from_slice(&name.as_bytes()[..len]);
    out
}
