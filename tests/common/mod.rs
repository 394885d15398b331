//! Common test utilities and helpers.

use selfmap::formats::macho::{MachImageBuilder, VM_PROT_READ, VM_PROT_WRITE};
use selfmap::{AccessConfig, LoadedImage, ProcessView, StaticImages};

/// Heap buffer that synthetic images point their segments at.
pub struct Arena {
    bytes: Vec<u8>,
}

impl Arena {
    pub fn new(len: usize, fill: u8) -> Self {
        Self {
            bytes: vec![fill; len],
        }
    }

    pub fn addr(&mut self) -> usize {
        self.bytes.as_mut_ptr() as usize
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// One-image header whose single `__DATA` segment covers `[start, start + len)`
/// once the given slide is applied.
pub fn data_image(path: &str, start: usize, len: usize, slide: isize) -> LoadedImage {
    let vmaddr = (start as i64 - slide as i64) as u64;
    let header = MachImageBuilder::new_64()
        .segment_64("__DATA", vmaddr, len as u64, VM_PROT_READ | VM_PROT_WRITE)
        .build();
    LoadedImage::mach_o(path, start, slide, header)
}

/// View whose map covers the first `covered` bytes of `arena`.
pub fn arena_view(
    arena: &mut Arena,
    covered: usize,
    config: AccessConfig,
) -> ProcessView<StaticImages> {
    let start = arena.addr();
    ProcessView::new(
        StaticImages::new(vec![data_image("/synthetic/arena", start, covered, 0)]),
        config,
    )
}

/// File name of the running test executable.
pub fn exe_name() -> String {
    std::env::current_exe()
        .ok()
        .and_then(|path| path.file_name().map(|name| name.to_string_lossy().into_owned()))
        .unwrap_or_default()
}
