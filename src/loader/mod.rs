//! Loaded image enumeration.
//!
//! The dynamic loader's bookkeeping (image list, per-image header and load
//! commands, slide) is read through the `ImageSource` trait. `HostImages`
//! reads the real loader of this process; `StaticImages` serves a fixed list
//! of synthetic images.

#[cfg(target_vendor = "apple")]
mod dyld;
#[cfg(target_os = "linux")]
mod phdr;

use serde::{Deserialize, Serialize};

use crate::core::segment::Perms;

/// A loadable segment already decoded by the platform loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramSegment {
    /// Unslid virtual address
    pub vaddr: u64,
    /// Size in memory
    pub memsz: u64,
    pub perms: Perms,
}

/// How the layout of a loaded image is described.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageLayout {
    /// Owned copy of a Mach-O header followed by its load command table
    MachO(Vec<u8>),
    /// Loadable program headers reported by the loader (ELF `PT_LOAD`)
    Program(Vec<ProgramSegment>),
    /// The loader reported no header for this image
    Missing,
}

/// Read-only snapshot of one loader entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedImage {
    /// Position in loader order
    pub index: usize,
    /// Path recorded by the loader
    pub path: String,
    /// Address the image header is mapped at, 0 when unknown
    pub base: usize,
    /// Relocation delta applied by the loader
    pub slide: isize,
    pub layout: ImageLayout,
}

impl LoadedImage {
    /// A Mach-O image described by a header buffer.
    pub fn mach_o(path: impl Into<String>, base: usize, slide: isize, header: Vec<u8>) -> Self {
        Self {
            index: 0,
            path: path.into(),
            base,
            slide,
            layout: ImageLayout::MachO(header),
        }
    }

    /// An image the loader reports without a header.
    pub fn missing(path: impl Into<String>) -> Self {
        Self {
            index: 0,
            path: path.into(),
            base: 0,
            slide: 0,
            layout: ImageLayout::Missing,
        }
    }
}

/// Access to the loader's list of images.
pub trait ImageSource: Send + Sync {
    /// Snapshot of all loaded images in loader order (main executable
    /// first on the supported platforms).
    fn images(&self) -> Vec<LoadedImage>;
}

impl<S: ImageSource + ?Sized> ImageSource for &S {
    fn images(&self) -> Vec<LoadedImage> {
        (**self).images()
    }
}

impl<S: ImageSource + ?Sized> ImageSource for Box<S> {
    fn images(&self) -> Vec<LoadedImage> {
        (**self).images()
    }
}

/// The dynamic loader of the current process.
///
/// Apple targets read dyld, Linux targets use `dl_iterate_phdr`. Other
/// platforms report no images.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostImages;

impl ImageSource for HostImages {
    fn images(&self) -> Vec<LoadedImage> {
        #[cfg(target_vendor = "apple")]
        let images = dyld::images();
        #[cfg(target_os = "linux")]
        let images = phdr::images();
        #[cfg(not(any(target_vendor = "apple", target_os = "linux")))]
        let images = {
            tracing::debug!("no loader backend for this platform");
            Vec::new()
        };
        images
    }
}

/// A fixed list of images.
#[derive(Debug, Clone, Default)]
pub struct StaticImages {
    images: Vec<LoadedImage>,
}

impl StaticImages {
    /// Indices are reassigned to follow list order.
    pub fn new(images: Vec<LoadedImage>) -> Self {
        let images = images
            .into_iter()
            .enumerate()
            .map(|(index, image)| LoadedImage { index, ..image })
            .collect();
        Self { images }
    }

    pub fn push(&mut self, image: LoadedImage) {
        let index = self.images.len();
        self.images.push(LoadedImage { index, ..image });
    }
}

impl ImageSource for StaticImages {
    fn images(&self) -> Vec<LoadedImage> {
        self.images.clone()
    }
}
