//! ProcessView: the context object tying an image source to its address map.
//!
//! The map is built on first use and cached for the lifetime of the view. It
//! is never refreshed, so images loaded or unloaded afterwards are not seen.

use once_cell::sync::OnceCell;

use crate::config::{AccessConfig, BoundsPolicy};
use crate::core::{AddressMap, Segment};
use crate::loader::{HostImages, ImageSource, LoadedImage};
use crate::process::builder::build_address_map;
use crate::process::locator::find_image_base;

/// An image source, its configuration, and its lazily built address map.
#[derive(Debug)]
pub struct ProcessView<S: ImageSource = HostImages> {
    source: S,
    config: AccessConfig,
    map: OnceCell<AddressMap>,
}

impl ProcessView<HostImages> {
    /// View over the current process with the default configuration.
    pub fn host() -> Self {
        Self::new(HostImages, AccessConfig::default())
    }
}

impl<S: ImageSource> ProcessView<S> {
    pub fn new(source: S, config: AccessConfig) -> Self {
        Self {
            source,
            config,
            map: OnceCell::new(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn config(&self) -> &AccessConfig {
        &self.config
    }

    /// The address map, built on the first call and reused afterwards.
    ///
    /// Concurrent first calls build once; the others wait for the result.
    pub fn address_map(&self) -> &AddressMap {
        self.map
            .get_or_init(|| build_address_map(&self.source, &self.config.segments))
    }

    /// True once the address map has been built.
    pub fn is_built(&self) -> bool {
        self.map.get().is_some()
    }

    /// True when `address` lies inside some segment of the map.
    pub fn is_valid(&self, address: usize) -> bool {
        self.address_map().contains(address)
    }

    /// Segment covering `address`, first match in map order.
    pub fn covering(&self, address: usize) -> Option<&Segment> {
        self.address_map().covering(address)
    }

    /// Whether an access of `len` bytes at `address` passes the configured
    /// bounds policy.
    pub fn permits(&self, address: usize, len: usize) -> bool {
        match self.config.bounds {
            BoundsPolicy::StartOnly => self.is_valid(address),
            BoundsPolicy::WholeSpan => self.address_map().covers_span(address, len),
        }
    }

    /// Fresh snapshot of the loader's images. Not cached.
    pub fn images(&self) -> Vec<LoadedImage> {
        self.source.images()
    }

    /// Uncached image base lookup; see `BaseSlot` for the cached form.
    pub fn find_image_base(&self, name: &str) -> Option<usize> {
        find_image_base(&self.source, name)
    }
}
