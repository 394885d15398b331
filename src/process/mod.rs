//! Introspection of the current process.
//!
//! `ProcessView` is the context object: an image source, a configuration and
//! the address map built from them. The free functions below operate on one
//! process-wide view over the host loader with the default configuration.

pub mod builder;
pub mod locator;
pub mod memory;
pub mod view;

use once_cell::sync::Lazy;

use crate::core::AddressMap;
use crate::error::AccessError;
use crate::loader::HostImages;

pub use builder::{build_address_map, image_segments};
pub use locator::{find_image, find_image_base, BaseSlot};
pub use memory::{GuardedMemory, Plain, INVALID_POINTER_TEXT};
pub use view::ProcessView;

static HOST: Lazy<ProcessView<HostImages>> = Lazy::new(ProcessView::host);
static HOST_BASE: BaseSlot = BaseSlot::new();

/// The process-wide view over the host loader.
pub fn host() -> &'static ProcessView<HostImages> {
    &HOST
}

/// Base address of the first loaded image whose path contains `name`.
///
/// All callers of this function share one cache slot: once any name has
/// resolved, that base is returned for every later call, whatever `name` is.
/// Use `image_base!` for a slot per call site, or
/// `ProcessView::find_image_base` for an uncached lookup.
pub fn resolve_base(name: &str) -> Option<usize> {
    HOST_BASE.resolve(&HostImages, name)
}

/// Every loadable segment of every image loaded when this is first called.
pub fn address_map() -> &'static AddressMap {
    HOST.address_map()
}

pub fn is_valid(address: usize) -> bool {
    HOST.is_valid(address)
}

pub fn read<T: Plain>(address: usize) -> Result<T, AccessError> {
    HOST.read(address)
}

pub fn read_or_default<T: Plain>(address: usize) -> T {
    HOST.read_or_default(address)
}

pub fn read_bytes(address: usize, len: usize) -> Result<Vec<u8>, AccessError> {
    HOST.read_bytes(address, len)
}

pub fn read_string(address: usize, max_len: usize) -> Result<String, AccessError> {
    HOST.read_string(address, max_len)
}

pub fn read_string_lossy(address: usize, max_len: usize) -> String {
    HOST.read_string_lossy(address, max_len)
}

pub fn write<T: Plain>(address: usize, value: T) -> Result<(), AccessError> {
    HOST.write(address, value)
}

pub fn write_bytes(address: usize, bytes: &[u8]) -> Result<(), AccessError> {
    HOST.write_bytes(address, bytes)
}
