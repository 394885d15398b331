//! selfmap: look at and touch the current process's own loaded images.
//!
//! * resolve the base address of a loaded module by path substring,
//! * build the map of every loadable segment of every loaded image,
//! * check whether an address lies inside that map,
//! * read and write typed values only at addresses the map covers.
//!
//! ```no_run
//! use selfmap::GuardedMemory;
//!
//! if let Some(base) = selfmap::resolve_base("ShooterGame") {
//!     let health: i32 = selfmap::read_or_default(base + 0x1234);
//!     let _ = selfmap::write::<i32>(base + 0x1234, health + 10);
//! }
//!
//! let view = selfmap::ProcessView::new(selfmap::HostImages, selfmap::AccessConfig::strict());
//! let _name = view.read_string_lossy(0x1000, 32);
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod formats;
pub mod loader;
pub mod logging;
pub mod process;

pub use config::{AccessConfig, BoundsPolicy, SegmentConfig};
pub use crate::core::{AddressMap, AddressRange, Perms, Segment};
pub use error::{AccessError, Result, SelfMapError};
pub use loader::{HostImages, ImageLayout, ImageSource, LoadedImage, StaticImages};
pub use process::{
    address_map, host, is_valid, read, read_bytes, read_or_default, read_string,
    read_string_lossy, resolve_base, write, write_bytes, BaseSlot, GuardedMemory, Plain,
    ProcessView, INVALID_POINTER_TEXT,
};
