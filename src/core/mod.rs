//! Core data types for selfmap.
//!
//! Ranges, segments and the address map built from them.

pub mod address_map;
pub mod address_range;
pub mod segment;

pub use address_map::AddressMap;
pub use address_range::AddressRange;
pub use segment::{Perms, Segment};
