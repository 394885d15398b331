//! Configuration for address-map construction and guarded access.
//!
//! Defaults reproduce the permissive behaviour: only the start address of an
//! access is validated, and every 64-bit segment is collected, including
//! inaccessible ones such as `__PAGEZERO`.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// How much of an access must lie inside a known segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundsPolicy {
    /// Only the first byte is checked; `len` is never compared against the
    /// end of the covering range.
    #[default]
    StartOnly,
    /// `[address, address + len)` must lie inside a single range.
    WholeSpan,
}

/// Which load commands become address-map entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentConfig {
    /// Also collect 32-bit `LC_SEGMENT` commands.
    pub include_segment32: bool,
    /// Drop segments whose initial protection is `---`.
    pub skip_inaccessible: bool,
    /// Drop segments with `vmsize == 0`.
    pub skip_empty: bool,
}

/// Master configuration for a `ProcessView`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    /// Bounds checking applied by the guarded accessor.
    pub bounds: BoundsPolicy,
    /// Segment collection options for the map builder.
    pub segments: SegmentConfig,
}

impl AccessConfig {
    /// Preset that closes the unchecked-length gap and ignores segments that
    /// can never be read.
    pub fn strict() -> Self {
        Self {
            bounds: BoundsPolicy::WholeSpan,
            segments: SegmentConfig {
                include_segment32: false,
                skip_inaccessible: true,
                skip_empty: true,
            },
        }
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Serialize the configuration to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
