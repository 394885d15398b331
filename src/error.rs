//! Error types for selfmap.
//!
//! Every failure a caller can observe has its own variant, so a legitimate
//! zero read from memory can never be confused with "address not mapped".

use thiserror::Error;

use crate::formats::macho::MachError;

/// Failures of the guarded accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessError {
    /// The address is not inside any segment of the address map.
    #[error("address {address:#x} is not inside any mapped segment")]
    NotMapped { address: usize },

    /// The address passed the first check but the bounded copy was refused.
    #[error("copy of {len} bytes at {address:#x} failed")]
    CopyFailed { address: usize, len: usize },
}

impl AccessError {
    /// Address the failed operation targeted.
    pub fn address(&self) -> usize {
        match self {
            AccessError::NotMapped { address } | AccessError::CopyFailed { address, .. } => {
                *address
            }
        }
    }
}

/// Main error type for selfmap operations.
#[derive(Debug, Error)]
pub enum SelfMapError {
    /// Image header parsing errors
    #[error("Image header error: {0}")]
    Image(#[from] MachError),

    /// Guarded memory access errors
    #[error("Memory access error: {0}")]
    Access(#[from] AccessError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for SelfMapError {
    fn from(err: serde_json::Error) -> Self {
        SelfMapError::Config(err.to_string())
    }
}

/// Result type alias for selfmap operations
pub type Result<T> = std::result::Result<T, SelfMapError>;
