//! Payload serialization formats
//!
//! A format converts the in-memory configuration set to and from the
//! bytes that travel through stdout/stdin or a payload file. Decoding is
//! the exact inverse of encoding for the same variant.

use std::collections::BTreeMap;

/// Exported configuration set: program name → file path → content
///
/// `BTreeMap` keeps key order deterministic, so re-encoding an unchanged
/// set yields an identical payload.
pub type ConfigSet = BTreeMap<String, BTreeMap<String, String>>;

/// Errors produced while encoding or decoding a payload
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// JSON serialization or deserialization failed
    #[error("JSON payload error: {0}")]
    Json(#[from] serde_json::Error),

    /// Binary serialization or deserialization failed
    #[error("binary payload error: {0}")]
    Binary(#[from] bincode::Error),
}

/// Payload serialization format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Human-readable JSON text
    Json,
    /// Compact binary encoding
    Binary,
}

impl Format {
    /// Encode a configuration set into payload bytes
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn encode(self, set: &ConfigSet) -> Result<Vec<u8>, FormatError> {
        match self {
            Self::Json => Ok(serde_json::to_vec(set)?),
            Self::Binary => Ok(bincode::serialize(set)?),
        }
    }

    /// Decode payload bytes back into a configuration set
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is malformed for this format.
    pub fn decode(self, payload: &[u8]) -> Result<ConfigSet, FormatError> {
        match self {
            Self::Json => Ok(serde_json::from_slice(payload)?),
            Self::Binary => Ok(bincode::deserialize(payload)?),
        }
    }
}
