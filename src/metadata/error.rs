//! Error types for metadata decoding
//!
//! Both variants are recoverable: the accessor turns them into the Absent
//! marker for the file being evaluated and the host never sees them.

use std::io;
use thiserror::Error;

/// Errors raised by a [`MetadataCodec`](super::MetadataCodec)
#[derive(Debug, Error)]
pub enum CodecError {
    /// The file could not be opened or read
    #[error("Read error: {0}")]
    Read(#[from] io::Error),

    /// The metadata container is malformed or unsupported
    #[error("Decode error: {0}")]
    Decode(String),
}

impl CodecError {
    #[must_use]
    pub fn decode(reason: impl Into<String>) -> Self {
        Self::Decode(reason.into())
    }
}
