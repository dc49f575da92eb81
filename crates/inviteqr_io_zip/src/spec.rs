//! Archive specification models and top-level error types.

use thiserror::Error;

use crate::conf::{C_MSG_NO_ITEMS, C_PREFIX_ARCHIVE_ERROR};

/// Entry compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumArchiveCompression {
    /// No compression.
    Stored,
    /// DEFLATE.
    #[default]
    Deflated,
}

impl EnumArchiveCompression {
    /// Parse a user token (`"stored"` / `"deflated"`).
    pub fn from_token(value: &str) -> Result<Self, ArchiveError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "stored" => Ok(Self::Stored),
            "deflated" | "deflate" => Ok(Self::Deflated),
            _ => Err(ArchiveError::InvalidOptions(format!(
                "Unknown compression: {value}"
            ))),
        }
    }
}

/// Options for one archive build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecArchiveOptions {
    /// Entry compression.
    pub compression: EnumArchiveCompression,
}

impl Default for SpecArchiveOptions {
    fn default() -> Self {
        Self {
            compression: EnumArchiveCompression::Deflated,
        }
    }
}

/// Finished in-memory archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecArchive {
    /// `qr_codes_<timestamp>.zip`.
    pub name: String,
    /// Complete archive payload.
    pub bytes: Vec<u8>,
    /// Entry paths in write order.
    pub entries: Vec<String>,
    /// Renamed collisions.
    pub warnings: Vec<String>,
}

/// Archive failures. None of them expose a partial archive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArchiveError {
    /// Nothing to package.
    #[error("{}", C_MSG_NO_ITEMS)]
    NoItems,
    /// Writer failure.
    #[error("{prefix}{0}", prefix = C_PREFIX_ARCHIVE_ERROR)]
    Write(String),
    /// Options failed validation.
    #[error("{0}")]
    InvalidOptions(String),
}
