//! Error types for Quarry
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Every variant is fatal to the operation that raised it. There is no
//! partial-success mode and nothing in the library retries.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for Quarry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for index building and merging
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error (open, read, write, seek, rename, remove)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// I/O error on a specific file
    #[error("I/O error on {path}: {source}")]
    IoAt {
        /// File the operation was acting on
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// On-disk data does not match the dictionary/blob format
    #[error("Format error in {path}: {detail}")]
    Format {
        /// Offending file
        path: PathBuf,
        /// What was wrong
        detail: String,
    },

    /// Doc ids or partition numbers out of production order
    ///
    /// Violations would otherwise produce silently corrupt posting lists,
    /// so they are rejected before any output is written.
    #[error("Ordering violation: {0}")]
    OrderingViolation(String),

    /// Posting list codec error
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Merge found nothing to merge
    #[error("No partitions found in {0}")]
    NoPartitions(PathBuf),

    /// Invalid input from a caller or a document source
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Create a format error for a file
    pub fn format(path: impl AsRef<Path>, detail: impl Into<String>) -> Self {
        Error::Format {
            path: path.as_ref().to_path_buf(),
            detail: detail.into(),
        }
    }

    /// Wrap an I/O error with the path it occurred on
    pub fn io_at(path: impl AsRef<Path>, source: io::Error) -> Self {
        Error::IoAt {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create an ordering violation error
    pub fn ordering(detail: impl Into<String>) -> Self {
        Error::OrderingViolation(detail.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(detail: impl Into<String>) -> Self {
        Error::InvalidInput(detail.into())
    }
}

/// Posting list codec errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// Decoding failed (truncated input, invalid selector, overflow).
    ///
    /// Carries the scheme and data length so callers can distinguish a
    /// wrong-codec error from data corruption.
    #[error("Decode error (scheme={scheme}, data_len={data_len}): {detail}")]
    DecodeError {
        /// Human-readable error description
        detail: String,
        /// Scheme that attempted the decode
        scheme: String,
        /// Length of the data that failed to decode
        data_len: usize,
    },

    /// Unknown codec scheme name.
    #[error("Unknown codec scheme: {0}")]
    UnknownScheme(String),

    /// A delta does not fit the scheme's value width.
    #[error("Value {value} exceeds {scheme} maximum of {max}")]
    ValueOutOfRange {
        /// Delta that could not be packed
        value: u64,
        /// Largest packable value
        max: u64,
        /// Scheme that rejected the value
        scheme: String,
    },

    /// Input sequence decreases.
    #[error("Sequence not ascending at position {position}: {previous} then {current}")]
    NotAscending {
        /// Index of the offending element
        position: usize,
        /// Element before it
        previous: u64,
        /// Offending element
        current: u64,
    },

    /// Input sequence has no base element.
    #[error("Cannot encode an empty sequence")]
    EmptySequence,
}

impl CodecError {
    /// Create a decode error with full diagnostic context.
    pub fn decode(detail: impl Into<String>, scheme: impl Into<String>, data_len: usize) -> Self {
        CodecError::DecodeError {
            detail: detail.into(),
            scheme: scheme.into(),
            data_len,
        }
    }
}
