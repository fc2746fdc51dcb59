//! Unified error types for yconvert.
//!
//! This module provides a single error type covering container decoding,
//! metadata handling and engine invocation, presenting a consistent API to
//! callers of the conversion layer.
use thiserror::Error;

/// Main error type for yconvert operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// y-format container is missing its body, has an unparseable header
    /// or references media that is not present
    #[error("Malformed container: {reason}{}", fragment_suffix(.fragment))]
    MalformedContainer {
        reason: String,
        /// Offending entry name or header fragment, when one can be named
        fragment: Option<String>,
    },

    /// Format is not known or not allowed for the requested conversion
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// External engine reported a failure, exited non-zero or timed out
    #[error("Engine failed: {0}")]
    EngineFailed(String),

    /// Engine output did not survive post-validation
    #[error("Invalid container produced by engine: {0}")]
    ContainerInvalid(String),

    /// Metadata field outside the mutable vocabulary under a strict policy
    #[error("Unknown metadata field: {0}")]
    UnknownMetadataField(String),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// JSON (metadata sidecar) error
    #[error("JSON error: {0}")]
    JsonError(String),

    /// Unsupported operation
    #[error("Unsupported feature: {0}")]
    Unsupported(String),
}

fn fragment_suffix(fragment: &Option<String>) -> String {
    match fragment {
        Some(f) => format!(" ({f:?})"),
        None => String::new(),
    }
}

impl Error {
    /// Build a [`Error::MalformedContainer`] without an offending fragment.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Error::MalformedContainer {
            reason: reason.into(),
            fragment: None,
        }
    }

    /// Build a [`Error::MalformedContainer`] naming the offending entry or
    /// header fragment.
    pub fn malformed_at(reason: impl Into<String>, fragment: impl Into<String>) -> Self {
        Error::MalformedContainer {
            reason: reason.into(),
            fragment: Some(fragment.into()),
        }
    }
}

/// Result type for yconvert operations.
pub type Result<T> = std::result::Result<T, Error>;
