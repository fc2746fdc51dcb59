//! Unified error types for yconvert.
//!
//! Every component reports failures through the same [`Error`] so callers
//! can tell container, engine and metadata problems apart by kind.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, Result};
