//! Common types shared by the codec, metadata and conversion layers.

pub mod detection;
pub mod document;
pub mod error;
pub mod format;

pub use document::Document;
pub use error::{Error, Result};
pub use format::{DocumentFamily, DocumentFormat, is_yformat_extension};
