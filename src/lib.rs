//! yconvert - Conversion layer between office formats and the y-formats
//!
//! The y-formats (`docy`, `xlsy`, `ppty`) are the intermediate document
//! representation of a collaborative editor. This library moves documents in
//! and out of them through an external conversion engine.
//!
//! # Features
//!
//! - **Archive codec**: Decode and encode y-format containers (`body.txt`,
//!   `media/*`, `metadata.json`) with header validation
//! - **Metadata**: Read and write document properties, stored in a container
//!   sidecar for y-formats and through a property engine otherwise
//! - **Format registry**: Static table of permitted export targets per
//!   source MIME type
//! - **Conversion**: Request-scoped staging, engine invocation and output
//!   validation, with an engine for the `x2t` converter (feature `x2t`)
//!
//! # Example - Converting a spreadsheet
//!
//! ```no_run
//! use yconvert::Document;
//! use yconvert::convert::{Converter, ConverterConfig, X2tEngine};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConverterConfig::new().with_engine_path("/opt/onlyoffice/x2t");
//! let converter = Converter::new(X2tEngine::from_config(&config), config);
//!
//! let xlsx = Document::new(std::fs::read("budget.xlsx")?, "xlsx");
//! let xlsy = converter.convert(xlsx, "xlsy")?;
//! assert!(xlsy.is_yformat());
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Inspecting a container
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = std::fs::read("budget.xlsy")?;
//! let container = yconvert::yformat::decode(&bytes)?;
//! println!("header: {}", container.header());
//! for name in container.media().keys() {
//!     println!("media: {name}");
//! }
//! # Ok(())
//! # }
//! ```

/// Shared document model, format identification and errors
pub mod common;

/// Conversion orchestration and engines
pub mod convert;

/// Document metadata vocabulary and codec
pub mod metadata;

/// Permitted conversion targets per MIME type
pub mod registry;

/// y-format container codec
pub mod yformat;

// Re-export commonly used types for convenience
pub use common::{Document, DocumentFamily, DocumentFormat, Error, Result};
pub use convert::{Converter, ConverterConfig, Engine, EngineJob};
#[cfg(feature = "x2t")]
pub use convert::X2tEngine;
pub use metadata::{FieldValue, MetadataField, MetadataRecord};
pub use yformat::YContainer;
