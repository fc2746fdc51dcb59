//! Document metadata.
//!
//! Metadata is exchanged as a [`MetadataRecord`]: a map from the fixed
//! [`MetadataField`] vocabulary to text or list values. The
//! [`MetadataCodec`] reads records from documents and writes the mutable
//! fields (`Title`, `Subject`, `Keywords`) back, either into the
//! `metadata.json` sidecar of a y-format container or through a
//! [`PropertyEngine`].
//!
//! # Example
//!
//! ```
//! use yconvert::Document;
//! use yconvert::metadata::{FieldValue, MetadataCodec, MetadataField};
//!
//! # fn main() -> yconvert::Result<()> {
//! let codec = MetadataCodec::detached();
//! let doc = codec.inject(
//!     Document::new(Vec::new(), "xlsy"),
//!     [("Title", FieldValue::from("Quarterly"))],
//! )?;
//! let record = codec.extract(&doc)?;
//! assert_eq!(record.text(MetadataField::Title), Some("Quarterly"));
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod engine;
pub mod field;
pub mod sidecar;

pub use codec::{MetadataCodec, UnknownFieldPolicy};
pub use engine::{DetachedEngine, EngineProperty, PropertyEngine, PropertyValue};
pub use field::{DATE_FORMAT, FieldValue, MetadataField, MetadataRecord, UNSET_DATE};
