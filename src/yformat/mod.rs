//! The y-format intermediate container.
//!
//! A y-format document (`docy`, `xlsy`, `ppty`) is a ZIP archive with a
//! versioned text body, binary media attachments and an optional metadata
//! sidecar:
//!
//! ```text
//! body.txt            XLSY;v10;0;<payload>
//! metadata.json       {"Title": "..."}
//! media/image1.png    <bytes>
//! ```
//!
//! [`decode`] and [`encode`] convert between bytes and [`YContainer`];
//! decoding validates the header and that every `media/` reference in the
//! payload resolves to an attachment.
//!
//! # Example
//!
//! ```
//! use yconvert::yformat::{decode, encode, YContainer};
//!
//! # fn main() -> yconvert::Result<()> {
//! let container = YContainer::new(&b"DOCY;v10;0;<img media/image1.png>"[..])?
//!     .with_media("image1.png", vec![0x89, b'P', b'N', b'G'])?;
//! let bytes = encode(&container)?;
//! assert_eq!(decode(&bytes)?, container);
//! # Ok(())
//! # }
//! ```

pub mod constants;
pub mod container;
mod fs;
pub mod header;
pub mod package;
pub mod writer;

pub use constants::{BODY_ENTRY, LATEST_FORMAT_VERSION, MEDIA_PREFIX, METADATA_ENTRY};
pub use container::YContainer;
pub use header::{BodyHeader, FormatTag};
pub use package::decode;
pub use writer::encode;
