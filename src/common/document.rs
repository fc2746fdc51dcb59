//! Documents handed between callers, the orchestrator and engines.

use bytes::Bytes;

use super::format::DocumentFormat;

/// An opaque document: raw bytes plus the extension naming its format.
///
/// A `Document` is immutable. Operations that change a document return a new
/// one; cloning is cheap because the bytes are reference counted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    data: Bytes,
    extension: String,
}

impl Document {
    /// Create a document from bytes and a format extension (without dot).
    pub fn new(data: impl Into<Bytes>, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        let extension = extension.trim_start_matches('.').to_ascii_lowercase();
        Self {
            data: data.into(),
            extension,
        }
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Shared handle to the underlying bytes.
    #[inline]
    pub fn bytes(&self) -> Bytes {
        self.data.clone()
    }

    #[inline]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// The known format of this document, if its extension is recognized.
    #[inline]
    pub fn format(&self) -> Option<DocumentFormat> {
        DocumentFormat::from_extension(&self.extension)
    }

    /// Whether the document is one of the y-formats.
    #[inline]
    pub fn is_yformat(&self) -> bool {
        self.format().is_some_and(DocumentFormat::is_yformat)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn into_bytes(self) -> Bytes {
        self.data
    }
}
