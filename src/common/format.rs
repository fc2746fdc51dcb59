//! Document format identifiers.
//!
//! Formats are identified by their lower-case file extension, the same way the
//! conversion engine expects them. Each known format belongs to a family and,
//! for the three office families, has a y-format counterpart.

use phf::{Map, phf_map};
use std::fmt;

/// Document family a format belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFamily {
    /// Word processing documents
    Text,
    /// Spreadsheets
    Spreadsheet,
    /// Slide decks
    Presentation,
    /// Page-description formats that any family can be exported to
    CrossPlatform,
}

/// Known document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    /// Office Open XML word processing document (.docx)
    Docx,
    /// OpenDocument Text (.odt)
    Odt,
    /// Text document y-format (.docy)
    Docy,
    /// Office Open XML spreadsheet (.xlsx)
    Xlsx,
    /// OpenDocument Spreadsheet (.ods)
    Ods,
    /// Spreadsheet y-format (.xlsy)
    Xlsy,
    /// Office Open XML presentation (.pptx)
    Pptx,
    /// OpenDocument Presentation (.odp)
    Odp,
    /// Presentation y-format (.ppty)
    Ppty,
    /// Portable Document Format (.pdf)
    Pdf,
}

static EXTENSIONS: Map<&'static str, DocumentFormat> = phf_map! {
    "docx" => DocumentFormat::Docx,
    "odt" => DocumentFormat::Odt,
    "docy" => DocumentFormat::Docy,
    "xlsx" => DocumentFormat::Xlsx,
    "ods" => DocumentFormat::Ods,
    "xlsy" => DocumentFormat::Xlsy,
    "pptx" => DocumentFormat::Pptx,
    "odp" => DocumentFormat::Odp,
    "ppty" => DocumentFormat::Ppty,
    "pdf" => DocumentFormat::Pdf,
};

impl DocumentFormat {
    /// Look up a format by file extension (without dot, case-insensitive).
    pub fn from_extension(extension: &str) -> Option<Self> {
        let extension = extension.trim_start_matches('.');
        EXTENSIONS
            .get(extension)
            .or_else(|| EXTENSIONS.get(extension.to_ascii_lowercase().as_str()))
            .copied()
    }

    /// File extension of this format, without dot.
    pub fn extension(self) -> &'static str {
        match self {
            DocumentFormat::Docx => "docx",
            DocumentFormat::Odt => "odt",
            DocumentFormat::Docy => "docy",
            DocumentFormat::Xlsx => "xlsx",
            DocumentFormat::Ods => "ods",
            DocumentFormat::Xlsy => "xlsy",
            DocumentFormat::Pptx => "pptx",
            DocumentFormat::Odp => "odp",
            DocumentFormat::Ppty => "ppty",
            DocumentFormat::Pdf => "pdf",
        }
    }

    pub fn family(self) -> DocumentFamily {
        match self {
            DocumentFormat::Docx | DocumentFormat::Odt | DocumentFormat::Docy => {
                DocumentFamily::Text
            },
            DocumentFormat::Xlsx | DocumentFormat::Ods | DocumentFormat::Xlsy => {
                DocumentFamily::Spreadsheet
            },
            DocumentFormat::Pptx | DocumentFormat::Odp | DocumentFormat::Ppty => {
                DocumentFamily::Presentation
            },
            DocumentFormat::Pdf => DocumentFamily::CrossPlatform,
        }
    }

    /// Whether this is one of the intermediate y-formats.
    #[inline]
    pub fn is_yformat(self) -> bool {
        matches!(
            self,
            DocumentFormat::Docy | DocumentFormat::Xlsy | DocumentFormat::Ppty
        )
    }

    /// The Office Open XML format an engine reads and writes in place of a
    /// y-format. Non y-formats map to themselves.
    pub fn engine_facing(self) -> Self {
        match self {
            DocumentFormat::Docy => DocumentFormat::Docx,
            DocumentFormat::Xlsy => DocumentFormat::Xlsx,
            DocumentFormat::Ppty => DocumentFormat::Pptx,
            other => other,
        }
    }

    /// The y-format of this format's family, if the family has one.
    pub fn yformat(self) -> Option<Self> {
        match self.family() {
            DocumentFamily::Text => Some(DocumentFormat::Docy),
            DocumentFamily::Spreadsheet => Some(DocumentFormat::Xlsy),
            DocumentFamily::Presentation => Some(DocumentFormat::Ppty),
            DocumentFamily::CrossPlatform => None,
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Whether `extension` names a y-format.
#[inline]
pub fn is_yformat_extension(extension: &str) -> bool {
    DocumentFormat::from_extension(extension).is_some_and(DocumentFormat::is_yformat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(DocumentFormat::from_extension("xlsy"), Some(DocumentFormat::Xlsy));
        assert_eq!(DocumentFormat::from_extension(".DOCX"), Some(DocumentFormat::Docx));
        assert_eq!(DocumentFormat::from_extension("txt"), None);
    }

    #[test]
    fn test_yformat_mapping() {
        assert!(DocumentFormat::Docy.is_yformat());
        assert!(!DocumentFormat::Docx.is_yformat());
        assert_eq!(DocumentFormat::Xlsy.engine_facing(), DocumentFormat::Xlsx);
        assert_eq!(DocumentFormat::Ods.engine_facing(), DocumentFormat::Ods);
        assert_eq!(DocumentFormat::Odp.yformat(), Some(DocumentFormat::Ppty));
        assert_eq!(DocumentFormat::Pdf.yformat(), None);
    }

    #[test]
    fn test_is_yformat_extension() {
        assert!(is_yformat_extension("ppty"));
        assert!(!is_yformat_extension("pptx"));
        assert!(!is_yformat_extension("unknown"));
    }
}
