//! Format compatibility registry.
//!
//! Answers which target formats a document of a given MIME type may be
//! converted to. The table is a compile-time perfect hash map keyed by the
//! canonical (parameter-free) MIME type; it is immutable and safe to read
//! from any number of threads.
//!
//! # Examples
//!
//! ```
//! use yconvert::registry::allowed_targets;
//!
//! let targets = allowed_targets("application/x-asc-text;charset=utf-8");
//! assert_eq!(targets[0].display_name, "Word 2007 Document");
//! assert!(allowed_targets("image/png").is_empty());
//! ```

pub mod constants;

use phf::{Map, phf_map};

use crate::common::DocumentFormat;
use constants::*;

/// A permitted conversion target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormatEntry {
    pub mimetype: &'static str,
    pub display_name: &'static str,
}

impl FormatEntry {
    const fn new(mimetype: &'static str, display_name: &'static str) -> Self {
        Self {
            mimetype,
            display_name,
        }
    }

    /// The `(mimetype, display_name)` pair.
    pub fn as_tuple(&self) -> (&'static str, &'static str) {
        (self.mimetype, self.display_name)
    }
}

const TEXT_TARGETS: &[FormatEntry] = &[
    FormatEntry::new(OOXML_TEXT, "Word 2007 Document"),
    FormatEntry::new(ODF_TEXT, "ODF Text Document"),
];

const SPREADSHEET_TARGETS: &[FormatEntry] = &[
    FormatEntry::new(OOXML_SPREADSHEET, "Excel 2007 Spreadsheet"),
    FormatEntry::new(ODF_SPREADSHEET, "ODF Spreadsheet Document"),
];

const PRESENTATION_TARGETS: &[FormatEntry] = &[
    FormatEntry::new(OOXML_PRESENTATION, "PowerPoint 2007 Presentation"),
    FormatEntry::new(ODF_PRESENTATION, "ODF Presentation Document"),
];

// OOXML before ODF: callers rely on this order.
static ALLOWED_TARGETS: Map<&'static str, &'static [FormatEntry]> = phf_map! {
    "application/x-asc-text" => TEXT_TARGETS,
    "application/x-asc-spreadsheet" => SPREADSHEET_TARGETS,
    "application/x-asc-presentation" => PRESENTATION_TARGETS,
};

static EXTENSION_MIMETYPES: Map<&'static str, &'static str> = phf_map! {
    "docy" => ASC_TEXT,
    "xlsy" => ASC_SPREADSHEET,
    "ppty" => ASC_PRESENTATION,
    "docx" => OOXML_TEXT,
    "xlsx" => OOXML_SPREADSHEET,
    "pptx" => OOXML_PRESENTATION,
    "odt" => ODF_TEXT,
    "ods" => ODF_SPREADSHEET,
    "odp" => ODF_PRESENTATION,
    "pdf" => PDF,
};

static MIMETYPE_EXTENSIONS: Map<&'static str, &'static str> = phf_map! {
    "application/x-asc-text" => "docy",
    "application/x-asc-spreadsheet" => "xlsy",
    "application/x-asc-presentation" => "ppty",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => "docx",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => "xlsx",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation" => "pptx",
    "application/vnd.oasis.opendocument.text" => "odt",
    "application/vnd.oasis.opendocument.spreadsheet" => "ods",
    "application/vnd.oasis.opendocument.presentation" => "odp",
    "application/pdf" => "pdf",
};

/// Strip any `;parameter=value` suffix from a MIME type.
///
/// Everything from the first `;` onward is removed; nothing else is trimmed.
#[inline]
pub fn canonicalize(mimetype: &str) -> &str {
    mimetype.split_once(';').map_or(mimetype, |(base, _)| base)
}

/// Ordered conversion targets for a MIME type.
///
/// Parameters are ignored. Unknown types yield an empty slice.
pub fn allowed_targets(mimetype: &str) -> &'static [FormatEntry] {
    ALLOWED_TARGETS
        .get(canonicalize(mimetype))
        .copied()
        .unwrap_or(&[])
}

/// Whether a document of `source` MIME type may be converted to `target`.
pub fn is_conversion_allowed(source: &str, target: &str) -> bool {
    let target = canonicalize(target);
    allowed_targets(source)
        .iter()
        .any(|entry| entry.mimetype == target)
}

/// MIME type of a known format extension.
#[inline]
pub fn mimetype_for_extension(extension: &str) -> Option<&'static str> {
    EXTENSION_MIMETYPES.get(extension).copied()
}

/// Format extension of a known MIME type (parameters ignored).
#[inline]
pub fn extension_for_mimetype(mimetype: &str) -> Option<&'static str> {
    MIMETYPE_EXTENSIONS.get(canonicalize(mimetype)).copied()
}

/// MIME type of a known format.
pub fn mimetype_for_format(format: DocumentFormat) -> &'static str {
    // Every DocumentFormat extension has a table entry.
    mimetype_for_extension(format.extension()).unwrap_or(TEXT_PLAIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_canonicalize() {
        assert_eq!(canonicalize("application/x-asc-text;ignored=param"), "application/x-asc-text");
        assert_eq!(canonicalize("application/x-asc-text"), "application/x-asc-text");
        assert_eq!(canonicalize(" text/plain ;a=b;c=d"), " text/plain ");
        assert_eq!(canonicalize(";x"), "");
    }

    #[test]
    fn test_text_targets() {
        let targets: Vec<_> = allowed_targets("application/x-asc-text;ignored=param")
            .iter()
            .map(FormatEntry::as_tuple)
            .collect();
        assert_eq!(
            targets,
            vec![
                (
                    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
                    "Word 2007 Document"
                ),
                ("application/vnd.oasis.opendocument.text", "ODF Text Document"),
            ]
        );
    }

    #[test]
    fn test_spreadsheet_targets() {
        let targets: Vec<_> = allowed_targets("application/x-asc-spreadsheet;ignored=param")
            .iter()
            .map(FormatEntry::as_tuple)
            .collect();
        assert_eq!(
            targets,
            vec![
                (
                    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
                    "Excel 2007 Spreadsheet"
                ),
                ("application/vnd.oasis.opendocument.spreadsheet", "ODF Spreadsheet Document"),
            ]
        );
    }

    #[test]
    fn test_presentation_targets() {
        let targets: Vec<_> = allowed_targets("application/x-asc-presentation;ignored=param")
            .iter()
            .map(FormatEntry::as_tuple)
            .collect();
        assert_eq!(
            targets,
            vec![
                (
                    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
                    "PowerPoint 2007 Presentation"
                ),
                ("application/vnd.oasis.opendocument.presentation", "ODF Presentation Document"),
            ]
        );
    }

    #[test]
    fn test_unknown_type_is_empty() {
        assert!(allowed_targets("application/octet-stream").is_empty());
        assert!(allowed_targets("").is_empty());
        assert!(allowed_targets("APPLICATION/X-ASC-TEXT").is_empty());
    }

    #[test]
    fn test_conversion_allowed() {
        assert!(is_conversion_allowed(ASC_SPREADSHEET, OOXML_SPREADSHEET));
        assert!(is_conversion_allowed("application/x-asc-text;v=1", "application/vnd.oasis.opendocument.text;q=1"));
        assert!(!is_conversion_allowed(ASC_TEXT, OOXML_SPREADSHEET));
    }

    #[test]
    fn test_extension_mapping() {
        assert_eq!(mimetype_for_extension("xlsy"), Some(ASC_SPREADSHEET));
        assert_eq!(extension_for_mimetype("application/vnd.oasis.opendocument.text;x=y"), Some("odt"));
        assert_eq!(mimetype_for_format(DocumentFormat::Ppty), ASC_PRESENTATION);
        assert_eq!(mimetype_for_extension("txt"), None);
    }

    proptest! {
        #[test]
        fn prop_parameters_never_change_targets(param in "[a-z]{0,8}=[ -~]{0,16}") {
            for base in [ASC_TEXT, ASC_SPREADSHEET, ASC_PRESENTATION, "image/png"] {
                let with_param = format!("{base};{param}");
                prop_assert_eq!(allowed_targets(&with_param), allowed_targets(base));
            }
        }
    }
}
