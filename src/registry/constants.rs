//! MIME types of the formats the conversion layer knows about.

/// MIME type of text document y-format (.docy)
pub const ASC_TEXT: &str = "application/x-asc-text";

/// MIME type of spreadsheet y-format (.xlsy)
pub const ASC_SPREADSHEET: &str = "application/x-asc-spreadsheet";

/// MIME type of presentation y-format (.ppty)
pub const ASC_PRESENTATION: &str = "application/x-asc-presentation";

/// MIME type for Office Open XML word processing documents (.docx)
pub const OOXML_TEXT: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// MIME type for Office Open XML spreadsheets (.xlsx)
pub const OOXML_SPREADSHEET: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// MIME type for Office Open XML presentations (.pptx)
pub const OOXML_PRESENTATION: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

/// MIME type for OpenDocument Text (.odt)
pub const ODF_TEXT: &str = "application/vnd.oasis.opendocument.text";

/// MIME type for OpenDocument Spreadsheet (.ods)
pub const ODF_SPREADSHEET: &str = "application/vnd.oasis.opendocument.spreadsheet";

/// MIME type for OpenDocument Presentation (.odp)
pub const ODF_PRESENTATION: &str = "application/vnd.oasis.opendocument.presentation";

/// MIME type for PDF
pub const PDF: &str = "application/pdf";

/// MIME type engines report for documents they cannot classify
pub const TEXT_PLAIN: &str = "text/plain";
