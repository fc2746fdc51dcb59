//! Body header parsing.
//!
//! Every y-format body starts with `<TAG>;v<VERSION>;<REVISION>;`, for example
//! `XLSY;v10;0;`. The tag names the document family, the version selects the
//! payload grammar.

use std::fmt;
use std::str::FromStr;

use super::constants::{CURRENT_REVISION, LATEST_FORMAT_VERSION, MAX_HEADER_LEN};
use crate::common::{DocumentFormat, Error, Result};

/// Family tag at the start of a body header.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FormatTag {
    /// Text document body (`DOCY`)
    Docy,
    /// Spreadsheet body (`XLSY`)
    Xlsy,
    /// Presentation body (`PPTY`)
    Ppty,
    /// Any other alphanumeric tag, kept verbatim
    Other(String),
}

impl FormatTag {
    pub fn as_str(&self) -> &str {
        match self {
            FormatTag::Docy => "DOCY",
            FormatTag::Xlsy => "XLSY",
            FormatTag::Ppty => "PPTY",
            FormatTag::Other(tag) => tag,
        }
    }

    /// The y-format this tag belongs to, if it is one of the known families.
    pub fn format(&self) -> Option<DocumentFormat> {
        match self {
            FormatTag::Docy => Some(DocumentFormat::Docy),
            FormatTag::Xlsy => Some(DocumentFormat::Xlsy),
            FormatTag::Ppty => Some(DocumentFormat::Ppty),
            FormatTag::Other(_) => None,
        }
    }

    /// Tag written for a y-format document.
    pub fn for_format(format: DocumentFormat) -> Option<Self> {
        match format {
            DocumentFormat::Docy => Some(FormatTag::Docy),
            DocumentFormat::Xlsy => Some(FormatTag::Xlsy),
            DocumentFormat::Ppty => Some(FormatTag::Ppty),
            _ => None,
        }
    }
}

impl FromStr for FormatTag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(Error::malformed_at("invalid format tag", s));
        }
        Ok(match s {
            "DOCY" => FormatTag::Docy,
            "XLSY" => FormatTag::Xlsy,
            "PPTY" => FormatTag::Ppty,
            other => FormatTag::Other(other.to_string()),
        })
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed body header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyHeader {
    pub tag: FormatTag,
    pub version: u32,
    pub revision: u32,
    /// Byte length of the header including its final `;`
    len: usize,
}

impl BodyHeader {
    /// Header for freshly written bodies of the given tag.
    pub fn current(tag: FormatTag) -> Self {
        let mut header = Self {
            tag,
            version: LATEST_FORMAT_VERSION,
            revision: CURRENT_REVISION,
            len: 0,
        };
        header.len = header.to_string().len();
        header
    }

    /// Parse the header at the start of `body`.
    pub fn parse(body: &[u8]) -> Result<Self> {
        let window = &body[..body.len().min(MAX_HEADER_LEN)];
        let mut fields = window.splitn(4, |&b| b == b';');
        // The fourth field only exists when the third `;` was found.
        let (Some(tag), Some(version), Some(revision), Some(_)) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            return Err(Error::malformed_at(
                "body header is not terminated",
                fragment(body),
            ));
        };

        // Measured on the raw fields: numbers may carry leading zeros that
        // Display would not reproduce.
        let len = tag.len() + version.len() + revision.len() + 3;

        let tag = std::str::from_utf8(tag)
            .map_err(|_| Error::malformed_at("format tag is not ASCII", fragment(body)))?
            .parse::<FormatTag>()?;

        let version = version
            .strip_prefix(b"v")
            .ok_or_else(|| Error::malformed_at("version field lacks 'v' prefix", fragment(body)))
            .and_then(|digits| parse_number(digits, body))?;
        let revision = parse_number(revision, body)?;

        let header = Self {
            tag,
            version,
            revision,
            len,
        };
        if header.is_future_version() {
            tracing::warn!(
                tag = %header.tag,
                version = header.version,
                latest = LATEST_FORMAT_VERSION,
                "body uses a newer format version than supported; parsing with latest grammar"
            );
        }
        Ok(header)
    }

    /// Whether the body was written by a newer format version than this
    /// crate knows.
    #[inline]
    pub fn is_future_version(&self) -> bool {
        self.version > LATEST_FORMAT_VERSION
    }

    /// Byte length of the header as it appears in the body.
    #[inline]
    pub fn encoded_len(&self) -> usize {
        self.len
    }
}

impl fmt::Display for BodyHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};v{};{};", self.tag, self.version, self.revision)
    }
}

fn parse_number(digits: &[u8], body: &[u8]) -> Result<u32> {
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return Err(Error::malformed_at(
            "header version fields must be non-negative integers",
            fragment(body),
        ));
    }
    std::str::from_utf8(digits)
        .ok()
        .and_then(|s| s.parse::<u32>().ok())
        .ok_or_else(|| Error::malformed_at("header number out of range", fragment(body)))
}

/// Leading bytes of a body, for error reports.
fn fragment(body: &[u8]) -> String {
    String::from_utf8_lossy(&body[..body.len().min(20)]).into_owned()
}
