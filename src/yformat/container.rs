//! In-memory y-format container.

use std::collections::{BTreeMap, BTreeSet};

use bytes::Bytes;
use memchr::memmem;

use super::constants::MEDIA_PREFIX;
use super::header::BodyHeader;
use crate::common::{Error, Result};

/// A decoded y-format document: versioned body, media attachments and an
/// optional metadata sidecar.
///
/// Media are keyed by their name below `media/`, so `media/image1.png` is
/// stored as `image1.png`. Keys are kept sorted, which is also the order they
/// are written in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YContainer {
    header: BodyHeader,
    body: Bytes,
    media: BTreeMap<String, Bytes>,
    metadata: Option<Bytes>,
}

impl YContainer {
    /// Create a container around `body`, parsing its header.
    pub fn new(body: impl Into<Bytes>) -> Result<Self> {
        let body = body.into();
        let header = BodyHeader::parse(&body)?;
        Ok(Self {
            header,
            body,
            media: BTreeMap::new(),
            metadata: None,
        })
    }

    /// Add or replace a media attachment.
    pub fn insert_media(&mut self, name: impl Into<String>, data: impl Into<Bytes>) -> Result<()> {
        let name = name.into();
        validate_media_name(&name)?;
        self.media.insert(name, data.into());
        Ok(())
    }

    /// Builder form of [`YContainer::insert_media`].
    pub fn with_media(mut self, name: impl Into<String>, data: impl Into<Bytes>) -> Result<Self> {
        self.insert_media(name, data)?;
        Ok(self)
    }

    /// Replace the raw metadata sidecar.
    pub fn set_metadata(&mut self, sidecar: Option<Bytes>) {
        self.metadata = sidecar;
    }

    #[inline]
    pub fn header(&self) -> &BodyHeader {
        &self.header
    }

    /// The full body, header included.
    #[inline]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// The body with its header stripped.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.body[self.header.encoded_len()..]
    }

    #[inline]
    pub fn media(&self) -> &BTreeMap<String, Bytes> {
        &self.media
    }

    /// Media attachment by name, with or without the `media/` prefix.
    pub fn media_entry(&self, name: &str) -> Option<&Bytes> {
        self.media.get(name.strip_prefix(MEDIA_PREFIX).unwrap_or(name))
    }

    /// Raw bytes of the `metadata.json` sidecar, if present.
    #[inline]
    pub fn metadata(&self) -> Option<&Bytes> {
        self.metadata.as_ref()
    }

    /// Names of all media the body payload refers to.
    pub fn media_references(&self) -> BTreeSet<String> {
        let payload = self.payload();
        memmem::find_iter(payload, MEDIA_PREFIX.as_bytes())
            .filter_map(|pos| {
                let start = pos + MEDIA_PREFIX.len();
                let end = payload[start..]
                    .iter()
                    .position(|&b| !is_media_name_byte(b))
                    .map_or(payload.len(), |n| start + n);
                // Names are ASCII by construction of is_media_name_byte.
                let name = std::str::from_utf8(&payload[start..end])
                    .ok()?
                    .trim_end_matches('/');
                validate_media_name(name).is_ok().then(|| name.to_string())
            })
            .collect()
    }

    /// Check that every media reference in the body resolves to an entry.
    pub fn validate(&self) -> Result<()> {
        for name in self.media_references() {
            if !self.media.contains_key(&name) {
                return Err(Error::malformed_at(
                    "body references missing media entry",
                    format!("{MEDIA_PREFIX}{name}"),
                ));
            }
        }
        Ok(())
    }
}

#[inline]
fn is_media_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-' | b'/')
}

/// Media names end up as file paths in working areas, so anything that could
/// escape the media directory is refused.
pub(crate) fn validate_media_name(name: &str) -> Result<()> {
    let unsafe_name = name.is_empty()
        || name.starts_with('/')
        || name.contains('\\')
        || name.contains(':')
        || name.split('/').any(|part| part.is_empty() || part == "." || part == "..");
    if unsafe_name {
        return Err(Error::malformed_at(
            "unsafe media entry name",
            format!("{MEDIA_PREFIX}{name}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_references() {
        let container = YContainer::new(
            &b"DOCY;v10;0;<img src=\"media/image1.png\"/>;media/chart-2.bin,media/;media/x"[..],
        )
        .unwrap();
        let refs: Vec<_> = container.media_references().into_iter().collect();
        assert_eq!(refs, vec!["chart-2.bin", "image1.png", "x"]);
    }

    #[test]
    fn test_nested_media_references() {
        let container = YContainer::new(
            &b"XLSY;v10;0;media/charts/c1.bin media/charts/ media/a//b media/../x"[..],
        )
        .unwrap();
        let refs: Vec<_> = container.media_references().into_iter().collect();
        assert_eq!(refs, vec!["charts", "charts/c1.bin"]);

        let container = container
            .with_media("charts/c1.bin", vec![1])
            .unwrap()
            .with_media("charts", vec![2])
            .unwrap();
        assert!(container.validate().is_ok());
    }

    #[test]
    fn test_validate_reports_dangling_reference() {
        let container = YContainer::new(&b"DOCY;v10;0;media/image1.png"[..]).unwrap();
        let err = container.validate().unwrap_err();
        match err {
            Error::MalformedContainer { fragment, .. } => {
                assert_eq!(fragment.as_deref(), Some("media/image1.png"));
            },
            other => panic!("unexpected error: {other:?}"),
        }

        let container = container.with_media("image1.png", vec![0x89, b'P']).unwrap();
        assert!(container.validate().is_ok());
        assert!(container.media_entry("media/image1.png").is_some());
    }

    #[test]
    fn test_header_is_not_a_reference_source() {
        let container = YContainer::new(&b"XLSY;v10;0;"[..]).unwrap();
        assert!(container.payload().is_empty());
        assert!(container.media_references().is_empty());
    }

    #[test]
    fn test_unsafe_media_names() {
        for name in ["", "../etc/passwd", "/abs", "a//b", "a\\b", "c:evil", "./x"] {
            assert!(validate_media_name(name).is_err(), "{name:?} accepted");
        }
        assert!(validate_media_name("charts/chart1.bin").is_ok());
    }
}
