//! Decoding y-format archives.

use std::io::{Cursor, Read};

use bytes::Bytes;

use super::constants::{
    BODY_ENTRY, LEGACY_BODY_ENTRY, MAX_ENTRY_PREALLOC, MEDIA_PREFIX, METADATA_ENTRY,
};
use super::container::{YContainer, validate_media_name};
use crate::common::detection::is_zip;
use crate::common::{Error, Result};

/// Decode y-format bytes into a [`YContainer`].
///
/// Accepts either a ZIP archive holding `body.txt` (or the legacy
/// `Editor.bin`), `media/*` entries and an optional `metadata.json`, or a bare
/// body without any archive around it. Entries that fit none of these roles
/// are skipped. The result is validated: every media reference in the body
/// must resolve to an entry.
pub fn decode(bytes: &[u8]) -> Result<YContainer> {
    if !is_zip(bytes) {
        tracing::debug!(len = bytes.len(), "decoding bare y-format body");
        let container = YContainer::new(Bytes::copy_from_slice(bytes))?;
        container.validate()?;
        return Ok(container);
    }

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| Error::malformed(format!("unreadable archive: {e}")))?;

    let mut body = None;
    let mut legacy_body = None;
    let mut metadata = None;
    let mut media = Vec::new();

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| Error::malformed(format!("unreadable archive entry #{index}: {e}")))?;
        if entry.is_dir() {
            continue;
        }
        let name = entry.name().to_string();
        let mut content = Vec::with_capacity(capacity_hint(entry.size()));
        entry
            .read_to_end(&mut content)
            .map_err(|e| Error::malformed_at(format!("corrupt archive entry: {e}"), name.as_str()))?;

        match name.as_str() {
            BODY_ENTRY => body = Some(content),
            LEGACY_BODY_ENTRY => legacy_body = Some(content),
            METADATA_ENTRY => metadata = Some(Bytes::from(content)),
            other => match other.strip_prefix(MEDIA_PREFIX) {
                Some(media_name) => {
                    validate_media_name(media_name)?;
                    media.push((media_name.to_string(), content));
                },
                None => tracing::debug!(entry = other, "skipping unrelated archive entry"),
            },
        }
    }

    let body = body
        .or(legacy_body)
        .ok_or_else(|| Error::malformed_at("body entry missing", BODY_ENTRY))?;

    let mut container = YContainer::new(body)?;
    for (name, content) in media {
        container.insert_media(name, content)?;
    }
    container.set_metadata(metadata);
    container.validate()?;

    tracing::debug!(
        tag = %container.header().tag,
        version = container.header().version,
        media = container.media().len(),
        has_metadata = container.metadata().is_some(),
        "decoded y-format archive"
    );
    Ok(container)
}

/// Buffer size to reserve for an entry declaring `declared` bytes.
#[inline]
fn capacity_hint(declared: u64) -> usize {
    usize::try_from(declared).map_or(MAX_ENTRY_PREALLOC, |n| n.min(MAX_ENTRY_PREALLOC))
}
