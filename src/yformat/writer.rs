//! Encoding y-format archives.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use super::constants::{BODY_ENTRY, MEDIA_PREFIX, METADATA_ENTRY};
use super::container::YContainer;
use crate::common::Result;

/// Encode a container as a ZIP archive.
///
/// Entries are written in a fixed order (`body.txt`, `metadata.json`, then
/// media sorted by name) with a fixed timestamp, so encoding the same
/// container twice yields identical bytes.
pub fn encode(container: &YContainer) -> Result<Vec<u8>> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    writer.start_file(BODY_ENTRY, options)?;
    writer.write_all(container.body())?;

    if let Some(sidecar) = container.metadata() {
        writer.start_file(METADATA_ENTRY, options)?;
        writer.write_all(sidecar)?;
    }

    for (name, data) in container.media() {
        writer.start_file(format!("{MEDIA_PREFIX}{name}"), options)?;
        writer.write_all(data)?;
    }

    Ok(writer.finish()?.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yformat::decode;

    fn sample() -> YContainer {
        YContainer::new(&b"DOCY;v10;0;media/b.png media/a.png"[..])
            .unwrap()
            .with_media("b.png", vec![2u8; 64])
            .unwrap()
            .with_media("a.png", vec![1u8; 64])
            .unwrap()
    }

    #[test]
    fn test_encode_is_deterministic() {
        let first = encode(&sample()).unwrap();
        let second = encode(&sample()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_reencode_unmodified_container_is_identical() {
        let bytes = encode(&sample()).unwrap();
        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded, sample());
        assert_eq!(encode(&decoded).unwrap(), bytes);
    }

    #[test]
    fn test_nested_media_survive_decode() {
        let container = YContainer::new(&b"XLSY;v10;0;<chart r=\"media/charts/chart1.bin\"/>"[..])
            .unwrap()
            .with_media("charts/chart1.bin", vec![7u8; 16])
            .unwrap();
        let decoded = decode(&encode(&container).unwrap()).unwrap();
        assert_eq!(decoded, container);
        assert_eq!(
            decoded.media_entry("media/charts/chart1.bin").map(|b| b.len()),
            Some(16)
        );
    }

    #[test]
    fn test_entry_order() {
        let mut container = sample();
        container.set_metadata(Some(bytes::Bytes::from_static(b"{}")));
        let bytes = encode(&container).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert_eq!(
            names,
            vec!["body.txt", "metadata.json", "media/a.png", "media/b.png"]
        );
    }
}
