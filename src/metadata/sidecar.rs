//! `metadata.json` sidecar of y-format containers.
//!
//! The sidecar is a flat JSON object from field name to a string or a list of
//! strings. Unknown names and values of other JSON types are skipped so that
//! sidecars written by newer producers still load.

use bytes::Bytes;
use serde_json::Value;

use super::field::{FieldValue, MetadataField, MetadataRecord};
use crate::common::{Error, Result};

/// Parse a sidecar into a record.
pub fn read(sidecar: &[u8]) -> Result<MetadataRecord> {
    let value: Value = serde_json::from_slice(sidecar)?;
    let Value::Object(entries) = value else {
        return Err(Error::malformed_at(
            "metadata sidecar is not a JSON object",
            crate::yformat::METADATA_ENTRY,
        ));
    };

    let mut record = MetadataRecord::new();
    for (name, value) in entries {
        let Ok(field) = name.parse::<MetadataField>() else {
            tracing::debug!(field = %name, "skipping unknown sidecar field");
            continue;
        };
        match value {
            Value::String(text) => {
                record.insert(field, FieldValue::Text(text));
            },
            Value::Array(items) => {
                let texts: Vec<String> = items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(text) => Some(text),
                        _ => None,
                    })
                    .collect();
                record.insert(field, FieldValue::List(texts));
            },
            other => {
                tracing::debug!(field = %name, value = %other, "skipping non-text sidecar value");
            },
        }
    }
    Ok(record)
}

/// Serialize a record as a sidecar.
pub fn write(record: &MetadataRecord) -> Result<Bytes> {
    Ok(Bytes::from(serde_json::to_vec(record)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_sidecar() {
        let sidecar = r#"{
            "CreationDate": "31/01/2018 21:09:10",
            "Keywords": ["тест", "сабжект"],
            "Title": "kesha",
            "Generator": "someone",
            "Revision": 3
        }"#;
        let record = read(sidecar.as_bytes()).unwrap();
        assert_eq!(record.len(), 3);
        assert_eq!(record.text(MetadataField::Title), Some("kesha"));
        assert_eq!(
            record.get(MetadataField::Keywords),
            Some(&FieldValue::List(vec!["тест".to_string(), "сабжект".to_string()]))
        );
    }

    #[test]
    fn test_read_rejects_non_object() {
        assert!(matches!(read(b"[1, 2]"), Err(Error::MalformedContainer { .. })));
        assert!(matches!(read(b"{oops"), Err(Error::JsonError(_))));
    }

    #[test]
    fn test_write_then_read() {
        let mut record = MetadataRecord::new();
        record.insert(MetadataField::Subject, "s");
        let bytes = write(&record).unwrap();
        assert_eq!(bytes.as_ref(), br#"{"Subject":"s"}"#);
        assert_eq!(read(&bytes).unwrap(), record);
    }
}
