//! Extracting and injecting document metadata.

use serde::{Deserialize, Serialize};

use super::engine::{DetachedEngine, EngineProperty, PropertyEngine, PropertyValue};
use super::field::{FieldValue, MetadataField, MetadataRecord};
use super::sidecar;
use crate::common::{Document, Error, Result};
use crate::registry::mimetype_for_format;
use crate::yformat::{self, BodyHeader, FormatTag, YContainer};

/// What to do with field names outside `Title`, `Subject` and `Keywords`
/// when setting metadata.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownFieldPolicy {
    /// Skip them silently
    #[default]
    Ignore,
    /// Fail with [`Error::UnknownMetadataField`]
    Reject,
}

/// Maps between documents and [`MetadataRecord`]s.
///
/// y-format documents keep their mutable fields in the container's
/// `metadata.json` sidecar; the body is never inspected. Everything else goes
/// through the [`PropertyEngine`].
#[derive(Debug, Clone, Default)]
pub struct MetadataCodec<P = DetachedEngine> {
    engine: P,
    policy: UnknownFieldPolicy,
}

impl MetadataCodec<DetachedEngine> {
    /// Codec without an office engine attached.
    pub fn detached() -> Self {
        Self::new(DetachedEngine)
    }
}

impl<P: PropertyEngine> MetadataCodec<P> {
    pub fn new(engine: P) -> Self {
        Self {
            engine,
            policy: UnknownFieldPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: UnknownFieldPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[inline]
    pub fn policy(&self) -> UnknownFieldPolicy {
        self.policy
    }

    #[inline]
    pub fn engine(&self) -> &P {
        &self.engine
    }

    /// Extract the metadata of a document.
    ///
    /// A y-format document carrying a sidecar reports the sidecar fields plus
    /// its `MIMEType`. Otherwise the engine is asked; empty documents are
    /// presented to it in their engine-facing format.
    ///
    /// A non-empty y-format document without a sidecar cannot be handed to
    /// the engine as is and fails with [`Error::Unsupported`]; convert it to
    /// its engine-facing format first, as
    /// [`Converter::get_metadata`](crate::convert::Converter::get_metadata)
    /// does.
    pub fn extract(&self, document: &Document) -> Result<MetadataRecord> {
        if let Some(record) = self.extract_from_container(document)? {
            return Ok(record);
        }
        let extension = match document.format() {
            Some(format) if format.is_yformat() && !document.is_empty() => {
                return Err(Error::Unsupported(format!(
                    "{format} body without metadata sidecar; convert to {} before reading properties",
                    format.engine_facing()
                )));
            },
            Some(format) if document.is_empty() => format.engine_facing().extension(),
            _ => document.extension(),
        };
        self.extract_from_engine(document.data(), extension)
    }

    /// Sidecar metadata of a y-format document, if it has any.
    ///
    /// Returns `Ok(None)` for other formats, for empty documents and for
    /// containers without a sidecar.
    pub fn extract_from_container(&self, document: &Document) -> Result<Option<MetadataRecord>> {
        let Some(format) = document.format().filter(|f| f.is_yformat()) else {
            return Ok(None);
        };
        if document.is_empty() {
            return Ok(None);
        }
        let container = yformat::decode(document.data())?;
        let Some(raw) = container.metadata() else {
            return Ok(None);
        };
        let mut record = sidecar::read(raw)?;
        record.insert(MetadataField::MimeType, mimetype_for_format(format));
        Ok(Some(record))
    }

    /// Ask the engine for the properties of `data` and map them onto the
    /// vocabulary.
    pub fn extract_from_engine(&self, data: &[u8], extension: &str) -> Result<MetadataRecord> {
        let properties = self.engine.read_properties(data, extension)?;
        let mut record = MetadataRecord::new();
        for property in properties {
            let Ok(field) = property.name.parse::<MetadataField>() else {
                tracing::trace!(property = %property.name, "dropping engine property outside vocabulary");
                continue;
            };
            // Only a new, empty document reports its implementation.
            if field == MetadataField::ImplementationName && !data.is_empty() {
                continue;
            }
            let value = match property.value {
                PropertyValue::Text(text) => FieldValue::Text(text),
                PropertyValue::TextList(values) => FieldValue::List(values),
                PropertyValue::Date(date) => FieldValue::date(date),
            };
            record.insert(field, value);
        }
        Ok(record)
    }

    /// Return a copy of `document` with the given fields overwritten.
    ///
    /// Only `Title`, `Subject` and `Keywords` are written. Other names are
    /// handled per the configured [`UnknownFieldPolicy`]. Mutable fields not
    /// mentioned keep their previous value.
    pub fn inject<I, K>(&self, document: Document, fields: I) -> Result<Document>
    where
        I: IntoIterator<Item = (K, FieldValue)>,
        K: AsRef<str>,
    {
        let updates = self.mutable_fields(fields)?;
        if document.is_yformat() {
            self.inject_into_container(document, updates)
        } else {
            self.inject_through_engine(document, updates)
        }
    }

    fn mutable_fields<I, K>(&self, fields: I) -> Result<MetadataRecord>
    where
        I: IntoIterator<Item = (K, FieldValue)>,
        K: AsRef<str>,
    {
        let mut updates = MetadataRecord::new();
        for (name, value) in fields {
            let name = name.as_ref();
            match name.parse::<MetadataField>() {
                Ok(field) if field.is_mutable() => {
                    updates.insert(field, value);
                },
                _ => match self.policy {
                    UnknownFieldPolicy::Ignore => {
                        tracing::debug!(field = name, "ignoring metadata field that cannot be set");
                    },
                    UnknownFieldPolicy::Reject => {
                        return Err(Error::UnknownMetadataField(name.to_string()));
                    },
                },
            }
        }
        Ok(updates)
    }

    fn inject_into_container(&self, document: Document, updates: MetadataRecord) -> Result<Document> {
        let mut container = if document.is_empty() {
            // A new document: start from an empty body of its family.
            let tag = document
                .format()
                .and_then(FormatTag::for_format)
                .ok_or_else(|| Error::UnsupportedFormat(document.extension().to_string()))?;
            YContainer::new(BodyHeader::current(tag).to_string().into_bytes())?
        } else {
            yformat::decode(document.data())?
        };

        let mut record = match container.metadata() {
            Some(raw) => sidecar::read(raw)?,
            None => MetadataRecord::new(),
        };
        record.retain_mutable();
        for (field, value) in updates.iter() {
            record.insert(field, value.clone());
        }

        container.set_metadata(Some(sidecar::write(&record)?));
        let bytes = yformat::encode(&container)?;
        tracing::debug!(
            extension = document.extension(),
            fields = record.len(),
            "wrote metadata sidecar"
        );
        Ok(Document::new(bytes, document.extension()))
    }

    fn inject_through_engine(&self, document: Document, updates: MetadataRecord) -> Result<Document> {
        let properties: Vec<EngineProperty> = updates
            .iter()
            .map(|(field, value)| {
                let value = match (field, value) {
                    (MetadataField::Keywords, value) => PropertyValue::TextList(
                        value.values().into_iter().map(str::to_string).collect(),
                    ),
                    (_, FieldValue::Text(text)) => PropertyValue::Text(text.clone()),
                    (_, FieldValue::List(values)) => PropertyValue::Text(values.join(", ")),
                };
                EngineProperty::new(field.as_str(), value)
            })
            .collect();
        let bytes = self
            .engine
            .write_properties(document.data(), document.extension(), &properties)?;
        Ok(Document::new(bytes, document.extension()))
    }
}
