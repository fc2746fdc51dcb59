//! Property access contract of the office engine.
//!
//! The engine exposes document properties as name/value pairs, the way an
//! office service's document-properties interface does. Names that are not
//! part of the metadata vocabulary are dropped by the codec.

use chrono::NaiveDateTime;

use super::field::UNSET_DATE;
use crate::common::{Error, Result};
use crate::registry::constants::TEXT_PLAIN;

/// Implementation name reported for documents with no stored properties.
pub const PROPERTY_BAG_IMPLEMENTATION: &str = "com.sun.star.comp.comphelper.OPropertyBag";

/// Value of an engine-reported property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    Text(String),
    TextList(Vec<String>),
    /// `None` for dates the document never set
    Date(Option<NaiveDateTime>),
}

/// A single engine-reported property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineProperty {
    pub name: String,
    pub value: PropertyValue,
}

impl EngineProperty {
    pub fn new(name: impl Into<String>, value: PropertyValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, PropertyValue::Text(value.into()))
    }
}

/// Read and write document properties through an office engine.
///
/// Implementations are synchronous; `extension` names the format of `data`.
pub trait PropertyEngine {
    /// All properties the engine reports for the document.
    fn read_properties(&self, data: &[u8], extension: &str) -> Result<Vec<EngineProperty>>;

    /// A copy of the document with `properties` overwritten.
    fn write_properties(
        &self,
        data: &[u8],
        extension: &str,
        properties: &[EngineProperty],
    ) -> Result<Vec<u8>>;
}

impl<T: PropertyEngine + ?Sized> PropertyEngine for &T {
    fn read_properties(&self, data: &[u8], extension: &str) -> Result<Vec<EngineProperty>> {
        (**self).read_properties(data, extension)
    }

    fn write_properties(
        &self,
        data: &[u8],
        extension: &str,
        properties: &[EngineProperty],
    ) -> Result<Vec<u8>> {
        (**self).write_properties(data, extension, properties)
    }
}

impl<T: PropertyEngine + ?Sized> PropertyEngine for Box<T> {
    fn read_properties(&self, data: &[u8], extension: &str) -> Result<Vec<EngineProperty>> {
        (**self).read_properties(data, extension)
    }

    fn write_properties(
        &self,
        data: &[u8],
        extension: &str,
        properties: &[EngineProperty],
    ) -> Result<Vec<u8>> {
        (**self).write_properties(data, extension, properties)
    }
}

/// Property engine used when no office service is attached.
///
/// An empty document is answered the way a freshly created property bag
/// answers: unset dates, the bag's implementation name and `text/plain`.
/// Anything else needs a real engine and is reported as unsupported.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedEngine;

impl PropertyEngine for DetachedEngine {
    fn read_properties(&self, data: &[u8], extension: &str) -> Result<Vec<EngineProperty>> {
        if !data.is_empty() {
            return Err(Error::Unsupported(format!(
                "reading properties of a non-empty .{extension} document requires an office engine"
            )));
        }
        Ok(vec![
            EngineProperty::new("CreationDate", PropertyValue::Date(None)),
            EngineProperty::text("ImplementationName", PROPERTY_BAG_IMPLEMENTATION),
            EngineProperty::text("MIMEType", TEXT_PLAIN),
            EngineProperty::new("ModificationDate", PropertyValue::Date(None)),
            EngineProperty::text("PrintDate", UNSET_DATE),
            EngineProperty::new("TemplateDate", PropertyValue::Date(None)),
        ])
    }

    fn write_properties(
        &self,
        _data: &[u8],
        extension: &str,
        _properties: &[EngineProperty],
    ) -> Result<Vec<u8>> {
        Err(Error::Unsupported(format!(
            "writing properties of .{extension} documents requires an office engine"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detached_engine_empty_document() {
        let properties = DetachedEngine.read_properties(b"", "xlsx").unwrap();
        let names: Vec<_> = properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "CreationDate",
                "ImplementationName",
                "MIMEType",
                "ModificationDate",
                "PrintDate",
                "TemplateDate"
            ]
        );
    }

    #[test]
    fn test_detached_engine_refuses_real_documents() {
        assert!(matches!(
            DetachedEngine.read_properties(b"PK\x03\x04", "xlsx"),
            Err(Error::Unsupported(_))
        ));
        assert!(matches!(
            DetachedEngine.write_properties(b"", "docx", &[]),
            Err(Error::Unsupported(_))
        ));
    }
}
