//! Metadata field vocabulary and values.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::common::Error;

/// Textual form of dates in metadata records.
pub const DATE_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Date value reported for dates that were never set.
pub const UNSET_DATE: &str = "00/00/0000 00:00:00";

/// Canonical metadata fields.
///
/// Only [`Title`](MetadataField::Title), [`Subject`](MetadataField::Subject)
/// and [`Keywords`](MetadataField::Keywords) can be written; the others are
/// derived from the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MetadataField {
    CreationDate,
    ImplementationName,
    Keywords,
    #[serde(rename = "MIMEType")]
    MimeType,
    ModificationDate,
    PrintDate,
    Subject,
    TemplateDate,
    Title,
}

impl MetadataField {
    pub const ALL: [MetadataField; 9] = [
        MetadataField::CreationDate,
        MetadataField::ImplementationName,
        MetadataField::Keywords,
        MetadataField::MimeType,
        MetadataField::ModificationDate,
        MetadataField::PrintDate,
        MetadataField::Subject,
        MetadataField::TemplateDate,
        MetadataField::Title,
    ];

    /// Field name as it appears in records, sidecars and engine properties.
    pub fn as_str(self) -> &'static str {
        match self {
            MetadataField::CreationDate => "CreationDate",
            MetadataField::ImplementationName => "ImplementationName",
            MetadataField::Keywords => "Keywords",
            MetadataField::MimeType => "MIMEType",
            MetadataField::ModificationDate => "ModificationDate",
            MetadataField::PrintDate => "PrintDate",
            MetadataField::Subject => "Subject",
            MetadataField::TemplateDate => "TemplateDate",
            MetadataField::Title => "Title",
        }
    }

    /// Whether callers may set this field.
    #[inline]
    pub fn is_mutable(self) -> bool {
        matches!(
            self,
            MetadataField::Title | MetadataField::Subject | MetadataField::Keywords
        )
    }

    #[inline]
    pub fn is_date(self) -> bool {
        matches!(
            self,
            MetadataField::CreationDate
                | MetadataField::ModificationDate
                | MetadataField::PrintDate
                | MetadataField::TemplateDate
        )
    }
}

impl FromStr for MetadataField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetadataField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| Error::UnknownMetadataField(s.to_string()))
    }
}

impl fmt::Display for MetadataField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A metadata value: one text, or several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    /// Collapse lists of zero or one element into a single text.
    pub fn normalize(self) -> Self {
        match self {
            FieldValue::List(mut values) if values.len() <= 1 => {
                FieldValue::Text(values.pop().unwrap_or_default())
            },
            other => other,
        }
    }

    /// The value as text, if it is a single text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            FieldValue::List(_) => None,
        }
    }

    /// All contained texts.
    pub fn values(&self) -> Vec<&str> {
        match self {
            FieldValue::Text(text) => vec![text.as_str()],
            FieldValue::List(values) => values.iter().map(String::as_str).collect(),
        }
    }

    /// Render a date, or the unset sentinel.
    pub fn date(date: Option<NaiveDateTime>) -> Self {
        FieldValue::Text(
            date.map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_else(|| UNSET_DATE.to_string()),
        )
    }
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        FieldValue::Text(text.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(text: String) -> Self {
        FieldValue::Text(text)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(values: Vec<String>) -> Self {
        FieldValue::List(values)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(values: Vec<&str>) -> Self {
        FieldValue::List(values.into_iter().map(str::to_string).collect())
    }
}

/// Metadata of one document, ordered by field name.
///
/// Which fields are present depends on the document's history, not on a
/// fixed schema: a fresh document reports engine defaults, one whose
/// metadata was set reports exactly what was set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetadataRecord {
    fields: BTreeMap<MetadataField, FieldValue>,
}

impl MetadataRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, collapsing single-element lists.
    pub fn insert(&mut self, field: MetadataField, value: impl Into<FieldValue>) -> Option<FieldValue> {
        self.fields.insert(field, value.into().normalize())
    }

    pub fn get(&self, field: MetadataField) -> Option<&FieldValue> {
        self.fields.get(&field)
    }

    /// Single-text value of a field.
    pub fn text(&self, field: MetadataField) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_text)
    }

    pub fn remove(&mut self, field: MetadataField) -> Option<FieldValue> {
        self.fields.remove(&field)
    }

    pub fn contains(&self, field: MetadataField) -> bool {
        self.fields.contains_key(&field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Present fields, in name order.
    pub fn fields(&self) -> impl Iterator<Item = MetadataField> + '_ {
        self.fields.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MetadataField, &FieldValue)> {
        self.fields.iter().map(|(field, value)| (*field, value))
    }

    /// Keep only the fields callers may set.
    pub fn retain_mutable(&mut self) {
        self.fields.retain(|field, _| field.is_mutable());
    }
}

impl FromIterator<(MetadataField, FieldValue)> for MetadataRecord {
    fn from_iter<I: IntoIterator<Item = (MetadataField, FieldValue)>>(iter: I) -> Self {
        let mut record = MetadataRecord::new();
        for (field, value) in iter {
            record.insert(field, value);
        }
        record
    }
}
