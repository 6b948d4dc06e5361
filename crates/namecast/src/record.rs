//! Typed field values and parsed filename records.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;

/// Name of the field that receives a filename's extension.
pub const EXTENSION_FIELD: &str = "extension";

/// A field value, either the raw string segment or the result of a cast.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Str(s) => f.write_str(s),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Float(x) => write!(f, "{}", x),
            FieldValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Str(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Str(value)
    }
}

/// Fields bound from a filename, in schema order.
///
/// The extension field is only present when an extension was bound, and keeps
/// its leading period (`".txt"`).
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRecord {
    fields: Vec<(String, FieldValue)>,
}

impl ParsedRecord {
    /// Build a record from ordered `(name, value)` pairs.
    pub fn from_fields<N, V>(fields: impl IntoIterator<Item = (N, V)>) -> Self
    where
        N: Into<String>,
        V: Into<FieldValue>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }

    /// Bind `base` fields and, when present, the extension value in the slot
    /// the schema gives the extension field.
    pub(crate) fn bind(
        names: &[String],
        mut base: impl Iterator<Item = FieldValue>,
        extension: Option<&str>,
    ) -> Self {
        let mut fields = Vec::with_capacity(names.len());
        for name in names {
            if name == EXTENSION_FIELD {
                if let Some(ext) = extension {
                    fields.push((name.clone(), FieldValue::Str(ext.to_string())));
                }
                continue;
            }
            if let Some(value) = base.next() {
                fields.push((name.clone(), value));
            }
        }
        Self { fields }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// The bound extension, including its leading period.
    pub fn extension(&self) -> Option<&str> {
        self.get(EXTENSION_FIELD).and_then(FieldValue::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Every field except the extension, in schema order.
    pub fn base_fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields().filter(|(n, _)| *n != EXTENSION_FIELD)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(crate) fn map_values<E>(
        self,
        mut f: impl FnMut(&str, FieldValue) -> Result<FieldValue, E>,
    ) -> Result<Self, E> {
        let fields = self
            .fields
            .into_iter()
            .map(|(name, value)| {
                let value = f(&name, value)?;
                Ok((name, value))
            })
            .collect::<Result<Vec<_>, E>>()?;
        Ok(Self { fields })
    }
}

impl Serialize for ParsedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_places_extension_in_schema_slot() {
        let names: Vec<String> = ["extension", "a", "b"].iter().map(|s| s.to_string()).collect();
        let base = vec![FieldValue::from("x"), FieldValue::from("y")];

        let record = ParsedRecord::bind(&names, base.into_iter(), Some(".csv"));

        let order: Vec<&str> = record.fields().map(|(n, _)| n).collect();
        assert_eq!(order, vec!["extension", "a", "b"]);
        assert_eq!(record.extension(), Some(".csv"));
        assert_eq!(record.base_fields().count(), 2);
    }

    #[test]
    fn bind_without_extension_omits_field() {
        let names: Vec<String> = ["a", "extension"].iter().map(|s| s.to_string()).collect();

        let record = ParsedRecord::bind(&names, vec![FieldValue::from("report")].into_iter(), None);

        assert_eq!(record.len(), 1);
        assert_eq!(record.extension(), None);
    }

    #[test]
    fn serializes_as_ordered_object() {
        let record = ParsedRecord::from_fields([
            ("site", FieldValue::from("north")),
            ("year", FieldValue::Int(2024)),
            ("ratio", FieldValue::Float(0.5)),
            ("final", FieldValue::Bool(true)),
        ]);

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"site":"north","year":2024,"ratio":0.5,"final":true}"#
        );
    }
}
