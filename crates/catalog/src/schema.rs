//! Per-category metadata schema definitions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Free-form metadata carried by an item, validated against its category schema.
pub type MetadataRecord = BTreeMap<String, JsonValue>;

/// Declared type of a metadata field.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    String,
    Number,
    Boolean,
}

/// Constraints for a single metadata field.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    /// Numeric lower bound (inclusive). Only meaningful for `Number` fields.
    pub min: Option<f64>,
    /// Numeric upper bound (inclusive). Only meaningful for `Number` fields.
    pub max: Option<f64>,
    /// Length bounds in characters. Only meaningful for `String` fields.
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    /// Closed set of accepted values, when the field is an enumeration.
    pub allowed: Option<Vec<JsonValue>>,
}

/// Mapping of field name → definition every item of a category must satisfy.
///
/// An empty schema accepts any metadata record.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetadataSchema {
    fields: BTreeMap<String, FieldDef>,
}

impl MetadataSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: impl Into<String>, def: FieldDef) -> Self {
        self.fields.insert(name.into(), def);
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldDef)> {
        self.fields.iter()
    }
}
