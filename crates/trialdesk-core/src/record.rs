//! Extraction records returned by `/extract-info`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::category::Category;

/// One extracted literature item.
///
/// Category-specific fields live in `fields` and are passed back to the
/// backend unchanged when the record is chosen for summary generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionRecord {
    #[serde(default)]
    pub literature_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_name: Option<String>,
    /// Set when the backend failed to process this item. A failed record
    /// carries no field data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md_file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inclusion_criteria: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusion_criteria: Option<String>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

/// Identity of a record for single-selection: name plus section, never the
/// name alone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey {
    pub literature_name: String,
    pub section_name: Option<String>,
}

impl ExtractionRecord {
    pub fn key(&self) -> RecordKey {
        RecordKey {
            literature_name: self.literature_name.clone(),
            section_name: self.section_name.clone(),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.as_deref().is_some_and(|e| !e.is_empty())
    }

    /// The record's category, if its section names a known one.
    pub fn category(&self) -> Option<Category> {
        self.section_name.as_deref().and_then(Category::from_name)
    }

    /// A category field as display text. Empty strings, `null` and `false`
    /// count as absent.
    pub fn field(&self, key: &str) -> Option<String> {
        match self.fields.get(key)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(true) => Some("true".to_string()),
            Value::Array(items) if !items.is_empty() => Some(
                items
                    .iter()
                    .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
                    .collect::<Vec<_>>()
                    .join("; "),
            ),
            Value::Object(map) if !map.is_empty() => Some(Value::Object(map.clone()).to_string()),
            _ => None,
        }
    }

    pub fn inclusion(&self) -> Option<&str> {
        self.inclusion_criteria.as_deref().filter(|s| !s.is_empty())
    }

    pub fn exclusion(&self) -> Option<&str> {
        self.exclusion_criteria.as_deref().filter(|s| !s.is_empty())
    }
}
