//! Equality filters for document queries and live subscriptions.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::document::Fields;

/// A single equality condition on a named field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterField {
    /// The field name to compare.
    pub field: String,
    /// The value the field must equal.
    pub value: Value,
}

impl FilterField {
    /// Create a new equality condition.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Check the condition against a document's fields.
    ///
    /// Comparison is exact: strings are compared byte-for-byte with no
    /// case folding or trimming, and a missing field never matches.
    pub fn matches(&self, fields: &Fields) -> bool {
        fields.get(&self.field) == Some(&self.value)
    }
}

/// A conjunction of equality conditions. An empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    /// Conditions that must all hold.
    pub conditions: Vec<FilterField>,
}

impl Filter {
    /// A filter matching every document in a collection.
    pub fn all() -> Self {
        Self::default()
    }

    /// A filter with a single equality condition.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            conditions: vec![FilterField::eq(field, value)],
        }
    }

    /// Add another equality condition.
    pub fn and_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push(FilterField::eq(field, value));
        self
    }

    /// Check every condition against a document's fields.
    pub fn matches(&self, fields: &Fields) -> bool {
        self.conditions.iter().all(|c| c.matches(fields))
    }
}
