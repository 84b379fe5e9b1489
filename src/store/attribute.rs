//! Attribute definitions
//!
//! Generic value shapes a schemaless item is built from.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// A single attribute value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeValue {
    /// Text
    S(String),

    /// Number, carried as its decimal text
    N(String),

    /// Set of unique text elements (never empty when stored)
    Ss(BTreeSet<String>),

    /// Boolean
    Bool(bool),

    /// Explicit null
    Null,
}

impl AttributeValue {
    /// Short type tag used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            AttributeValue::S(_) => "S",
            AttributeValue::N(_) => "N",
            AttributeValue::Ss(_) => "SS",
            AttributeValue::Bool(_) => "BOOL",
            AttributeValue::Null => "NULL",
        }
    }

    pub fn as_s(&self) -> Option<&str> {
        match self {
            AttributeValue::S(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_ss(&self) -> Option<&BTreeSet<String>> {
        match self {
            AttributeValue::Ss(set) => Some(set),
            _ => None,
        }
    }
}

/// A record in generic form: attribute name → value
pub type Item = BTreeMap<String, AttributeValue>;

/// Primary key of an item: one text attribute
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key {
    /// Name of the key attribute (`id`, `number`)
    pub attribute: String,

    /// Key value
    pub value: String,
}

impl Key {
    pub fn new(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Extract the key named `attribute` from an item
    ///
    /// Returns `None` when the attribute is absent or not text.
    pub fn from_item(item: &Item, attribute: &str) -> Option<Self> {
        item.get(attribute)
            .and_then(AttributeValue::as_s)
            .map(|value| Self::new(attribute, value))
    }
}
