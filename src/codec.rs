//! Record codec
//!
//! Conversion between typed entities and the store's generic `Item` form.
//!
//! ## Shape Rules
//! - Text fields are `S`, integers are `N` (decimal text), id sets are `SS`
//! - The key attribute must be present, text, and non-empty
//! - Empty sets are never written; an absent set attribute decodes as empty
//!
//! Shape mismatches surface as `CodecError`, which the repositories wrap into
//! `DataError::Encode` or `DataError::Decode` with the entity name.

use std::collections::BTreeSet;
use std::str::FromStr;

use thiserror::Error;

use crate::error::{DataError, Result};
use crate::store::{AttributeValue, Item, Key};

/// Errors converting between entities and items
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("missing attribute `{0}`")]
    MissingAttribute(String),

    #[error("attribute `{attribute}` has type {found}, expected {expected}")]
    TypeMismatch {
        attribute: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("attribute `{attribute}` is not a valid number: `{value}`")]
    InvalidNumber { attribute: String, value: String },

    #[error("attribute `{0}` must not be empty")]
    EmptyValue(String),
}

/// An entity with a fixed stored shape
pub trait Record: Sized {
    /// Entity name used in errors and logs
    const ENTITY: &'static str;

    /// Name of the primary key attribute
    const KEY_ATTRIBUTE: &'static str;

    /// Primary key value of this record
    fn key_value(&self) -> &str;

    fn to_item(&self) -> std::result::Result<Item, CodecError>;

    fn from_item(item: &Item) -> std::result::Result<Self, CodecError>;

    /// Primary key of this record
    fn key(&self) -> Key {
        Key::new(Self::KEY_ATTRIBUTE, self.key_value())
    }
}

/// Encode a record, wrapping failures as `DataError::Encode`
pub fn encode<R: Record>(record: &R) -> Result<Item> {
    record
        .to_item()
        .map_err(|source| DataError::encode(R::ENTITY, source))
}

/// Decode a record, wrapping failures as `DataError::Decode`
pub fn decode<R: Record>(item: &Item) -> Result<R> {
    R::from_item(item).map_err(|source| DataError::decode(R::ENTITY, source))
}

// =============================================================================
// Field Helpers
// =============================================================================

/// Required text attribute
pub(crate) fn get_s(item: &Item, attribute: &str) -> std::result::Result<String, CodecError> {
    match item.get(attribute) {
        Some(AttributeValue::S(value)) => Ok(value.clone()),
        Some(other) => Err(mismatch(attribute, "S", other)),
        None => Err(CodecError::MissingAttribute(attribute.to_string())),
    }
}

/// Required text attribute that must also be non-empty (keys)
pub(crate) fn get_key_s(item: &Item, attribute: &str) -> std::result::Result<String, CodecError> {
    let value = get_s(item, attribute)?;
    if value.is_empty() {
        return Err(CodecError::EmptyValue(attribute.to_string()));
    }
    Ok(value)
}

/// Required number attribute parsed into `T`
pub(crate) fn get_n<T: FromStr>(item: &Item, attribute: &str) -> std::result::Result<T, CodecError> {
    match item.get(attribute) {
        Some(AttributeValue::N(text)) => {
            text.trim()
                .parse::<T>()
                .map_err(|_| CodecError::InvalidNumber {
                    attribute: attribute.to_string(),
                    value: text.clone(),
                })
        }
        Some(other) => Err(mismatch(attribute, "N", other)),
        None => Err(CodecError::MissingAttribute(attribute.to_string())),
    }
}

/// Optional string-set attribute; absent or null decodes as empty
pub(crate) fn get_ss(
    item: &Item,
    attribute: &str,
) -> std::result::Result<BTreeSet<String>, CodecError> {
    match item.get(attribute) {
        Some(AttributeValue::Ss(set)) => Ok(set.clone()),
        Some(AttributeValue::Null) | None => Ok(BTreeSet::new()),
        Some(other) => Err(mismatch(attribute, "SS", other)),
    }
}

pub(crate) fn put_key_s(
    item: &mut Item,
    attribute: &str,
    value: &str,
) -> std::result::Result<(), CodecError> {
    if value.is_empty() {
        return Err(CodecError::EmptyValue(attribute.to_string()));
    }
    item.insert(attribute.to_string(), AttributeValue::S(value.to_string()));
    Ok(())
}

pub(crate) fn put_s(item: &mut Item, attribute: &str, value: &str) {
    item.insert(attribute.to_string(), AttributeValue::S(value.to_string()));
}

pub(crate) fn put_n<T: ToString>(item: &mut Item, attribute: &str, value: T) {
    item.insert(attribute.to_string(), AttributeValue::N(value.to_string()));
}

/// Writes the set only when it has elements
pub(crate) fn put_ss(
    item: &mut Item,
    attribute: &str,
    set: &BTreeSet<String>,
) -> std::result::Result<(), CodecError> {
    if set.is_empty() {
        return Ok(());
    }
    if set.iter().any(|element| element.is_empty()) {
        return Err(CodecError::EmptyValue(attribute.to_string()));
    }
    item.insert(attribute.to_string(), AttributeValue::Ss(set.clone()));
    Ok(())
}

fn mismatch(attribute: &str, expected: &'static str, found: &AttributeValue) -> CodecError {
    CodecError::TypeMismatch {
        attribute: attribute.to_string(),
        expected,
        found: found.type_name(),
    }
}
