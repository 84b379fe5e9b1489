//! Passenger entity

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::codec::{self, CodecError, Record};
use crate::store::Item;

pub const ID: &str = "id";
pub const NAME: &str = "name";

/// A passenger record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passenger {
    /// Generated at creation, immutable
    pub id: String,

    pub name: String,
}

impl Passenger {
    /// Create a passenger with a fresh random id
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
        }
    }
}

impl Record for Passenger {
    const ENTITY: &'static str = "passenger";
    const KEY_ATTRIBUTE: &'static str = ID;

    fn key_value(&self) -> &str {
        &self.id
    }

    fn to_item(&self) -> Result<Item, CodecError> {
        let mut item = Item::new();
        codec::put_key_s(&mut item, ID, &self.id)?;
        codec::put_s(&mut item, NAME, &self.name);
        Ok(item)
    }

    fn from_item(item: &Item) -> Result<Self, CodecError> {
        Ok(Self {
            id: codec::get_key_s(item, ID)?,
            name: codec::get_s(item, NAME)?,
        })
    }
}
