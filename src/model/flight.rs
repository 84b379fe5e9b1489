//! Flight entity
//!
//! A flight is stored as a `FlightRecord` whose `passenger_ids` set is the
//! booking relationship. Nothing enforces that those ids still name existing
//! passengers; a deleted passenger stays referenced until its booking is
//! cancelled.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::codec::{self, CodecError, Record};
use crate::store::Item;

use super::Passenger;

pub const NUMBER: &str = "number";
pub const CAPACITY: &str = "capacity";
pub const CAPTAIN: &str = "captain";
pub const PLANE: &str = "plane";
pub const PASSENGERS: &str = "passengers";

/// A flight as stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightRecord {
    /// Caller-supplied flight number, never generated
    pub number: String,
    pub capacity: i64,
    pub captain: String,
    pub plane: String,

    /// Booked passenger ids, stored under `passengers`
    pub passenger_ids: BTreeSet<String>,
}

impl FlightRecord {
    /// A flight with nobody booked
    pub fn new(
        number: impl Into<String>,
        capacity: i64,
        captain: impl Into<String>,
        plane: impl Into<String>,
    ) -> Self {
        Self {
            number: number.into(),
            capacity,
            captain: captain.into(),
            plane: plane.into(),
            passenger_ids: BTreeSet::new(),
        }
    }
}

impl Record for FlightRecord {
    const ENTITY: &'static str = "flight";
    const KEY_ATTRIBUTE: &'static str = NUMBER;

    fn key_value(&self) -> &str {
        &self.number
    }

    fn to_item(&self) -> Result<Item, CodecError> {
        let mut item = Item::new();
        codec::put_key_s(&mut item, NUMBER, &self.number)?;
        codec::put_n(&mut item, CAPACITY, self.capacity);
        codec::put_s(&mut item, CAPTAIN, &self.captain);
        codec::put_s(&mut item, PLANE, &self.plane);
        codec::put_ss(&mut item, PASSENGERS, &self.passenger_ids)?;
        Ok(item)
    }

    fn from_item(item: &Item) -> Result<Self, CodecError> {
        Ok(Self {
            number: codec::get_key_s(item, NUMBER)?,
            capacity: codec::get_n(item, CAPACITY)?,
            captain: codec::get_s(item, CAPTAIN)?,
            plane: codec::get_s(item, PLANE)?,
            passenger_ids: codec::get_ss(item, PASSENGERS)?,
        })
    }
}

/// A flight with its passengers resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flight {
    pub number: String,
    pub capacity: i64,
    pub captain: String,
    pub plane: String,

    /// No ordering guarantee
    pub passengers: Vec<Passenger>,
}

impl Flight {
    /// Combine a stored flight with its resolved passengers
    pub fn from_record(record: FlightRecord, passengers: Vec<Passenger>) -> Self {
        Self {
            number: record.number,
            capacity: record.capacity,
            captain: record.captain,
            plane: record.plane,
            passengers,
        }
    }

    /// Ids of the resolved passengers
    pub fn passenger_ids(&self) -> BTreeSet<String> {
        self.passengers.iter().map(|p| p.id.clone()).collect()
    }
}
