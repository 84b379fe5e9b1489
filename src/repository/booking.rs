//! Booking Manager
//!
//! Owns the flight → passenger relationship edge. A booking is one atomic
//! set update on the flight record: `Add` to book, `Delete` to cancel. No
//! read-modify-write happens here, so concurrent bookings on one flight
//! cannot lose each other.
//!
//! Both updates require the flight to exist. Booking or cancelling against
//! an unknown flight number fails with `DataError::Write` instead of
//! creating a sparse flight record.

use std::sync::Arc;

use tracing::debug;

use crate::codec::Record;
use crate::error::{DataError, Result};
use crate::model::{flight, FlightRecord};
use crate::store::{Key, KvStore, SetAction, SetUpdate, UpdateCondition};

/// Atomic booking and cancellation on the flights table
pub struct BookingManager<S> {
    store: Arc<S>,
    table: String,
}

impl<S: KvStore> BookingManager<S> {
    pub fn new(store: Arc<S>, table: impl Into<String>) -> Self {
        Self {
            store,
            table: table.into(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Add a passenger id to a flight's set; booking twice is a no-op
    pub fn book(&self, flight_number: &str, passenger_id: &str) -> Result<bool> {
        self.apply(flight_number, passenger_id, SetAction::Add)?;
        debug!(table = %self.table, flight = flight_number, passenger = passenger_id, "booked");
        Ok(true)
    }

    /// Remove a passenger id from a flight's set; removing an absent id is a no-op
    pub fn cancel(&self, flight_number: &str, passenger_id: &str) -> Result<bool> {
        self.apply(flight_number, passenger_id, SetAction::Delete)?;
        debug!(table = %self.table, flight = flight_number, passenger = passenger_id, "cancelled");
        Ok(true)
    }

    fn apply(&self, flight_number: &str, passenger_id: &str, action: SetAction) -> Result<()> {
        let update = SetUpdate {
            key: Key::new(FlightRecord::KEY_ATTRIBUTE, flight_number),
            attribute: flight::PASSENGERS.to_string(),
            action,
            element: passenger_id.to_string(),
            condition: UpdateCondition::ItemExists,
        };

        self.store
            .update_set(&self.table, update)
            .map_err(|source| DataError::write(&self.table, source))
    }
}
