//! Flight Repository
//!
//! Read path over raw flight records. Flights are provisioned outside the
//! data layer; their `passengers` set is only changed through
//! `BookingManager`.

use std::sync::Arc;

use tracing::debug;

use crate::error::Result;
use crate::model::FlightRecord;
use crate::store::KvStore;

use super::{get_decoded, scan_decoded};

/// Repository over the flights table
pub struct FlightRepository<S> {
    store: Arc<S>,
    table: String,
}

impl<S: KvStore> FlightRepository<S> {
    pub fn new(store: Arc<S>, table: impl Into<String>) -> Self {
        Self {
            store,
            table: table.into(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Every stored flight, passenger ids unresolved
    pub fn scan_raw(&self) -> Result<Vec<FlightRecord>> {
        let flights: Vec<FlightRecord> = scan_decoded(&*self.store, &self.table)?;
        debug!(table = %self.table, count = flights.len(), "scanned flights");
        Ok(flights)
    }

    /// One stored flight by number
    pub fn get_raw(&self, number: &str) -> Result<FlightRecord> {
        get_decoded(&*self.store, &self.table, number)
    }
}
