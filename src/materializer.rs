//! Flight Materializer
//!
//! Turns raw flight records into `Flight` views by resolving every booked
//! passenger id (a scatter-gather join done in the application, since the
//! store has no joins).
//!
//! ## Strategies
//! - `PerPassenger`: one point lookup per id, per flight, in sequence.
//!   N flights with P passengers each cost N·P round trips.
//! - `Batched`: ids are deduplicated across all flights and fetched with
//!   multi-gets, costing ⌈unique ids / batch limit⌉ round trips.
//!
//! ## Failure Policy
//! All or nothing. The first error anywhere (scan, decode, or a passenger
//! that no longer exists) fails the whole call and no views are returned.
//! Reads are not isolated from concurrent writes, so a passenger deleted
//! between the scan and its resolution surfaces as `DataError::NotFound`.
//!
//! Both strategies report a missing or malformed passenger for the first
//! failing id in flight-scan order. A failed multi-get under `Batched` is
//! reported before any id is resolved.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::codec::{self, Record};
use crate::config::ResolveStrategy;
use crate::error::{DataError, Result};
use crate::model::{Flight, FlightRecord, Passenger};
use crate::repository::{FlightRepository, PassengerRepository};
use crate::store::KvStore;

/// Builds fully resolved flight views
pub struct FlightMaterializer<'a, S> {
    flights: &'a FlightRepository<S>,
    passengers: &'a PassengerRepository<S>,
    strategy: ResolveStrategy,
}

impl<'a, S: KvStore> FlightMaterializer<'a, S> {
    pub fn new(
        flights: &'a FlightRepository<S>,
        passengers: &'a PassengerRepository<S>,
        strategy: ResolveStrategy,
    ) -> Self {
        Self {
            flights,
            passengers,
            strategy,
        }
    }

    /// Every flight with its passengers resolved
    ///
    /// Returns exactly one view per stored flight, in scan order.
    pub fn get_all_flights(&self) -> Result<Vec<Flight>> {
        let records = self.flights.scan_raw()?;

        let flights = match self.strategy {
            ResolveStrategy::PerPassenger => records
                .into_iter()
                .map(|record| self.resolve_each(record))
                .collect::<Result<Vec<_>>>()?,
            ResolveStrategy::Batched => self.resolve_batched(records)?,
        };

        debug!(
            flights = flights.len(),
            strategy = ?self.strategy,
            "materialized flights"
        );
        Ok(flights)
    }

    /// One point lookup per booked id
    fn resolve_each(&self, record: FlightRecord) -> Result<Flight> {
        let passengers = record
            .passenger_ids
            .iter()
            .map(|id| self.passengers.get(id))
            .collect::<Result<Vec<_>>>()?;

        Ok(Flight::from_record(record, passengers))
    }

    /// One multi-get pass over the union of booked ids
    ///
    /// Records are decoded per reference, in flight-scan order, so the
    /// first failing id yields the same error as the per-passenger path.
    fn resolve_batched(&self, records: Vec<FlightRecord>) -> Result<Vec<Flight>> {
        let mut seen = HashSet::new();
        let ids: Vec<String> = records
            .iter()
            .flat_map(|record| record.passenger_ids.iter())
            .filter(|id| seen.insert(id.as_str()))
            .cloned()
            .collect();

        let items = self.passengers.fetch_many(&ids)?;
        let mut decoded: HashMap<&str, Passenger> = HashMap::with_capacity(items.len());

        let mut flights = Vec::with_capacity(records.len());
        for record in records {
            let mut passengers = Vec::with_capacity(record.passenger_ids.len());
            for id in &record.passenger_ids {
                if let Some(passenger) = decoded.get(id.as_str()) {
                    passengers.push(passenger.clone());
                    continue;
                }
                let (key, item) = items
                    .get_key_value(id.as_str())
                    .ok_or_else(|| DataError::not_found(Passenger::ENTITY, id.as_str()))?;
                let passenger: Passenger = codec::decode(item)?;
                decoded.insert(key.as_str(), passenger.clone());
                passengers.push(passenger);
            }
            flights.push(Flight::from_record(record, passengers));
        }
        Ok(flights)
    }
}
