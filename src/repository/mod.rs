//! Repository Module
//!
//! Typed access to the passengers and flights tables.
//!
//! ## Responsibilities
//! - `PassengerRepository`: create, get, get-all, batched get, delete
//! - `FlightRepository`: read path over raw flight records
//! - `BookingManager`: atomic add/remove of passenger ids on a flight
//!
//! Every store failure is wrapped with its table name and returned as is.
//! Listing calls decode every record or fail; they never return a partial
//! list.

mod booking;
mod flight;
mod passenger;

pub use booking::BookingManager;
pub use flight::FlightRepository;
pub use passenger::{BatchOptions, PassengerRepository};

use crate::codec::{self, Record};
use crate::error::{DataError, Result};
use crate::store::KvStore;

/// Scan a table and decode every item as `R`
///
/// The first malformed item aborts the whole scan.
pub(crate) fn scan_decoded<R: Record, S: KvStore>(store: &S, table: &str) -> Result<Vec<R>> {
    let items = store
        .scan(table)
        .map_err(|source| DataError::read(table, source))?;

    items.iter().map(codec::decode::<R>).collect()
}

/// Point-read one record by key, failing with `NotFound` when absent
pub(crate) fn get_decoded<R: Record, S: KvStore>(store: &S, table: &str, key: &str) -> Result<R> {
    let item = store
        .get_item(table, &crate::store::Key::new(R::KEY_ATTRIBUTE, key))
        .map_err(|source| DataError::read(table, source))?;

    match item {
        Some(item) if !item.is_empty() => codec::decode(&item),
        _ => Err(DataError::not_found(R::ENTITY, key)),
    }
}
