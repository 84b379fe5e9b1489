//! Passenger Repository
//!
//! Owns passenger records. Passengers are created with a generated id,
//! read back by id, listed with a full scan, and deleted idempotently.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, trace};

use crate::codec::{self, CodecError, Record};
use crate::error::{DataError, Result};
use crate::model::Passenger;
use crate::store::{Item, Key, KvStore, StoreError, MAX_BATCH_GET_KEYS};

use super::{get_decoded, scan_decoded};

/// How `get_many` splits and spreads multi-get requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    /// Max keys per multi-get request
    pub limit: usize,

    /// Max multi-get requests running at once
    pub workers: usize,
}

impl BatchOptions {
    /// Reject a limit outside `1..=MAX_BATCH_GET_KEYS` or zero workers
    pub fn validate(&self) -> Result<()> {
        if self.limit == 0 || self.limit > MAX_BATCH_GET_KEYS {
            return Err(DataError::Config(format!(
                "batch_get_limit must be within 1..={}, got {}",
                MAX_BATCH_GET_KEYS, self.limit
            )));
        }
        if self.workers == 0 {
            return Err(DataError::Config("fanout_workers must be at least 1".to_string()));
        }
        Ok(())
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            limit: MAX_BATCH_GET_KEYS,
            workers: 1,
        }
    }
}

/// Repository over the passengers table
pub struct PassengerRepository<S> {
    store: Arc<S>,
    table: String,
    batch: BatchOptions,
}

impl<S: KvStore> PassengerRepository<S> {
    pub fn new(store: Arc<S>, table: impl Into<String>) -> Self {
        Self {
            store,
            table: table.into(),
            batch: BatchOptions::default(),
        }
    }

    /// Set how `get_many` batches its requests
    pub fn with_batch_options(mut self, batch: BatchOptions) -> Result<Self> {
        batch.validate()?;
        self.batch = batch;
        Ok(self)
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Create a passenger with a newly generated id
    pub fn create(&self, name: &str) -> Result<Passenger> {
        let passenger = Passenger::new(name);
        let item = codec::encode(&passenger)?;

        self.store
            .put_item(&self.table, item)
            .map_err(|source| DataError::write(&self.table, source))?;

        debug!(table = %self.table, id = %passenger.id, "created passenger");
        Ok(passenger)
    }

    /// Look up one passenger by id
    pub fn get(&self, id: &str) -> Result<Passenger> {
        get_decoded(&*self.store, &self.table, id)
    }

    /// Every passenger in the table, in one batch
    pub fn get_all(&self) -> Result<Vec<Passenger>> {
        let passengers: Vec<Passenger> = scan_decoded(&*self.store, &self.table)?;
        debug!(table = %self.table, count = passengers.len(), "listed passengers");
        Ok(passengers)
    }

    /// Delete a passenger; deleting an unknown id still succeeds
    ///
    /// Flights that booked this passenger keep the id in their set.
    pub fn delete(&self, id: &str) -> Result<bool> {
        self.store
            .delete_item(&self.table, &Key::new(Passenger::KEY_ATTRIBUTE, id))
            .map_err(|source| DataError::write(&self.table, source))?;

        debug!(table = %self.table, id, "deleted passenger");
        Ok(true)
    }

    /// Fetch many passengers with multi-get requests
    ///
    /// Ids with no record are simply absent from the returned map. Every
    /// fetched record is decoded, so one malformed record fails the call.
    pub fn get_many(&self, ids: &[String]) -> Result<HashMap<String, Passenger>> {
        self.fetch_many(ids)?
            .into_values()
            .map(|item| {
                let passenger: Passenger = codec::decode(&item)?;
                Ok((passenger.id.clone(), passenger))
            })
            .collect()
    }

    /// Fetch raw passenger items by id, without decoding them
    ///
    /// Ids are deduplicated, split into chunks of `BatchOptions::limit`, and
    /// the chunks spread over up to `BatchOptions::workers` threads. Ids with
    /// no record are absent from the map. Any failed request fails the whole
    /// call with the error of the earliest failed chunk.
    pub fn fetch_many(&self, ids: &[String]) -> Result<HashMap<String, Item>> {
        let mut seen = HashSet::with_capacity(ids.len());
        let keys: Vec<Key> = ids
            .iter()
            .filter(|id| seen.insert(id.as_str()))
            .map(|id| Key::new(Passenger::KEY_ATTRIBUTE, id.as_str()))
            .collect();

        if keys.is_empty() {
            return Ok(HashMap::new());
        }

        let chunks: Vec<&[Key]> = keys.chunks(self.batch.limit).collect();
        trace!(
            table = %self.table,
            keys = keys.len(),
            chunks = chunks.len(),
            workers = self.batch.workers,
            "batched passenger fetch"
        );

        let items = if self.batch.workers == 1 || chunks.len() == 1 {
            let mut items = Vec::with_capacity(keys.len());
            for chunk in &chunks {
                items.extend(self.fetch_chunk(chunk)?);
            }
            items
        } else {
            self.fetch_parallel(&chunks)?
        };

        let mut by_id = HashMap::with_capacity(items.len());
        for item in items {
            match Key::from_item(&item, Passenger::KEY_ATTRIBUTE) {
                Some(key) => {
                    by_id.insert(key.value, item);
                }
                None => {
                    return Err(DataError::decode(
                        Passenger::ENTITY,
                        CodecError::MissingAttribute(Passenger::KEY_ATTRIBUTE.to_string()),
                    ))
                }
            }
        }
        Ok(by_id)
    }

    fn fetch_chunk(&self, chunk: &[Key]) -> Result<Vec<Item>> {
        self.store
            .batch_get_items(&self.table, chunk)
            .map_err(|source| DataError::read(&self.table, source))
    }

    /// Run chunks on scoped worker threads, stopping early once any fails
    fn fetch_parallel(&self, chunks: &[&[Key]]) -> Result<Vec<Item>> {
        let workers = self.batch.workers.min(chunks.len());
        let failed = AtomicBool::new(false);

        let outcome = crossbeam::thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|worker| {
                    let failed = &failed;
                    scope.spawn(move |_| {
                        let mut results = Vec::new();
                        for index in (worker..chunks.len()).step_by(workers) {
                            if failed.load(Ordering::Acquire) {
                                break;
                            }
                            let result = self.fetch_chunk(chunks[index]);
                            if result.is_err() {
                                failed.store(true, Ordering::Release);
                            }
                            results.push((index, result));
                        }
                        results
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| handle.join())
                .collect::<std::thread::Result<Vec<_>>>()
        });

        let mut results: Vec<(usize, Result<Vec<Item>>)> = match outcome {
            Ok(Ok(per_worker)) => per_worker.into_iter().flatten().collect(),
            _ => {
                return Err(DataError::read(
                    &self.table,
                    StoreError::Unavailable("batch get worker panicked".to_string()),
                ))
            }
        };
        results.sort_by_key(|(index, _)| *index);

        let mut items = Vec::new();
        for (_, result) in results {
            items.extend(result?);
        }
        Ok(items)
    }
}
