//! Configuration for flightdesk
//!
//! Centralized configuration with sensible defaults. Built once and handed
//! to the data layer at construction; nothing reads process-wide state.

use crate::error::{DataError, Result};
use crate::repository::BatchOptions;
use crate::store::MAX_BATCH_GET_KEYS;

/// Suffix used for the default table names
pub const DEFAULT_TABLE_SUFFIX: &str = "default";

/// How the materializer resolves passenger ids into passengers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveStrategy {
    /// One point lookup per passenger id, per flight, in sequence.
    /// N flights with P passengers each cost N·P round trips.
    PerPassenger,

    /// Deduplicate ids across every flight and fetch them with multi-gets
    /// of at most `batch_get_limit` keys each.
    Batched,
}

/// Main configuration for a data layer instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Table Configuration
    // -------------------------------------------------------------------------
    /// Table holding passenger records, keyed by `id`
    pub passengers_table: String,

    /// Table holding flight records, keyed by `number`
    pub flights_table: String,

    // -------------------------------------------------------------------------
    // Fan-out Configuration
    // -------------------------------------------------------------------------
    /// Passenger resolution strategy for flight listing
    pub resolve_strategy: ResolveStrategy,

    /// Max keys per multi-get request (store ceiling is 100)
    pub batch_get_limit: usize,

    /// Max multi-get requests in flight at once
    pub fanout_workers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            passengers_table: passengers_table_name(DEFAULT_TABLE_SUFFIX),
            flights_table: flights_table_name(DEFAULT_TABLE_SUFFIX),
            resolve_strategy: ResolveStrategy::Batched,
            batch_get_limit: MAX_BATCH_GET_KEYS,
            fanout_workers: 4,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check that the config can drive a data layer
    pub fn validate(&self) -> Result<()> {
        if self.passengers_table.trim().is_empty() {
            return Err(DataError::Config("passengers table name is empty".to_string()));
        }
        if self.flights_table.trim().is_empty() {
            return Err(DataError::Config("flights table name is empty".to_string()));
        }
        if self.passengers_table == self.flights_table {
            return Err(DataError::Config(format!(
                "passengers and flights share table `{}`",
                self.flights_table
            )));
        }
        self.batch_options().validate()
    }

    /// Multi-get settings for the passenger repository
    pub fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            limit: self.batch_get_limit,
            workers: self.fanout_workers,
        }
    }
}

/// `playground-passengers-{suffix}`
pub fn passengers_table_name(suffix: &str) -> String {
    format!("playground-passengers-{}", suffix)
}

/// `playground-flights-{suffix}`
pub fn flights_table_name(suffix: &str) -> String {
    format!("playground-flights-{}", suffix)
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Derive both table names from a deployment suffix
    pub fn table_suffix(mut self, suffix: &str) -> Self {
        self.config.passengers_table = passengers_table_name(suffix);
        self.config.flights_table = flights_table_name(suffix);
        self
    }

    /// Set the passengers table name
    pub fn passengers_table(mut self, name: impl Into<String>) -> Self {
        self.config.passengers_table = name.into();
        self
    }

    /// Set the flights table name
    pub fn flights_table(mut self, name: impl Into<String>) -> Self {
        self.config.flights_table = name.into();
        self
    }

    /// Set the passenger resolution strategy
    pub fn resolve_strategy(mut self, strategy: ResolveStrategy) -> Self {
        self.config.resolve_strategy = strategy;
        self
    }

    /// Set the max keys per multi-get request
    pub fn batch_get_limit(mut self, limit: usize) -> Self {
        self.config.batch_get_limit = limit;
        self
    }

    /// Set the number of concurrent multi-get requests
    pub fn fanout_workers(mut self, workers: usize) -> Self {
        self.config.fanout_workers = workers;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
