//! Data Layer Module
//!
//! The entry point that wires the store client, repositories, and
//! materializer together.
//!
//! ## Responsibilities
//! - Validate the config and connect to the store exactly once
//! - Share that one client with every repository for the layer's lifetime
//! - Expose the seven caller-facing operations
//!
//! Creating a passenger and booking them are two separate calls. No
//! transaction spans them, so a passenger can exist before it is visible on
//! any flight.

use std::sync::Arc;

use tracing::debug;

use crate::config::Config;
use crate::error::{DataError, Result};
use crate::materializer::FlightMaterializer;
use crate::model::{Flight, Passenger};
use crate::repository::{BookingManager, FlightRepository, PassengerRepository};
use crate::store::{KvStore, StoreProvider};

/// Passenger and flight data access over one shared store client
pub struct DataLayer<S> {
    /// Layer configuration
    config: Config,

    /// The long-lived store client shared by every component
    store: Arc<S>,

    passengers: PassengerRepository<S>,
    flights: FlightRepository<S>,
    bookings: BookingManager<S>,
}

impl<S: KvStore> DataLayer<S> {
    /// Build a data layer around an open store client
    pub fn open(config: Config, store: Arc<S>) -> Result<Self> {
        config.validate()?;
        Self::assemble(config, store)
    }

    /// Connect through a provider, then build the data layer
    ///
    /// The config is checked before the provider is asked for a client.
    pub fn connect<P>(config: Config, provider: &P) -> Result<Self>
    where
        P: StoreProvider<Store = S>,
    {
        config.validate()?;
        let store = provider.connect().map_err(DataError::Connect)?;
        Self::assemble(config, store)
    }

    /// Wire the components; `config` must already be validated
    fn assemble(config: Config, store: Arc<S>) -> Result<Self> {
        let passengers = PassengerRepository::new(Arc::clone(&store), &config.passengers_table)
            .with_batch_options(config.batch_options())?;
        let flights = FlightRepository::new(Arc::clone(&store), &config.flights_table);
        let bookings = BookingManager::new(Arc::clone(&store), &config.flights_table);

        debug!(
            passengers_table = %config.passengers_table,
            flights_table = %config.flights_table,
            strategy = ?config.resolve_strategy,
            "data layer opened"
        );

        Ok(Self {
            config,
            store,
            passengers,
            flights,
            bookings,
        })
    }

    // =========================================================================
    // Passengers
    // =========================================================================

    pub fn create_passenger(&self, name: &str) -> Result<Passenger> {
        self.passengers.create(name)
    }

    /// Succeeds even when no passenger has this id
    pub fn delete_passenger(&self, id: &str) -> Result<bool> {
        self.passengers.delete(id)
    }

    pub fn get_passenger(&self, id: &str) -> Result<Passenger> {
        self.passengers.get(id)
    }

    pub fn get_all_passengers(&self) -> Result<Vec<Passenger>> {
        self.passengers.get_all()
    }

    // =========================================================================
    // Bookings
    // =========================================================================

    pub fn book_flight(&self, flight_number: &str, passenger_id: &str) -> Result<bool> {
        self.bookings.book(flight_number, passenger_id)
    }

    pub fn cancel_booking(&self, flight_number: &str, passenger_id: &str) -> Result<bool> {
        self.bookings.cancel(flight_number, passenger_id)
    }

    // =========================================================================
    // Flights
    // =========================================================================

    /// Every flight with passengers resolved, using the configured strategy
    pub fn get_all_flights(&self) -> Result<Vec<Flight>> {
        FlightMaterializer::new(&self.flights, &self.passengers, self.config.resolve_strategy)
            .get_all_flights()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn passengers(&self) -> &PassengerRepository<S> {
        &self.passengers
    }

    pub fn flights(&self) -> &FlightRepository<S> {
        &self.flights
    }

    pub fn bookings(&self) -> &BookingManager<S> {
        &self.bookings
    }
}
