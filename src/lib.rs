//! # flightdesk
//!
//! A passenger and flight data layer over a schemaless key-value store:
//! - Passenger records with generated ids
//! - Bookings as atomic set-membership updates on the flight record
//! - Flight views materialized by resolving booked passenger ids
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        DataLayer                             │
//! │              (one shared store client, Config)               │
//! └──────┬──────────────────┬──────────────────────┬────────────┘
//!        │                  │                      │
//!        ▼                  ▼                      ▼
//! ┌─────────────┐   ┌───────────────┐   ┌──────────────────────┐
//! │  Passenger  │   │    Booking    │   │  FlightMaterializer  │
//! │ Repository  │   │    Manager    │   │  (scatter-gather)    │
//! └──────┬──────┘   │ (set ADD/DEL) │   └───┬──────────────┬───┘
//!        ▲          └───────┬───────┘       │              │
//!        │                  │               ▼              │
//!        │                  │       ┌────────────────┐     │
//!        │                  │       │FlightRepository│     │
//!        │                  │       └───────┬────────┘     │
//!        └──────────────────┼───────────────┼──────────────┘
//!                           ▼               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │              Record Codec  ─►  KvStore (Item maps)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod store;
pub mod codec;
pub mod model;
pub mod repository;
pub mod materializer;
pub mod datalayer;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{DataError, Result};
pub use config::{Config, ResolveStrategy};
pub use datalayer::DataLayer;
pub use model::{Flight, FlightRecord, Passenger};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of flightdesk
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
