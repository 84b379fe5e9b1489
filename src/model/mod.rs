//! Model Module
//!
//! Domain entities and their stored shapes.
//!
//! ## Entities
//! - `Passenger`: keyed by a generated id, never mutated after creation
//! - `FlightRecord`: stored flight, owning the set of booked passenger ids
//! - `Flight`: materialized view with every passenger id resolved

pub mod flight;
pub mod passenger;

pub use flight::{Flight, FlightRecord};
pub use passenger::Passenger;
