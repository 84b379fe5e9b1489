//! Booking Manager and Flight Repository Tests
//!
//! These tests verify:
//! - Booking adds exactly one occurrence of a passenger id
//! - Cancelling removes only from the target flight
//! - Cancelling a non-booked pair is a no-op
//! - Booking against an unknown flight fails without creating a record
//! - Concurrent bookings on one flight are all kept
//! - Flight read path (scan, point get, failures)

#[path = "../common/mod.rs"]
mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread;

use flightdesk::model::FlightRecord;
use flightdesk::repository::{BookingManager, FlightRepository, PassengerRepository};
use flightdesk::store::{AttributeValue, Item, KvStore, MemoryStore, StoreError};
use flightdesk::{Config, DataError};

use common::{id_set, provisioned_store, seed_empty_flight, seed_flight, FaultyStore};

// =============================================================================
// Helper Functions
// =============================================================================

struct Fixture {
    config: Config,
    store: Arc<MemoryStore>,
    flights: FlightRepository<MemoryStore>,
    bookings: BookingManager<MemoryStore>,
    passengers: PassengerRepository<MemoryStore>,
}

fn setup() -> Fixture {
    let config = Config::default();
    let store = provisioned_store(&config);
    Fixture {
        flights: FlightRepository::new(Arc::clone(&store), &config.flights_table),
        bookings: BookingManager::new(Arc::clone(&store), &config.flights_table),
        passengers: PassengerRepository::new(Arc::clone(&store), &config.passengers_table),
        store,
        config,
    }
}

fn booked(fixture: &Fixture, number: &str) -> std::collections::BTreeSet<String> {
    fixture.flights.get_raw(number).unwrap().passenger_ids
}

// =============================================================================
// Book Tests
// =============================================================================

#[test]
fn test_book_adds_passenger() {
    let fx = setup();
    seed_empty_flight(&*fx.store, &fx.config, "BA100");

    assert!(fx.bookings.book("BA100", "p1").unwrap());

    assert_eq!(booked(&fx, "BA100"), id_set(["p1"]));
}

#[test]
fn test_book_twice_keeps_one_occurrence() {
    let fx = setup();
    seed_empty_flight(&*fx.store, &fx.config, "BA100");

    fx.bookings.book("BA100", "p1").unwrap();
    fx.bookings.book("BA100", "p1").unwrap();

    assert_eq!(booked(&fx, "BA100"), id_set(["p1"]));
}

#[test]
fn test_book_preserves_scalar_fields() {
    let fx = setup();
    seed_flight(
        &*fx.store,
        &fx.config,
        &FlightRecord::new("BA100", 220, "Lindbergh", "B787"),
    );

    fx.bookings.book("BA100", "p1").unwrap();

    let record = fx.flights.get_raw("BA100").unwrap();
    assert_eq!(record.capacity, 220);
    assert_eq!(record.captain, "Lindbergh");
    assert_eq!(record.plane, "B787");
}

#[test]
fn test_book_does_not_check_passenger_exists() {
    let fx = setup();
    seed_empty_flight(&*fx.store, &fx.config, "BA100");

    fx.bookings.book("BA100", "nobody").unwrap();

    assert_eq!(booked(&fx, "BA100"), id_set(["nobody"]));
    assert!(fx.passengers.get_all().unwrap().is_empty());
}

#[test]
fn test_book_unknown_flight_fails() {
    let fx = setup();

    let err = fx.bookings.book("XX999", "p1").unwrap_err();

    assert!(matches!(
        err,
        DataError::Write { source: StoreError::ConditionalCheckFailed(_), .. }
    ));
    assert!(fx.flights.scan_raw().unwrap().is_empty());
}

#[test]
fn test_book_empty_passenger_id_fails() {
    let fx = setup();
    seed_empty_flight(&*fx.store, &fx.config, "BA100");

    let err = fx.bookings.book("BA100", "").unwrap_err();
    assert!(matches!(err, DataError::Write { .. }));
    assert!(booked(&fx, "BA100").is_empty());
}

#[test]
fn test_book_store_failure() {
    let config = Config::default();
    let store = FaultyStore::provisioned(&config);
    seed_empty_flight(&*store, &config, "BA100");
    store.fail_updates.store(true, Ordering::SeqCst);
    let bookings = BookingManager::new(Arc::clone(&store), &config.flights_table);

    let err = bookings.book("BA100", "p1").unwrap_err();
    assert!(matches!(
        err,
        DataError::Write { source: StoreError::Unavailable(_), .. }
    ));
}

// =============================================================================
// Cancel Tests
// =============================================================================

#[test]
fn test_cancel_removes_passenger() {
    let fx = setup();
    seed_empty_flight(&*fx.store, &fx.config, "BA100");
    fx.bookings.book("BA100", "p1").unwrap();
    fx.bookings.book("BA100", "p2").unwrap();

    assert!(fx.bookings.cancel("BA100", "p1").unwrap());

    assert_eq!(booked(&fx, "BA100"), id_set(["p2"]));
}

#[test]
fn test_cancel_not_booked_is_noop() {
    let fx = setup();
    seed_empty_flight(&*fx.store, &fx.config, "BA100");
    fx.bookings.book("BA100", "p1").unwrap();

    assert!(fx.bookings.cancel("BA100", "p2").unwrap());
    assert!(fx.bookings.cancel("BA100", "p2").unwrap());

    assert_eq!(booked(&fx, "BA100"), id_set(["p1"]));
}

#[test]
fn test_cancel_on_empty_flight_is_noop() {
    let fx = setup();
    seed_empty_flight(&*fx.store, &fx.config, "BA100");

    assert!(fx.bookings.cancel("BA100", "p1").unwrap());
    assert!(booked(&fx, "BA100").is_empty());
}

#[test]
fn test_cancel_only_affects_target_flight() {
    let fx = setup();
    seed_empty_flight(&*fx.store, &fx.config, "BA100");
    seed_empty_flight(&*fx.store, &fx.config, "BA200");
    let ada = fx.passengers.create("Ada").unwrap();
    fx.bookings.book("BA100", &ada.id).unwrap();
    fx.bookings.book("BA200", &ada.id).unwrap();

    fx.bookings.cancel("BA100", &ada.id).unwrap();

    assert!(booked(&fx, "BA100").is_empty());
    assert_eq!(booked(&fx, "BA200"), id_set([ada.id.clone()]));
    assert_eq!(fx.passengers.get(&ada.id).unwrap(), ada);
}

#[test]
fn test_cancel_last_passenger_drops_set_attribute() {
    let fx = setup();
    seed_empty_flight(&*fx.store, &fx.config, "BA100");
    fx.bookings.book("BA100", "p1").unwrap();

    fx.bookings.cancel("BA100", "p1").unwrap();

    let item = fx
        .store
        .get_item(&fx.config.flights_table, &flightdesk::store::Key::new("number", "BA100"))
        .unwrap()
        .unwrap();
    assert!(!item.contains_key("passengers"));
}

#[test]
fn test_cancel_unknown_flight_fails() {
    let fx = setup();

    let err = fx.bookings.cancel("XX999", "p1").unwrap_err();

    assert!(matches!(
        err,
        DataError::Write { source: StoreError::ConditionalCheckFailed(_), .. }
    ));
    assert!(fx.flights.scan_raw().unwrap().is_empty());
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[test]
fn test_concurrent_bookings_are_all_kept() {
    let fx = Arc::new(setup());
    seed_empty_flight(&*fx.store, &fx.config, "BA100");

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let fx = Arc::clone(&fx);
            thread::spawn(move || {
                for i in 0..25 {
                    fx.bookings.book("BA100", &format!("p-{}-{}", t, i)).unwrap();
                    // Every thread also books a shared id; it must appear once
                    fx.bookings.book("BA100", "shared").unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let ids = booked(&fx, "BA100");
    assert_eq!(ids.len(), 8 * 25 + 1);
    assert!(ids.contains("shared"));
}

// =============================================================================
// Flight Read Path Tests
// =============================================================================

#[test]
fn test_scan_raw_returns_every_flight() {
    let fx = setup();
    seed_empty_flight(&*fx.store, &fx.config, "BA100");
    seed_empty_flight(&*fx.store, &fx.config, "BA200");
    fx.bookings.book("BA200", "p1").unwrap();

    let flights = fx.flights.scan_raw().unwrap();

    assert_eq!(flights.len(), 2);
    let ba200 = flights.iter().find(|f| f.number == "BA200").unwrap();
    assert_eq!(ba200.passenger_ids, id_set(["p1"]));
}

#[test]
fn test_get_raw_unknown_flight() {
    let fx = setup();

    let err = fx.flights.get_raw("XX999").unwrap_err();
    assert!(matches!(err, DataError::NotFound { entity: "flight", .. }));
}

#[test]
fn test_scan_raw_malformed_flight() {
    let fx = setup();
    seed_empty_flight(&*fx.store, &fx.config, "BA100");

    let mut item = Item::new();
    item.insert("number".to_string(), AttributeValue::S("BA300".to_string()));
    item.insert("capacity".to_string(), AttributeValue::S("many".to_string()));
    fx.store.put_item(&fx.config.flights_table, item).unwrap();

    let err = fx.flights.scan_raw().unwrap_err();
    assert!(matches!(err, DataError::Decode { entity: "flight", .. }));
}

#[test]
fn test_scan_raw_store_failure() {
    let config = Config::default();
    let store = FaultyStore::provisioned(&config);
    store.fail_scans.store(true, Ordering::SeqCst);
    let flights = FlightRepository::new(Arc::clone(&store), &config.flights_table);

    assert!(matches!(flights.scan_raw(), Err(DataError::Read { .. })));
}
