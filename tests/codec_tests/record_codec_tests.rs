//! Record Codec Tests
//!
//! Tests for converting passengers and flights to and from store items.

use std::collections::BTreeSet;

use flightdesk::codec::{decode, encode, CodecError, Record};
use flightdesk::model::{FlightRecord, Passenger};
use flightdesk::store::{AttributeValue, Item};
use flightdesk::DataError;

// =============================================================================
// Helper Functions
// =============================================================================

fn ids(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn flight_item() -> Item {
    let mut item = Item::new();
    item.insert("number".to_string(), AttributeValue::S("BA100".to_string()));
    item.insert("capacity".to_string(), AttributeValue::N("180".to_string()));
    item.insert("captain".to_string(), AttributeValue::S("Earhart".to_string()));
    item.insert("plane".to_string(), AttributeValue::S("A320".to_string()));
    item
}

// =============================================================================
// Passenger Tests
// =============================================================================

#[test]
fn test_passenger_item_shape() {
    let passenger = Passenger {
        id: "p1".to_string(),
        name: "Ada".to_string(),
    };

    let item = passenger.to_item().unwrap();

    assert_eq!(item.len(), 2);
    assert_eq!(item.get("id"), Some(&AttributeValue::S("p1".to_string())));
    assert_eq!(item.get("name"), Some(&AttributeValue::S("Ada".to_string())));
    assert_eq!(Passenger::from_item(&item).unwrap(), passenger);
}

#[test]
fn test_passenger_new_generates_distinct_ids() {
    let a = Passenger::new("Ada");
    let b = Passenger::new("Ada");

    assert_ne!(a.id, b.id);
    assert_eq!(a.id.len(), 36);
}

#[test]
fn test_passenger_missing_name() {
    let mut item = Item::new();
    item.insert("id".to_string(), AttributeValue::S("p1".to_string()));

    let err = Passenger::from_item(&item).unwrap_err();
    assert_eq!(err, CodecError::MissingAttribute("name".to_string()));
}

#[test]
fn test_passenger_name_wrong_type() {
    let mut item = Item::new();
    item.insert("id".to_string(), AttributeValue::S("p1".to_string()));
    item.insert("name".to_string(), AttributeValue::N("7".to_string()));

    let err = Passenger::from_item(&item).unwrap_err();
    assert!(matches!(
        err,
        CodecError::TypeMismatch { expected: "S", found: "N", .. }
    ));
}

#[test]
fn test_passenger_empty_id_cannot_encode() {
    let passenger = Passenger {
        id: String::new(),
        name: "Ada".to_string(),
    };

    let err = encode(&passenger).unwrap_err();
    assert!(matches!(err, DataError::Encode { entity: "passenger", .. }));
}

#[test]
fn test_decode_wraps_entity_name() {
    let err = decode::<Passenger>(&Item::new()).unwrap_err();
    assert!(matches!(err, DataError::Decode { entity: "passenger", .. }));
}

// =============================================================================
// Flight Tests
// =============================================================================

#[test]
fn test_flight_without_passengers_omits_set() {
    let record = FlightRecord::new("BA100", 180, "Earhart", "A320");

    let item = record.to_item().unwrap();

    assert_eq!(item, flight_item());
    assert!(!item.contains_key("passengers"));
}

#[test]
fn test_flight_with_passengers() {
    let mut record = FlightRecord::new("BA100", 180, "Earhart", "A320");
    record.passenger_ids = ids(&["p1", "p2"]);

    let item = record.to_item().unwrap();

    assert_eq!(item.get("passengers"), Some(&AttributeValue::Ss(ids(&["p1", "p2"]))));
    assert_eq!(FlightRecord::from_item(&item).unwrap(), record);
}

#[test]
fn test_flight_absent_set_decodes_empty() {
    let record = FlightRecord::from_item(&flight_item()).unwrap();

    assert_eq!(record.number, "BA100");
    assert_eq!(record.capacity, 180);
    assert_eq!(record.captain, "Earhart");
    assert_eq!(record.plane, "A320");
    assert!(record.passenger_ids.is_empty());
}

#[test]
fn test_flight_null_set_decodes_empty() {
    let mut item = flight_item();
    item.insert("passengers".to_string(), AttributeValue::Null);

    let record = FlightRecord::from_item(&item).unwrap();
    assert!(record.passenger_ids.is_empty());
}

#[test]
fn test_flight_passengers_wrong_type() {
    let mut item = flight_item();
    item.insert("passengers".to_string(), AttributeValue::S("p1".to_string()));

    let err = FlightRecord::from_item(&item).unwrap_err();
    assert!(matches!(
        err,
        CodecError::TypeMismatch { expected: "SS", found: "S", .. }
    ));
}

#[test]
fn test_flight_capacity_not_a_number() {
    let mut item = flight_item();
    item.insert("capacity".to_string(), AttributeValue::N("lots".to_string()));

    let err = FlightRecord::from_item(&item).unwrap_err();
    assert_eq!(
        err,
        CodecError::InvalidNumber {
            attribute: "capacity".to_string(),
            value: "lots".to_string(),
        }
    );
}

#[test]
fn test_flight_capacity_full_integer_range() {
    let beyond_u32 = i64::from(u32::MAX) + 1;

    for capacity in [-1, 0, beyond_u32] {
        let mut item = flight_item();
        item.insert("capacity".to_string(), AttributeValue::N(capacity.to_string()));

        let record = FlightRecord::from_item(&item).unwrap();
        assert_eq!(record.capacity, capacity);
        assert_eq!(record.to_item().unwrap(), item);
    }
}

#[test]
fn test_flight_missing_number() {
    let mut item = flight_item();
    item.remove("number");

    let err = FlightRecord::from_item(&item).unwrap_err();
    assert_eq!(err, CodecError::MissingAttribute("number".to_string()));
}

#[test]
fn test_flight_key() {
    let record = FlightRecord::new("BA100", 180, "Earhart", "A320");
    let key = record.key();

    assert_eq!(key.attribute, "number");
    assert_eq!(key.value, "BA100");
}
