//! Store Module
//!
//! The boundary between the data layer and the schemaless key-value store.
//!
//! ## Responsibilities
//! - Describe records as generic attribute maps (`Item`)
//! - Expose point reads, multi-gets, scans, puts, deletes, and atomic
//!   set-membership updates through the `KvStore` trait
//! - Hand out one long-lived client per data layer (`StoreProvider`)
//!
//! ## Data Model
//! ```text
//! table ──► key value (text) ──► Item { attribute name ──► AttributeValue }
//! ```
//!
//! Tables are provisioned outside the data layer. A request against a table
//! that does not exist fails with `StoreError::TableNotFound`.

mod attribute;
mod memory;
mod provider;

pub use attribute::{AttributeValue, Item, Key};
pub use memory::{MemoryStore, RequestStats};
pub use provider::{SharedStore, StoreProvider};

use thiserror::Error;

/// Max keys accepted by a single `batch_get_items` call
pub const MAX_BATCH_GET_KEYS: usize = 100;

/// Result type alias for store requests
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors reported by a key-value store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("table not found: {0}")]
    TableNotFound(String),

    /// Item is missing its key attribute or the key is not text
    #[error("item is missing key attribute `{0}`")]
    MissingKey(String),

    /// A conditional update found its condition false
    #[error("conditional check failed: {0}")]
    ConditionalCheckFailed(String),

    /// Request is malformed for the store
    #[error("validation error: {0}")]
    Validation(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    /// Store could not serve the request
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Which way a set update moves an element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetAction {
    /// Union the element into the set, creating the set if absent
    Add,

    /// Remove the element; an emptied set is dropped from the item
    Delete,
}

/// Precondition evaluated atomically with a set update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateCondition {
    /// Apply unconditionally; a missing item is created from the key
    None,

    /// Fail with `ConditionalCheckFailed` unless the item already exists
    ItemExists,
}

/// A single-element atomic update on a string-set attribute
#[derive(Debug, Clone)]
pub struct SetUpdate {
    pub key: Key,
    pub attribute: String,
    pub action: SetAction,
    pub element: String,
    pub condition: UpdateCondition,
}

/// A schemaless key-value store
///
/// Implementations must apply `update_set` atomically: concurrent updates on
/// the same item never lose each other's elements.
pub trait KvStore: Send + Sync {
    /// Write a full item, replacing any item with the same key
    fn put_item(&self, table: &str, item: Item) -> StoreResult<()>;

    /// Read one item by key; `None` when absent
    fn get_item(&self, table: &str, key: &Key) -> StoreResult<Option<Item>>;

    /// Read up to `MAX_BATCH_GET_KEYS` items in one request.
    /// Absent keys are omitted and result order is unspecified.
    fn batch_get_items(&self, table: &str, keys: &[Key]) -> StoreResult<Vec<Item>>;

    /// Remove an item; removing an absent key succeeds
    fn delete_item(&self, table: &str, key: &Key) -> StoreResult<()>;

    /// Read every item in a table
    fn scan(&self, table: &str) -> StoreResult<Vec<Item>>;

    /// Atomically add or remove one element of a string set
    fn update_set(&self, table: &str, update: SetUpdate) -> StoreResult<()>;
}
