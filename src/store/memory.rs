//! In-memory store
//!
//! A `KvStore` held entirely in process memory. Items are kept as bincode
//! blobs, the way a byte-oriented engine stores values, and decoded on read.
//!
//! ## Concurrency
//! - `tables`: Protected by RwLock (many concurrent readers, exclusive writer)
//! - Set updates run under the write lock, so they are atomic per item
//! - Request counters are atomics (lock-free)

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tracing::trace;

use super::{
    AttributeValue, Item, Key, KvStore, SetAction, SetUpdate, StoreError, StoreResult,
    UpdateCondition, MAX_BATCH_GET_KEYS,
};

/// One provisioned table
struct Table {
    /// Name of the text attribute every item is keyed by
    key_attribute: String,

    /// key value → bincode-encoded `Item`, ordered by key
    items: BTreeMap<String, Vec<u8>>,
}

impl Table {
    fn check_key(&self, key: &Key) -> StoreResult<()> {
        if key.attribute != self.key_attribute {
            return Err(StoreError::Validation(format!(
                "key attribute `{}` does not match table key `{}`",
                key.attribute, self.key_attribute
            )));
        }
        Ok(())
    }

    fn load(&self, key: &str) -> StoreResult<Option<Item>> {
        match self.items.get(key) {
            Some(blob) => Ok(Some(bincode::deserialize(blob)?)),
            None => Ok(None),
        }
    }
}

/// Snapshot of how many requests a store has served
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestStats {
    pub puts: u64,
    pub gets: u64,
    pub batch_gets: u64,
    pub deletes: u64,
    pub scans: u64,
    pub set_updates: u64,
}

#[derive(Default)]
struct Counters {
    puts: AtomicU64,
    gets: AtomicU64,
    batch_gets: AtomicU64,
    deletes: AtomicU64,
    scans: AtomicU64,
    set_updates: AtomicU64,
}

/// In-process key-value store
#[derive(Default)]
pub struct MemoryStore {
    /// table name → table
    tables: RwLock<HashMap<String, Table>>,

    /// Per-operation request counters
    counters: Counters,
}

impl MemoryStore {
    /// Create a store with no tables
    pub fn new() -> Self {
        Self::default()
    }

    /// Provision a table keyed by `key_attribute`
    ///
    /// Provisioning an existing table leaves it and its items untouched.
    pub fn create_table(&self, name: &str, key_attribute: &str) {
        let mut tables = self.tables.write();
        tables.entry(name.to_string()).or_insert_with(|| Table {
            key_attribute: key_attribute.to_string(),
            items: BTreeMap::new(),
        });
    }

    /// Number of items in a table
    pub fn item_count(&self, table: &str) -> StoreResult<usize> {
        let tables = self.tables.read();
        let table = Self::table(&tables, table)?;
        Ok(table.items.len())
    }

    /// Requests served so far
    pub fn stats(&self) -> RequestStats {
        RequestStats {
            puts: self.counters.puts.load(Ordering::Relaxed),
            gets: self.counters.gets.load(Ordering::Relaxed),
            batch_gets: self.counters.batch_gets.load(Ordering::Relaxed),
            deletes: self.counters.deletes.load(Ordering::Relaxed),
            scans: self.counters.scans.load(Ordering::Relaxed),
            set_updates: self.counters.set_updates.load(Ordering::Relaxed),
        }
    }

    fn table<'a>(tables: &'a HashMap<String, Table>, name: &str) -> StoreResult<&'a Table> {
        tables
            .get(name)
            .ok_or_else(|| StoreError::TableNotFound(name.to_string()))
    }

    fn table_mut<'a>(
        tables: &'a mut HashMap<String, Table>,
        name: &str,
    ) -> StoreResult<&'a mut Table> {
        tables
            .get_mut(name)
            .ok_or_else(|| StoreError::TableNotFound(name.to_string()))
    }
}

/// Stores cannot hold empty sets or empty set elements
fn check_sets(item: &Item) -> StoreResult<()> {
    for (name, value) in item {
        if let AttributeValue::Ss(set) = value {
            if set.is_empty() {
                return Err(StoreError::Validation(format!(
                    "string set `{}` must not be empty",
                    name
                )));
            }
            if set.iter().any(|element| element.is_empty()) {
                return Err(StoreError::Validation(format!(
                    "string set `{}` contains an empty element",
                    name
                )));
            }
        }
    }
    Ok(())
}

impl KvStore for MemoryStore {
    fn put_item(&self, table: &str, item: Item) -> StoreResult<()> {
        self.counters.puts.fetch_add(1, Ordering::Relaxed);

        let mut tables = self.tables.write();
        let table_ref = Self::table_mut(&mut tables, table)?;

        let key = Key::from_item(&item, &table_ref.key_attribute)
            .filter(|key| !key.value.is_empty())
            .ok_or_else(|| StoreError::MissingKey(table_ref.key_attribute.clone()))?;
        check_sets(&item)?;

        let blob = bincode::serialize(&item)?;
        trace!(table, key = %key.value, bytes = blob.len(), "put item");
        table_ref.items.insert(key.value, blob);
        Ok(())
    }

    fn get_item(&self, table: &str, key: &Key) -> StoreResult<Option<Item>> {
        self.counters.gets.fetch_add(1, Ordering::Relaxed);

        let tables = self.tables.read();
        let table_ref = Self::table(&tables, table)?;
        table_ref.check_key(key)?;

        trace!(table, key = %key.value, "get item");
        table_ref.load(&key.value)
    }

    fn batch_get_items(&self, table: &str, keys: &[Key]) -> StoreResult<Vec<Item>> {
        self.counters.batch_gets.fetch_add(1, Ordering::Relaxed);

        if keys.is_empty() || keys.len() > MAX_BATCH_GET_KEYS {
            return Err(StoreError::Validation(format!(
                "batch get takes 1..={} keys, got {}",
                MAX_BATCH_GET_KEYS,
                keys.len()
            )));
        }

        let tables = self.tables.read();
        let table_ref = Self::table(&tables, table)?;

        let mut seen = HashSet::with_capacity(keys.len());
        let mut items = Vec::with_capacity(keys.len());
        for key in keys {
            table_ref.check_key(key)?;
            if !seen.insert(key.value.as_str()) {
                return Err(StoreError::Validation(format!(
                    "duplicate key `{}` in batch get",
                    key.value
                )));
            }
            if let Some(item) = table_ref.load(&key.value)? {
                items.push(item);
            }
        }

        trace!(table, requested = keys.len(), found = items.len(), "batch get");
        Ok(items)
    }

    fn delete_item(&self, table: &str, key: &Key) -> StoreResult<()> {
        self.counters.deletes.fetch_add(1, Ordering::Relaxed);

        let mut tables = self.tables.write();
        let table_ref = Self::table_mut(&mut tables, table)?;
        table_ref.check_key(key)?;

        let existed = table_ref.items.remove(&key.value).is_some();
        trace!(table, key = %key.value, existed, "delete item");
        Ok(())
    }

    fn scan(&self, table: &str) -> StoreResult<Vec<Item>> {
        self.counters.scans.fetch_add(1, Ordering::Relaxed);

        let tables = self.tables.read();
        let table_ref = Self::table(&tables, table)?;

        let items = table_ref
            .items
            .values()
            .map(|blob| bincode::deserialize(blob).map_err(StoreError::from))
            .collect::<StoreResult<Vec<Item>>>()?;

        trace!(table, count = items.len(), "scan");
        Ok(items)
    }

    fn update_set(&self, table: &str, update: SetUpdate) -> StoreResult<()> {
        self.counters.set_updates.fetch_add(1, Ordering::Relaxed);

        if update.element.is_empty() {
            return Err(StoreError::Validation(
                "set element must not be empty".to_string(),
            ));
        }
        if update.attribute == update.key.attribute {
            return Err(StoreError::Validation(format!(
                "cannot update key attribute `{}`",
                update.attribute
            )));
        }

        // Held across read-modify-write: this is what makes the update atomic
        let mut tables = self.tables.write();
        let table_ref = Self::table_mut(&mut tables, table)?;
        table_ref.check_key(&update.key)?;

        let mut item = match table_ref.load(&update.key.value)? {
            Some(item) => item,
            None => match update.condition {
                UpdateCondition::ItemExists => {
                    return Err(StoreError::ConditionalCheckFailed(format!(
                        "no item with {} = `{}`",
                        update.key.attribute, update.key.value
                    )));
                }
                UpdateCondition::None => {
                    let mut item = Item::new();
                    item.insert(
                        update.key.attribute.clone(),
                        AttributeValue::S(update.key.value.clone()),
                    );
                    item
                }
            },
        };

        match (update.action, item.remove(&update.attribute)) {
            (SetAction::Add, None) => {
                let set = std::iter::once(update.element.clone()).collect();
                item.insert(update.attribute.clone(), AttributeValue::Ss(set));
            }
            (SetAction::Add, Some(AttributeValue::Ss(mut set))) => {
                set.insert(update.element.clone());
                item.insert(update.attribute.clone(), AttributeValue::Ss(set));
            }
            (SetAction::Delete, None) => {}
            (SetAction::Delete, Some(AttributeValue::Ss(mut set))) => {
                set.remove(&update.element);
                if !set.is_empty() {
                    item.insert(update.attribute.clone(), AttributeValue::Ss(set));
                }
            }
            (_, Some(other)) => {
                return Err(StoreError::Validation(format!(
                    "attribute `{}` is {} not SS",
                    update.attribute,
                    other.type_name()
                )));
            }
        }

        let blob = bincode::serialize(&item)?;
        trace!(
            table,
            key = %update.key.value,
            attribute = %update.attribute,
            action = ?update.action,
            "set update"
        );
        table_ref.items.insert(update.key.value, blob);
        Ok(())
    }
}
