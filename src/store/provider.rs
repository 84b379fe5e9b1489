//! Store Client Provider
//!
//! Produces the store handle a data layer holds for its whole lifetime.

use std::sync::Arc;

use super::{KvStore, StoreResult};

/// Source of store client handles
///
/// A data layer calls `connect` once at construction and shares the handle
/// across every repository.
pub trait StoreProvider {
    type Store: KvStore;

    fn connect(&self) -> StoreResult<Arc<Self::Store>>;
}

/// Provider handing out clones of an already-open client
pub struct SharedStore<S> {
    store: Arc<S>,
}

impl<S: KvStore> SharedStore<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

impl<S: KvStore> StoreProvider for SharedStore<S> {
    type Store = S;

    fn connect(&self) -> StoreResult<Arc<S>> {
        Ok(Arc::clone(&self.store))
    }
}
