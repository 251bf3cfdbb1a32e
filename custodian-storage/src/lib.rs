//! Custodian Storage - record store port, cache, and the cached gateway
//!
//! Defines the persistence abstraction for customer records, an
//! in-memory store, the generic cache port with a moka-backed adapter,
//! and the cache-aside gateway that fronts both.

pub mod cache;
pub mod gateway;
pub mod validators;

pub use cache::{CacheResult, CacheSettings, CacheStats, CacheStore, MemoryCache};
pub use gateway::{CachedGateway, CustomerGateway};
pub use validators::UniqueEmailValidator;

use custodian_core::{Customer, CustomerId, RecordKind, StoreError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Result type alias for record store operations.
pub type StoreResult<T> = Result<T, StoreError>;

// ============================================================================
// RECORD STORE PORT
// ============================================================================

/// Record store port for customer records.
///
/// Implementations own transactional discipline for a single write; none
/// may return a partially constructed record. Reads signal absence as
/// `Ok(None)`, writes against an id that was never persisted fail with
/// [`StoreError::NotFound`], and deletes are idempotent.
pub trait CustomerStore: Send + Sync {
    /// Persist a new customer. The store assigns the identity; the
    /// returned record carries it.
    fn create(&self, customer: &Customer) -> StoreResult<Customer>;

    /// Overwrite the customer stored under `id`.
    fn update(&self, id: CustomerId, customer: &Customer) -> StoreResult<()>;

    /// Delete the customer stored under `id`. Deleting an absent record
    /// is not an error.
    fn delete(&self, id: CustomerId) -> StoreResult<()>;

    /// Fetch a customer by id.
    fn get(&self, id: CustomerId) -> StoreResult<Option<Customer>>;

    /// All customers, ascending by id.
    fn list(&self) -> StoreResult<Vec<Customer>>;
}

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

/// In-memory customer store.
///
/// The default adapter and the test double: a hash map behind a rw-lock
/// with a monotonically increasing identity sequence. Every mutation is
/// atomic per call.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: RwLock<HashMap<CustomerId, Customer>>,
    sequence: AtomicU64,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored customers.
    pub fn count(&self) -> usize {
        self.records.read().map(|records| records.len()).unwrap_or(0)
    }

    /// Drop all stored customers. The identity sequence keeps advancing
    /// so deleted ids are never reused.
    pub fn clear(&self) {
        if let Ok(mut records) = self.records.write() {
            records.clear();
        }
    }

    fn read_records(&self) -> StoreResult<RwLockReadGuard<'_, HashMap<CustomerId, Customer>>> {
        self.records.read().map_err(|_| StoreError::LockPoisoned)
    }

    fn write_records(&self) -> StoreResult<RwLockWriteGuard<'_, HashMap<CustomerId, Customer>>> {
        self.records.write().map_err(|_| StoreError::LockPoisoned)
    }

    fn next_id(&self) -> CustomerId {
        CustomerId::new(self.sequence.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

impl CustomerStore for InMemoryStore {
    fn create(&self, customer: &Customer) -> StoreResult<Customer> {
        let id = self.next_id();
        let stored = customer.clone().with_id(id);

        let mut records = self.write_records()?;
        if records.insert(id, stored.clone()).is_some() {
            // The sequence never hands out an id twice; hitting this
            // means the map was corrupted externally.
            return Err(StoreError::InsertFailed {
                kind: RecordKind::Customer,
                reason: format!("id {} already present", id),
            });
        }
        tracing::info!(%id, "created customer");
        Ok(stored)
    }

    fn update(&self, id: CustomerId, customer: &Customer) -> StoreResult<()> {
        let mut records = self.write_records()?;
        if !records.contains_key(&id) {
            return Err(StoreError::NotFound {
                kind: RecordKind::Customer,
                id,
            });
        }
        records.insert(id, customer.clone().with_id(id));
        tracing::info!(%id, "updated customer");
        Ok(())
    }

    fn delete(&self, id: CustomerId) -> StoreResult<()> {
        let mut records = self.write_records()?;
        if records.remove(&id).is_some() {
            tracing::info!(%id, "deleted customer");
        } else {
            tracing::debug!(%id, "delete of absent customer");
        }
        Ok(())
    }

    fn get(&self, id: CustomerId) -> StoreResult<Option<Customer>> {
        let records = self.read_records()?;
        Ok(records.get(&id).cloned())
    }

    fn list(&self) -> StoreResult<Vec<Customer>> {
        let records = self.read_records()?;
        let mut customers: Vec<Customer> = records.values().cloned().collect();
        customers.sort_by_key(|customer| customer.id);
        Ok(customers)
    }
}

// ============================================================================
// TESTS
// ============================================================================


// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================
