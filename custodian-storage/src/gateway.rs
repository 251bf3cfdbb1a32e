//! Cache-aside customer gateway.
//!
//! Orchestrates validation, the record store, and the cache for every
//! customer read and write. The store is the source of truth; the cache
//! is best-effort and may be evicted underneath us at any time. Between
//! a store commit and the matching cache write there is a narrow window
//! in which another reader can observe the previous cache entry; the
//! two agree again before the write call returns.

use crate::cache::CacheStore;
use crate::CustomerStore;
use custodian_core::{Customer, CustomerId, CustodianResult, OperationHint, ValidationEngine};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Caller-facing gateway contract.
///
/// Reads signal absence as `Ok(None)`; turning that into a 404-style
/// fault is the transport layer's job. Writes raise the aggregated
/// validation failure before any mutation, or a store error after the
/// store call.
pub trait CustomerGateway: Send + Sync {
    /// Validate and persist a new customer; the returned record carries
    /// the store-assigned identity.
    fn create(&self, customer: Customer) -> CustodianResult<Customer>;

    /// Validate and overwrite the customer stored under `id`.
    fn update(&self, id: CustomerId, customer: Customer) -> CustodianResult<()>;

    /// Delete the customer stored under `id`; deleting twice succeeds
    /// both times.
    fn delete(&self, id: CustomerId) -> CustodianResult<()>;

    /// Fetch a customer, served from cache when possible.
    fn get(&self, id: CustomerId) -> CustodianResult<Option<Customer>>;

    /// All customers, straight from the store.
    fn list(&self) -> CustodianResult<Vec<Customer>>;
}

/// Cache-aside gateway over a record store and a cache.
///
/// Mutations run validation first, then write through the store, then
/// overwrite or evict the cache entry. Reads consult the cache first and
/// fall back to the store on a miss, populating the cache on the way
/// out. Cache faults are logged and absorbed: a store-confirmed
/// operation never fails because the cache layer did.
pub struct CachedGateway<S, C> {
    store: Arc<S>,
    cache: Arc<C>,
    engine: ValidationEngine,
}

impl<S, C> CachedGateway<S, C>
where
    S: CustomerStore,
    C: CacheStore<CustomerId, Customer>,
{
    /// Gateway over the given collaborators. Validators were registered
    /// on the engine by the caller, in order.
    pub fn new(store: Arc<S>, cache: Arc<C>, engine: ValidationEngine) -> Self {
        CachedGateway {
            store,
            cache,
            engine,
        }
    }

    /// The record store behind this gateway.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The cache in front of the store.
    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Overwrite the cache entry for `id`; best-effort.
    fn cache_put(&self, id: CustomerId, customer: &Customer) {
        match self.cache.put(id, customer.clone()) {
            Ok(()) => debug!(%id, "cached customer"),
            Err(error) => warn!(%id, %error, "cache put failed, store result stands"),
        }
    }
}

impl<S, C> CustomerGateway for CachedGateway<S, C>
where
    S: CustomerStore,
    C: CacheStore<CustomerId, Customer>,
{
    fn create(&self, customer: Customer) -> CustodianResult<Customer> {
        self.engine
            .validate(Some(&customer), OperationHint::Create)?;

        let created = self.store.create(&customer)?;
        self.cache_put(created.id, &created);
        info!(id = %created.id, "created customer");
        Ok(created)
    }

    fn update(&self, id: CustomerId, customer: Customer) -> CustodianResult<()> {
        // The path id is authoritative; uniqueness checks need it on the
        // candidate to exclude self-collisions.
        let candidate = customer.with_id(id);
        self.engine
            .validate(Some(&candidate), OperationHint::Update)?;

        self.store.update(id, &candidate)?;
        // Overwrite even when the entry was never cached: a previous
        // miss must not leave a post-update read cold.
        self.cache_put(id, &candidate);
        info!(%id, "updated customer");
        Ok(())
    }

    fn delete(&self, id: CustomerId) -> CustodianResult<()> {
        let outcome = self.store.delete(id);

        // Evict no matter what the store said; a stale entry must not
        // outlive the delete attempt.
        match self.cache.remove(&id) {
            Ok(()) => debug!(%id, "evicted customer from cache"),
            Err(error) => warn!(%id, %error, "cache eviction failed after delete"),
        }

        outcome?;
        info!(%id, "deleted customer");
        Ok(())
    }

    fn get(&self, id: CustomerId) -> CustodianResult<Option<Customer>> {
        match self.cache.get(&id) {
            Ok(Some(customer)) => {
                debug!(%id, "cache hit");
                return Ok(Some(customer));
            }
            Ok(None) => debug!(%id, "cache miss"),
            Err(error) => warn!(%id, %error, "cache get failed, falling back to store"),
        }

        match self.store.get(id)? {
            Some(customer) => {
                self.cache_put(id, &customer);
                Ok(Some(customer))
            }
            // Absence is never cached; a later create must not be masked.
            None => Ok(None),
        }
    }

    fn list(&self) -> CustodianResult<Vec<Customer>> {
        let customers = self.store.list()?;

        for customer in &customers {
            match self.cache.put_if_absent(customer.id, customer.clone()) {
                Ok(true) => debug!(id = %customer.id, "cached customer from list"),
                Ok(false) => {}
                Err(error) => {
                    warn!(id = %customer.id, %error, "cache population failed during list");
                }
            }
        }
        Ok(customers)
    }
}

// ============================================================================
// TESTS
// ============================================================================
