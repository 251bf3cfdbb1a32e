//! In-memory cache adapter backed by moka.

use super::traits::{CacheResult, CacheStats, CacheStore};
use custodian_core::ConfigError;
use moka::sync::Cache;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Settings for a named in-memory cache.
#[derive(Debug, Clone)]
pub struct CacheSettings {
    /// Name used in log output.
    pub name: String,
    /// Maximum number of entries before capacity eviction kicks in.
    pub max_entries: u64,
    /// Time to live for entries; `None` keeps entries until capacity
    /// eviction claims them.
    pub time_to_live: Option<Duration>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        CacheSettings {
            name: "records".to_string(),
            max_entries: 10_000,
            time_to_live: None,
        }
    }
}

impl CacheSettings {
    /// Settings for a cache with the given name and default limits.
    pub fn new(name: impl Into<String>) -> Self {
        CacheSettings {
            name: name.into(),
            ..CacheSettings::default()
        }
    }

    /// Set the maximum entry count.
    pub fn with_max_entries(mut self, max_entries: u64) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Set the entry TTL.
    pub fn with_time_to_live(mut self, ttl: Duration) -> Self {
        self.time_to_live = Some(ttl);
        self
    }

    /// Reject settings that cannot produce a usable cache.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "name".to_string(),
                value: self.name.clone(),
                reason: "must not be blank".to_string(),
            });
        }
        if self.max_entries == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_entries".to_string(),
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if let Some(ttl) = self.time_to_live {
            if ttl.is_zero() {
                return Err(ConfigError::InvalidValue {
                    field: "time_to_live".to_string(),
                    value: "0s".to_string(),
                    reason: "must be positive".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Thread-safe in-memory cache with capacity and TTL eviction.
///
/// Eviction is the backend's business; callers observe evicted entries
/// simply as misses.
pub struct MemoryCache<K, V> {
    name: String,
    inner: Cache<K, V>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<K, V> MemoryCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Build a cache from validated settings.
    pub fn new(settings: CacheSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(Self::build(settings))
    }

    /// Cache with default settings.
    pub fn with_defaults() -> Self {
        Self::build(CacheSettings::default())
    }

    fn build(settings: CacheSettings) -> Self {
        let mut builder = Cache::builder().max_capacity(settings.max_entries);
        if let Some(ttl) = settings.time_to_live {
            builder = builder.time_to_live(ttl);
        }

        tracing::info!(
            name = %settings.name,
            max_entries = settings.max_entries,
            ttl = ?settings.time_to_live,
            "creating in-memory cache"
        );
        MemoryCache {
            name: settings.name,
            inner: builder.build(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Name this cache was created with.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Flush pending eviction and bookkeeping work so entry counts are
    /// exact. Useful in tests; never required for correctness.
    pub fn run_pending_tasks(&self) {
        self.inner.run_pending_tasks();
    }
}

impl<K, V> CacheStore<K, V> for MemoryCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn put(&self, key: K, value: V) -> CacheResult<()> {
        self.inner.insert(key, value);
        Ok(())
    }

    fn put_if_absent(&self, key: K, value: V) -> CacheResult<bool> {
        let entry = self.inner.entry(key).or_insert(value);
        Ok(entry.is_fresh())
    }

    fn get(&self, key: &K) -> CacheResult<Option<V>> {
        let value = self.inner.get(key);
        if value.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        Ok(value)
    }

    fn contains_key(&self, key: &K) -> CacheResult<bool> {
        Ok(self.inner.contains_key(key))
    }

    fn remove(&self, key: &K) -> CacheResult<()> {
        self.inner.invalidate(key);
        Ok(())
    }

    fn clear(&self) -> CacheResult<()> {
        self.inner.invalidate_all();
        Ok(())
    }

    fn stats(&self) -> CacheResult<CacheStats> {
        self.inner.run_pending_tasks();
        Ok(CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entry_count: self.inner.entry_count(),
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
