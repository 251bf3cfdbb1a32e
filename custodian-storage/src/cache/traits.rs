//! Cache port and usage statistics.

use custodian_core::CacheError;

/// Result type alias for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Generic key/value cache port.
///
/// A miss is `Ok(None)`, never an error. Implementations may evict
/// entries whenever they like (bounded capacity and TTL backends are
/// legitimate substitutions), so callers must treat every miss as
/// "re-derive from the backing store", never as a hard failure.
pub trait CacheStore<K, V>: Send + Sync {
    /// Store a value under `key`, replacing any existing value.
    fn put(&self, key: K, value: V) -> CacheResult<()>;

    /// Store a value under `key` only when no value exists there.
    ///
    /// Returns true when this call inserted the value. Used to prime
    /// entries without clobbering a concurrently written newer one; not
    /// correctness-critical.
    fn put_if_absent(&self, key: K, value: V) -> CacheResult<bool>;

    /// Look up the value under `key`.
    fn get(&self, key: &K) -> CacheResult<Option<V>>;

    /// Whether a value currently exists under `key`.
    fn contains_key(&self, key: &K) -> CacheResult<bool>;

    /// Drop the value under `key`, if any.
    fn remove(&self, key: &K) -> CacheResult<()>;

    /// Drop every value.
    fn clear(&self) -> CacheResult<()>;

    /// Usage statistics.
    fn stats(&self) -> CacheResult<CacheStats>;
}

/// Statistics about cache usage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of lookups answered from the cache.
    pub hits: u64,
    /// Number of lookups that missed.
    pub misses: u64,
    /// Number of entries currently cached.
    pub entry_count: u64,
}

impl CacheStats {
    /// Hit rate over all lookups so far (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_rate() {
        let stats = CacheStats {
            hits: 80,
            misses: 20,
            entry_count: 10,
        };
        assert!((stats.hit_rate() - 0.8).abs() < 0.001);
    }

    #[test]
    fn test_hit_rate_with_no_lookups() {
        assert!((CacheStats::default().hit_rate() - 0.0).abs() < 0.001);
    }
}
