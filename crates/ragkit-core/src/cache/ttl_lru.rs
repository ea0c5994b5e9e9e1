//! Bounded TTL + LRU cache for expensive-to-construct instances.
//!
//! Thread-safe cache with O(1) operations using `IndexMap` (front = LRU,
//! back = MRU). Entries expire a fixed interval after insertion; the
//! insertion timestamp is never refreshed on hit.
//!
//! # Acquisition protocol
//!
//! `get_or_load` is double-checked: a read-locked probe serves the common
//! hit without contending with loads, then the write-locked slow path
//! re-checks the key, sweeps expired entries and runs the loader while
//! still holding the lock. Holding the lock across the load serialises
//! concurrent misses on purpose: the loader is the expensive operation
//! being amortised, and each key must be constructed at most once per
//! race window.

#![allow(clippy::cast_precision_loss)] // Precision loss acceptable for hit rate calculation

use super::monitor::CacheSnapshot;
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Cache statistics snapshot for monitoring.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Number of LRU evictions.
    pub evictions: u64,
    /// Number of entries dropped because their TTL elapsed.
    pub expired: u64,
    /// Number of entries currently cached.
    pub size: usize,
}

impl CacheStats {
    /// Calculate hit rate (0.0 to 1.0). Defined as 0.0 when no lookups
    /// have occurred.
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// One cached value with its insertion timestamp.
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.inserted_at.elapsed() <= ttl
    }
}

/// Thread-safe bounded cache with TTL expiration and LRU eviction.
///
/// Uses `IndexMap` internally, which preserves insertion order and provides
/// O(1) access; move-to-back on hit and pop-front on eviction are both O(1)
/// amortized. Values are shared immutable handles and must be cheap to clone
/// (`Arc` in every use in this crate).
pub struct TtlLruCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Label used in log events and metrics.
    name: &'static str,
    /// Time-to-live measured from insertion, monotonic clock.
    ttl: Duration,
    /// Maximum number of entries.
    max_size: usize,
    /// Ordered map protected by `RwLock` (front = LRU, back = MRU).
    inner: RwLock<IndexMap<K, CacheEntry<V>>>,
    // Statistics are atomic so snapshots never need the map lock.
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    expired: AtomicU64,
}

impl<K, V> TtlLruCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Create a new cache with the given label, TTL and capacity.
    ///
    /// # Panics
    ///
    /// Panics if `max_size` is zero: a zero-capacity cache cannot hold the
    /// value it just loaded.
    #[must_use]
    pub fn new(name: &'static str, ttl: Duration, max_size: usize) -> Self {
        assert!(max_size > 0, "cache '{name}' requires max_size >= 1");
        Self {
            name,
            ttl,
            max_size,
            inner: RwLock::new(IndexMap::with_capacity(max_size)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            expired: AtomicU64::new(0),
        }
    }

    /// Label of this cache.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Maximum number of entries.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.max_size
    }

    /// Time-to-live applied to every entry.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Current number of entries, stale ones included until swept.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Check if the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Returns the cached value for `key`, loading it through `loader` on a
    /// miss.
    ///
    /// A fresh cached value counts as a hit and is moved to most-recently-
    /// used. Otherwise the loader runs under the cache lock (at most one
    /// construction per key per race window), expired entries are swept,
    /// and least-recently-used entries are evicted until the new value
    /// fits. A loader error inserts nothing and is returned unchanged.
    ///
    /// # Errors
    ///
    /// Propagates whatever error the loader returns.
    pub fn get_or_load<E, F>(&self, key: K, loader: F) -> std::result::Result<V, E>
    where
        F: FnOnce() -> std::result::Result<V, E>,
    {
        // Fast path: read-locked probe, then a brief write lock to touch.
        let probed_fresh = {
            let inner = self.inner.read();
            inner.get(&key).map(|entry| entry.is_fresh(self.ttl))
        };
        if probed_fresh == Some(true) {
            let mut inner = self.inner.write();
            if let Some(value) = self.touch_if_fresh(&mut inner, &key) {
                return Ok(value);
            }
        } else if probed_fresh == Some(false) {
            // Expired: re-check under the lock, another thread may have
            // replaced the entry in the meantime.
            let mut inner = self.inner.write();
            let still_stale = inner
                .get(&key)
                .is_some_and(|entry| !entry.is_fresh(self.ttl));
            if still_stale {
                inner.shift_remove(&key);
                self.expired.fetch_add(1, Ordering::Relaxed);
                tracing::info!(cache = self.name, "cache entry expired");
            }
        }

        // Slow path: re-check, sweep, then load while holding the lock.
        let mut inner = self.inner.write();
        if let Some(value) = self.touch_if_fresh(&mut inner, &key) {
            return Ok(value);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        self.sweep_expired(&mut inner);

        let load_start = Instant::now();
        let value = loader()?;
        tracing::info!(
            cache = self.name,
            load_secs = load_start.elapsed().as_secs_f64(),
            "cache miss, value loaded"
        );

        while inner.len() >= self.max_size {
            if inner.shift_remove_index(0).is_none() {
                break;
            }
            self.evictions.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(
                cache = self.name,
                capacity = self.max_size,
                "cache full, evicted least recently used entry"
            );
        }

        inner.insert(
            key,
            CacheEntry {
                value: value.clone(),
                inserted_at: Instant::now(),
            },
        );
        Ok(value)
    }

    /// Freshness-checked lookup without loading.
    ///
    /// A fresh entry counts as a hit and is touched; a stale entry is
    /// removed and counted as expired, then the lookup counts as a miss.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<V> {
        let mut inner = self.inner.write();
        if let Some(value) = self.touch_if_fresh(&mut inner, key) {
            return Some(value);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Atomically empties the map. Statistics are unaffected.
    pub fn clear(&self) {
        let mut inner = self.inner.write();
        inner.clear();
        tracing::info!(cache = self.name, "cache cleared");
    }

    /// Resets all counters to zero. Cached entries are unaffected.
    pub fn clear_stats(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
        self.expired.store(0, Ordering::Relaxed);
    }

    /// Statistics snapshot including current size.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            expired: self.expired.load(Ordering::Relaxed),
            size: self.inner.read().len(),
        }
    }

    /// Named snapshot for monitoring.
    #[must_use]
    pub fn snapshot(&self) -> CacheSnapshot {
        CacheSnapshot {
            name: self.name,
            capacity: self.max_size,
            ttl: self.ttl,
            stats: self.stats(),
        }
    }

    /// Removes `key` and re-inserts it at MRU if still fresh, returning its
    /// value and counting a hit. A stale entry stays removed and counts as
    /// expired.
    fn touch_if_fresh(&self, inner: &mut IndexMap<K, CacheEntry<V>>, key: &K) -> Option<V> {
        let entry = inner.shift_remove(key)?;
        if entry.is_fresh(self.ttl) {
            let value = entry.value.clone();
            let age_secs = entry.inserted_at.elapsed().as_secs_f64();
            inner.insert(key.clone(), entry);
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(cache = self.name, age_secs, "cache hit");
            Some(value)
        } else {
            self.expired.fetch_add(1, Ordering::Relaxed);
            tracing::info!(cache = self.name, "cache entry expired");
            None
        }
    }

    /// Drops every stale entry in one pass over the map.
    fn sweep_expired(&self, inner: &mut IndexMap<K, CacheEntry<V>>) {
        let before = inner.len();
        let ttl = self.ttl;
        inner.retain(|_, entry| entry.is_fresh(ttl));
        let swept = before - inner.len();
        if swept > 0 {
            self.expired.fetch_add(swept as u64, Ordering::Relaxed);
            tracing::info!(cache = self.name, swept, "swept expired cache entries");
        }
    }
}
