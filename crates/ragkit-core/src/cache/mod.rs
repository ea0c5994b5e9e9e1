//! Caching substrate for expensive model and connection instances.
//!
//! Every instance cache in this crate is the same structure under a
//! different parameterisation: bounded size, TTL expiration measured from
//! insertion, LRU eviction, and hit/miss/eviction/expiration counters.

pub mod key;
mod monitor;
mod ttl_lru;

pub use monitor::{efficiency, CacheMonitor, CacheSnapshot, PerformanceReport};
pub use ttl_lru::{CacheStats, TtlLruCache};
