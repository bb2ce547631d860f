// Cache module.
// Key derivation, the TTL table, and the stores records are cached in.

pub mod keys;
pub mod memory;
pub mod paths;
pub mod store;

use std::time::Duration;

use serde_json::Value;

pub use keys::CacheKey;
pub use memory::MemoryCache;
pub use store::{CachedData, DiskCache};

/// String-keyed store with per-entry expiry.
///
/// Values are JSON trees so one store can hold every record type. Implementations
/// do their own locking; the gateway calls them concurrently without coordination.
/// Expired entries must never be returned.
pub trait CacheStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;

    fn set(&self, key: &str, value: Value, ttl: Duration);

    fn remove(&self, key: &str);
}
