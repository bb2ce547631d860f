// On-disk cache store.
// One JSON file per key, written atomically, expired lazily on read.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::warn;

use crate::error::{GatewayError, Result};

use super::CacheStore;
use super::paths;

/// Wrapper for cached data with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    /// The cached data.
    pub data: T,
    /// When the data was cached.
    pub cached_at: DateTime<Utc>,
    /// Lifetime in seconds from `cached_at`.
    pub ttl_secs: u64,
}

impl<T> CachedData<T> {
    /// Create a new cached data entry.
    pub fn new(data: T, ttl: Duration) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
            ttl_secs: ttl.as_secs(),
        }
    }

    /// Check if this cached data has expired.
    pub fn is_expired(&self) -> bool {
        let elapsed = Utc::now()
            .signed_duration_since(self.cached_at)
            .to_std()
            .unwrap_or(Duration::ZERO);

        elapsed >= Duration::from_secs(self.ttl_secs)
    }
}

/// Read cached JSON data from a file.
pub fn read_cached<T: DeserializeOwned>(path: &Path) -> Result<Option<CachedData<T>>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path)?;
    let cached: CachedData<T> = serde_json::from_str(&contents)?;
    Ok(Some(cached))
}

/// Write data to cache as JSON, atomically via a uniquely named temp file.
pub fn write_cached<T: Serialize>(path: &Path, cached: &CachedData<T>) -> Result<()> {
    static SEQ: AtomicU64 = AtomicU64::new(0);

    let parent = path
        .parent()
        .ok_or_else(|| GatewayError::Other(format!("no parent for {}", path.display())))?;
    fs::create_dir_all(parent)?;

    let json = serde_json::to_string(cached)?;
    let temp_path = path.with_extension(format!(
        "{}.{}.tmp",
        std::process::id(),
        SEQ.fetch_add(1, Ordering::Relaxed)
    ));
    let mut file = fs::File::create(&temp_path)?;
    file.write_all(json.as_bytes())?;
    file.sync_all()?;
    fs::rename(&temp_path, path)?;

    Ok(())
}

/// Delete a cached file.
pub fn delete(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Filesystem-backed [`CacheStore`] that survives restarts.
///
/// Concurrent writers of one key race; the last rename wins and readers never see
/// a partially written file.
pub struct DiskCache {
    root: PathBuf,
}

impl DiskCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store under the platform cache directory.
    pub fn in_cache_dir() -> Result<Self> {
        paths::cache_dir()
            .map(Self::new)
            .ok_or_else(|| GatewayError::Other("no cache directory for this platform".into()))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Delete every entry.
    pub fn clear(&self) -> Result<()> {
        let dir = paths::entries_dir(&self.root);
        if dir.exists() {
            fs::remove_dir_all(dir)?;
        }
        Ok(())
    }
}

impl CacheStore for DiskCache {
    fn get(&self, key: &str) -> Option<Value> {
        let path = paths::entry_path(&self.root, key);
        match read_cached::<Value>(&path) {
            Ok(Some(cached)) if !cached.is_expired() => Some(cached.data),
            Ok(Some(_)) => {
                if let Err(e) = delete(&path) {
                    warn!(key, error = %e, "failed to delete expired cache entry");
                }
                None
            }
            Ok(None) => None,
            Err(e) => {
                warn!(key, error = %e, "unreadable cache entry, treating as miss");
                None
            }
        }
    }

    fn set(&self, key: &str, value: Value, ttl: Duration) {
        let path = paths::entry_path(&self.root, key);
        if let Err(e) = write_cached(&path, &CachedData::new(value, ttl)) {
            warn!(key, error = %e, "failed to write cache entry");
        }
    }

    fn remove(&self, key: &str) {
        if let Err(e) = delete(&paths::entry_path(&self.root, key)) {
            warn!(key, error = %e, "failed to delete cache entry");
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_write_and_read_cached() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.json");

        write_cached(&path, &CachedData::new(json!({"name": "bug"}), Duration::from_secs(60)))
            .unwrap();

        let cached: CachedData<Value> = read_cached(&path).unwrap().unwrap();
        assert_eq!(cached.data, json!({"name": "bug"}));
        assert_eq!(cached.ttl_secs, 60);
        assert!(!cached.is_expired());
    }

    #[test]
    fn test_entry_expires() {
        let mut data = CachedData::new("test", Duration::from_secs(300));

        // Set cached_at to the past
        data.cached_at = Utc::now() - chrono::Duration::seconds(600);

        assert!(data.is_expired());
    }

    #[test]
    fn test_store_roundtrip_and_remove() {
        let temp_dir = TempDir::new().unwrap();
        let cache = DiskCache::new(temp_dir.path());

        cache.set("labels_acme_widgets", json!([{"name": "bug"}]), Duration::from_secs(3600));
        assert_eq!(cache.get("labels_acme_widgets"), Some(json!([{"name": "bug"}])));

        cache.remove("labels_acme_widgets");
        cache.remove("labels_acme_widgets");
        assert_eq!(cache.get("labels_acme_widgets"), None);
    }

    #[test]
    fn test_expired_entry_is_deleted_on_read() {
        let temp_dir = TempDir::new().unwrap();
        let cache = DiskCache::new(temp_dir.path());
        let path = paths::entry_path(temp_dir.path(), "pulls_acme_widgets");

        let mut stale = CachedData::new(json!([]), Duration::from_secs(300));
        stale.cached_at = Utc::now() - chrono::Duration::seconds(301);
        write_cached(&path, &stale).unwrap();

        assert_eq!(cache.get("pulls_acme_widgets"), None);
        assert!(!path.exists());
    }

    #[test]
    fn test_corrupt_entry_is_a_miss() {
        let temp_dir = TempDir::new().unwrap();
        let cache = DiskCache::new(temp_dir.path());
        let path = paths::entry_path(temp_dir.path(), "user_repositories");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{truncated").unwrap();

        assert_eq!(cache.get("user_repositories"), None);
    }

    #[test]
    fn test_clear() {
        let temp_dir = TempDir::new().unwrap();
        let cache = DiskCache::new(temp_dir.path());
        cache.set("a", json!(1), Duration::from_secs(60));
        cache.set("b", json!(2), Duration::from_secs(60));

        cache.clear().unwrap();
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), None);
    }

    #[test]
    fn test_read_nonexistent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nonexistent.json");

        let cached: Option<CachedData<Value>> = read_cached(&path).unwrap();
        assert!(cached.is_none());
    }
}
