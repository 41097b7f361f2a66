//! On-disk cache of layout results, one JSON file per document.
//!
//! The file is a JSON object keyed by page index. Writes are a locked
//! read-merge-write through a temporary file, so concurrent fetches of the
//! same document never lose each other's pages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::{Error, Result};

/// Environment variable overriding the cache directory.
pub const CACHE_DIR_ENV: &str = "PAGEFLOW_CACHE_DIR";

/// Cached pages of one document, keyed by page index.
pub type CacheMap = BTreeMap<u32, CacheEntry>;

/// A cached layout result for one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Page index within the source document
    pub page_index: u32,

    /// When the result was fetched
    pub fetched_at: DateTime<Utc>,

    /// Raw layout result
    pub result: serde_json::Value,
}

impl CacheEntry {
    /// Create an entry stamped with the current time.
    pub fn new(page_index: u32, result: serde_json::Value) -> Self {
        Self {
            page_index,
            fetched_at: Utc::now(),
            result,
        }
    }
}

/// Resolve the cache directory.
///
/// Uses `PAGEFLOW_CACHE_DIR` when set, otherwise `pageflow` under the
/// user's documents directory (or the working directory if there is none).
pub fn cache_dir_from_env() -> PathBuf {
    match std::env::var_os(CACHE_DIR_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => default_cache_dir(),
    }
}

/// Default cache directory, ignoring the environment.
pub fn default_cache_dir() -> PathBuf {
    dirs::document_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pageflow")
}

/// Read a cache file synchronously.
///
/// Unlike [`PageCache::load`], failures are reported rather than treated as
/// an empty cache.
pub fn read_cache_file(path: impl AsRef<Path>) -> Result<CacheMap> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|e| cache_error(path, e))?;
    parse_cache(path, &data)
}

fn parse_cache(path: &Path, data: &[u8]) -> Result<CacheMap> {
    serde_json::from_slice(data).map_err(|e| Error::CacheIo {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn cache_error(path: &Path, err: io::Error) -> Error {
    Error::CacheIo {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

/// Cache file for one document.
///
/// Clones share the write lock.
#[derive(Debug, Clone)]
pub struct PageCache {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl PageCache {
    /// Cache for `document_name` stored in `dir`.
    ///
    /// Nothing is touched on disk until the first merge.
    pub fn open(dir: impl AsRef<Path>, document_name: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{document_name}.json")),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Cache for `document_name` in the directory from [`cache_dir_from_env`].
    pub fn for_document(document_name: &str) -> Self {
        Self::open(cache_dir_from_env(), document_name)
    }

    /// Path of the cache file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every cached page.
    ///
    /// A missing file is an empty cache. An unreadable or corrupt file is
    /// logged and also treated as empty.
    pub async fn load(&self) -> CacheMap {
        match self.try_load().await {
            Ok(map) => map,
            Err(e) => {
                log::warn!("Ignoring unreadable cache: {}", e);
                CacheMap::new()
            }
        }
    }

    async fn try_load(&self) -> Result<CacheMap> {
        match tokio::fs::read(&self.path).await {
            Ok(data) => parse_cache(&self.path, &data),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(CacheMap::new()),
            Err(e) => Err(cache_error(&self.path, e)),
        }
    }

    /// Cached result for a page.
    ///
    /// Reads the whole file; use [`load`](Self::load) for repeated lookups.
    pub async fn get(&self, page_index: u32) -> Option<CacheEntry> {
        self.load().await.remove(&page_index)
    }

    /// Indices of all cached pages, ascending.
    pub async fn cached_indices(&self) -> Vec<u32> {
        self.load().await.into_keys().collect()
    }

    /// Path a corrupt cache file is moved to before it is rewritten.
    pub fn corrupt_path(&self) -> PathBuf {
        self.path.with_extension("json.corrupt")
    }

    /// Add a page to the cache file.
    ///
    /// The file is re-read under the lock so entries written by other
    /// tasks since the last load are kept. A file that does not parse is
    /// moved to [`corrupt_path`](Self::corrupt_path) and replaced; a file
    /// that cannot be read is left alone and the merge fails.
    pub async fn merge(&self, page_index: u32, result: serde_json::Value) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut map = match tokio::fs::read(&self.path).await {
            Ok(data) => match parse_cache(&self.path, &data) {
                Ok(map) => map,
                Err(e) => {
                    let aside = self.corrupt_path();
                    log::warn!("{}; moving it to {}", e, aside.display());
                    tokio::fs::rename(&self.path, &aside)
                        .await
                        .map_err(|e| cache_error(&aside, e))?;
                    CacheMap::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => CacheMap::new(),
            Err(e) => return Err(cache_error(&self.path, e)),
        };
        map.insert(page_index, CacheEntry::new(page_index, result));

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| cache_error(parent, e))?;
        }

        let data = serde_json::to_vec_pretty(&map)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &data)
            .await
            .map_err(|e| cache_error(&tmp, e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| cache_error(&self.path, e))?;

        log::trace!("Cached page {} in {}", page_index, self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let cache = PageCache::open(dir.path(), "doc");

        assert!(cache.load().await.is_empty());
        assert!(cache.get(0).await.is_none());
        assert!(!cache.path().exists());
    }

    #[tokio::test]
    async fn test_merge_and_reload() {
        let dir = TempDir::new().unwrap();
        let cache = PageCache::open(dir.path().join("nested"), "doc");

        cache.merge(3, json!({"paragraphs": []})).await.unwrap();
        cache.merge(1, json!({"paragraphs": [1]})).await.unwrap();

        assert_eq!(cache.cached_indices().await, vec![1, 3]);
        let entry = cache.get(1).await.unwrap();
        assert_eq!(entry.page_index, 1);
        assert_eq!(entry.result, json!({"paragraphs": [1]}));

        let from_disk = read_cache_file(cache.path()).unwrap();
        assert_eq!(from_disk.len(), 2);
    }

    #[tokio::test]
    async fn test_corrupt_cache_treated_as_empty() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("doc.json"), b"{not json").unwrap();
        let cache = PageCache::open(dir.path(), "doc");

        assert!(cache.load().await.is_empty());
        assert!(read_cache_file(cache.path()).is_err());

        // A merge moves the corrupt file aside before writing a new one
        cache.merge(0, json!({})).await.unwrap();
        assert_eq!(cache.cached_indices().await, vec![0]);
        assert_eq!(std::fs::read(cache.corrupt_path()).unwrap(), b"{not json");
        assert!(cache.corrupt_path().ends_with("doc.json.corrupt"));
    }

    #[tokio::test]
    async fn test_unreadable_cache_not_overwritten() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"plain file").unwrap();
        let cache = PageCache::open(&blocker, "doc");

        assert!(cache.merge(0, json!({})).await.is_err());
        assert_eq!(std::fs::read(&blocker).unwrap(), b"plain file");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_merges_keep_all_pages() {
        let dir = TempDir::new().unwrap();
        let cache = PageCache::open(dir.path(), "doc");

        let mut handles = Vec::new();
        for i in 0..16u32 {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move {
                cache.merge(i, json!({ "page": i })).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(cache.cached_indices().await, (0..16).collect::<Vec<_>>());
    }

    #[test]
    fn test_keys_serialized_as_strings() {
        let mut map = CacheMap::new();
        map.insert(7, CacheEntry::new(7, json!(null)));
        let value = serde_json::to_value(&map).unwrap();
        assert!(value.get("7").is_some());
    }
}
