//! Durable store backends.
//!
//! A store only knows about whole buckets: `load` returns the last snapshot
//! written for a bucket and `store` replaces it.

use crate::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{PoisonError, RwLock};

#[async_trait]
pub trait DurableStore: Send + Sync {
    async fn load(&self, bucket: &str) -> Result<Option<Vec<u8>>>;
    async fn store(&self, bucket: &str, snapshot: &[u8]) -> Result<()>;
    fn name(&self) -> &'static str;
}

/// Process-local store. Survives cache instances, not process restarts.
#[derive(Default)]
pub struct MemoryStore {
    buckets: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw snapshot currently held for `bucket`.
    pub fn snapshot(&self, bucket: &str) -> Option<Vec<u8>> {
        self.buckets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(bucket)
            .cloned()
    }

    /// Overwrite a bucket directly, bypassing any cache.
    pub fn put_snapshot(&self, bucket: &str, snapshot: Vec<u8>) {
        self.buckets
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(bucket.to_string(), snapshot);
    }
}

#[async_trait]
impl DurableStore for MemoryStore {
    async fn load(&self, bucket: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.snapshot(bucket))
    }
    async fn store(&self, bucket: &str, snapshot: &[u8]) -> Result<()> {
        self.put_snapshot(bucket, snapshot.to_vec());
        Ok(())
    }
    fn name(&self) -> &'static str {
        "memory"
    }
}

/// One `<bucket>.json` file per bucket under a directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn bucket_path(&self, bucket: &str) -> PathBuf {
        self.dir.join(format!("{}.json", bucket))
    }
}

#[async_trait]
impl DurableStore for FileStore {
    async fn load(&self, bucket: &str) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(self.bucket_path(bucket)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn store(&self, bucket: &str, snapshot: &[u8]) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.bucket_path(bucket);
        let tmp = self.dir.join(format!(".{}.json.tmp", bucket));
        tokio::fs::write(&tmp, snapshot).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

/// Store that never holds anything.
pub struct NullStore;
impl NullStore {
    pub fn new() -> Self {
        Self
    }
}
impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DurableStore for NullStore {
    async fn load(&self, _: &str) -> Result<Option<Vec<u8>>> {
        Ok(None)
    }
    async fn store(&self, _: &str, _: &[u8]) -> Result<()> {
        Ok(())
    }
    fn name(&self) -> &'static str {
        "null"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "market-potential-store-{}-{}",
            tag,
            std::process::id()
        ))
    }

    #[tokio::test]
    async fn test_memory_store_replaces_whole_bucket() {
        let store = MemoryStore::new();
        assert!(store.load("analysis").await.unwrap().is_none());
        store.store("analysis", b"{\"a\":1}").await.unwrap();
        store.store("analysis", b"{}").await.unwrap();
        assert_eq!(store.load("analysis").await.unwrap().unwrap(), b"{}");
        assert!(store.load("validation").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_store_persists_per_bucket_files() {
        let dir = scratch_dir("roundtrip");
        let _ = std::fs::remove_dir_all(&dir);
        let store = FileStore::new(&dir);

        assert!(store.load("ambiguity").await.unwrap().is_none());
        store.store("ambiguity", b"{\"k\":true}").await.unwrap();
        assert!(dir.join("ambiguity.json").exists());

        let reopened = FileStore::new(&dir);
        assert_eq!(
            reopened.load("ambiguity").await.unwrap().unwrap(),
            b"{\"k\":true}"
        );
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_null_store_discards_writes() {
        let store = NullStore::new();
        store.store("analysis", b"{}").await.unwrap();
        assert!(store.load("analysis").await.unwrap().is_none());
        assert_eq!(store.name(), "null");
    }
}
