//! Two-tier expiring cache.

use super::backend::DurableStore;
use super::key::RequestKey;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

pub const DEFAULT_TTL_DAYS: u64 = 30;
const MILLIS_PER_DAY: u64 = 24 * 60 * 60 * 1000;

/// Wall-clock source for entry timestamps and expiry checks.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> u64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Clock that only moves when told to.
///
/// This is a testing aid for exercising TTL boundaries without sleeping;
/// production code uses [`SystemClock`].
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start_millis: u64) -> Self {
        Self {
            now: AtomicU64::new(start_millis),
        }
    }
    pub fn set(&self, millis: u64) {
        self.now.store(millis, Ordering::SeqCst);
    }
    pub fn advance(&self, by: Duration) {
        self.now.fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// A cached value and the moment it was saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry<V> {
    pub value: V,
    pub saved_at: u64,
}

impl<V> CacheEntry<V> {
    pub fn new(value: V, saved_at: u64) -> Self {
        Self { value, saved_at }
    }

    /// Visible while `now - saved_at <= ttl`.
    pub fn is_fresh(&self, now: u64, ttl: Duration) -> bool {
        now.saturating_sub(self.saved_at) <= ttl.as_millis() as u64
    }
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub ttl: Duration,
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_millis(DEFAULT_TTL_DAYS * MILLIS_PER_DAY),
            enabled: true,
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
    pub fn with_ttl_days(self, days: u64) -> Self {
        self.with_ttl(Duration::from_millis(days.saturating_mul(MILLIS_PER_DAY)))
    }
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    pub expired: u64,
    pub errors: u64,
}

#[derive(Default)]
struct AtomicStats {
    hits: AtomicU64,
    misses: AtomicU64,
    sets: AtomicU64,
    expired: AtomicU64,
    errors: AtomicU64,
}

impl AtomicStats {
    fn to_stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            sets: self.sets.load(Ordering::Relaxed),
            expired: self.expired.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}

type Snapshot<V> = HashMap<String, CacheEntry<V>>;

/// Memory tier in front of a durable bucket.
///
/// Reads hit memory first and fall back to the durable snapshot, promoting
/// whatever is still fresh. Every `set` re-writes the full bucket snapshot.
/// Durable-tier failures are logged and degrade to a miss or a skipped write.
pub struct TieredCache<V> {
    bucket: String,
    config: CacheConfig,
    memory: RwLock<Snapshot<V>>,
    store: Arc<dyn DurableStore>,
    clock: Arc<dyn Clock>,
    stats: AtomicStats,
    write_lock: tokio::sync::Mutex<()>,
}

impl<V> TieredCache<V>
where
    V: Serialize + DeserializeOwned + Clone + Send + Sync,
{
    pub fn new(bucket: impl Into<String>, config: CacheConfig, store: Arc<dyn DurableStore>) -> Self {
        Self::with_clock(bucket, config, store, Arc::new(SystemClock))
    }

    pub fn with_clock(
        bucket: impl Into<String>,
        config: CacheConfig,
        store: Arc<dyn DurableStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            bucket: bucket.into(),
            config,
            memory: RwLock::new(HashMap::new()),
            store,
            clock,
            stats: AtomicStats::default(),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.to_stats()
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.name()
    }

    /// Number of fresh entries held in memory.
    pub fn len(&self) -> usize {
        let now = self.clock.now_millis();
        self.memory
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|e| e.is_fresh(now, self.config.ttl))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub async fn get(&self, key: &RequestKey) -> Option<V> {
        if !self.config.enabled {
            return None;
        }
        let now = self.clock.now_millis();

        if let Some(value) = self.get_from_memory(key, now) {
            self.stats.hits.fetch_add(1, Ordering::Relaxed);
            debug!(bucket = self.bucket.as_str(), key = key.as_str(), tier = "memory", "cache hit");
            return Some(value);
        }

        let persisted = self.load_persisted(now).await;
        let found = persisted.get(key.as_str()).map(|e| e.value.clone());
        self.promote(persisted);

        match found {
            Some(value) => {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                debug!(bucket = self.bucket.as_str(), key = key.as_str(), tier = "durable", "cache hit");
                Some(value)
            }
            None => {
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                debug!(bucket = self.bucket.as_str(), key = key.as_str(), "cache miss");
                None
            }
        }
    }

    pub async fn set(&self, key: &RequestKey, value: V) {
        if !self.config.enabled {
            return;
        }
        let now = self.clock.now_millis();
        self.memory
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.as_str().to_string(), CacheEntry::new(value, now));
        self.persist(now).await;
    }

    /// Warm the memory tier from the durable snapshot. Returns how many fresh
    /// entries were promoted.
    pub async fn load_all(&self) -> usize {
        if !self.config.enabled {
            return 0;
        }
        let now = self.clock.now_millis();
        let persisted = self.load_persisted(now).await;
        self.promote(persisted)
    }

    /// Re-write the full snapshot from memory.
    pub async fn flush(&self) {
        if !self.config.enabled {
            return;
        }
        let now = self.clock.now_millis();
        self.persist(now).await;
    }

    fn get_from_memory(&self, key: &RequestKey, now: u64) -> Option<V> {
        {
            let memory = self.memory.read().unwrap_or_else(PoisonError::into_inner);
            match memory.get(key.as_str()) {
                Some(entry) if entry.is_fresh(now, self.config.ttl) => {
                    return Some(entry.value.clone())
                }
                Some(_) => {}
                None => return None,
            }
        }
        self.memory
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key.as_str());
        self.stats.expired.fetch_add(1, Ordering::Relaxed);
        None
    }

    fn promote(&self, persisted: Snapshot<V>) -> usize {
        let mut memory = self.memory.write().unwrap_or_else(PoisonError::into_inner);
        let mut promoted = 0;
        for (key, entry) in persisted {
            let newer = memory
                .get(&key)
                .map(|existing| entry.saved_at > existing.saved_at)
                .unwrap_or(true);
            if newer {
                memory.insert(key, entry);
                promoted += 1;
            }
        }
        promoted
    }

    /// Fresh entries of the durable snapshot. Any failure reads as empty.
    async fn load_persisted(&self, now: u64) -> Snapshot<V> {
        let bytes = match self.store.load(&self.bucket).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return HashMap::new(),
            Err(e) => {
                self.stats.errors.fetch_add(1, Ordering::Relaxed);
                warn!(bucket = self.bucket.as_str(), backend = self.store.name(), error = %e, "durable cache read failed");
                return HashMap::new();
            }
        };
        let snapshot: Snapshot<V> = match serde_json::from_slice(&bytes) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                self.stats.errors.fetch_add(1, Ordering::Relaxed);
                warn!(bucket = self.bucket.as_str(), error = %e, "durable cache snapshot is corrupt, ignoring");
                return HashMap::new();
            }
        };
        let total = snapshot.len();
        let fresh: Snapshot<V> = snapshot
            .into_iter()
            .filter(|(_, e)| e.is_fresh(now, self.config.ttl))
            .collect();
        let dropped = (total - fresh.len()) as u64;
        if dropped > 0 {
            self.stats.expired.fetch_add(dropped, Ordering::Relaxed);
            debug!(bucket = self.bucket.as_str(), dropped, "discarded expired durable entries");
        }
        fresh
    }

    async fn persist(&self, now: u64) {
        let _guard = self.write_lock.lock().await;

        let mut snapshot = self.load_persisted(now).await;
        {
            let memory = self.memory.read().unwrap_or_else(PoisonError::into_inner);
            for (key, entry) in memory.iter() {
                if entry.is_fresh(now, self.config.ttl) {
                    snapshot.insert(key.clone(), entry.clone());
                }
            }
        }

        let bytes = match serde_json::to_vec(&snapshot) {
            Ok(bytes) => bytes,
            Err(e) => {
                self.stats.errors.fetch_add(1, Ordering::Relaxed);
                warn!(bucket = self.bucket.as_str(), error = %e, "failed to serialize cache snapshot, write skipped");
                return;
            }
        };
        match self.store.store(&self.bucket, &bytes).await {
            Ok(()) => {
                self.stats.sets.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                self.stats.errors.fetch_add(1, Ordering::Relaxed);
                warn!(bucket = self.bucket.as_str(), backend = self.store.name(), error = %e, "durable cache write failed, write skipped");
            }
        }
    }
}
