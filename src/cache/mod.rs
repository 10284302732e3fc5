//! 结果缓存模块：内存 + 持久化两级缓存，按时间过期。
//!
//! # Result Caching Module
//!
//! Request keys, deterministic seeds and the two-tier expiring cache that
//! keeps validation, ambiguity and analysis results across process restarts.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`RequestKey`] | Canonical `city::sector` key, request id and seeds |
//! | [`TieredCache`] | Memory tier over a durable bucket, TTL on read |
//! | [`CacheConfig`] | TTL (default 30 days) and on/off switch |
//! | [`DurableStore`] | Trait for bucket-level snapshot storage |
//! | [`MemoryStore`] / [`FileStore`] / [`NullStore`] | Store implementations |
//! | [`ResultCaches`] | One cache per result kind |
//!
//! ## Example
//!
//! ```rust
//! use market_potential::cache::{CacheConfig, MemoryStore, RequestKey, TieredCache};
//! use std::sync::Arc;
//!
//! # async fn demo() {
//! let cache: TieredCache<String> = TieredCache::new(
//!     "analysis",
//!     CacheConfig::new().with_ttl_days(7),
//!     Arc::new(MemoryStore::new()),
//! );
//! let key = RequestKey::new(" Pune", "BANER ");
//! cache.set(&key, "cached".to_string()).await;
//! assert_eq!(cache.get(&key).await.as_deref(), Some("cached"));
//! # }
//! ```
//!
//! Durable-tier failures never surface to callers: a failed read is a miss
//! and a failed write is skipped.

mod backend;
mod buckets;
mod key;
mod manager;

pub use backend::{DurableStore, FileStore, MemoryStore, NullStore};
pub use buckets::{ResultCaches, AMBIGUITY_BUCKET, ANALYSIS_BUCKET, VALIDATION_BUCKET};
pub use key::{fnv1a_32, Purpose, RequestKey, KEY_SEPARATOR};
pub use manager::{
    CacheConfig, CacheEntry, CacheStats, Clock, ManualClock, SystemClock, TieredCache,
    DEFAULT_TTL_DAYS,
};
