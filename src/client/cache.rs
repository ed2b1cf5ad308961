// ABOUTME: Local progress cache: trait seam plus the in-memory LRU implementation
// ABOUTME: Keyed by (device, routine); holds typed records, no serialization round-trip
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use std::num::NonZeroUsize;
use std::sync::Arc;

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::constants::client::DEFAULT_CACHE_CAPACITY;
use crate::errors::AppResult;
use crate::models::SessionProgress;

/// Local key-value tier of the progress store
///
/// Implementations are best-effort: a miss is always a valid answer, and
/// callers must tolerate stale values (the merge on revalidate reconciles
/// them).
#[async_trait]
pub trait ProgressCache: Send + Sync {
    /// Look up the cached record for a device+routine pair
    async fn get(&self, device_id: &str, routine_id: Uuid) -> AppResult<Option<SessionProgress>>;

    /// Store a record, replacing any cached value for the same pair
    async fn put(&self, progress: SessionProgress) -> AppResult<()>;
}

/// In-memory progress cache with LRU eviction
///
/// `LruCache` requires a mutable borrow even on reads (access order), so
/// every operation takes the write lock. Progress records are small and
/// per-device cardinality is low; contention is not a concern here.
#[derive(Clone)]
pub struct MemoryProgressCache {
    store: Arc<RwLock<LruCache<(String, Uuid), SessionProgress>>>,
}

impl MemoryProgressCache {
    /// Fallback capacity when the configured value is zero
    /// Note: `unreachable!()` on compile-time constant is verified at compile time
    const FALLBACK_CAPACITY: NonZeroUsize = match NonZeroUsize::new(DEFAULT_CACHE_CAPACITY) {
        Some(n) => n,
        None => unreachable!(),
    };

    /// Create a cache bounded to `capacity` records
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(Self::FALLBACK_CAPACITY);
        Self {
            store: Arc::new(RwLock::new(LruCache::new(capacity))),
        }
    }
}

impl Default for MemoryProgressCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

#[async_trait]
impl ProgressCache for MemoryProgressCache {
    async fn get(&self, device_id: &str, routine_id: Uuid) -> AppResult<Option<SessionProgress>> {
        let key = (device_id.to_owned(), routine_id);
        Ok(self.store.write().await.get(&key).cloned())
    }

    async fn put(&self, progress: SessionProgress) -> AppResult<()> {
        let key = (progress.device_id.clone(), progress.routine_id);
        self.store.write().await.push(key, progress);
        Ok(())
    }
}
