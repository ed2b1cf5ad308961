// ABOUTME: Two-tier progress store: local cache over the authoritative backend
// ABOUTME: Stale-while-revalidate reads, write-through writes, pure merge reconciliation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use uuid::Uuid;

use crate::client::{ProgressBackend, ProgressCache};
use crate::errors::AppResult;
use crate::models::SessionProgress;
use crate::progress::merge_progress;

/// Where a tiered read was answered from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadSource {
    /// Served from the local cache without a network round-trip
    Cache,
    /// Fetched from the authoritative server (cache miss)
    Server,
}

/// A progress record together with the tier that produced it
#[derive(Debug, Clone)]
pub struct TieredRead {
    /// The progress record
    pub progress: SessionProgress,
    /// Which tier answered
    pub source: ReadSource,
}

/// Offline-first progress store for a single device+routine pair
///
/// Reads serve the cached record immediately when one exists; callers that
/// served a cache hit are expected to follow up with [`revalidate`]
/// (stale-while-revalidate). Writes go through the cache first so the UI
/// sees them without waiting on the network, then reconcile with the
/// server's reply. Every operation is idempotent and safe to retry whole.
///
/// [`revalidate`]: Self::revalidate
pub struct TieredProgressStore<C, B> {
    cache: C,
    backend: B,
    device_id: String,
    routine_id: Uuid,
}

impl<C, B> TieredProgressStore<C, B>
where
    C: ProgressCache,
    B: ProgressBackend,
{
    /// Create a store scoped to one device+routine pair
    ///
    /// Caches are cheaply cloneable handles, so several stores (one per
    /// routine) can share a single bounded cache.
    pub fn new(cache: C, backend: B, device_id: impl Into<String>, routine_id: Uuid) -> Self {
        Self {
            cache,
            backend,
            device_id: device_id.into(),
            routine_id,
        }
    }

    /// Read the progress record, preferring the local tier.
    ///
    /// A cache hit is returned as-is and may be stale. On a miss the server
    /// record is fetched and cached before returning.
    ///
    /// # Errors
    ///
    /// Returns an error when the cache tier fails or a miss cannot be
    /// filled from the server
    pub async fn read(&self) -> AppResult<TieredRead> {
        if let Some(cached) = self.cache.get(&self.device_id, self.routine_id).await? {
            return Ok(TieredRead {
                progress: cached,
                source: ReadSource::Cache,
            });
        }

        let fetched = self.backend.fetch(&self.device_id, self.routine_id).await?;
        self.cache.put(fetched.clone()).await?;
        Ok(TieredRead {
            progress: fetched,
            source: ReadSource::Server,
        })
    }

    /// Refresh the cached record from the server.
    ///
    /// The fetched record is merged with whatever is cached so local
    /// completions recorded while offline survive the refresh, then the
    /// merged result is written back to the cache and returned.
    ///
    /// # Errors
    ///
    /// Returns an error when the server fetch or cache write fails
    pub async fn revalidate(&self) -> AppResult<SessionProgress> {
        let fetched = self.backend.fetch(&self.device_id, self.routine_id).await?;
        let merged = match self.cache.get(&self.device_id, self.routine_id).await? {
            Some(cached) => merge_progress(&cached, &fetched),
            None => fetched,
        };
        self.cache.put(merged.clone()).await?;
        Ok(merged)
    }

    /// Record new progress locally and push it to the server.
    ///
    /// The record lands in the cache before the network call, then the
    /// server's merged reply is reconciled and cached. Returns the final
    /// merged record.
    ///
    /// # Errors
    ///
    /// Returns an error when the cache write or the server push fails; the
    /// operation is safe to retry in full
    pub async fn write(&self, progress: SessionProgress) -> AppResult<SessionProgress> {
        self.cache.put(progress.clone()).await?;

        let reply = self.backend.push_sync(&progress).await?;
        let merged = merge_progress(&progress, &reply);
        self.cache.put(merged.clone()).await?;
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MemoryProgressCache;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::Mutex;

    /// Backend stub that reconciles pushes the way the real server does
    #[derive(Clone)]
    struct StubBackend {
        record: Arc<Mutex<SessionProgress>>,
        fetch_calls: Arc<AtomicUsize>,
    }

    impl StubBackend {
        fn new(record: SessionProgress) -> Self {
            Self {
                record: Arc::new(Mutex::new(record)),
                fetch_calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl ProgressBackend for StubBackend {
        async fn fetch(&self, _device_id: &str, _routine_id: Uuid) -> AppResult<SessionProgress> {
            self.fetch_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.record.lock().await.clone())
        }

        async fn push_sync(&self, snapshot: &SessionProgress) -> AppResult<SessionProgress> {
            let mut record = self.record.lock().await;
            *record = merge_progress(&record, snapshot);
            Ok(record.clone())
        }
    }

    fn progress(routine_id: Uuid, current: u32, completed: &[u32]) -> SessionProgress {
        let mut record = SessionProgress::new("device-1", routine_id);
        record.current_session = current;
        record.completed_sessions = completed.iter().copied().collect();
        record
    }

    fn store(
        backend: StubBackend,
        routine_id: Uuid,
    ) -> TieredProgressStore<MemoryProgressCache, StubBackend> {
        TieredProgressStore::new(MemoryProgressCache::default(), backend, "device-1", routine_id)
    }

    #[tokio::test]
    async fn miss_fetches_from_server_then_hits_cache() {
        let routine_id = Uuid::new_v4();
        let backend = StubBackend::new(progress(routine_id, 3, &[1, 2]));
        let store = store(backend.clone(), routine_id);

        let first = store.read().await.unwrap();
        assert_eq!(first.source, ReadSource::Server);
        assert_eq!(first.progress.current_session, 3);

        let second = store.read().await.unwrap();
        assert_eq!(second.source, ReadSource::Cache);
        assert_eq!(backend.fetch_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn revalidate_merges_cached_and_fetched() {
        let routine_id = Uuid::new_v4();
        let backend = StubBackend::new(progress(routine_id, 3, &[1, 2]));
        let store = store(backend, routine_id);

        // Local record knows about a completion the server missed.
        store
            .cache
            .put(progress(routine_id, 2, &[1, 4]))
            .await
            .unwrap();

        let merged = store.revalidate().await.unwrap();
        assert_eq!(merged.current_session, 3);
        assert_eq!(
            merged.completed_sessions.iter().copied().collect::<Vec<_>>(),
            vec![1, 2, 4]
        );

        // The merged record replaced the stale cached one.
        let cached = store.read().await.unwrap();
        assert_eq!(cached.source, ReadSource::Cache);
        assert_eq!(cached.progress.completed_sessions.len(), 3);
    }

    #[tokio::test]
    async fn write_is_visible_locally_and_reconciled_with_server() {
        let routine_id = Uuid::new_v4();
        let backend = StubBackend::new(progress(routine_id, 4, &[1, 2, 3]));
        let store = store(backend.clone(), routine_id);

        let written = store.write(progress(routine_id, 2, &[1, 5])).await.unwrap();
        assert_eq!(written.current_session, 4);
        assert!(written.completed_sessions.contains(&5));
        assert!(written.completed_sessions.contains(&3));

        // Server record absorbed the local completion.
        let server = backend.record.lock().await.clone();
        assert!(server.completed_sessions.contains(&5));

        // Subsequent reads serve the merged record from cache.
        let read = store.read().await.unwrap();
        assert_eq!(read.source, ReadSource::Cache);
        assert_eq!(read.progress, written);
    }
}
