// ABOUTME: Real-server E2E tests for the device-side tiered progress store
// ABOUTME: Exercises cache and server read paths, write-through sync, and revalidation over HTTP
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use anyhow::Result;
use common::{create_test_routine, create_test_server_resources, TEST_DEVICE};
use ironlog::client::{
    HttpProgressBackend, MemoryProgressCache, ProgressCache, ReadSource, TieredProgressStore,
};
use ironlog::models::SessionProgress;
use ironlog::resources::ServerResources;
use ironlog::server::IronLogServer;
use rand::Rng;
use serde_json::json;
use std::{net::TcpListener, sync::Arc, time::Duration};
use tokio::{task::JoinHandle, time::sleep};
use url::Url;
use uuid::Uuid;

/// Check if a port is available
fn is_port_available(port: u16) -> bool {
    TcpListener::bind(format!("127.0.0.1:{port}")).is_ok()
}

/// Find an available port
fn find_available_port() -> u16 {
    let mut rng = rand::thread_rng();
    for _ in 0..100 {
        let port = rng.gen_range(40000..50000);
        if is_port_available(port) {
            return port;
        }
    }
    panic!("Could not find an available port after 100 attempts");
}

/// Test server setup
struct TestServer {
    port: u16,
    resources: Arc<ServerResources>,
}

impl TestServer {
    async fn new() -> Result<Self> {
        Ok(Self {
            port: find_available_port(),
            resources: create_test_server_resources().await?,
        })
    }

    async fn start(&self) -> JoinHandle<()> {
        let server = IronLogServer::new(self.resources.clone());
        let port = self.port;

        let handle = tokio::spawn(async move {
            let _ = server.run(port).await;
        });

        // Wait for server to be ready
        sleep(Duration::from_millis(500)).await;

        handle
    }

    fn base_url(&self) -> Url {
        Url::parse(&format!("http://127.0.0.1:{}", self.port)).unwrap()
    }

    fn store(
        &self,
        cache: MemoryProgressCache,
        routine_id: Uuid,
    ) -> TieredProgressStore<MemoryProgressCache, HttpProgressBackend> {
        TieredProgressStore::new(
            cache,
            HttpProgressBackend::new(self.base_url()),
            TEST_DEVICE,
            routine_id,
        )
    }

    /// Complete a session directly against the REST API, bypassing the store
    async fn complete_session(&self, routine_id: Uuid, session_number: u32) {
        let url = format!("http://127.0.0.1:{}/api/session-progress/complete", self.port);
        let response = reqwest::Client::new()
            .post(&url)
            .json(&json!({
                "device_id": TEST_DEVICE,
                "routine_id": routine_id,
                "session_number": session_number
            }))
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());
    }
}

#[tokio::test]
async fn test_read_misses_fill_from_server_then_hit_cache() -> Result<()> {
    let server = TestServer::new().await?;
    let routine = create_test_routine(&server.resources, TEST_DEVICE).await?;
    let _handle = server.start().await;

    let store = server.store(MemoryProgressCache::default(), routine.id);

    // First read misses the cache; the server seeds the default record.
    let first = store.read().await?;
    assert_eq!(first.source, ReadSource::Server);
    assert_eq!(first.progress.current_session, 1);
    assert!(first.progress.completed_sessions.is_empty());

    // Second read is served locally without touching the network.
    let second = store.read().await?;
    assert_eq!(second.source, ReadSource::Cache);
    assert_eq!(second.progress.current_session, 1);

    Ok(())
}

#[tokio::test]
async fn test_write_pushes_local_progress_through_sync() -> Result<()> {
    let server = TestServer::new().await?;
    let routine = create_test_routine(&server.resources, TEST_DEVICE).await?;
    let _handle = server.start().await;

    let store = server.store(MemoryProgressCache::default(), routine.id);

    // A local record built offline: two sessions done, pointer at three.
    let mut local = SessionProgress::new(TEST_DEVICE, routine.id);
    local.current_session = 3;
    local.completed_sessions = [1, 2].into_iter().collect();

    let merged = store.write(local).await?;
    assert_eq!(merged.current_session, 3);
    assert_eq!(merged.completed_sessions.len(), 2);

    // The server now holds the pushed record; a fresh store sees it.
    let fresh = server.store(MemoryProgressCache::default(), routine.id);
    let read = fresh.read().await?;
    assert_eq!(read.source, ReadSource::Server);
    assert_eq!(read.progress.current_session, 3);
    assert!(read.progress.completed_sessions.contains(&2));

    Ok(())
}

#[tokio::test]
async fn test_revalidate_merges_server_and_offline_completions() -> Result<()> {
    let server = TestServer::new().await?;
    let routine = create_test_routine(&server.resources, TEST_DEVICE).await?;
    let _handle = server.start().await;

    // Another device session completes 1 and 2 against the server.
    server.complete_session(routine.id, 1).await;
    server.complete_session(routine.id, 2).await;

    // This device recorded session 3 while offline; it only exists in cache.
    let cache = MemoryProgressCache::default();
    let mut offline = SessionProgress::new(TEST_DEVICE, routine.id);
    offline.current_session = 4;
    offline.completed_sessions = [3].into_iter().collect();
    cache.put(offline).await?;

    let store = server.store(cache, routine.id);
    let merged = store.revalidate().await?;

    // The refresh keeps the offline completion and absorbs the server's.
    assert_eq!(merged.current_session, 4);
    assert_eq!(
        merged.completed_sessions.iter().copied().collect::<Vec<_>>(),
        vec![1, 2, 3]
    );

    // The cached copy was replaced by the merged record.
    let read = store.read().await?;
    assert_eq!(read.source, ReadSource::Cache);
    assert_eq!(read.progress.completed_sessions.len(), 3);

    Ok(())
}

#[tokio::test]
async fn test_server_completion_wins_over_offline_skip() -> Result<()> {
    let server = TestServer::new().await?;
    let routine = create_test_routine(&server.resources, TEST_DEVICE).await?;
    let _handle = server.start().await;

    server.complete_session(routine.id, 1).await;

    // The offline client skipped the same session.
    let mut offline = SessionProgress::new(TEST_DEVICE, routine.id);
    offline.current_session = 2;
    offline.skipped_sessions = [1].into_iter().collect();

    let store = server.store(MemoryProgressCache::default(), routine.id);
    let merged = store.write(offline).await?;

    assert!(merged.completed_sessions.contains(&1));
    assert!(merged.skipped_sessions.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_backend_fetch_unknown_routine_is_an_error() -> Result<()> {
    let server = TestServer::new().await?;
    let _handle = server.start().await;

    let store = server.store(MemoryProgressCache::default(), Uuid::new_v4());
    let err = store.read().await.unwrap_err();
    assert_eq!(err.http_status(), 502, "server 404 surfaces as upstream failure");

    Ok(())
}
