// ABOUTME: Authoritative progress backend: trait seam plus the reqwest implementation
// ABOUTME: Talks to the session-progress REST endpoints of an IronLog server
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use std::collections::BTreeSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use serde::Serialize;
use url::Url;
use uuid::Uuid;

use crate::constants::service_names;
use crate::errors::{AppError, AppResult};
use crate::models::SessionProgress;

const REQUEST_TIMEOUT_SECS: u64 = 30;
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Authoritative server tier of the progress store
#[async_trait]
pub trait ProgressBackend: Send + Sync {
    /// Fetch the server record for a device+routine pair
    ///
    /// The server creates the default record when none exists, so a
    /// successful fetch always yields a value.
    async fn fetch(&self, device_id: &str, routine_id: Uuid) -> AppResult<SessionProgress>;

    /// Push a local snapshot and receive the merged server record
    async fn push_sync(&self, snapshot: &SessionProgress) -> AppResult<SessionProgress>;
}

/// Wire form of the sync request body
#[derive(Debug, Serialize)]
struct SyncBody<'a> {
    device_id: &'a str,
    routine_id: Uuid,
    current_session: u32,
    completed_sessions: &'a BTreeSet<u32>,
    skipped_sessions: &'a BTreeSet<u32>,
}

/// Progress backend over the IronLog REST API
///
/// The base URL is injected rather than compiled in; devices point at
/// whatever host serves their data.
pub struct HttpProgressBackend {
    client: Client,
    base_url: Url,
}

impl HttpProgressBackend {
    /// Create a backend with pooled connections and conservative timeouts
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client, base_url }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    async fn decode_progress(response: reqwest::Response) -> AppResult<SessionProgress> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::external_service(
                service_names::IRONLOG_SERVER,
                format!("{status}: {body}"),
            ));
        }
        Ok(response.json::<SessionProgress>().await?)
    }
}

#[async_trait]
impl ProgressBackend for HttpProgressBackend {
    async fn fetch(&self, device_id: &str, routine_id: Uuid) -> AppResult<SessionProgress> {
        let url = self.endpoint(&format!("api/session-progress/{device_id}/{routine_id}"));
        let response = self.client.get(&url).send().await?;
        Self::decode_progress(response).await
    }

    async fn push_sync(&self, snapshot: &SessionProgress) -> AppResult<SessionProgress> {
        let url = self.endpoint("api/session-progress/sync");
        let body = SyncBody {
            device_id: &snapshot.device_id,
            routine_id: snapshot.routine_id,
            current_session: snapshot.current_session,
            completed_sessions: &snapshot.completed_sessions,
            skipped_sessions: &snapshot.skipped_sessions,
        };
        let response = self.client.put(&url).json(&body).send().await?;
        Self::decode_progress(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_doubling_slashes() {
        let with_slash = HttpProgressBackend::new(Url::parse("http://localhost:8080/").unwrap());
        let without = HttpProgressBackend::new(Url::parse("http://localhost:8080").unwrap());

        assert_eq!(
            with_slash.endpoint("api/session-progress/sync"),
            "http://localhost:8080/api/session-progress/sync"
        );
        assert_eq!(
            without.endpoint("api/session-progress/sync"),
            "http://localhost:8080/api/session-progress/sync"
        );
    }
}
