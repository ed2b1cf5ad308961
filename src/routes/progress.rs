// ABOUTME: Route handlers for the session progress REST API
// ABOUTME: Get-or-create, complete, skip, and client snapshot sync endpoints
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

//! Session progress routes
//!
//! Thin handlers over the progress service. All session arithmetic lives in
//! the pure engine; these endpoints only shape requests and responses.

use std::collections::BTreeSet;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::{ProgressManager, RoutinesManager};
use crate::errors::AppError;
use crate::models::SessionProgress;
use crate::resources::ServerResources;
use crate::routes::{parse_uuid, require_device_id};
use crate::services::progress;

/// Request body for completing or skipping a session
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionActionRequest {
    /// Owning device
    pub device_id: String,
    /// Routine whose progress is being advanced
    pub routine_id: Uuid,
    /// 1-based session the action applies to
    pub session_number: u32,
}

/// Request body for syncing a client-side progress snapshot
#[derive(Debug, Serialize, Deserialize)]
pub struct SyncProgressRequest {
    /// Owning device
    pub device_id: String,
    /// Routine whose progress is being synced
    pub routine_id: Uuid,
    /// Client's view of the next session to perform
    pub current_session: u32,
    /// Client's set of completed session numbers
    pub completed_sessions: BTreeSet<u32>,
    /// Client's set of skipped session numbers
    pub skipped_sessions: BTreeSet<u32>,
}

/// Session progress routes implementation
pub struct ProgressRoutes;

impl ProgressRoutes {
    /// Create all session progress routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/session-progress/:device_id/:routine_id",
                get(Self::handle_get),
            )
            .route(
                "/api/session-progress/complete",
                post(Self::handle_complete),
            )
            .route("/api/session-progress/skip", post(Self::handle_skip))
            .route("/api/session-progress/sync", put(Self::handle_sync))
            .with_state(resources)
    }

    fn managers(resources: &Arc<ServerResources>) -> (RoutinesManager, ProgressManager) {
        (
            RoutinesManager::new(resources.database.pool().clone()),
            ProgressManager::new(resources.database.pool().clone()),
        )
    }

    /// Handle GET /api/session-progress/:device_id/:routine_id
    ///
    /// Returns the stored record, creating the default (session 1, nothing
    /// completed) when none exists yet.
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path((device_id, routine_id)): Path<(String, String)>,
    ) -> Result<Response, AppError> {
        require_device_id(&device_id)?;
        let routine_id = parse_uuid(&routine_id, "routine")?;

        let (routines, progress_manager) = Self::managers(&resources);
        let record =
            progress::get_or_create(&routines, &progress_manager, &device_id, routine_id).await?;
        Ok((StatusCode::OK, Json(record)).into_response())
    }

    /// Handle POST /api/session-progress/complete
    async fn handle_complete(
        State(resources): State<Arc<ServerResources>>,
        Json(body): Json<SessionActionRequest>,
    ) -> Result<Response, AppError> {
        require_device_id(&body.device_id)?;

        let (routines, progress_manager) = Self::managers(&resources);
        let record = progress::complete(
            &routines,
            &progress_manager,
            &body.device_id,
            body.routine_id,
            body.session_number,
        )
        .await?;
        Ok((StatusCode::OK, Json(record)).into_response())
    }

    /// Handle POST /api/session-progress/skip
    async fn handle_skip(
        State(resources): State<Arc<ServerResources>>,
        Json(body): Json<SessionActionRequest>,
    ) -> Result<Response, AppError> {
        require_device_id(&body.device_id)?;

        let (routines, progress_manager) = Self::managers(&resources);
        let record = progress::skip(
            &routines,
            &progress_manager,
            &body.device_id,
            body.routine_id,
            body.session_number,
        )
        .await?;
        Ok((StatusCode::OK, Json(record)).into_response())
    }

    /// Handle PUT /api/session-progress/sync
    ///
    /// Reconciles an offline client snapshot with the server record and
    /// returns the merged result.
    async fn handle_sync(
        State(resources): State<Arc<ServerResources>>,
        Json(body): Json<SyncProgressRequest>,
    ) -> Result<Response, AppError> {
        require_device_id(&body.device_id)?;

        let snapshot = SessionProgress {
            device_id: body.device_id,
            routine_id: body.routine_id,
            current_session: body.current_session,
            completed_sessions: body.completed_sessions,
            skipped_sessions: body.skipped_sessions,
            last_workout_date: None,
            updated_at: Utc::now(),
        };

        let (routines, progress_manager) = Self::managers(&resources);
        let record = progress::sync(&routines, &progress_manager, &snapshot).await?;
        Ok((StatusCode::OK, Json(record)).into_response())
    }
}
