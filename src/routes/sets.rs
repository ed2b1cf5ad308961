// ABOUTME: Route handlers for the exercise set log REST API
// ABOUTME: Append, filtered listing with pagination, update, and delete
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

//! Exercise set routes
//!
//! The set log is append-only from the workout flow; update and delete exist
//! for explicit user corrections only.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::{ListSetsFilter, SetsManager};
use crate::errors::AppError;
use crate::models::ExerciseSet;
use crate::resources::ServerResources;
use crate::routes::{parse_uuid, require_device_id, DeviceQuery};

/// Request body for logging a set
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSetRequest {
    /// Owning device
    pub device_id: String,
    /// Exercise name as logged
    pub exercise: String,
    /// Repetitions performed
    pub reps: u32,
    /// Weight moved, in kilograms (0 for bodyweight work)
    pub weight_kg: f64,
    /// Session this set belongs to
    pub session_number: u32,
    /// Optional link back to the routine slot that prescribed it
    #[serde(default)]
    pub routine_exercise_id: Option<Uuid>,
}

/// Request body for correcting a previously logged set
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateSetRequest {
    /// Owning device
    pub device_id: String,
    /// Corrected exercise name
    pub exercise: String,
    /// Corrected repetitions
    pub reps: u32,
    /// Corrected weight, in kilograms
    pub weight_kg: f64,
    /// Corrected session number
    pub session_number: u32,
    /// Optional link back to the routine slot that prescribed it
    #[serde(default)]
    pub routine_exercise_id: Option<Uuid>,
}

/// Query parameters for listing sets
#[derive(Debug, Deserialize)]
pub struct ListSetsQuery {
    /// Opaque device identifier
    pub device_id: String,
    /// Exact exercise name filter
    #[serde(default)]
    pub exercise: Option<String>,
    /// Session number filter
    #[serde(default)]
    pub session_number: Option<u32>,
    /// Page size (capped server-side)
    #[serde(default)]
    pub limit: Option<u32>,
    /// Page offset
    #[serde(default)]
    pub offset: Option<u32>,
}

fn validate_set_fields(exercise: &str, reps: u32, weight_kg: f64) -> Result<(), AppError> {
    if exercise.trim().is_empty() {
        return Err(AppError::invalid_input("exercise must not be empty"));
    }
    if reps == 0 {
        return Err(AppError::invalid_input("reps must be at least 1"));
    }
    if !weight_kg.is_finite() || weight_kg < 0.0 {
        return Err(AppError::invalid_input(
            "weight_kg must be a non-negative number",
        ));
    }
    Ok(())
}

/// Exercise set routes implementation
pub struct SetsRoutes;

impl SetsRoutes {
    /// Create all set log routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/sets", post(Self::handle_create))
            .route("/api/sets", get(Self::handle_list))
            .route("/api/sets/:id", put(Self::handle_update))
            .route("/api/sets/:id", delete(Self::handle_delete))
            .with_state(resources)
    }

    fn manager(resources: &Arc<ServerResources>) -> SetsManager {
        SetsManager::new(resources.database.pool().clone())
    }

    /// Handle POST /api/sets - Append a set to the log
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        Json(body): Json<CreateSetRequest>,
    ) -> Result<Response, AppError> {
        require_device_id(&body.device_id)?;
        validate_set_fields(&body.exercise, body.reps, body.weight_kg)?;

        let set = ExerciseSet {
            id: Uuid::new_v4(),
            device_id: body.device_id,
            exercise: body.exercise,
            reps: body.reps,
            weight_kg: body.weight_kg,
            session_number: body.session_number,
            routine_exercise_id: body.routine_exercise_id,
            created_at: Utc::now(),
        };
        Self::manager(&resources).create(&set).await?;

        Ok((StatusCode::CREATED, Json(set)).into_response())
    }

    /// Handle GET /api/sets - List a device's sets, newest first
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<ListSetsQuery>,
    ) -> Result<Response, AppError> {
        require_device_id(&query.device_id)?;

        let filter = ListSetsFilter {
            exercise: query.exercise,
            session_number: query.session_number,
            limit: query.limit,
            offset: query.offset,
        };
        let sets = Self::manager(&resources)
            .list(&query.device_id, &filter)
            .await?;
        Ok((StatusCode::OK, Json(sets)).into_response())
    }

    /// Handle PUT /api/sets/:id - Correct a logged set
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
        Json(body): Json<UpdateSetRequest>,
    ) -> Result<Response, AppError> {
        require_device_id(&body.device_id)?;
        validate_set_fields(&body.exercise, body.reps, body.weight_kg)?;
        let set_id = parse_uuid(&id, "set")?;

        let replacement = ExerciseSet {
            id: set_id,
            device_id: body.device_id,
            exercise: body.exercise,
            reps: body.reps,
            weight_kg: body.weight_kg,
            session_number: body.session_number,
            routine_exercise_id: body.routine_exercise_id,
            // Preserved by the update statement; never written back.
            created_at: Utc::now(),
        };
        let updated = Self::manager(&resources)
            .update(&replacement)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Set {set_id}")))?;

        Ok((StatusCode::OK, Json(updated)).into_response())
    }

    /// Handle DELETE /api/sets/:id - Remove a logged set
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
        Query(query): Query<DeviceQuery>,
    ) -> Result<Response, AppError> {
        require_device_id(&query.device_id)?;
        let set_id = parse_uuid(&id, "set")?;

        let deleted = Self::manager(&resources)
            .delete(&query.device_id, set_id)
            .await?;
        if !deleted {
            return Err(AppError::not_found(format!("Set {set_id}")));
        }
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
