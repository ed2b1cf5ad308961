// ABOUTME: Route handlers for the routines REST API (training plan CRUD + activation)
// ABOUTME: Explicit request schemas validated at the boundary before any business logic
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

//! Routine routes
//!
//! CRUD over training routines plus the single-active selection. At most one
//! routine is active per device; activation deactivates every sibling in the
//! same transaction.

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

use crate::database::RoutinesManager;
use crate::errors::AppError;
use crate::models::{Routine, RoutineDay, RoutineExercise};
use crate::resources::ServerResources;
use crate::routes::{parse_uuid, require_device_id, DeviceQuery};

/// One exercise slot in a routine create/update request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutineExerciseBody {
    /// Exercise name as shown to the user
    pub name: String,
    /// Prescribed number of working sets
    pub target_sets: u32,
    /// Prescribed repetitions per set
    pub target_reps: u32,
    /// Optional rest between sets, in seconds
    #[serde(default)]
    pub rest_seconds: Option<u32>,
}

/// One training day in a routine create/update request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutineDayBody {
    /// Day label (e.g., "Push", "Pull", "Legs")
    pub name: String,
    /// Exercises prescribed for this day, in order
    pub exercises: Vec<RoutineExerciseBody>,
}

/// Request body for creating a routine
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateRoutineRequest {
    /// Owning device
    pub device_id: String,
    /// Routine name
    pub name: String,
    /// Ordered training days
    pub days: Vec<RoutineDayBody>,
    /// Planned number of sessions in the full cycle
    pub total_sessions: u32,
    /// Activate this routine immediately
    #[serde(default)]
    pub activate: bool,
}

/// Request body for updating a routine's plan
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateRoutineRequest {
    /// Owning device
    pub device_id: String,
    /// New routine name
    pub name: String,
    /// Replacement day list
    pub days: Vec<RoutineDayBody>,
    /// New planned session count
    pub total_sessions: u32,
}

fn days_from_bodies(days: Vec<RoutineDayBody>) -> Vec<RoutineDay> {
    days.into_iter()
        .enumerate()
        .map(|(order, day)| RoutineDay {
            order: order as u32,
            name: day.name,
            exercises: day
                .exercises
                .into_iter()
                .map(|exercise| RoutineExercise {
                    id: Uuid::new_v4(),
                    name: exercise.name,
                    target_sets: exercise.target_sets,
                    target_reps: exercise.target_reps,
                    rest_seconds: exercise.rest_seconds,
                })
                .collect(),
        })
        .collect()
}

/// Routine routes implementation
pub struct RoutinesRoutes;

impl RoutinesRoutes {
    /// Create all routine routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/routines", post(Self::handle_create))
            .route("/api/routines", get(Self::handle_list))
            .route("/api/routines/active", get(Self::handle_get_active))
            .route("/api/routines/:id", get(Self::handle_get))
            .route("/api/routines/:id", put(Self::handle_update))
            .route("/api/routines/:id", delete(Self::handle_delete))
            .route("/api/routines/:id/activate", post(Self::handle_activate))
            .with_state(resources)
    }

    fn manager(resources: &Arc<ServerResources>) -> RoutinesManager {
        RoutinesManager::new(resources.database.pool().clone())
    }

    /// Handle POST /api/routines - Create a routine
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        Json(body): Json<CreateRoutineRequest>,
    ) -> Result<Response, AppError> {
        require_device_id(&body.device_id)?;

        let now = Utc::now();
        let routine = Routine {
            id: Uuid::new_v4(),
            device_id: body.device_id,
            name: body.name,
            days: days_from_bodies(body.days),
            total_sessions: body.total_sessions,
            is_active: false,
            created_at: now,
            updated_at: now,
        };
        routine.validate()?;

        let manager = Self::manager(&resources);
        manager.create(&routine).await?;

        let routine = if body.activate {
            manager
                .activate(&routine.device_id, routine.id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Routine {}", routine.id)))?
        } else {
            routine
        };

        Ok((StatusCode::CREATED, Json(routine)).into_response())
    }

    /// Handle GET /api/routines?device_id= - List a device's routines
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<DeviceQuery>,
    ) -> Result<Response, AppError> {
        require_device_id(&query.device_id)?;

        let routines = Self::manager(&resources).list(&query.device_id).await?;
        Ok((StatusCode::OK, Json(routines)).into_response())
    }

    /// Handle GET /api/routines/active?device_id= - The device's active routine
    async fn handle_get_active(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<DeviceQuery>,
    ) -> Result<Response, AppError> {
        require_device_id(&query.device_id)?;

        let routine = Self::manager(&resources)
            .get_active(&query.device_id)
            .await?
            .ok_or_else(|| AppError::not_found("Active routine"))?;
        Ok((StatusCode::OK, Json(routine)).into_response())
    }

    /// Handle GET /api/routines/:id - Fetch one routine
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
        Query(query): Query<DeviceQuery>,
    ) -> Result<Response, AppError> {
        require_device_id(&query.device_id)?;
        let routine_id = parse_uuid(&id, "routine")?;

        let routine = Self::manager(&resources)
            .get(&query.device_id, routine_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Routine {routine_id}")))?;
        Ok((StatusCode::OK, Json(routine)).into_response())
    }

    /// Handle PUT /api/routines/:id - Replace a routine's plan
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
        Json(body): Json<UpdateRoutineRequest>,
    ) -> Result<Response, AppError> {
        require_device_id(&body.device_id)?;
        let routine_id = parse_uuid(&id, "routine")?;

        let now = Utc::now();
        let replacement = Routine {
            id: routine_id,
            device_id: body.device_id,
            name: body.name,
            days: days_from_bodies(body.days),
            total_sessions: body.total_sessions,
            is_active: false,
            created_at: now,
            updated_at: now,
        };
        replacement.validate()?;

        let routine = Self::manager(&resources)
            .update(&replacement)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Routine {routine_id}")))?;
        Ok((StatusCode::OK, Json(routine)).into_response())
    }

    /// Handle DELETE /api/routines/:id - Delete a routine and its progress
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
        Query(query): Query<DeviceQuery>,
    ) -> Result<Response, AppError> {
        require_device_id(&query.device_id)?;
        let routine_id = parse_uuid(&id, "routine")?;

        let deleted = Self::manager(&resources)
            .delete(&query.device_id, routine_id)
            .await?;
        if !deleted {
            return Err(AppError::not_found(format!("Routine {routine_id}")));
        }
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    /// Handle POST /api/routines/:id/activate - Make this the device's active routine
    async fn handle_activate(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
        Query(query): Query<DeviceQuery>,
    ) -> Result<Response, AppError> {
        require_device_id(&query.device_id)?;
        let routine_id = parse_uuid(&id, "routine")?;

        let routine = Self::manager(&resources)
            .activate(&query.device_id, routine_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Routine {routine_id}")))?;
        Ok((StatusCode::OK, Json(routine)).into_response())
    }
}
