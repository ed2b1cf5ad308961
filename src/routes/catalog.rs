// ABOUTME: Route handlers for the exercise catalog REST API
// ABOUTME: Listing, name lookup, and custom entry registration over the layered catalog
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

//! Exercise catalog routes
//!
//! Reads go through the layered catalog (custom entries shadow the builtin
//! table); writes register custom entries keyed by normalized name.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::catalog::normalize_name;
use crate::database::ExerciseCatalogManager;
use crate::errors::AppError;
use crate::models::{Equipment, ExerciseInfo, ExerciseKind, MuscleGroup};
use crate::resources::ServerResources;

/// Request body for registering a custom exercise
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateExerciseRequest {
    /// Display name of the exercise
    pub name: String,
    /// Primary muscle group trained
    pub muscle: MuscleGroup,
    /// Equipment category
    pub equipment: Equipment,
    /// Compound or isolation classification
    pub kind: ExerciseKind,
}

/// Exercise catalog routes implementation
pub struct CatalogRoutes;

impl CatalogRoutes {
    /// Create all catalog routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/exercises", get(Self::handle_list))
            .route("/api/exercises", post(Self::handle_create))
            .route("/api/exercises/:name", get(Self::handle_lookup))
            .with_state(resources)
    }

    /// Handle GET /api/exercises - Every known exercise, ordered by name
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let entries = resources.catalog.entries().await?;
        Ok((StatusCode::OK, Json(entries)).into_response())
    }

    /// Handle GET /api/exercises/:name - Resolve one exercise by name
    ///
    /// Lookup is case- and whitespace-insensitive and follows aliases.
    async fn handle_lookup(
        State(resources): State<Arc<ServerResources>>,
        Path(name): Path<String>,
    ) -> Result<Response, AppError> {
        let info = resources
            .catalog
            .lookup(&name)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Exercise '{name}'")))?;
        Ok((StatusCode::OK, Json(info)).into_response())
    }

    /// Handle POST /api/exercises - Register a custom exercise
    ///
    /// The entry shadows any builtin exercise with the same normalized name.
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        Json(body): Json<CreateExerciseRequest>,
    ) -> Result<Response, AppError> {
        let normalized = normalize_name(&body.name);
        if normalized.is_empty() {
            return Err(AppError::invalid_input("exercise name must not be empty"));
        }

        let info = ExerciseInfo {
            name: body.name,
            muscle: body.muscle,
            equipment: body.equipment,
            kind: body.kind,
        };
        ExerciseCatalogManager::new(resources.database.pool().clone())
            .create(&normalized, &info)
            .await?;

        Ok((StatusCode::CREATED, Json(info)).into_response())
    }
}
