// ABOUTME: Route handler for the derived statistics REST API
// ABOUTME: Computes volume, muscle split, consistency, and PRs over a period window
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

//! Statistics routes

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::database::{RoutinesManager, SetsManager};
use crate::errors::AppError;
use crate::resources::ServerResources;
use crate::routes::require_device_id;
use crate::services::stats;
use crate::stats::StatsPeriod;

/// Query parameters for the statistics endpoint
#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    /// Aggregation window: week, month, year, or all (default)
    #[serde(default)]
    pub period: Option<String>,
}

/// Statistics routes implementation
pub struct StatsRoutes;

impl StatsRoutes {
    /// Create all statistics routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/stats/:device_id", get(Self::handle_stats))
            .with_state(resources)
    }

    /// Handle GET /api/stats/:device_id?period= - Compute derived statistics
    async fn handle_stats(
        State(resources): State<Arc<ServerResources>>,
        Path(device_id): Path<String>,
        Query(query): Query<StatsQuery>,
    ) -> Result<Response, AppError> {
        require_device_id(&device_id)?;
        let period = query
            .period
            .as_deref()
            .map_or(StatsPeriod::All, StatsPeriod::parse);

        let sets_manager = SetsManager::new(resources.database.pool().clone());
        let routines = RoutinesManager::new(resources.database.pool().clone());
        let derived = stats::compute_stats(
            &sets_manager,
            &routines,
            resources.catalog.as_ref(),
            &device_id,
            period,
        )
        .await?;
        Ok((StatusCode::OK, Json(derived)).into_response())
    }
}
