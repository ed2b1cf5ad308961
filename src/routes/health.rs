// ABOUTME: Health check route handlers for service monitoring and status endpoints
// ABOUTME: Provides liveness and readiness endpoints for monitoring infrastructure
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

//! Health check routes for service monitoring
//!
//! `/health` is a pure liveness probe; `/ready` additionally verifies the
//! database answers a trivial query.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};

use crate::resources::ServerResources;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health check routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/health", get(Self::handle_health))
            .route("/ready", get(Self::handle_ready))
            .with_state(resources)
    }

    /// Handle GET /health - liveness probe
    async fn handle_health() -> Json<serde_json::Value> {
        Json(serde_json::json!({
            "status": "healthy",
            "service": crate::constants::service_names::IRONLOG_SERVER,
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": chrono::Utc::now().to_rfc3339()
        }))
    }

    /// Handle GET /ready - readiness probe including a database ping
    async fn handle_ready(State(resources): State<Arc<ServerResources>>) -> Response {
        let database_ok = sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(resources.database.pool())
            .await
            .is_ok();

        let status = if database_ok {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };

        let body = Json(serde_json::json!({
            "status": if database_ok { "ready" } else { "unavailable" },
            "checks": { "database": database_ok },
            "timestamp": chrono::Utc::now().to_rfc3339()
        }));

        (status, body).into_response()
    }
}
