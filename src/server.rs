// ABOUTME: HTTP server assembly: merges domain routers and applies the middleware stack
// ABOUTME: Owns the listener lifecycle including graceful shutdown on ctrl-c
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

//! Server runtime
//!
//! [`IronLogServer`] wires every domain router onto one [`axum::Router`],
//! layers request tracing, request ids, CORS, timeouts, and body limits on
//! top, and serves the result until interrupted.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue};
use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

use crate::middleware::cors::setup_cors;
use crate::resources::ServerResources;
use crate::routes::{
    CatalogRoutes, HealthRoutes, MeasurementsRoutes, ProgressRoutes, RoutinesRoutes, SetsRoutes,
    StatsRoutes,
};

/// HTTP server over centralized resources
pub struct IronLogServer {
    resources: Arc<ServerResources>,
}

impl IronLogServer {
    /// Create a new server from shared resources
    #[must_use]
    pub const fn new(resources: Arc<ServerResources>) -> Self {
        Self { resources }
    }

    /// Build the complete application router, middleware included.
    ///
    /// Exposed separately from [`run`](Self::run) so tests can drive the
    /// router directly without binding a socket.
    #[must_use]
    pub fn router(resources: Arc<ServerResources>) -> Router {
        let config = resources.config.clone();

        let middleware = ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(RequestBodyLimitLayer::new(config.http.max_body_bytes))
            .layer(setup_cors(&config))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.http.request_timeout_secs,
            )))
            .layer(SetResponseHeaderLayer::if_not_present(
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ));

        Router::new()
            .merge(HealthRoutes::routes(resources.clone()))
            .merge(RoutinesRoutes::routes(resources.clone()))
            .merge(SetsRoutes::routes(resources.clone()))
            .merge(MeasurementsRoutes::routes(resources.clone()))
            .merge(ProgressRoutes::routes(resources.clone()))
            .merge(StatsRoutes::routes(resources.clone()))
            .merge(CatalogRoutes::routes(resources))
            .layer(middleware)
    }

    /// Bind the port and serve until ctrl-c.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind or serve the port
    pub async fn run(self, port: u16) -> Result<()> {
        let app = Self::router(self.resources);

        let listener = TcpListener::bind(("0.0.0.0", port))
            .await
            .with_context(|| format!("Failed to bind port {port}"))?;
        info!("HTTP server listening on port {port}");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP server error")?;

        info!("HTTP server shut down");
        Ok(())
    }
}

/// Resolve when the process receives an interrupt.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install ctrl-c handler: {e}");
        // Fall through and shut down rather than serving without a handler.
    }
    info!("Shutdown signal received");
}
