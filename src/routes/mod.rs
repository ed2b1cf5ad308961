// ABOUTME: Route module organization for IronLog HTTP endpoints
// ABOUTME: Centralized route definitions organized by domain with thin handlers over services
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

//! Route modules for the IronLog server
//!
//! Each domain module contains only route definitions, request/response
//! types, and thin handler functions that delegate to the service and
//! database layers.

/// Exercise catalog routes (builtin table + custom entries)
pub mod catalog;
/// Health check and readiness routes
pub mod health;
/// Body measurement routes
pub mod measurements;
/// Session progress routes (get, complete, skip, sync)
pub mod progress;
/// Routine CRUD and activation routes
pub mod routines;
/// Exercise set logging routes
pub mod sets;
/// Statistics routes
pub mod stats;

/// Catalog route handlers
pub use catalog::CatalogRoutes;
/// Health check route handlers
pub use health::HealthRoutes;
/// Measurement route handlers
pub use measurements::MeasurementsRoutes;
/// Session progress route handlers
pub use progress::ProgressRoutes;
/// Routine route handlers
pub use routines::RoutinesRoutes;
/// Exercise set route handlers
pub use sets::SetsRoutes;
/// Statistics route handlers
pub use stats::StatsRoutes;

use serde::Deserialize;

use crate::errors::{AppError, AppResult};

/// Query parameters identifying the requesting device
///
/// Every read endpoint scopes its data by device, so this extractor is
/// shared across the domain route modules.
#[derive(Debug, Deserialize)]
pub struct DeviceQuery {
    /// Opaque device identifier
    pub device_id: String,
}

/// Parse a path or body segment as a UUID, rejecting malformed input with
/// a 400 before any business logic runs.
pub(crate) fn parse_uuid(value: &str, what: &str) -> AppResult<uuid::Uuid> {
    uuid::Uuid::parse_str(value)
        .map_err(|_| AppError::invalid_input(format!("Invalid {what} id: {value}")))
}

/// Reject blank device identifiers before touching the database.
pub(crate) fn require_device_id(device_id: &str) -> AppResult<()> {
    if device_id.trim().is_empty() {
        return Err(AppError::invalid_input("device_id must not be empty"));
    }
    Ok(())
}
