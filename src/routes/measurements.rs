// ABOUTME: Route handlers for the body measurement REST API
// ABOUTME: Create, list newest-first, and delete dated measurement entries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

//! Body measurement routes

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::MeasurementsManager;
use crate::errors::AppError;
use crate::models::BodyMeasurement;
use crate::resources::ServerResources;
use crate::routes::{parse_uuid, require_device_id, DeviceQuery};

/// Request body for recording a measurement; every measured field is optional
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateMeasurementRequest {
    /// Owning device
    pub device_id: String,
    /// Body weight in kilograms
    #[serde(default)]
    pub weight_kg: Option<f64>,
    /// Body fat percentage
    #[serde(default)]
    pub body_fat_pct: Option<f64>,
    /// Chest circumference in centimeters
    #[serde(default)]
    pub chest_cm: Option<f64>,
    /// Waist circumference in centimeters
    #[serde(default)]
    pub waist_cm: Option<f64>,
    /// Hips circumference in centimeters
    #[serde(default)]
    pub hips_cm: Option<f64>,
    /// Upper arm circumference in centimeters
    #[serde(default)]
    pub arm_cm: Option<f64>,
    /// Thigh circumference in centimeters
    #[serde(default)]
    pub thigh_cm: Option<f64>,
    /// Free-form notes
    #[serde(default)]
    pub notes: Option<String>,
    /// When the measurement was taken; defaults to now
    #[serde(default)]
    pub recorded_at: Option<DateTime<Utc>>,
}

impl CreateMeasurementRequest {
    fn has_any_value(&self) -> bool {
        self.weight_kg.is_some()
            || self.body_fat_pct.is_some()
            || self.chest_cm.is_some()
            || self.waist_cm.is_some()
            || self.hips_cm.is_some()
            || self.arm_cm.is_some()
            || self.thigh_cm.is_some()
    }
}

/// Body measurement routes implementation
pub struct MeasurementsRoutes;

impl MeasurementsRoutes {
    /// Create all measurement routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/measurements", post(Self::handle_create))
            .route("/api/measurements", get(Self::handle_list))
            .route("/api/measurements/:id", delete(Self::handle_delete))
            .with_state(resources)
    }

    fn manager(resources: &Arc<ServerResources>) -> MeasurementsManager {
        MeasurementsManager::new(resources.database.pool().clone())
    }

    /// Handle POST /api/measurements - Record a measurement
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        Json(body): Json<CreateMeasurementRequest>,
    ) -> Result<Response, AppError> {
        require_device_id(&body.device_id)?;
        if !body.has_any_value() {
            return Err(AppError::invalid_input(
                "measurement must include at least one measured value",
            ));
        }

        let measurement = BodyMeasurement {
            id: Uuid::new_v4(),
            device_id: body.device_id,
            weight_kg: body.weight_kg,
            body_fat_pct: body.body_fat_pct,
            chest_cm: body.chest_cm,
            waist_cm: body.waist_cm,
            hips_cm: body.hips_cm,
            arm_cm: body.arm_cm,
            thigh_cm: body.thigh_cm,
            notes: body.notes,
            recorded_at: body.recorded_at.unwrap_or_else(Utc::now),
        };
        Self::manager(&resources).create(&measurement).await?;

        Ok((StatusCode::CREATED, Json(measurement)).into_response())
    }

    /// Handle GET /api/measurements?device_id= - List measurements, newest first
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<DeviceQuery>,
    ) -> Result<Response, AppError> {
        require_device_id(&query.device_id)?;

        let measurements = Self::manager(&resources).list(&query.device_id).await?;
        Ok((StatusCode::OK, Json(measurements)).into_response())
    }

    /// Handle DELETE /api/measurements/:id - Remove a measurement
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
        Query(query): Query<DeviceQuery>,
    ) -> Result<Response, AppError> {
        require_device_id(&query.device_id)?;
        let measurement_id = parse_uuid(&id, "measurement")?;

        let deleted = Self::manager(&resources)
            .delete(&query.device_id, measurement_id)
            .await?;
        if !deleted {
            return Err(AppError::not_found(format!(
                "Measurement {measurement_id}"
            )));
        }
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
