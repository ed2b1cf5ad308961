// ABOUTME: Database operations for dated body measurements
// ABOUTME: Every measured field is optional; rows list newest first per device
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::BodyMeasurement;

/// Database manager for body measurement storage
pub struct MeasurementsManager {
    pool: SqlitePool,
}

impl MeasurementsManager {
    /// Create a new measurements manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new measurement
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn create(&self, measurement: &BodyMeasurement) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO body_measurements (
                id, device_id, weight_kg, body_fat_pct, chest_cm, waist_cm,
                hips_cm, arm_cm, thigh_cm, notes, recorded_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ",
        )
        .bind(measurement.id.to_string())
        .bind(&measurement.device_id)
        .bind(measurement.weight_kg)
        .bind(measurement.body_fat_pct)
        .bind(measurement.chest_cm)
        .bind(measurement.waist_cm)
        .bind(measurement.hips_cm)
        .bind(measurement.arm_cm)
        .bind(measurement.thigh_cm)
        .bind(&measurement.notes)
        .bind(measurement.recorded_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create measurement: {e}")))?;

        Ok(())
    }

    /// List measurements for a device, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list(&self, device_id: &str) -> AppResult<Vec<BodyMeasurement>> {
        let rows = sqlx::query(
            r"
            SELECT id, device_id, weight_kg, body_fat_pct, chest_cm, waist_cm,
                   hips_cm, arm_cm, thigh_cm, notes, recorded_at
            FROM body_measurements
            WHERE device_id = $1
            ORDER BY recorded_at DESC
            ",
        )
        .bind(device_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list measurements: {e}")))?;

        rows.iter().map(row_to_measurement).collect()
    }

    /// Delete a measurement
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn delete(&self, device_id: &str, measurement_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            r"
            DELETE FROM body_measurements
            WHERE id = $1 AND device_id = $2
            ",
        )
        .bind(measurement_id.to_string())
        .bind(device_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to delete measurement: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}

/// Convert a database row to a `BodyMeasurement`
fn row_to_measurement(row: &SqliteRow) -> AppResult<BodyMeasurement> {
    let id_str: String = row.get("id");
    let recorded_at_str: String = row.get("recorded_at");

    Ok(BodyMeasurement {
        id: Uuid::parse_str(&id_str)
            .map_err(|e| AppError::internal(format!("Invalid measurement UUID: {e}")))?,
        device_id: row.get("device_id"),
        weight_kg: row.get("weight_kg"),
        body_fat_pct: row.get("body_fat_pct"),
        chest_cm: row.get("chest_cm"),
        waist_cm: row.get("waist_cm"),
        hips_cm: row.get("hips_cm"),
        arm_cm: row.get("arm_cm"),
        thigh_cm: row.get("thigh_cm"),
        notes: row.get("notes"),
        recorded_at: DateTime::parse_from_rfc3339(&recorded_at_str)
            .map_err(|e| AppError::internal(format!("Invalid datetime: {e}")))?
            .with_timezone(&Utc),
    })
}
