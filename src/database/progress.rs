// ABOUTME: Database operations for per device+routine session progress records
// ABOUTME: Single-row upsert keyed on (device_id, routine_id); session sets persist as JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::SessionProgress;

/// Database manager for session progress storage
pub struct ProgressManager {
    pool: SqlitePool,
}

impl ProgressManager {
    /// Create a new progress manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the progress record for a device+routine pair
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get(
        &self,
        device_id: &str,
        routine_id: Uuid,
    ) -> AppResult<Option<SessionProgress>> {
        let row = sqlx::query(
            r"
            SELECT device_id, routine_id, current_session, completed_sessions,
                   skipped_sessions, last_workout_date, updated_at
            FROM session_progress
            WHERE device_id = $1 AND routine_id = $2
            ",
        )
        .bind(device_id)
        .bind(routine_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get session progress: {e}")))?;

        row.map(|r| row_to_progress(&r)).transpose()
    }

    /// Insert or replace the progress record for a device+routine pair
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn upsert(&self, progress: &SessionProgress) -> AppResult<()> {
        let completed_json = serde_json::to_string(&progress.completed_sessions)?;
        let skipped_json = serde_json::to_string(&progress.skipped_sessions)?;

        sqlx::query(
            r"
            INSERT INTO session_progress (
                device_id, routine_id, current_session, completed_sessions,
                skipped_sessions, last_workout_date, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT(device_id, routine_id) DO UPDATE SET
                current_session = excluded.current_session,
                completed_sessions = excluded.completed_sessions,
                skipped_sessions = excluded.skipped_sessions,
                last_workout_date = excluded.last_workout_date,
                updated_at = excluded.updated_at
            ",
        )
        .bind(&progress.device_id)
        .bind(progress.routine_id.to_string())
        .bind(i64::from(progress.current_session))
        .bind(&completed_json)
        .bind(&skipped_json)
        .bind(progress.last_workout_date.map(|d| d.to_rfc3339()))
        .bind(progress.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to upsert session progress: {e}")))?;

        Ok(())
    }
}

/// Convert a database row to a `SessionProgress`
fn row_to_progress(row: &SqliteRow) -> AppResult<SessionProgress> {
    let routine_id_str: String = row.get("routine_id");
    let current_session: i64 = row.get("current_session");
    let completed_json: String = row.get("completed_sessions");
    let skipped_json: String = row.get("skipped_sessions");
    let last_workout_date_str: Option<String> = row.get("last_workout_date");
    let updated_at_str: String = row.get("updated_at");

    let completed_sessions: BTreeSet<u32> = serde_json::from_str(&completed_json)?;
    let skipped_sessions: BTreeSet<u32> = serde_json::from_str(&skipped_json)?;
    let last_workout_date = last_workout_date_str
        .map(|s| DateTime::parse_from_rfc3339(&s))
        .transpose()
        .map_err(|e| AppError::internal(format!("Invalid datetime: {e}")))?
        .map(|d| d.with_timezone(&Utc));

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Ok(SessionProgress {
        device_id: row.get("device_id"),
        routine_id: Uuid::parse_str(&routine_id_str)
            .map_err(|e| AppError::internal(format!("Invalid routine UUID: {e}")))?,
        current_session: current_session as u32,
        completed_sessions,
        skipped_sessions,
        last_workout_date,
        updated_at: DateTime::parse_from_rfc3339(&updated_at_str)
            .map_err(|e| AppError::internal(format!("Invalid datetime: {e}")))?
            .with_timezone(&Utc),
    })
}
