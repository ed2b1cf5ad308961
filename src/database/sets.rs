// ABOUTME: Database operations for the append-only exercise set log
// ABOUTME: Filtered, paginated listing plus the unpaginated fetch the stats engine uses
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

use crate::constants::limits::{DEFAULT_SETS_PAGE_SIZE, MAX_SETS_PAGE_SIZE};
use crate::errors::{AppError, AppResult};
use crate::models::ExerciseSet;

/// Filter options for listing exercise sets
#[derive(Debug, Clone, Default)]
pub struct ListSetsFilter {
    /// Filter by exercise name (exact match)
    pub exercise: Option<String>,
    /// Filter by session number
    pub session_number: Option<u32>,
    /// Maximum number of results
    pub limit: Option<u32>,
    /// Offset for pagination
    pub offset: Option<u32>,
}

/// Database manager for the exercise set log
pub struct SetsManager {
    pool: SqlitePool,
}

impl SetsManager {
    /// Create a new sets manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Append a set to the log
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn create(&self, set: &ExerciseSet) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO exercise_sets (
                id, device_id, exercise, reps, weight_kg, session_number,
                routine_exercise_id, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(set.id.to_string())
        .bind(&set.device_id)
        .bind(&set.exercise)
        .bind(i64::from(set.reps))
        .bind(set.weight_kg)
        .bind(i64::from(set.session_number))
        .bind(set.routine_exercise_id.map(|id| id.to_string()))
        .bind(set.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create set: {e}")))?;

        Ok(())
    }

    /// Get a set by ID, scoped to its owning device
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get(&self, device_id: &str, set_id: Uuid) -> AppResult<Option<ExerciseSet>> {
        let row = sqlx::query(
            r"
            SELECT id, device_id, exercise, reps, weight_kg, session_number,
                   routine_exercise_id, created_at
            FROM exercise_sets
            WHERE id = $1 AND device_id = $2
            ",
        )
        .bind(set_id.to_string())
        .bind(device_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get set: {e}")))?;

        row.map(|r| row_to_set(&r)).transpose()
    }

    /// List sets for a device with optional filtering, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list(
        &self,
        device_id: &str,
        filter: &ListSetsFilter,
    ) -> AppResult<Vec<ExerciseSet>> {
        let limit = filter
            .limit
            .unwrap_or(DEFAULT_SETS_PAGE_SIZE)
            .min(MAX_SETS_PAGE_SIZE);
        let limit_val = i32::try_from(limit).unwrap_or(i32::MAX);
        let offset_val = i32::try_from(filter.offset.unwrap_or(0)).unwrap_or(0);

        // Build dynamic query with parameterized conditions to prevent SQL injection
        let mut conditions = vec!["device_id = ?".to_owned()];
        let mut bind_values: Vec<String> = vec![device_id.to_owned()];

        if let Some(ref exercise) = filter.exercise {
            conditions.push("exercise = ?".to_owned());
            bind_values.push(exercise.clone());
        }
        if let Some(session) = filter.session_number {
            conditions.push("session_number = ?".to_owned());
            bind_values.push(session.to_string());
        }

        let query = format!(
            r"
            SELECT id, device_id, exercise, reps, weight_kg, session_number,
                   routine_exercise_id, created_at
            FROM exercise_sets
            WHERE {}
            ORDER BY created_at DESC
            LIMIT ? OFFSET ?
            ",
            conditions.join(" AND ")
        );

        let mut sql_query = sqlx::query(&query);
        for value in &bind_values {
            sql_query = sql_query.bind(value);
        }
        sql_query = sql_query.bind(limit_val).bind(offset_val);

        let rows = sql_query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list sets: {e}")))?;

        rows.iter().map(row_to_set).collect()
    }

    /// Fetch every set for a device at or after an optional cutoff
    ///
    /// Used by the statistics engine, which recomputes over the full window
    /// and must not be paginated.
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list_for_stats(
        &self,
        device_id: &str,
        since: Option<DateTime<Utc>>,
    ) -> AppResult<Vec<ExerciseSet>> {
        let rows = match since {
            Some(bound) => {
                sqlx::query(
                    r"
                    SELECT id, device_id, exercise, reps, weight_kg, session_number,
                           routine_exercise_id, created_at
                    FROM exercise_sets
                    WHERE device_id = $1 AND created_at >= $2
                    ORDER BY created_at ASC
                    ",
                )
                .bind(device_id)
                .bind(bound.to_rfc3339())
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(
                    r"
                    SELECT id, device_id, exercise, reps, weight_kg, session_number,
                           routine_exercise_id, created_at
                    FROM exercise_sets
                    WHERE device_id = $1
                    ORDER BY created_at ASC
                    ",
                )
                .bind(device_id)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| AppError::database(format!("Failed to fetch sets for stats: {e}")))?;

        rows.iter().map(row_to_set).collect()
    }

    /// Replace a set's logged values
    ///
    /// Returns the updated set, or `None` when no row matched.
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn update(&self, set: &ExerciseSet) -> AppResult<Option<ExerciseSet>> {
        let result = sqlx::query(
            r"
            UPDATE exercise_sets SET
                exercise = $1, reps = $2, weight_kg = $3, session_number = $4,
                routine_exercise_id = $5
            WHERE id = $6 AND device_id = $7
            ",
        )
        .bind(&set.exercise)
        .bind(i64::from(set.reps))
        .bind(set.weight_kg)
        .bind(i64::from(set.session_number))
        .bind(set.routine_exercise_id.map(|id| id.to_string()))
        .bind(set.id.to_string())
        .bind(&set.device_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update set: {e}")))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get(&set.device_id, set.id).await
    }

    /// Delete a set
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn delete(&self, device_id: &str, set_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            r"
            DELETE FROM exercise_sets
            WHERE id = $1 AND device_id = $2
            ",
        )
        .bind(set_id.to_string())
        .bind(device_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to delete set: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}

/// Convert a database row to an `ExerciseSet`
fn row_to_set(row: &SqliteRow) -> AppResult<ExerciseSet> {
    let id_str: String = row.get("id");
    let routine_exercise_id_str: Option<String> = row.get("routine_exercise_id");
    let reps: i64 = row.get("reps");
    let session_number: i64 = row.get("session_number");
    let created_at_str: String = row.get("created_at");

    let routine_exercise_id = routine_exercise_id_str
        .map(|s| Uuid::parse_str(&s))
        .transpose()
        .map_err(|e| AppError::internal(format!("Invalid routine exercise UUID: {e}")))?;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Ok(ExerciseSet {
        id: Uuid::parse_str(&id_str)
            .map_err(|e| AppError::internal(format!("Invalid set UUID: {e}")))?,
        device_id: row.get("device_id"),
        exercise: row.get("exercise"),
        reps: reps as u32,
        weight_kg: row.get("weight_kg"),
        session_number: session_number as u32,
        routine_exercise_id,
        created_at: DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|e| AppError::internal(format!("Invalid datetime: {e}")))?
            .with_timezone(&Utc),
    })
}
