// ABOUTME: Database operations for training routines (CRUD plus single-active selection)
// ABOUTME: Routine days persist as a JSON column; at most one routine is active per device
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::{Routine, RoutineDay};

/// Database manager for routine storage
pub struct RoutinesManager {
    pool: SqlitePool,
}

impl RoutinesManager {
    /// Create a new routines manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new routine
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn create(&self, routine: &Routine) -> AppResult<()> {
        let days_json = serde_json::to_string(&routine.days)?;

        sqlx::query(
            r"
            INSERT INTO routines (
                id, device_id, name, days, total_sessions, is_active,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(routine.id.to_string())
        .bind(&routine.device_id)
        .bind(&routine.name)
        .bind(&days_json)
        .bind(i64::from(routine.total_sessions))
        .bind(routine.is_active)
        .bind(routine.created_at.to_rfc3339())
        .bind(routine.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create routine: {e}")))?;

        Ok(())
    }

    /// Get a routine by ID, scoped to its owning device
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get(&self, device_id: &str, routine_id: Uuid) -> AppResult<Option<Routine>> {
        let row = sqlx::query(
            r"
            SELECT id, device_id, name, days, total_sessions, is_active,
                   created_at, updated_at
            FROM routines
            WHERE id = $1 AND device_id = $2
            ",
        )
        .bind(routine_id.to_string())
        .bind(device_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get routine: {e}")))?;

        row.map(|r| row_to_routine(&r)).transpose()
    }

    /// List all routines for a device, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list(&self, device_id: &str) -> AppResult<Vec<Routine>> {
        let rows = sqlx::query(
            r"
            SELECT id, device_id, name, days, total_sessions, is_active,
                   created_at, updated_at
            FROM routines
            WHERE device_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(device_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list routines: {e}")))?;

        rows.iter().map(row_to_routine).collect()
    }

    /// Get the device's active routine, if one is selected
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get_active(&self, device_id: &str) -> AppResult<Option<Routine>> {
        let row = sqlx::query(
            r"
            SELECT id, device_id, name, days, total_sessions, is_active,
                   created_at, updated_at
            FROM routines
            WHERE device_id = $1 AND is_active = true
            ORDER BY updated_at DESC
            LIMIT 1
            ",
        )
        .bind(device_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get active routine: {e}")))?;

        row.map(|r| row_to_routine(&r)).transpose()
    }

    /// Replace a routine's mutable fields
    ///
    /// Returns the updated routine, or `None` when no row matched.
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn update(&self, routine: &Routine) -> AppResult<Option<Routine>> {
        let days_json = serde_json::to_string(&routine.days)?;
        let now = Utc::now();

        let result = sqlx::query(
            r"
            UPDATE routines SET
                name = $1, days = $2, total_sessions = $3, updated_at = $4
            WHERE id = $5 AND device_id = $6
            ",
        )
        .bind(&routine.name)
        .bind(&days_json)
        .bind(i64::from(routine.total_sessions))
        .bind(now.to_rfc3339())
        .bind(routine.id.to_string())
        .bind(&routine.device_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update routine: {e}")))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get(&routine.device_id, routine.id).await
    }

    /// Delete a routine together with its session progress
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn delete(&self, device_id: &str, routine_id: Uuid) -> AppResult<bool> {
        // Progress rows key on the routine; remove them first so a deleted
        // routine leaves no orphaned progress behind.
        sqlx::query(
            r"
            DELETE FROM session_progress
            WHERE device_id = $1 AND routine_id = $2
            ",
        )
        .bind(device_id)
        .bind(routine_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to delete routine progress: {e}")))?;

        let result = sqlx::query(
            r"
            DELETE FROM routines
            WHERE id = $1 AND device_id = $2
            ",
        )
        .bind(routine_id.to_string())
        .bind(device_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to delete routine: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Mark one routine active and deactivate every other routine the
    /// device owns, in a single transaction
    ///
    /// Returns the activated routine, or `None` when no row matched; in
    /// that case the transaction rolls back and the previous selection
    /// stays in place.
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn activate(&self, device_id: &str, routine_id: Uuid) -> AppResult<Option<Routine>> {
        let now = Utc::now().to_rfc3339();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin activation: {e}")))?;

        sqlx::query(
            r"
            UPDATE routines SET is_active = false, updated_at = $1
            WHERE device_id = $2 AND is_active = true
            ",
        )
        .bind(&now)
        .bind(device_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to deactivate routines: {e}")))?;

        let result = sqlx::query(
            r"
            UPDATE routines SET is_active = true, updated_at = $1
            WHERE id = $2 AND device_id = $3
            ",
        )
        .bind(&now)
        .bind(routine_id.to_string())
        .bind(device_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to activate routine: {e}")))?;

        if result.rows_affected() == 0 {
            tx.rollback()
                .await
                .map_err(|e| AppError::database(format!("Failed to roll back activation: {e}")))?;
            return Ok(None);
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit activation: {e}")))?;

        self.get(device_id, routine_id).await
    }
}

/// Convert a database row to a `Routine`
fn row_to_routine(row: &SqliteRow) -> AppResult<Routine> {
    let id_str: String = row.get("id");
    let days_json: String = row.get("days");
    let total_sessions: i64 = row.get("total_sessions");
    let created_at_str: String = row.get("created_at");
    let updated_at_str: String = row.get("updated_at");

    let days: Vec<RoutineDay> = serde_json::from_str(&days_json)?;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Ok(Routine {
        id: Uuid::parse_str(&id_str)
            .map_err(|e| AppError::internal(format!("Invalid routine UUID: {e}")))?,
        device_id: row.get("device_id"),
        name: row.get("name"),
        days,
        total_sessions: total_sessions as u32,
        is_active: row.get("is_active"),
        created_at: DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|e| AppError::internal(format!("Invalid datetime: {e}")))?
            .with_timezone(&Utc),
        updated_at: DateTime::parse_from_rfc3339(&updated_at_str)
            .map_err(|e| AppError::internal(format!("Invalid datetime: {e}")))?
            .with_timezone(&Utc),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;
    use crate::models::RoutineExercise;

    async fn manager() -> RoutinesManager {
        let db = Database::new("sqlite::memory:").await.unwrap();
        RoutinesManager::new(db.pool().clone())
    }

    fn routine(device_id: &str, name: &str) -> Routine {
        Routine {
            id: Uuid::new_v4(),
            device_id: device_id.to_string(),
            name: name.to_string(),
            days: vec![RoutineDay {
                order: 0,
                name: "Full Body".into(),
                exercises: vec![RoutineExercise {
                    id: Uuid::new_v4(),
                    name: "Squat".into(),
                    target_sets: 3,
                    target_reps: 5,
                    rest_seconds: Some(180),
                }],
            }],
            total_sessions: 24,
            is_active: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn create_and_get_round_trip() {
        let manager = manager().await;
        let routine = routine("device-1", "PPL");
        manager.create(&routine).await.unwrap();

        let fetched = manager.get("device-1", routine.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "PPL");
        assert_eq!(fetched.days.len(), 1);
        assert_eq!(fetched.days[0].exercises[0].name, "Squat");
        assert_eq!(fetched.total_sessions, 24);
    }

    #[tokio::test]
    async fn get_is_scoped_to_the_owning_device() {
        let manager = manager().await;
        let routine = routine("device-1", "PPL");
        manager.create(&routine).await.unwrap();

        assert!(manager
            .get("device-2", routine.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn activate_clears_previous_selection() {
        let manager = manager().await;
        let first = routine("device-1", "Block A");
        let second = routine("device-1", "Block B");
        manager.create(&first).await.unwrap();
        manager.create(&second).await.unwrap();

        manager.activate("device-1", first.id).await.unwrap();
        manager.activate("device-1", second.id).await.unwrap();

        let active = manager.get_active("device-1").await.unwrap().unwrap();
        assert_eq!(active.id, second.id);
        let first_again = manager.get("device-1", first.id).await.unwrap().unwrap();
        assert!(!first_again.is_active);
    }

    #[tokio::test]
    async fn activating_unknown_routine_keeps_current_selection() {
        let manager = manager().await;
        let existing = routine("device-1", "Block A");
        manager.create(&existing).await.unwrap();
        manager.activate("device-1", existing.id).await.unwrap();

        let missing = manager.activate("device-1", Uuid::new_v4()).await.unwrap();
        assert!(missing.is_none());

        let active = manager.get_active("device-1").await.unwrap().unwrap();
        assert_eq!(active.id, existing.id, "failed activation must not deselect");
    }

    #[tokio::test]
    async fn update_missing_routine_returns_none() {
        let manager = manager().await;
        let ghost = routine("device-1", "Ghost");
        assert!(manager.update(&ghost).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_also_removes_progress() {
        let manager = manager().await;
        let routine = routine("device-1", "PPL");
        manager.create(&routine).await.unwrap();

        sqlx::query(
            "INSERT INTO session_progress (device_id, routine_id, current_session, completed_sessions, skipped_sessions, updated_at)
             VALUES ($1, $2, 3, '[1,2]', '[]', $3)",
        )
        .bind("device-1")
        .bind(routine.id.to_string())
        .bind(Utc::now().to_rfc3339())
        .execute(&manager.pool)
        .await
        .unwrap();

        assert!(manager.delete("device-1", routine.id).await.unwrap());

        let orphans: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM session_progress WHERE routine_id = $1",
        )
        .bind(routine.id.to_string())
        .fetch_one(&manager.pool)
        .await
        .unwrap();
        assert_eq!(orphans, 0);
    }
}
