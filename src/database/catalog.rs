// ABOUTME: Database operations for device-defined custom exercise catalog entries
// ABOUTME: Rows key on the normalized exercise name and layer over the builtin table
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use crate::errors::{AppError, AppResult};
use crate::models::{Equipment, ExerciseInfo, ExerciseKind, MuscleGroup};

/// Database manager for custom exercise catalog entries
pub struct ExerciseCatalogManager {
    pool: SqlitePool,
}

impl ExerciseCatalogManager {
    /// Create a new catalog manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a custom exercise under its normalized name
    ///
    /// # Errors
    ///
    /// Returns `AppError::already_exists` when the normalized name is taken,
    /// or a database error if the operation fails
    pub async fn create(&self, normalized_name: &str, info: &ExerciseInfo) -> AppResult<()> {
        let result = sqlx::query(
            r"
            INSERT INTO exercise_catalog (
                normalized_name, name, muscle, equipment, kind, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT(normalized_name) DO NOTHING
            ",
        )
        .bind(normalized_name)
        .bind(&info.name)
        .bind(info.muscle.as_str())
        .bind(info.equipment.as_str())
        .bind(info.kind.as_str())
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create catalog entry: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::already_exists(format!(
                "exercise '{}' is already defined",
                info.name
            )));
        }

        Ok(())
    }

    /// Look up a custom exercise by its normalized name
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get(&self, normalized_name: &str) -> AppResult<Option<ExerciseInfo>> {
        let row = sqlx::query(
            r"
            SELECT name, muscle, equipment, kind
            FROM exercise_catalog
            WHERE normalized_name = $1
            ",
        )
        .bind(normalized_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get catalog entry: {e}")))?;

        Ok(row.map(|r| row_to_exercise_info(&r)))
    }

    /// List every custom exercise, ordered by name
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list(&self) -> AppResult<Vec<ExerciseInfo>> {
        let rows = sqlx::query(
            r"
            SELECT name, muscle, equipment, kind
            FROM exercise_catalog
            ORDER BY name ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list catalog entries: {e}")))?;

        Ok(rows.iter().map(row_to_exercise_info).collect())
    }
}

/// Convert a database row to an `ExerciseInfo`
fn row_to_exercise_info(row: &SqliteRow) -> ExerciseInfo {
    let muscle_str: String = row.get("muscle");
    let equipment_str: String = row.get("equipment");
    let kind_str: String = row.get("kind");

    ExerciseInfo {
        name: row.get("name"),
        muscle: MuscleGroup::parse(&muscle_str),
        equipment: Equipment::parse(&equipment_str),
        kind: ExerciseKind::parse(&kind_str),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;

    async fn manager() -> ExerciseCatalogManager {
        let db = Database::new("sqlite::memory:").await.unwrap();
        ExerciseCatalogManager::new(db.pool().clone())
    }

    fn info(name: &str, muscle: MuscleGroup) -> ExerciseInfo {
        ExerciseInfo {
            name: name.to_string(),
            muscle,
            equipment: Equipment::Machine,
            kind: ExerciseKind::Isolation,
        }
    }

    #[tokio::test]
    async fn create_get_round_trips_enums() {
        let manager = manager().await;
        manager
            .create("pendulum squat", &info("Pendulum Squat", MuscleGroup::Legs))
            .await
            .unwrap();

        let found = manager.get("pendulum squat").await.unwrap().unwrap();
        assert_eq!(found.name, "Pendulum Squat");
        assert_eq!(found.muscle, MuscleGroup::Legs);
        assert_eq!(found.equipment, Equipment::Machine);
        assert_eq!(found.kind, ExerciseKind::Isolation);
    }

    #[tokio::test]
    async fn duplicate_create_is_rejected() {
        let manager = manager().await;
        let entry = info("Pendulum Squat", MuscleGroup::Legs);
        manager.create("pendulum squat", &entry).await.unwrap();

        let err = manager.create("pendulum squat", &entry).await.unwrap_err();
        assert_eq!(err.http_status(), 409);
    }

    #[tokio::test]
    async fn list_is_name_ordered() {
        let manager = manager().await;
        manager
            .create("zercher squat", &info("Zercher Squat", MuscleGroup::Legs))
            .await
            .unwrap();
        manager
            .create("ab wheel", &info("Ab Wheel", MuscleGroup::Core))
            .await
            .unwrap();

        let names: Vec<String> = manager
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["Ab Wheel".to_string(), "Zercher Squat".to_string()]);
    }
}
