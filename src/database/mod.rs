// ABOUTME: SQLite-backed persistence: connection pool, schema migrations, manager handles
// ABOUTME: One manager per table family; all timestamps stored as RFC 3339 text
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

//! # Database Management
//!
//! Owns the `SQLite` connection pool and the schema. Table-level operations
//! live in per-domain managers ([`RoutinesManager`], [`SetsManager`],
//! [`ProgressManager`], [`MeasurementsManager`], [`ExerciseCatalogManager`])
//! that borrow the pool cheaply via [`Database::pool`].

pub mod catalog;
pub mod measurements;
pub mod progress;
pub mod routines;
pub mod sets;

pub use catalog::ExerciseCatalogManager;
pub use measurements::MeasurementsManager;
pub use progress::ProgressManager;
pub use routines::RoutinesManager;
pub use sets::{ListSetsFilter, SetsManager};

use std::path::Path;

use anyhow::{Context, Result};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};

use crate::constants::server::DB_MAX_CONNECTIONS;

/// Database handle wrapping the `SQLite` connection pool
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Open (creating if necessary) the database and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or a
    /// migration statement fails
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = if database_url.contains(":memory:") {
            // Every pooled connection would open its own private in-memory
            // database, so pin the pool to a single long-lived connection.
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect(database_url)
                .await
                .context("failed to open in-memory database")?
        } else {
            // Ensure SQLite creates the database file if it doesn't exist
            let connection_options = if database_url.starts_with("sqlite:") {
                ensure_parent_dir(database_url)?;
                format!("{database_url}?mode=rwc")
            } else {
                database_url.to_string()
            };
            SqlitePoolOptions::new()
                .max_connections(DB_MAX_CONNECTIONS)
                .connect(&connection_options)
                .await
                .with_context(|| format!("failed to open database at {database_url}"))?
        };

        let db = Self { pool };
        db.migrate().await?;

        Ok(db)
    }

    /// Get a reference to the database pool for manager construction
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if a migration statement fails
    pub async fn migrate(&self) -> Result<()> {
        self.migrate_routines().await?;
        self.migrate_exercise_sets().await?;
        self.migrate_session_progress().await?;
        self.migrate_body_measurements().await?;
        self.migrate_exercise_catalog().await?;
        Ok(())
    }

    async fn migrate_routines(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS routines (
                id TEXT PRIMARY KEY,
                device_id TEXT NOT NULL,
                name TEXT NOT NULL,
                days TEXT NOT NULL,
                total_sessions INTEGER NOT NULL,
                is_active BOOLEAN NOT NULL DEFAULT false,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE INDEX IF NOT EXISTS idx_routines_device
            ON routines(device_id)
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn migrate_exercise_sets(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS exercise_sets (
                id TEXT PRIMARY KEY,
                device_id TEXT NOT NULL,
                exercise TEXT NOT NULL,
                reps INTEGER NOT NULL,
                weight_kg REAL NOT NULL,
                session_number INTEGER NOT NULL,
                routine_exercise_id TEXT,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE INDEX IF NOT EXISTS idx_exercise_sets_device_created
            ON exercise_sets(device_id, created_at)
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE INDEX IF NOT EXISTS idx_exercise_sets_device_exercise
            ON exercise_sets(device_id, exercise)
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn migrate_session_progress(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS session_progress (
                device_id TEXT NOT NULL,
                routine_id TEXT NOT NULL,
                current_session INTEGER NOT NULL DEFAULT 1,
                completed_sessions TEXT NOT NULL DEFAULT '[]',
                skipped_sessions TEXT NOT NULL DEFAULT '[]',
                last_workout_date TEXT,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (device_id, routine_id)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn migrate_body_measurements(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS body_measurements (
                id TEXT PRIMARY KEY,
                device_id TEXT NOT NULL,
                weight_kg REAL,
                body_fat_pct REAL,
                chest_cm REAL,
                waist_cm REAL,
                hips_cm REAL,
                arm_cm REAL,
                thigh_cm REAL,
                notes TEXT,
                recorded_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE INDEX IF NOT EXISTS idx_body_measurements_device_recorded
            ON body_measurements(device_id, recorded_at)
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn migrate_exercise_catalog(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS exercise_catalog (
                normalized_name TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                muscle TEXT NOT NULL,
                equipment TEXT NOT NULL,
                kind TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// Create the directory a file-backed `sqlite:` URL points into
fn ensure_parent_dir(database_url: &str) -> Result<()> {
    let path = database_url.trim_start_matches("sqlite:");
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create database directory {}", parent.display())
            })?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let db = Database::new("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db.migrate().await.unwrap();
    }

    #[tokio::test]
    async fn in_memory_pool_reuses_one_connection() {
        let db = Database::new("sqlite::memory:").await.unwrap();

        // The schema must stay visible across pool acquisitions.
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM routines")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn file_backed_database_survives_reopen() {
        let temp_dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}/nested/ironlog.db", temp_dir.path().display());

        let db = Database::new(&url).await.unwrap();
        sqlx::query(
            r"
            INSERT INTO routines (id, device_id, name, days, total_sessions, is_active, created_at, updated_at)
            VALUES ('r1', 'd1', 'Push Pull Legs', '[]', 36, false, '2025-01-01T00:00:00Z', '2025-01-01T00:00:00Z')
            ",
        )
        .execute(db.pool())
        .await
        .unwrap();
        db.pool().close().await;

        // Missing parent directories were created and the data persisted.
        let reopened = Database::new(&url).await.unwrap();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM routines")
            .fetch_one(reopened.pool())
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
