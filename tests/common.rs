// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides database, resource, and fixture creation helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]
//! Shared test utilities for `ironlog`
//!
//! This module provides common test setup functions to reduce duplication
//! across integration tests.

use anyhow::Result;
use chrono::Utc;
use ironlog::{
    config::environment::{
        CorsConfig, DatabaseConfig, DatabaseUrl, Environment, HttpConfig, LogLevel, ServerConfig,
    },
    database::{Database, RoutinesManager},
    models::{Routine, RoutineDay, RoutineExercise},
    resources::ServerResources,
};
use std::sync::{Arc, Once};
use uuid::Uuid;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        // Check for TEST_LOG environment variable to control test logging level
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN, // Default to WARN for quiet tests
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Standard test database setup
pub async fn create_test_database() -> Result<Database> {
    init_test_logging();
    let database = Database::new("sqlite::memory:").await?;
    Ok(database)
}

/// Configuration suitable for tests: in-memory database, open CORS
pub fn create_test_config() -> ServerConfig {
    ServerConfig {
        http_port: 8080,
        log_level: LogLevel::Info,
        environment: Environment::Testing,
        database: DatabaseConfig {
            url: DatabaseUrl::Memory,
        },
        cors: CorsConfig {
            allowed_origins: "*".to_string(),
        },
        http: HttpConfig {
            request_timeout_secs: 30,
            max_body_bytes: 1_048_576,
        },
    }
}

/// Create test `ServerResources` over a fresh in-memory database
pub async fn create_test_server_resources() -> Result<Arc<ServerResources>> {
    let database = create_test_database().await?;
    let config = Arc::new(create_test_config());
    Ok(Arc::new(ServerResources::new(database, config)))
}

/// Standard device identifier used across fixtures
pub const TEST_DEVICE: &str = "test-device";

/// Build a valid three-day routine for the given device (not persisted)
pub fn build_test_routine(device_id: &str) -> Routine {
    let now = Utc::now();
    let day = |order: u32, name: &str, exercise: &str| RoutineDay {
        order,
        name: name.to_string(),
        exercises: vec![RoutineExercise {
            id: Uuid::new_v4(),
            name: exercise.to_string(),
            target_sets: 3,
            target_reps: 8,
            rest_seconds: Some(120),
        }],
    };

    Routine {
        id: Uuid::new_v4(),
        device_id: device_id.to_string(),
        name: "Push Pull Legs".to_string(),
        days: vec![
            day(0, "Push", "Barbell Bench Press"),
            day(1, "Pull", "Barbell Row"),
            day(2, "Legs", "Barbell Back Squat"),
        ],
        total_sessions: 36,
        is_active: false,
        created_at: now,
        updated_at: now,
    }
}

/// Persist a routine fixture and return it
pub async fn create_test_routine(resources: &ServerResources, device_id: &str) -> Result<Routine> {
    let routine = build_test_routine(device_id);
    RoutinesManager::new(resources.database.pool().clone())
        .create(&routine)
        .await?;
    Ok(routine)
}
