// ABOUTME: Session progress business logic: get-or-create, complete, skip, sync
// ABOUTME: Loads records through managers, applies the pure engine, persists the result
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use chrono::Utc;
use uuid::Uuid;

use crate::database::{ProgressManager, RoutinesManager};
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use crate::models::SessionProgress;
use crate::progress::{complete_session, merge_progress, sanitize_snapshot, skip_session};

/// Fetch the progress record for a device+routine pair, creating the
/// default record (session 1, nothing completed) when none exists.
///
/// # Errors
///
/// Returns `AppError::not_found` when the routine does not exist, or a
/// database error if persistence fails
pub async fn get_or_create(
    routines: &RoutinesManager,
    progress_manager: &ProgressManager,
    device_id: &str,
    routine_id: Uuid,
) -> AppResult<SessionProgress> {
    routines
        .get(device_id, routine_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Routine {routine_id} not found")))?;
    load_or_seed(progress_manager, device_id, routine_id).await
}

/// Load the progress record, seeding the default when absent.
///
/// Callers must have verified the routine exists.
async fn load_or_seed(
    progress_manager: &ProgressManager,
    device_id: &str,
    routine_id: Uuid,
) -> AppResult<SessionProgress> {
    if let Some(existing) = progress_manager.get(device_id, routine_id).await? {
        return Ok(existing);
    }

    let fresh = SessionProgress::new(device_id, routine_id);
    progress_manager.upsert(&fresh).await?;
    AppLogger::log_progress_event(device_id, &routine_id.to_string(), "created", None);
    Ok(fresh)
}

/// Mark a session completed and persist the updated record.
///
/// # Errors
///
/// Returns `AppError::not_found` when the routine does not exist, a
/// validation error when the session number is out of range or too far
/// ahead, and a database error if persistence fails
pub async fn complete(
    routines: &RoutinesManager,
    progress_manager: &ProgressManager,
    device_id: &str,
    routine_id: Uuid,
    session_number: u32,
) -> AppResult<SessionProgress> {
    let routine = routines
        .get(device_id, routine_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Routine {routine_id} not found")))?;

    let mut progress = load_or_seed(progress_manager, device_id, routine_id).await?;
    complete_session(
        &mut progress,
        session_number,
        routine.total_sessions,
        Utc::now(),
    )?;
    progress_manager.upsert(&progress).await?;

    AppLogger::log_progress_event(
        device_id,
        &routine_id.to_string(),
        "completed",
        Some(session_number),
    );
    Ok(progress)
}

/// Mark the current session skipped and persist the updated record.
///
/// # Errors
///
/// Returns `AppError::not_found` when the routine does not exist, a
/// validation error when the session is not the current one, and a
/// database error if persistence fails
pub async fn skip(
    routines: &RoutinesManager,
    progress_manager: &ProgressManager,
    device_id: &str,
    routine_id: Uuid,
    session_number: u32,
) -> AppResult<SessionProgress> {
    let routine = routines
        .get(device_id, routine_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Routine {routine_id} not found")))?;

    let mut progress = load_or_seed(progress_manager, device_id, routine_id).await?;
    skip_session(
        &mut progress,
        session_number,
        routine.total_sessions,
        Utc::now(),
    )?;
    progress_manager.upsert(&progress).await?;

    AppLogger::log_progress_event(
        device_id,
        &routine_id.to_string(),
        "skipped",
        Some(session_number),
    );
    Ok(progress)
}

/// Reconcile a client-supplied snapshot against the server record.
///
/// The snapshot is sanitized against the routine's session domain, merged
/// with the server record when one exists (the merge is commutative, so
/// neither side is privileged), and persisted. A missing server record is
/// seeded directly from the sanitized snapshot.
///
/// # Errors
///
/// Returns `AppError::not_found` when the routine does not exist, or a
/// database error if persistence fails
pub async fn sync(
    routines: &RoutinesManager,
    progress_manager: &ProgressManager,
    snapshot: &SessionProgress,
) -> AppResult<SessionProgress> {
    let routine = routines
        .get(&snapshot.device_id, snapshot.routine_id)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!("Routine {} not found", snapshot.routine_id))
        })?;

    let sanitized = sanitize_snapshot(snapshot, routine.total_sessions);
    let mut merged = match progress_manager
        .get(&snapshot.device_id, snapshot.routine_id)
        .await?
    {
        Some(server) => merge_progress(&server, &sanitized),
        None => sanitized,
    };
    merged.updated_at = Utc::now();
    progress_manager.upsert(&merged).await?;

    AppLogger::log_progress_event(
        &snapshot.device_id,
        &snapshot.routine_id.to_string(),
        "synced",
        Some(merged.current_session),
    );
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;
    use crate::models::{Routine, RoutineDay};

    struct Fixture {
        routines: RoutinesManager,
        progress: ProgressManager,
        routine_id: Uuid,
    }

    async fn fixture() -> Fixture {
        let db = Database::new("sqlite::memory:").await.unwrap();
        let routines = RoutinesManager::new(db.pool().clone());
        let progress = ProgressManager::new(db.pool().clone());

        let routine = Routine {
            id: Uuid::new_v4(),
            device_id: "device-1".into(),
            name: "Linear Block".into(),
            days: vec![RoutineDay {
                order: 0,
                name: "Full Body".into(),
                exercises: Vec::new(),
            }],
            total_sessions: 12,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        routines.create(&routine).await.unwrap();

        Fixture {
            routines,
            progress,
            routine_id: routine.id,
        }
    }

    #[tokio::test]
    async fn get_or_create_seeds_the_default_record() {
        let fx = fixture().await;
        let created = get_or_create(&fx.routines, &fx.progress, "device-1", fx.routine_id)
            .await
            .unwrap();
        assert_eq!(created.current_session, 1);
        assert!(created.completed_sessions.is_empty());

        // The record now persists and round-trips unchanged.
        let again = get_or_create(&fx.routines, &fx.progress, "device-1", fx.routine_id)
            .await
            .unwrap();
        assert_eq!(again.current_session, 1);
    }

    #[tokio::test]
    async fn get_or_create_requires_the_routine() {
        let fx = fixture().await;
        let err = get_or_create(&fx.routines, &fx.progress, "device-1", Uuid::new_v4())
            .await
            .unwrap_err();
        assert_eq!(err.http_status(), 404);
    }

    #[tokio::test]
    async fn complete_advances_and_persists() {
        let fx = fixture().await;
        let after = complete(&fx.routines, &fx.progress, "device-1", fx.routine_id, 1)
            .await
            .unwrap();
        assert_eq!(after.current_session, 2);
        assert!(after.completed_sessions.contains(&1));
        assert!(after.last_workout_date.is_some());

        let stored = fx
            .progress
            .get("device-1", fx.routine_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.current_session, 2);
    }

    #[tokio::test]
    async fn complete_unknown_routine_is_not_found() {
        let fx = fixture().await;
        let err = complete(&fx.routines, &fx.progress, "device-1", Uuid::new_v4(), 1)
            .await
            .unwrap_err();
        assert_eq!(err.http_status(), 404);
    }

    #[tokio::test]
    async fn skip_rejects_a_non_current_session() {
        let fx = fixture().await;
        let err = skip(&fx.routines, &fx.progress, "device-1", fx.routine_id, 3)
            .await
            .unwrap_err();
        assert_eq!(err.http_status(), 400);
    }

    #[tokio::test]
    async fn sync_seeds_from_a_sanitized_snapshot() {
        let fx = fixture().await;
        let mut snapshot = SessionProgress::new("device-1", fx.routine_id);
        snapshot.current_session = 4;
        snapshot.completed_sessions = [1, 2, 3, 99].into_iter().collect();

        let merged = sync(&fx.routines, &fx.progress, &snapshot).await.unwrap();
        assert_eq!(merged.current_session, 4);
        // 99 lies outside the 12-session domain and is dropped.
        assert!(!merged.completed_sessions.contains(&99));
        assert_eq!(merged.completed_sessions.len(), 3);
    }

    #[tokio::test]
    async fn sync_merges_with_the_server_record() {
        let fx = fixture().await;
        complete(&fx.routines, &fx.progress, "device-1", fx.routine_id, 1)
            .await
            .unwrap();
        complete(&fx.routines, &fx.progress, "device-1", fx.routine_id, 2)
            .await
            .unwrap();

        // A stale client that only knows about session 1 but skipped 2.
        let mut snapshot = SessionProgress::new("device-1", fx.routine_id);
        snapshot.current_session = 2;
        snapshot.completed_sessions = [1].into_iter().collect();
        snapshot.skipped_sessions = [2].into_iter().collect();

        let merged = sync(&fx.routines, &fx.progress, &snapshot).await.unwrap();
        assert_eq!(merged.current_session, 3);
        assert!(merged.completed_sessions.contains(&2));
        // Completion on the server wins over the client's skip.
        assert!(merged.skipped_sessions.is_empty());
    }
}
