// ABOUTME: Commutative merge of two session progress snapshots
// ABOUTME: Used server-side on sync and client-side when reconciling cache with server
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

//! Progress snapshot merging
//!
//! The merge is deliberately simple: the session pointer takes the maximum,
//! the completed and skipped sets take the union, and completion wins when a
//! session would land in both sets. Losing an update is acceptable for a
//! single-device identifier; inventing regressions is not.

use std::collections::BTreeSet;

use crate::models::SessionProgress;

/// Merge two progress snapshots for the same (device, routine) pair
///
/// Rules:
/// - `current_session` = max of both sides, floored at 1
/// - `completed_sessions` = union
/// - `skipped_sessions` = union, minus anything completed (completion priority)
/// - `last_workout_date` and `updated_at` = latest of the two
///
/// The identity fields are taken from `a`; callers merge snapshots that
/// already agree on device and routine.
#[must_use]
pub fn merge_progress(a: &SessionProgress, b: &SessionProgress) -> SessionProgress {
    let completed_sessions: BTreeSet<u32> = a
        .completed_sessions
        .union(&b.completed_sessions)
        .copied()
        .collect();

    let mut skipped_sessions: BTreeSet<u32> = a
        .skipped_sessions
        .union(&b.skipped_sessions)
        .copied()
        .collect();
    // Completion wins when the two sides disagree about a session
    skipped_sessions.retain(|n| !completed_sessions.contains(n));

    let last_workout_date = match (a.last_workout_date, b.last_workout_date) {
        (Some(x), Some(y)) => Some(x.max(y)),
        (x, y) => x.or(y),
    };

    SessionProgress {
        device_id: a.device_id.clone(),
        routine_id: a.routine_id,
        current_session: a.current_session.max(b.current_session).max(1),
        completed_sessions,
        skipped_sessions,
        last_workout_date,
        updated_at: a.updated_at.max(b.updated_at),
    }
}
