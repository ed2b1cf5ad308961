// ABOUTME: Validated state transitions for completing and skipping numbered sessions
// ABOUTME: Pure functions over SessionProgress; persistence happens in the service layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

//! Session state transitions
//!
//! Session numbers are 1-based. `current_session` points at the next session
//! the user may act on and may reach `total_sessions + 1` once the cycle is
//! finished; it never rewinds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};
use crate::models::SessionProgress;

/// Lifecycle state of a single numbered session
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Not yet reached by the session pointer
    Pending,
    /// The next actionable session
    Current,
    /// Completed at least once
    Completed,
    /// Skipped and never completed
    Skipped,
}

/// Classify a session number against a progress record
///
/// Completion takes precedence over skip, which takes precedence over the
/// pointer; everything else is pending.
#[must_use]
pub fn session_state(progress: &SessionProgress, session_number: u32) -> SessionState {
    if progress.completed_sessions.contains(&session_number) {
        SessionState::Completed
    } else if progress.skipped_sessions.contains(&session_number) {
        SessionState::Skipped
    } else if session_number == progress.current_session {
        SessionState::Current
    } else {
        SessionState::Pending
    }
}

/// Mark a session completed
///
/// Idempotent: re-completing a session only refreshes `last_workout_date`.
/// Completing the current session (or one past it) advances the pointer to
/// `session_number + 1`; completing an earlier session leaves it alone.
/// Completion removes the session from the skipped set.
///
/// # Errors
///
/// Returns `AppError::out_of_range` when `session_number` is outside
/// `[1, total_sessions]` and `AppError::invalid_input` when it is more than
/// one past `current_session`.
pub fn complete_session(
    progress: &mut SessionProgress,
    session_number: u32,
    total_sessions: u32,
    now: DateTime<Utc>,
) -> AppResult<()> {
    validate_session_number(session_number, total_sessions)?;
    if session_number > progress.current_session + 1 {
        return Err(AppError::invalid_input(format!(
            "cannot complete session {session_number}: allowed range is 1 to {}",
            progress.current_session + 1
        )));
    }

    progress.completed_sessions.insert(session_number);
    progress.skipped_sessions.remove(&session_number);
    if session_number >= progress.current_session {
        progress.current_session = session_number + 1;
    }
    progress.last_workout_date = Some(now);
    progress.updated_at = now;
    Ok(())
}

/// Mark the current session skipped and advance the pointer
///
/// Only the current session may be skipped. A skip does not count as a
/// workout, so `last_workout_date` is left untouched.
///
/// # Errors
///
/// Returns `AppError::out_of_range` when `session_number` is outside
/// `[1, total_sessions]` and `AppError::invalid_input` when it is not the
/// current session.
pub fn skip_session(
    progress: &mut SessionProgress,
    session_number: u32,
    total_sessions: u32,
    now: DateTime<Utc>,
) -> AppResult<()> {
    validate_session_number(session_number, total_sessions)?;
    if session_number != progress.current_session {
        return Err(AppError::invalid_input(format!(
            "only the current session ({}) may be skipped",
            progress.current_session
        )));
    }

    progress.skipped_sessions.insert(session_number);
    progress.completed_sessions.remove(&session_number);
    progress.current_session = session_number + 1;
    progress.updated_at = now;
    Ok(())
}

/// Clamp a client snapshot into the valid domain before seeding or merging
///
/// Session numbers outside `[1, total_sessions]` are dropped, the pointer is
/// floored at 1, and completion priority restores disjointness. Sanitization
/// never fails; a hostile snapshot simply loses its invalid members.
#[must_use]
pub fn sanitize_snapshot(snapshot: &SessionProgress, total_sessions: u32) -> SessionProgress {
    let completed_sessions: std::collections::BTreeSet<u32> = snapshot
        .completed_sessions
        .iter()
        .copied()
        .filter(|n| (1..=total_sessions).contains(n))
        .collect();

    let skipped_sessions: std::collections::BTreeSet<u32> = snapshot
        .skipped_sessions
        .iter()
        .copied()
        .filter(|n| (1..=total_sessions).contains(n) && !completed_sessions.contains(n))
        .collect();

    SessionProgress {
        device_id: snapshot.device_id.clone(),
        routine_id: snapshot.routine_id,
        current_session: snapshot.current_session.max(1),
        completed_sessions,
        skipped_sessions,
        last_workout_date: snapshot.last_workout_date,
        updated_at: snapshot.updated_at,
    }
}

fn validate_session_number(session_number: u32, total_sessions: u32) -> AppResult<()> {
    if session_number < 1 || session_number > total_sessions {
        return Err(AppError::out_of_range(format!(
            "session_number must be between 1 and {total_sessions}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    const TOTAL: u32 = 36;

    fn fresh() -> SessionProgress {
        SessionProgress::new("device-1", Uuid::new_v4())
    }

    #[test]
    fn completing_current_session_advances_pointer() {
        let mut progress = fresh();
        progress.current_session = 3;
        progress.completed_sessions = [1, 2].into_iter().collect();

        complete_session(&mut progress, 3, TOTAL, Utc::now()).unwrap();
        assert_eq!(progress.current_session, 4);
        assert!(progress.completed_sessions.contains(&3));
        assert!(progress.last_workout_date.is_some());
    }

    #[test]
    fn completing_one_ahead_is_allowed() {
        let mut progress = fresh();
        progress.current_session = 3;

        complete_session(&mut progress, 4, TOTAL, Utc::now()).unwrap();
        assert_eq!(progress.current_session, 5);
    }

    #[test]
    fn completing_two_ahead_is_rejected() {
        let mut progress = fresh();
        progress.current_session = 3;

        let err = complete_session(&mut progress, 5, TOTAL, Utc::now()).unwrap_err();
        assert!(err.message.contains("allowed range"));
        assert_eq!(progress.current_session, 3, "pointer unchanged on error");
    }

    #[test]
    fn completing_past_session_does_not_rewind_pointer() {
        let mut progress = fresh();
        progress.current_session = 5;

        complete_session(&mut progress, 2, TOTAL, Utc::now()).unwrap();
        assert_eq!(progress.current_session, 5);
        assert!(progress.completed_sessions.contains(&2));
    }

    #[test]
    fn completion_is_idempotent() {
        let mut progress = fresh();

        complete_session(&mut progress, 1, TOTAL, Utc::now()).unwrap();
        let pointer = progress.current_session;
        complete_session(&mut progress, 1, TOTAL, Utc::now()).unwrap();

        assert_eq!(progress.current_session, pointer);
        assert_eq!(progress.completed_sessions.len(), 1);
    }

    #[test]
    fn completing_overrides_prior_skip() {
        let mut progress = fresh();
        skip_session(&mut progress, 1, TOTAL, Utc::now()).unwrap();
        assert!(progress.skipped_sessions.contains(&1));

        complete_session(&mut progress, 1, TOTAL, Utc::now()).unwrap();
        assert!(progress.completed_sessions.contains(&1));
        assert!(!progress.skipped_sessions.contains(&1));
    }

    #[test]
    fn session_number_bounds_are_enforced() {
        let mut progress = fresh();
        assert!(complete_session(&mut progress, 0, TOTAL, Utc::now()).is_err());
        assert!(complete_session(&mut progress, TOTAL + 1, TOTAL, Utc::now()).is_err());
    }

    #[test]
    fn completing_final_session_parks_pointer_past_the_end() {
        let mut progress = fresh();
        progress.current_session = TOTAL;

        complete_session(&mut progress, TOTAL, TOTAL, Utc::now()).unwrap();
        assert_eq!(progress.current_session, TOTAL + 1);
    }

    #[test]
    fn only_current_session_may_be_skipped() {
        let mut progress = fresh();
        progress.current_session = 3;

        let err = skip_session(&mut progress, 5, TOTAL, Utc::now()).unwrap_err();
        assert!(err.message.contains('3'), "error names the required value");

        skip_session(&mut progress, 3, TOTAL, Utc::now()).unwrap();
        assert_eq!(progress.current_session, 4);
        assert!(progress.last_workout_date.is_none(), "skip is not a workout");
    }

    #[test]
    fn state_machine_view() {
        let mut progress = fresh();
        complete_session(&mut progress, 1, TOTAL, Utc::now()).unwrap();
        skip_session(&mut progress, 2, TOTAL, Utc::now()).unwrap();

        assert_eq!(session_state(&progress, 1), SessionState::Completed);
        assert_eq!(session_state(&progress, 2), SessionState::Skipped);
        assert_eq!(session_state(&progress, 3), SessionState::Current);
        assert_eq!(session_state(&progress, 4), SessionState::Pending);
    }

    #[test]
    fn sanitize_drops_out_of_domain_numbers() {
        let mut snapshot = fresh();
        snapshot.current_session = 0;
        snapshot.completed_sessions = [0, 1, 2, 99].into_iter().collect();
        snapshot.skipped_sessions = [2, 3, 100].into_iter().collect();

        let clean = sanitize_snapshot(&snapshot, TOTAL);
        assert_eq!(clean.current_session, 1);
        assert_eq!(
            clean.completed_sessions.iter().copied().collect::<Vec<_>>(),
            vec![1, 2]
        );
        // 2 was completed, so it leaves the skipped set
        assert_eq!(
            clean.skipped_sessions.iter().copied().collect::<Vec<_>>(),
            vec![3]
        );
    }
}
