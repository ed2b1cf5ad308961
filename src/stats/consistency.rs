// ABOUTME: Training cadence metrics: distinct sessions, completion rate, streaks
// ABOUTME: Calendar-day scans over set timestamps, backward from today
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};

use super::{ConsistencyStats, StatsPeriod};
use crate::constants::stats::FALLBACK_DAYS_PER_WEEK;
use crate::models::ExerciseSet;

/// Compute cadence metrics over the filtered window.
///
/// `days_per_week` is the active routine's planned training frequency and
/// sets the completion-rate expectation; `None` falls back to a default
/// cadence. The streak scan tolerates a not-yet-logged today but breaks on
/// a missing yesterday.
#[must_use]
pub fn consistency_stats(
    sets: &[&ExerciseSet],
    days_per_week: Option<u32>,
    period: StatsPeriod,
    now: DateTime<Utc>,
) -> ConsistencyStats {
    let sessions: BTreeSet<u32> = sets.iter().map(|set| set.session_number).collect();
    let sessions_completed = sessions.len() as u64;

    let earliest = sets.iter().map(|set| set.created_at).min();
    let expected = expected_sessions(period, days_per_week, earliest, now);
    let completion_rate_percent = if expected == 0 {
        0.0
    } else {
        (sessions_completed as f64 / f64::from(expected) * 100.0).min(100.0)
    };

    ConsistencyStats {
        sessions_completed,
        completion_rate_percent,
        streak_days: streak_days(sets, now),
        days_since_last_workout: days_since_last_workout(sets, now),
    }
}

/// Count consecutive calendar days with at least one set, scanning backward
/// from today. Today itself may be empty without breaking the streak.
#[must_use]
pub fn streak_days(sets: &[&ExerciseSet], now: DateTime<Utc>) -> u32 {
    let days: BTreeSet<NaiveDate> = sets.iter().map(|set| set.created_at.date_naive()).collect();
    let today = now.date_naive();

    let mut cursor = if days.contains(&today) {
        today
    } else {
        match today.pred_opt() {
            Some(yesterday) if days.contains(&yesterday) => yesterday,
            _ => return 0,
        }
    };

    let mut streak = 1;
    while let Some(previous) = cursor.pred_opt() {
        if !days.contains(&previous) {
            break;
        }
        streak += 1;
        cursor = previous;
    }
    streak
}

/// Calendar days between today and the most recent set, `None` when the
/// window holds no sets. Future-dated sets clamp to zero.
#[must_use]
pub fn days_since_last_workout(sets: &[&ExerciseSet], now: DateTime<Utc>) -> Option<i64> {
    let last = sets.iter().map(|set| set.created_at).max()?;
    Some((now.date_naive() - last.date_naive()).num_days().max(0))
}

/// How many sessions the window "should" contain given the planned weekly
/// cadence. The all-time window derives its length from the earliest set.
fn expected_sessions(
    period: StatsPeriod,
    days_per_week: Option<u32>,
    earliest: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> u32 {
    let weeks = match period {
        StatsPeriod::Week => 1,
        StatsPeriod::Month => 4,
        StatsPeriod::Year => 52,
        StatsPeriod::All => earliest.map_or(1, |start| {
            let days = (now - start).num_days().max(0);
            u32::try_from(days / 7).unwrap_or(u32::MAX).max(1)
        }),
    };
    let cadence = days_per_week.unwrap_or(FALLBACK_DAYS_PER_WEEK).max(1);
    weeks.saturating_mul(cadence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    fn set_on(days_ago: i64, session_number: u32) -> ExerciseSet {
        ExerciseSet {
            id: Uuid::new_v4(),
            device_id: "device-1".into(),
            exercise: "Squat".into(),
            reps: 5,
            weight_kg: 100.0,
            session_number,
            routine_exercise_id: None,
            created_at: Utc::now() - Duration::days(days_ago),
        }
    }

    #[test]
    fn sessions_count_distinct_session_numbers() {
        let sets = [set_on(0, 3), set_on(0, 3), set_on(2, 2), set_on(4, 1)];
        let refs: Vec<&ExerciseSet> = sets.iter().collect();
        let stats = consistency_stats(&refs, Some(3), StatsPeriod::Week, Utc::now());

        assert_eq!(stats.sessions_completed, 3);
    }

    #[test]
    fn completion_rate_is_capped_at_one_hundred() {
        let sets = [set_on(0, 1), set_on(1, 2), set_on(2, 3), set_on(3, 4)];
        let refs: Vec<&ExerciseSet> = sets.iter().collect();
        let stats = consistency_stats(&refs, Some(3), StatsPeriod::Week, Utc::now());

        // Four sessions against an expectation of three.
        assert!((stats.completion_rate_percent - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn completion_rate_uses_fallback_cadence() {
        let sets = [set_on(0, 1)];
        let refs: Vec<&ExerciseSet> = sets.iter().collect();
        let stats = consistency_stats(&refs, None, StatsPeriod::Week, Utc::now());

        // One session of an expected three.
        assert!((stats.completion_rate_percent - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn streak_counts_consecutive_days_including_today() {
        let sets = [set_on(0, 3), set_on(1, 2), set_on(2, 1)];
        let refs: Vec<&ExerciseSet> = sets.iter().collect();
        assert_eq!(streak_days(&refs, Utc::now()), 3);
    }

    #[test]
    fn streak_tolerates_a_rest_day_today() {
        let sets = [set_on(1, 2), set_on(2, 1)];
        let refs: Vec<&ExerciseSet> = sets.iter().collect();
        assert_eq!(streak_days(&refs, Utc::now()), 2);
    }

    #[test]
    fn streak_breaks_when_yesterday_is_empty() {
        let sets = [set_on(2, 2), set_on(3, 1)];
        let refs: Vec<&ExerciseSet> = sets.iter().collect();
        assert_eq!(streak_days(&refs, Utc::now()), 0);
    }

    #[test]
    fn streak_is_zero_for_an_empty_log() {
        assert_eq!(streak_days(&[], Utc::now()), 0);
    }

    #[test]
    fn days_since_last_workout_uses_calendar_days() {
        let sets = [set_on(3, 1)];
        let refs: Vec<&ExerciseSet> = sets.iter().collect();
        assert_eq!(days_since_last_workout(&refs, Utc::now()), Some(3));
        assert_eq!(days_since_last_workout(&[], Utc::now()), None);
    }
}
