// ABOUTME: Statistics aggregation engine turning the raw set log into derived training stats
// ABOUTME: Pure recomputation per request; no incremental state, no persisted caches
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

//! # Statistics Aggregation Engine
//!
//! Transforms an unordered `ExerciseSet` log into the [`DerivedStats`] view:
//! volume totals, muscle distribution, consistency metrics, personal records,
//! a top-exercise leaderboard, and a weekly volume trend series.
//!
//! Every function here is pure. The service layer fetches the log, resolves
//! exercise names to muscle groups through the catalog, and hands everything
//! to [`compute`]. Results are recomputed in full on each call; they reflect
//! the log as passed in and nothing else.

pub mod aggregator;
pub mod consistency;
pub mod records;

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{ExerciseSet, MuscleGroup};

pub use aggregator::{muscle_distribution, top_exercises, volume_totals, weekly_volume_series};
pub use consistency::consistency_stats;
pub use records::{estimated_one_rep_max, personal_records};

/// Time window applied to the set log before aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsPeriod {
    /// Sets created in the last 7 days.
    Week,
    /// Sets created in the last 30 days.
    Month,
    /// Sets created in the last 365 days.
    Year,
    /// The entire log, unbounded.
    #[default]
    All,
}

impl StatsPeriod {
    /// String form used in query parameters and log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
            Self::All => "all",
        }
    }

    /// Parse a query-parameter value, falling back to the unbounded window.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "week" => Self::Week,
            "month" => Self::Month,
            "year" => Self::Year,
            _ => Self::All,
        }
    }

    /// Lower bound on `created_at` for this window, or `None` when unbounded.
    #[must_use]
    pub fn cutoff(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::Week => Some(now - Duration::days(7)),
            Self::Month => Some(now - Duration::days(30)),
            Self::Year => Some(now - Duration::days(365)),
            Self::All => None,
        }
    }
}

impl std::fmt::Display for StatsPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Aggregate volume over the filtered window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VolumeTotals {
    /// Sum of `weight × reps` across all sets, in kilograms.
    pub total_weight_kg: f64,
    /// Number of sets logged.
    pub total_sets: u64,
    /// Sum of repetitions across all sets.
    pub total_reps: u64,
}

/// Share of training volume attributed to one muscle group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MuscleVolume {
    /// Muscle group the volume belongs to.
    pub muscle: MuscleGroup,
    /// Volume in kilograms attributed to this group.
    pub volume_kg: f64,
    /// This group's share of total volume, 0 to 100.
    pub share_percent: f64,
}

/// Session cadence metrics over the filtered window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyStats {
    /// Count of distinct `session_number` values present in the window.
    pub sessions_completed: u64,
    /// Sessions completed versus the expected cadence, capped at 100.
    pub completion_rate_percent: f64,
    /// Consecutive calendar days with at least one set, scanning back from today.
    pub streak_days: u32,
    /// Calendar days since the most recent set, `None` when the log is empty.
    pub days_since_last_workout: Option<i64>,
}

/// The single best set recorded for an exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalRecord {
    /// Exercise name as logged.
    pub exercise: String,
    /// Weight of the record set in kilograms.
    pub weight_kg: f64,
    /// Repetitions of the record set.
    pub reps: u32,
    /// `weight × reps` of the record set.
    pub volume_kg: f64,
    /// When the record set was logged.
    pub achieved_at: DateTime<Utc>,
}

/// Per-exercise aggregate for the top-exercise leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSummary {
    /// Exercise name as logged.
    pub exercise: String,
    /// Number of sets logged for this exercise.
    pub total_sets: u64,
    /// Total `weight × reps` across those sets, in kilograms.
    pub total_volume_kg: f64,
    /// Heaviest weight lifted for this exercise.
    pub max_weight_kg: f64,
    /// Repetitions paired with the heaviest weight.
    pub max_weight_reps: u32,
    /// Epley one-rep-max estimate from the heaviest set, rounded to whole kg.
    pub estimated_1rm_kg: f64,
}

/// One ISO-week bucket of the volume trend series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyVolume {
    /// ISO week label, e.g. `2025-W14`.
    pub week: String,
    /// Total volume logged during that week, in kilograms.
    pub volume_kg: f64,
    /// Number of sets logged during that week.
    pub total_sets: u64,
}

/// The full derived-statistics view returned to clients.
///
/// An empty filtered log yields the zero value of every component rather
/// than an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedStats {
    /// Window the log was filtered to.
    pub period: StatsPeriod,
    /// When this view was computed.
    pub generated_at: DateTime<Utc>,
    /// Aggregate volume totals.
    pub volume: VolumeTotals,
    /// Volume share per muscle group, largest first.
    pub muscle_distribution: Vec<MuscleVolume>,
    /// Session cadence metrics.
    pub consistency: ConsistencyStats,
    /// Best set per exercise, ranked by set volume descending.
    pub personal_records: Vec<PersonalRecord>,
    /// Top exercises by total volume, at most five entries.
    pub top_exercises: Vec<ExerciseSummary>,
    /// Volume per ISO week in chronological order.
    pub weekly_volume: Vec<WeeklyVolume>,
    /// Timestamp of the most recent set in the window, if any.
    pub last_workout_date: Option<DateTime<Utc>>,
}

/// Compute the full derived-statistics view over a set log.
///
/// `muscles` maps logged exercise names to muscle groups; names missing from
/// the map land in the `Other` bucket. `days_per_week` is the active
/// routine's training cadence and feeds the completion-rate expectation
/// (`None` falls back to a default cadence).
#[must_use]
pub fn compute(
    sets: &[ExerciseSet],
    muscles: &HashMap<String, MuscleGroup>,
    days_per_week: Option<u32>,
    period: StatsPeriod,
    now: DateTime<Utc>,
) -> DerivedStats {
    let cutoff = period.cutoff(now);
    let filtered: Vec<&ExerciseSet> = sets
        .iter()
        .filter(|set| cutoff.is_none_or(|bound| set.created_at >= bound))
        .collect();

    let last_workout_date = filtered.iter().map(|set| set.created_at).max();

    DerivedStats {
        period,
        generated_at: now,
        volume: aggregator::volume_totals(&filtered),
        muscle_distribution: aggregator::muscle_distribution(&filtered, muscles),
        consistency: consistency::consistency_stats(&filtered, days_per_week, period, now),
        personal_records: records::personal_records(&filtered),
        top_exercises: aggregator::top_exercises(&filtered),
        weekly_volume: aggregator::weekly_volume_series(&filtered),
        last_workout_date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn set_at(exercise: &str, weight_kg: f64, reps: u32, days_ago: i64) -> ExerciseSet {
        ExerciseSet {
            id: Uuid::new_v4(),
            device_id: "device-1".into(),
            exercise: exercise.into(),
            reps,
            weight_kg,
            session_number: 1,
            routine_exercise_id: None,
            created_at: Utc::now() - Duration::days(days_ago),
        }
    }

    #[test]
    fn period_cutoffs_match_window_lengths() {
        let now = Utc::now();
        assert_eq!(StatsPeriod::Week.cutoff(now), Some(now - Duration::days(7)));
        assert_eq!(
            StatsPeriod::Month.cutoff(now),
            Some(now - Duration::days(30))
        );
        assert_eq!(
            StatsPeriod::Year.cutoff(now),
            Some(now - Duration::days(365))
        );
        assert_eq!(StatsPeriod::All.cutoff(now), None);
    }

    #[test]
    fn period_parse_is_lenient() {
        assert_eq!(StatsPeriod::parse("week"), StatsPeriod::Week);
        assert_eq!(StatsPeriod::parse(" MONTH "), StatsPeriod::Month);
        assert_eq!(StatsPeriod::parse("year"), StatsPeriod::Year);
        assert_eq!(StatsPeriod::parse("yesterday"), StatsPeriod::All);
        assert_eq!(StatsPeriod::parse(""), StatsPeriod::All);
    }

    #[test]
    fn period_serializes_lowercase() {
        let json = serde_json::to_string(&StatsPeriod::Month).unwrap();
        assert_eq!(json, "\"month\"");
        let parsed: StatsPeriod = serde_json::from_str("\"all\"").unwrap();
        assert_eq!(parsed, StatsPeriod::All);
    }

    #[test]
    fn empty_log_yields_empty_stats() {
        let stats = compute(
            &[],
            &HashMap::new(),
            None,
            StatsPeriod::All,
            Utc::now(),
        );

        assert_eq!(stats.volume, VolumeTotals::default());
        assert!(stats.muscle_distribution.is_empty());
        assert_eq!(stats.consistency.sessions_completed, 0);
        assert_eq!(stats.consistency.days_since_last_workout, None);
        assert!(stats.personal_records.is_empty());
        assert!(stats.top_exercises.is_empty());
        assert!(stats.weekly_volume.is_empty());
        assert_eq!(stats.last_workout_date, None);
    }

    #[test]
    fn window_filter_excludes_older_sets() {
        let sets = vec![
            set_at("Bench Press", 100.0, 5, 1),
            set_at("Bench Press", 95.0, 5, 40),
        ];
        let stats = compute(
            &sets,
            &HashMap::new(),
            None,
            StatsPeriod::Month,
            Utc::now(),
        );

        assert_eq!(stats.volume.total_sets, 1);
        assert!((stats.volume.total_weight_kg - 500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn compute_fills_every_section() {
        let mut muscles = HashMap::new();
        muscles.insert("Bench Press".to_string(), MuscleGroup::Chest);
        muscles.insert("Squat".to_string(), MuscleGroup::Legs);

        let sets = vec![
            set_at("Bench Press", 100.0, 5, 0),
            set_at("Squat", 140.0, 5, 1),
            set_at("Squat", 120.0, 8, 1),
        ];
        let stats = compute(&sets, &muscles, Some(3), StatsPeriod::All, Utc::now());

        assert_eq!(stats.volume.total_sets, 3);
        assert_eq!(stats.volume.total_reps, 18);
        assert_eq!(stats.muscle_distribution.len(), 2);
        assert_eq!(stats.personal_records.len(), 2);
        assert_eq!(stats.top_exercises.len(), 2);
        assert!(!stats.weekly_volume.is_empty());
        assert!(stats.last_workout_date.is_some());
        // Squat out-volumes bench, so it leads both rankings.
        assert_eq!(stats.top_exercises[0].exercise, "Squat");
        assert_eq!(stats.personal_records[0].exercise, "Squat");
    }
}
