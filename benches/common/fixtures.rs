// ABOUTME: Benchmark fixtures generating deterministic exercise set logs
// ABOUTME: Index arithmetic instead of RNG so measurements are reproducible
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

//! Benchmark fixtures for generating realistic training logs.
//!
//! Provides deterministic data generation for reproducible performance
//! measurements.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use ironlog::models::{ExerciseSet, MuscleGroup};
use uuid::Uuid;

/// Predefined set-log sizes for benchmark scenarios
#[derive(Debug, Clone, Copy)]
pub enum SetLogSize {
    /// Small log (100 sets) - a few weeks of training
    Small,
    /// Medium log (1000 sets) - roughly a year of steady lifting
    Medium,
}

impl SetLogSize {
    #[must_use]
    pub const fn count(self) -> usize {
        match self {
            Self::Small => 100,
            Self::Medium => 1_000,
        }
    }
}

/// Exercise roster the generator cycles through. The last entry is
/// deliberately absent from the builtin catalog so aggregation exercises
/// the `Other` bucket.
const EXERCISES: &[(&str, MuscleGroup)] = &[
    ("Barbell Bench Press", MuscleGroup::Chest),
    ("Barbell Back Squat", MuscleGroup::Legs),
    ("Deadlift", MuscleGroup::Back),
    ("Overhead Press", MuscleGroup::Shoulders),
    ("Barbell Row", MuscleGroup::Back),
    ("Barbell Curl", MuscleGroup::Arms),
    ("Hanging Leg Raise", MuscleGroup::Core),
    ("Sandbag Carry", MuscleGroup::Other),
];

/// Sets logged per calendar day; keeps day buckets dense enough that the
/// streak scan and the weekly series both have real work to do.
const SETS_PER_DAY: usize = 16;

/// Configuration for benchmark fixtures (internal use only)
#[derive(Debug, Clone)]
struct BenchmarkConfig {
    /// Base date for set generation (sets go backwards from here)
    base_date: DateTime<Utc>,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            base_date: Utc::now(),
        }
    }
}

/// Generate a single logged set for benchmarking (internal use only)
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn generate_set(index: usize, config: &BenchmarkConfig) -> ExerciseSet {
    let (exercise, _) = EXERCISES[index % EXERCISES.len()];
    let days_ago = (index / SETS_PER_DAY) as i64;

    ExerciseSet {
        id: Uuid::new_v4(),
        device_id: "bench-device".to_owned(),
        exercise: (*exercise).to_owned(),
        reps: calculate_reps(index),
        weight_kg: calculate_weight(index),
        session_number: calculate_session_number(index),
        routine_exercise_id: None,
        created_at: config.base_date - Duration::days(days_ago),
    }
}

#[allow(clippy::cast_possible_truncation)]
const fn calculate_reps(index: usize) -> u32 {
    let base_reps = 3_u32;
    let rep_variation = ((index * 7) % 10) as u32;
    base_reps + rep_variation
}

#[allow(clippy::cast_precision_loss)]
const fn calculate_weight(index: usize) -> f64 {
    let base_weight = 40.0; // empty bar plus change
    let weight_variation = ((index * 13) % 120) as f64;
    base_weight + weight_variation
}

#[allow(clippy::cast_possible_truncation)]
const fn calculate_session_number(index: usize) -> u32 {
    // Four sets per session, wrapping inside the routine domain.
    ((index / 4) % 72 + 1) as u32
}

/// Generate a training log of the given size
#[must_use]
pub fn generate_set_log(size: SetLogSize) -> Vec<ExerciseSet> {
    let config = BenchmarkConfig::default();
    (0..size.count())
        .map(|i| generate_set(i, &config))
        .collect()
}

/// Muscle-group resolution map matching the generator's exercise roster,
/// shaped the way the stats service hands it to the aggregation engine
#[must_use]
pub fn muscle_map() -> HashMap<String, MuscleGroup> {
    EXERCISES
        .iter()
        .map(|(name, muscle)| ((*name).to_owned(), *muscle))
        .collect()
}
