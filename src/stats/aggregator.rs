// ABOUTME: Volume totals, muscle distribution, top-exercise leaderboard, and weekly series
// ABOUTME: Pure folds over a filtered slice of exercise sets
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use chrono::Datelike;

use super::{ExerciseSummary, MuscleVolume, VolumeTotals, WeeklyVolume};
use crate::constants::stats::TOP_EXERCISES_LIMIT;
use crate::models::{ExerciseSet, MuscleGroup};
use crate::stats::records::estimated_one_rep_max;

/// Sum volume, set count, and rep count over the window.
#[must_use]
pub fn volume_totals(sets: &[&ExerciseSet]) -> VolumeTotals {
    let mut totals = VolumeTotals {
        total_sets: sets.len() as u64,
        ..VolumeTotals::default()
    };
    for set in sets {
        totals.total_weight_kg += set.volume_kg();
        totals.total_reps += u64::from(set.reps);
    }
    totals
}

/// Group volume by muscle and express each group as a share of the total.
///
/// Exercise names missing from `muscles` fall into the `Other` bucket.
/// Shares are percentages in 0..=100 and sum to roughly 100 subject to
/// floating-point rounding. Largest share first.
#[must_use]
pub fn muscle_distribution(
    sets: &[&ExerciseSet],
    muscles: &HashMap<String, MuscleGroup>,
) -> Vec<MuscleVolume> {
    let mut by_muscle: BTreeMap<MuscleGroup, f64> = BTreeMap::new();
    let mut total = 0.0;
    for set in sets {
        let muscle = muscles.get(&set.exercise).copied().unwrap_or_default();
        let volume = set.volume_kg();
        *by_muscle.entry(muscle).or_insert(0.0) += volume;
        total += volume;
    }

    if total <= f64::EPSILON {
        return Vec::new();
    }

    let mut distribution: Vec<MuscleVolume> = by_muscle
        .into_iter()
        .map(|(muscle, volume_kg)| MuscleVolume {
            muscle,
            volume_kg,
            share_percent: volume_kg / total * 100.0,
        })
        .collect();
    distribution.sort_by(|a, b| {
        b.volume_kg
            .partial_cmp(&a.volume_kg)
            .unwrap_or(Ordering::Equal)
    });
    distribution
}

struct ExerciseAccumulator {
    total_sets: u64,
    total_volume_kg: f64,
    max_weight_kg: f64,
    max_weight_reps: u32,
}

impl ExerciseAccumulator {
    fn fold(&mut self, set: &ExerciseSet) {
        self.total_sets += 1;
        self.total_volume_kg += set.volume_kg();
        // Heavier set wins; on equal weight the set with more reps does.
        if set.weight_kg > self.max_weight_kg
            || ((set.weight_kg - self.max_weight_kg).abs() < f64::EPSILON
                && set.reps > self.max_weight_reps)
        {
            self.max_weight_kg = set.weight_kg;
            self.max_weight_reps = set.reps;
        }
    }
}

/// Rank exercises by total volume and keep the top five.
///
/// Each entry carries the heaviest set (weight plus its paired reps) and an
/// Epley one-rep-max estimate derived from it. Ties on volume break by
/// exercise name so the ordering is stable.
#[must_use]
pub fn top_exercises(sets: &[&ExerciseSet]) -> Vec<ExerciseSummary> {
    let mut by_exercise: BTreeMap<&str, ExerciseAccumulator> = BTreeMap::new();
    for set in sets {
        by_exercise
            .entry(set.exercise.as_str())
            .or_insert_with(|| ExerciseAccumulator {
                total_sets: 0,
                total_volume_kg: 0.0,
                max_weight_kg: set.weight_kg,
                max_weight_reps: set.reps,
            })
            .fold(set);
    }

    let mut summaries: Vec<ExerciseSummary> = by_exercise
        .into_iter()
        .map(|(exercise, acc)| ExerciseSummary {
            exercise: exercise.to_string(),
            total_sets: acc.total_sets,
            total_volume_kg: acc.total_volume_kg,
            max_weight_kg: acc.max_weight_kg,
            max_weight_reps: acc.max_weight_reps,
            estimated_1rm_kg: estimated_one_rep_max(acc.max_weight_kg, acc.max_weight_reps),
        })
        .collect();
    summaries.sort_by(|a, b| {
        b.total_volume_kg
            .partial_cmp(&a.total_volume_kg)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.exercise.cmp(&b.exercise))
    });
    summaries.truncate(TOP_EXERCISES_LIMIT);
    summaries
}

/// Bucket volume by ISO week of `created_at`, in chronological order.
#[must_use]
pub fn weekly_volume_series(sets: &[&ExerciseSet]) -> Vec<WeeklyVolume> {
    let mut buckets: BTreeMap<(i32, u32), (f64, u64)> = BTreeMap::new();
    for set in sets {
        let week = set.created_at.iso_week();
        let bucket = buckets.entry((week.year(), week.week())).or_insert((0.0, 0));
        bucket.0 += set.volume_kg();
        bucket.1 += 1;
    }

    buckets
        .into_iter()
        .map(|((year, week), (volume_kg, total_sets))| WeeklyVolume {
            week: format!("{year}-W{week:02}"),
            volume_kg,
            total_sets,
        })
        .collect()
}
