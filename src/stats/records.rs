// ABOUTME: Personal-record extraction and Epley one-rep-max estimation
// ABOUTME: Picks the best set per exercise by weight times reps
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use std::cmp::Ordering;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use super::PersonalRecord;
use crate::models::ExerciseSet;

/// Epley one-rep-max estimate: `weight × (1 + reps / 30)`, rounded to the
/// nearest whole kilogram.
#[must_use]
pub fn estimated_one_rep_max(weight_kg: f64, reps: u32) -> f64 {
    weight_kg
        .mul_add(f64::from(reps) / 30.0, weight_kg)
        .round()
}

/// The best set per exercise, ranked by set volume descending.
///
/// "Best" means maximum `weight × reps`; on equal volume the heavier set
/// wins. Rank ties break by exercise name so the ordering is stable.
#[must_use]
pub fn personal_records(sets: &[&ExerciseSet]) -> Vec<PersonalRecord> {
    let mut best: BTreeMap<&str, &ExerciseSet> = BTreeMap::new();
    for set in sets {
        match best.entry(set.exercise.as_str()) {
            Entry::Vacant(slot) => {
                slot.insert(set);
            }
            Entry::Occupied(mut slot) => {
                if beats(set, slot.get()) {
                    slot.insert(set);
                }
            }
        }
    }

    let mut ranked: Vec<PersonalRecord> = best
        .into_values()
        .map(|set| PersonalRecord {
            exercise: set.exercise.clone(),
            weight_kg: set.weight_kg,
            reps: set.reps,
            volume_kg: set.volume_kg(),
            achieved_at: set.created_at,
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.volume_kg
            .partial_cmp(&a.volume_kg)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.exercise.cmp(&b.exercise))
    });
    ranked
}

fn beats(candidate: &ExerciseSet, incumbent: &ExerciseSet) -> bool {
    let (challenger, title) = (candidate.volume_kg(), incumbent.volume_kg());
    challenger > title
        || ((challenger - title).abs() < f64::EPSILON && candidate.weight_kg > incumbent.weight_kg)
}
