// ABOUTME: Statistics orchestration: loads the training log, resolves muscles, aggregates
// ABOUTME: Bridges the persistence layer and the pure stats engine for the HTTP handlers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use std::collections::{BTreeSet, HashMap};

use chrono::Utc;

use crate::catalog::ExerciseCatalog;
use crate::database::{RoutinesManager, SetsManager};
use crate::errors::AppResult;
use crate::models::{ExerciseSet, MuscleGroup};
use crate::stats::{self, DerivedStats, StatsPeriod};

/// Compute derived statistics for a device over the requested period.
///
/// Loads the training log for the period window, resolves exercise names to
/// muscle groups through the catalog, pulls the weekly cadence from the
/// active routine, and hands everything to the aggregation engine.
///
/// # Errors
///
/// Returns an error if database operations fail
pub async fn compute_stats(
    sets_manager: &SetsManager,
    routines: &RoutinesManager,
    catalog: &dyn ExerciseCatalog,
    device_id: &str,
    period: StatsPeriod,
) -> AppResult<DerivedStats> {
    let now = Utc::now();
    let cutoff = period.cutoff(now);

    let sets = sets_manager.list_for_stats(device_id, cutoff).await?;
    let muscles = resolve_muscles(catalog, &sets).await;
    let days_per_week = routines
        .get_active(device_id)
        .await?
        .map(|routine| routine.days_per_week());

    Ok(stats::compute(&sets, &muscles, days_per_week, period, now))
}

/// Map each distinct raw exercise name in the log to its muscle group.
///
/// Names the catalog cannot resolve are left out of the map; the
/// aggregation engine attributes their volume to `MuscleGroup::Other`.
/// A catalog failure degrades the same way rather than failing the
/// whole stats request.
async fn resolve_muscles(
    catalog: &dyn ExerciseCatalog,
    sets: &[ExerciseSet],
) -> HashMap<String, MuscleGroup> {
    let names: BTreeSet<&str> = sets.iter().map(|set| set.exercise.as_str()).collect();

    let mut muscles = HashMap::with_capacity(names.len());
    for name in names {
        match catalog.lookup(name).await {
            Ok(Some(info)) => {
                muscles.insert(name.to_owned(), info.muscle);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("Catalog lookup failed for '{name}': {e}");
            }
        }
    }
    muscles
}
