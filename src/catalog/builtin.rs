// ABOUTME: Compiled-in table of common lifts with a plain alias index
// ABOUTME: Keyed by normalized name; lookups are infallible and allocation-light
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use std::collections::HashMap;
use std::sync::LazyLock;

use async_trait::async_trait;

use super::{normalize_name, ExerciseCatalog};
use crate::errors::AppResult;
use crate::models::{Equipment, ExerciseInfo, ExerciseKind, MuscleGroup};

/// Compiled-in catalog of common lifts
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCatalog;

impl BuiltinCatalog {
    /// Resolve a name against the builtin table, following aliases
    #[must_use]
    pub fn resolve(name: &str) -> Option<&'static ExerciseInfo> {
        let normalized = normalize_name(name);
        let canonical = ALIAS_INDEX
            .get(normalized.as_str())
            .copied()
            .unwrap_or(normalized.as_str());
        BUILTIN_INDEX.get(canonical)
    }
}

#[async_trait]
impl ExerciseCatalog for BuiltinCatalog {
    async fn lookup(&self, name: &str) -> AppResult<Option<ExerciseInfo>> {
        Ok(Self::resolve(name).cloned())
    }

    async fn entries(&self) -> AppResult<Vec<ExerciseInfo>> {
        let mut entries: Vec<ExerciseInfo> = BUILTIN_INDEX.values().cloned().collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

type TableRow = (&'static str, MuscleGroup, Equipment, ExerciseKind);

#[rustfmt::skip]
const BUILTIN_TABLE: &[TableRow] = &[
    // Chest
    ("Barbell Bench Press",          MuscleGroup::Chest,     Equipment::Barbell,    ExerciseKind::Compound),
    ("Incline Barbell Bench Press",  MuscleGroup::Chest,     Equipment::Barbell,    ExerciseKind::Compound),
    ("Dumbbell Bench Press",         MuscleGroup::Chest,     Equipment::Dumbbell,   ExerciseKind::Compound),
    ("Incline Dumbbell Press",       MuscleGroup::Chest,     Equipment::Dumbbell,   ExerciseKind::Compound),
    ("Machine Chest Press",          MuscleGroup::Chest,     Equipment::Machine,    ExerciseKind::Compound),
    ("Dumbbell Fly",                 MuscleGroup::Chest,     Equipment::Dumbbell,   ExerciseKind::Isolation),
    ("Cable Crossover",              MuscleGroup::Chest,     Equipment::Cable,      ExerciseKind::Isolation),
    ("Push-Up",                      MuscleGroup::Chest,     Equipment::Bodyweight, ExerciseKind::Compound),
    ("Dip",                          MuscleGroup::Chest,     Equipment::Bodyweight, ExerciseKind::Compound),
    // Back
    ("Deadlift",                     MuscleGroup::Back,      Equipment::Barbell,    ExerciseKind::Compound),
    ("Barbell Row",                  MuscleGroup::Back,      Equipment::Barbell,    ExerciseKind::Compound),
    ("Dumbbell Row",                 MuscleGroup::Back,      Equipment::Dumbbell,   ExerciseKind::Compound),
    ("T-Bar Row",                    MuscleGroup::Back,      Equipment::Barbell,    ExerciseKind::Compound),
    ("Pull-Up",                      MuscleGroup::Back,      Equipment::Bodyweight, ExerciseKind::Compound),
    ("Chin-Up",                      MuscleGroup::Back,      Equipment::Bodyweight, ExerciseKind::Compound),
    ("Lat Pulldown",                 MuscleGroup::Back,      Equipment::Cable,      ExerciseKind::Compound),
    ("Seated Cable Row",             MuscleGroup::Back,      Equipment::Cable,      ExerciseKind::Compound),
    ("Back Extension",               MuscleGroup::Back,      Equipment::Bodyweight, ExerciseKind::Isolation),
    // Legs
    ("Barbell Back Squat",           MuscleGroup::Legs,      Equipment::Barbell,    ExerciseKind::Compound),
    ("Front Squat",                  MuscleGroup::Legs,      Equipment::Barbell,    ExerciseKind::Compound),
    ("Goblet Squat",                 MuscleGroup::Legs,      Equipment::Dumbbell,   ExerciseKind::Compound),
    ("Leg Press",                    MuscleGroup::Legs,      Equipment::Machine,    ExerciseKind::Compound),
    ("Romanian Deadlift",            MuscleGroup::Legs,      Equipment::Barbell,    ExerciseKind::Compound),
    ("Bulgarian Split Squat",        MuscleGroup::Legs,      Equipment::Dumbbell,   ExerciseKind::Compound),
    ("Walking Lunge",                MuscleGroup::Legs,      Equipment::Dumbbell,   ExerciseKind::Compound),
    ("Hip Thrust",                   MuscleGroup::Legs,      Equipment::Barbell,    ExerciseKind::Compound),
    ("Leg Extension",                MuscleGroup::Legs,      Equipment::Machine,    ExerciseKind::Isolation),
    ("Leg Curl",                     MuscleGroup::Legs,      Equipment::Machine,    ExerciseKind::Isolation),
    ("Calf Raise",                   MuscleGroup::Legs,      Equipment::Machine,    ExerciseKind::Isolation),
    // Shoulders
    ("Overhead Press",               MuscleGroup::Shoulders, Equipment::Barbell,    ExerciseKind::Compound),
    ("Seated Dumbbell Press",        MuscleGroup::Shoulders, Equipment::Dumbbell,   ExerciseKind::Compound),
    ("Arnold Press",                 MuscleGroup::Shoulders, Equipment::Dumbbell,   ExerciseKind::Compound),
    ("Lateral Raise",                MuscleGroup::Shoulders, Equipment::Dumbbell,   ExerciseKind::Isolation),
    ("Rear Delt Fly",                MuscleGroup::Shoulders, Equipment::Dumbbell,   ExerciseKind::Isolation),
    ("Face Pull",                    MuscleGroup::Shoulders, Equipment::Cable,      ExerciseKind::Isolation),
    ("Upright Row",                  MuscleGroup::Shoulders, Equipment::Barbell,    ExerciseKind::Compound),
    // Arms
    ("Barbell Curl",                 MuscleGroup::Arms,      Equipment::Barbell,    ExerciseKind::Isolation),
    ("Dumbbell Curl",                MuscleGroup::Arms,      Equipment::Dumbbell,   ExerciseKind::Isolation),
    ("Hammer Curl",                  MuscleGroup::Arms,      Equipment::Dumbbell,   ExerciseKind::Isolation),
    ("Preacher Curl",                MuscleGroup::Arms,      Equipment::Machine,    ExerciseKind::Isolation),
    ("Triceps Pushdown",             MuscleGroup::Arms,      Equipment::Cable,      ExerciseKind::Isolation),
    ("Skull Crusher",                MuscleGroup::Arms,      Equipment::Barbell,    ExerciseKind::Isolation),
    ("Overhead Triceps Extension",   MuscleGroup::Arms,      Equipment::Dumbbell,   ExerciseKind::Isolation),
    ("Close-Grip Bench Press",       MuscleGroup::Arms,      Equipment::Barbell,    ExerciseKind::Compound),
    // Core
    ("Plank",                        MuscleGroup::Core,      Equipment::Bodyweight, ExerciseKind::Isolation),
    ("Hanging Leg Raise",            MuscleGroup::Core,      Equipment::Bodyweight, ExerciseKind::Isolation),
    ("Cable Crunch",                 MuscleGroup::Core,      Equipment::Cable,      ExerciseKind::Isolation),
    ("Ab Wheel Rollout",             MuscleGroup::Core,      Equipment::Bodyweight, ExerciseKind::Compound),
    ("Russian Twist",                MuscleGroup::Core,      Equipment::Bodyweight, ExerciseKind::Isolation),
    ("Sit-Up",                       MuscleGroup::Core,      Equipment::Bodyweight, ExerciseKind::Isolation),
];

/// Plain alias index: normalized alias to normalized canonical name
#[rustfmt::skip]
const ALIAS_TABLE: &[(&str, &str)] = &[
    ("bench press",        "barbell bench press"),
    ("bench",              "barbell bench press"),
    ("incline bench",      "incline barbell bench press"),
    ("db bench press",     "dumbbell bench press"),
    ("squat",              "barbell back squat"),
    ("back squat",         "barbell back squat"),
    ("ohp",                "overhead press"),
    ("military press",     "overhead press"),
    ("shoulder press",     "overhead press"),
    ("rdl",                "romanian deadlift"),
    ("conventional deadlift", "deadlift"),
    ("bent over row",      "barbell row"),
    ("bb row",             "barbell row"),
    ("pullup",             "pull-up"),
    ("pull up",            "pull-up"),
    ("chinup",             "chin-up"),
    ("chin up",            "chin-up"),
    ("pushup",             "push-up"),
    ("push up",            "push-up"),
    ("lat pull down",      "lat pulldown"),
    ("tricep pushdown",    "triceps pushdown"),
    ("lunges",             "walking lunge"),
    ("bicep curl",         "dumbbell curl"),
];

static BUILTIN_INDEX: LazyLock<HashMap<String, ExerciseInfo>> = LazyLock::new(|| {
    BUILTIN_TABLE
        .iter()
        .map(|&(name, muscle, equipment, kind)| {
            (
                normalize_name(name),
                ExerciseInfo {
                    name: name.to_string(),
                    muscle,
                    equipment,
                    kind,
                },
            )
        })
        .collect()
});

static ALIAS_INDEX: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| ALIAS_TABLE.iter().copied().collect());

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_and_whitespace_insensitive() {
        let info = BuiltinCatalog::resolve("  BARBELL   bench PRESS ").unwrap();
        assert_eq!(info.name, "Barbell Bench Press");
        assert_eq!(info.muscle, MuscleGroup::Chest);
    }

    #[test]
    fn aliases_reach_their_canonical_entry() {
        assert_eq!(
            BuiltinCatalog::resolve("squat").unwrap().name,
            "Barbell Back Squat"
        );
        assert_eq!(
            BuiltinCatalog::resolve("OHP").unwrap().name,
            "Overhead Press"
        );
        assert_eq!(BuiltinCatalog::resolve("rdl").unwrap().muscle, MuscleGroup::Legs);
    }

    #[test]
    fn unknown_names_are_none() {
        assert!(BuiltinCatalog::resolve("quantum flux press").is_none());
    }

    #[test]
    fn every_alias_targets_a_real_entry() {
        for (alias, canonical) in ALIAS_TABLE {
            assert!(
                BUILTIN_INDEX.contains_key(*canonical),
                "alias {alias} points at missing entry {canonical}"
            );
        }
    }

    #[tokio::test]
    async fn entries_are_sorted_by_name() {
        let entries = BuiltinCatalog.entries().await.unwrap();
        assert!(entries.len() > 40);
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }
}
