// ABOUTME: Core data models for the IronLog workout tracking API
// ABOUTME: Defines Routine, ExerciseSet, SessionProgress, BodyMeasurement and catalog types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

//! # Data Models
//!
//! This module contains the core data structures used throughout the IronLog
//! server. Devices are identified by an opaque `device_id` string; there is no
//! account model.
//!
//! ## Design Principles
//!
//! - **Serializable**: All models support JSON serialization for the REST API
//! - **Type Safe**: Strong typing prevents common data handling errors
//! - **Set Semantics**: Completed/skipped session collections are true sets,
//!   serialized as sorted ascending arrays
//!
//! ## Core Models
//!
//! - `Routine`: A training plan with ordered days and a planned session count
//! - `ExerciseSet`: One logged set (exercise, reps, weight) in the append-only log
//! - `SessionProgress`: Per device+routine pointer into the session sequence
//! - `BodyMeasurement`: A dated body measurement entry
//! - `ExerciseInfo`: Catalog entry mapping an exercise to muscle group and equipment

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::limits;
use crate::errors::{AppError, AppResult};

/// Muscle group buckets used by the statistics engine
#[derive(Debug, Default, Copy, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum MuscleGroup {
    /// Chest (pressing movements)
    Chest,
    /// Back (rows, pulldowns, deadlift variants)
    Back,
    /// Legs (squats, lunges, leg machines)
    Legs,
    /// Shoulders (overhead pressing, raises)
    Shoulders,
    /// Arms (biceps and triceps isolation)
    Arms,
    /// Core (trunk and abdominal work)
    Core,
    /// Anything the catalog cannot classify
    #[default]
    Other,
}

impl MuscleGroup {
    /// Database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Chest => "chest",
            Self::Back => "back",
            Self::Legs => "legs",
            Self::Shoulders => "shoulders",
            Self::Arms => "arms",
            Self::Core => "core",
            Self::Other => "other",
        }
    }

    /// Parse from the database string, falling back to `Other`
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "chest" => Self::Chest,
            "back" => Self::Back,
            "legs" => Self::Legs,
            "shoulders" => Self::Shoulders,
            "arms" => Self::Arms,
            "core" => Self::Core,
            _ => Self::Other,
        }
    }
}

/// Equipment category for a catalog exercise
#[derive(Debug, Default, Copy, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Equipment {
    /// Barbell movements
    Barbell,
    /// Dumbbell movements
    Dumbbell,
    /// Fixed-path machines
    Machine,
    /// Cable stack movements
    Cable,
    /// Bodyweight movements
    Bodyweight,
    /// Anything else (bands, kettlebells, ...)
    #[default]
    Other,
}

impl Equipment {
    /// Database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Barbell => "barbell",
            Self::Dumbbell => "dumbbell",
            Self::Machine => "machine",
            Self::Cable => "cable",
            Self::Bodyweight => "bodyweight",
            Self::Other => "other",
        }
    }

    /// Parse from the database string, falling back to `Other`
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "barbell" => Self::Barbell,
            "dumbbell" => Self::Dumbbell,
            "machine" => Self::Machine,
            "cable" => Self::Cable,
            "bodyweight" => Self::Bodyweight,
            _ => Self::Other,
        }
    }
}

/// Whether an exercise is a multi-joint or single-joint movement
#[derive(Debug, Default, Copy, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseKind {
    /// Multi-joint movement (squat, bench press, row)
    #[default]
    Compound,
    /// Single-joint movement (curl, extension, raise)
    Isolation,
}

impl ExerciseKind {
    /// Database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Compound => "compound",
            Self::Isolation => "isolation",
        }
    }

    /// Parse from the database string, falling back to `Compound`
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "isolation" => Self::Isolation,
            _ => Self::Compound,
        }
    }
}

/// Catalog entry describing a known exercise
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExerciseInfo {
    /// Display name (e.g., "Barbell Bench Press")
    pub name: String,
    /// Primary muscle group trained
    pub muscle: MuscleGroup,
    /// Equipment category
    pub equipment: Equipment,
    /// Compound or isolation classification
    pub kind: ExerciseKind,
}

/// One exercise slot inside a routine day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoutineExercise {
    /// Stable identifier, referenced by logged sets
    pub id: Uuid,
    /// Exercise name as shown to the user
    pub name: String,
    /// Prescribed number of working sets
    pub target_sets: u32,
    /// Prescribed repetitions per set
    pub target_reps: u32,
    /// Optional rest between sets, in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rest_seconds: Option<u32>,
}

/// One ordered training day inside a routine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoutineDay {
    /// Zero-based position within the routine cycle
    pub order: u32,
    /// Day label (e.g., "Push", "Pull", "Legs")
    pub name: String,
    /// Exercises prescribed for this day
    pub exercises: Vec<RoutineExercise>,
}

/// A training routine: an ordered cycle of days repeated across sessions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Routine {
    /// Unique routine identifier
    pub id: Uuid,
    /// Owning device
    pub device_id: String,
    /// Routine name (e.g., "PPL 6-week block")
    pub name: String,
    /// Ordered training days; session N maps to day `(N - 1) % days.len()`
    pub days: Vec<RoutineDay>,
    /// Planned number of sessions in the full cycle
    pub total_sessions: u32,
    /// Whether this is the device's active routine (at most one)
    pub is_active: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl Routine {
    /// Number of distinct training days in one cycle week
    #[must_use]
    pub fn days_per_week(&self) -> u32 {
        self.days.len() as u32
    }

    /// The routine day a 1-based session number lands on, wrapping around the cycle
    #[must_use]
    pub fn day_for_session(&self, session_number: u32) -> Option<&RoutineDay> {
        if session_number == 0 || self.days.is_empty() {
            return None;
        }
        let index = ((session_number - 1) as usize) % self.days.len();
        self.days.get(index)
    }

    /// The 1-based week a session number falls in (ceiling of session / days-per-week)
    #[must_use]
    pub fn week_for_session(&self, session_number: u32) -> u32 {
        let days = (self.days.len().max(1)) as u32;
        session_number.max(1).div_ceil(days)
    }

    /// Validate structural invariants before persisting
    ///
    /// # Errors
    ///
    /// Returns `AppError::invalid_input` for an empty name or day list, and
    /// `AppError::out_of_range` when `total_sessions` falls outside the
    /// allowed cycle length.
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::invalid_input("routine name must not be empty"));
        }
        if self.days.is_empty() {
            return Err(AppError::invalid_input(
                "routine must define at least one training day",
            ));
        }
        if self.total_sessions < limits::MIN_TOTAL_SESSIONS
            || self.total_sessions > limits::MAX_TOTAL_SESSIONS
        {
            return Err(AppError::out_of_range(format!(
                "total_sessions must be between {} and {}",
                limits::MIN_TOTAL_SESSIONS,
                limits::MAX_TOTAL_SESSIONS
            )));
        }
        Ok(())
    }
}

/// One logged set in the append-only exercise log
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExerciseSet {
    /// Unique set identifier
    pub id: Uuid,
    /// Owning device
    pub device_id: String,
    /// Exercise name as entered (resolved against the catalog for stats)
    pub exercise: String,
    /// Repetitions performed
    pub reps: u32,
    /// Weight moved, in kilograms
    pub weight_kg: f64,
    /// 1-based session number this set was logged under
    pub session_number: u32,
    /// Routine exercise slot this set fulfils, when logged from a routine
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routine_exercise_id: Option<Uuid>,
    /// Logging timestamp
    pub created_at: DateTime<Utc>,
}

impl ExerciseSet {
    /// Training volume contributed by this set (weight x reps)
    #[must_use]
    pub fn volume_kg(&self) -> f64 {
        self.weight_kg * f64::from(self.reps)
    }
}

/// A dated body measurement entry; every measured field is optional
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BodyMeasurement {
    /// Unique measurement identifier
    pub id: Uuid,
    /// Owning device
    pub device_id: String,
    /// Body weight in kilograms
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    /// Body fat percentage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_fat_pct: Option<f64>,
    /// Chest circumference in centimeters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chest_cm: Option<f64>,
    /// Waist circumference in centimeters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waist_cm: Option<f64>,
    /// Hip circumference in centimeters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hips_cm: Option<f64>,
    /// Upper arm circumference in centimeters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arm_cm: Option<f64>,
    /// Thigh circumference in centimeters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thigh_cm: Option<f64>,
    /// Free-form notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// When the measurement was taken
    pub recorded_at: DateTime<Utc>,
}

/// Per device+routine progress through the session sequence
///
/// `completed_sessions` and `skipped_sessions` are true sets: membership is
/// what matters, serialization is always sorted ascending, and the two sets
/// stay disjoint (completion wins when they would overlap).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionProgress {
    /// Owning device
    pub device_id: String,
    /// Routine this progress tracks
    pub routine_id: Uuid,
    /// 1-based next session to perform; may reach `total_sessions + 1` when done
    pub current_session: u32,
    /// Session numbers completed at least once
    pub completed_sessions: BTreeSet<u32>,
    /// Session numbers skipped and never completed
    pub skipped_sessions: BTreeSet<u32>,
    /// Timestamp of the most recent completed session, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_workout_date: Option<DateTime<Utc>>,
    /// Last mutation timestamp
    pub updated_at: DateTime<Utc>,
}

impl SessionProgress {
    /// Fresh progress record: next session is 1, nothing completed or skipped
    #[must_use]
    pub fn new(device_id: impl Into<String>, routine_id: Uuid) -> Self {
        Self {
            device_id: device_id.into(),
            routine_id,
            current_session: 1,
            completed_sessions: BTreeSet::new(),
            skipped_sessions: BTreeSet::new(),
            last_workout_date: None,
            updated_at: Utc::now(),
        }
    }
}
