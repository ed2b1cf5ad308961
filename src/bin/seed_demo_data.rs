// ABOUTME: Demo data seeder for local IronLog development
// ABOUTME: Generates a demo routine, weeks of jittered set logs, and session progress
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

//! Demo data seeder for IronLog.
//!
//! This binary populates the database with realistic demo data for testing
//! the statistics, progress, and routine endpoints against something that
//! looks like months of actual training.
//!
//! Usage:
//! ```bash
//! # Seed with default settings (device "demo-device", 8 weeks of history)
//! cargo run --bin seed-demo-data
//!
//! # Seed a specific device with more history
//! cargo run --bin seed-demo-data -- --device-id my-phone --weeks 12
//!
//! # Wipe the device's data before seeding
//! cargo run --bin seed-demo-data -- --reset
//!
//! # Verbose output
//! cargo run --bin seed-demo-data -- -v
//! ```

use anyhow::Result;
use chrono::{Duration, Utc};
use clap::Parser;
use ironlog::database::{Database, ProgressManager, RoutinesManager, SetsManager};
use ironlog::models::{
    BodyMeasurement, ExerciseSet, Routine, RoutineDay, RoutineExercise, SessionProgress,
};
use ironlog::progress::{complete_session, skip_session};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sqlx::SqlitePool;
use std::env;
use tracing::info;
use uuid::Uuid;

#[derive(Parser)]
#[command(
    name = "seed-demo-data",
    about = "IronLog Demo Data Seeder",
    long_about = "Populate the database with a demo routine, weeks of logged sets, and session progress"
)]
struct SeedArgs {
    /// Device identifier to seed data under
    #[arg(long, default_value = "demo-device")]
    device_id: String,

    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,

    /// Number of weeks of training history to generate
    #[arg(long, default_value = "8")]
    weeks: u32,

    /// Delete the device's existing data before seeding
    #[arg(long)]
    reset: bool,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// One exercise slot in the demo plan
struct DemoExercise {
    name: &'static str,
    sets: u32,
    reps: u32,
    /// Starting working weight in kg; progresses over the weeks
    base_weight: f64,
}

/// One training day in the demo plan
struct DemoDay {
    name: &'static str,
    exercises: &'static [DemoExercise],
}

/// Classic three-day push/pull/legs split
const DEMO_PLAN: &[DemoDay] = &[
    DemoDay {
        name: "Push",
        exercises: &[
            DemoExercise {
                name: "Barbell Bench Press",
                sets: 4,
                reps: 8,
                base_weight: 60.0,
            },
            DemoExercise {
                name: "Overhead Press",
                sets: 3,
                reps: 10,
                base_weight: 35.0,
            },
            DemoExercise {
                name: "Triceps Pushdown",
                sets: 3,
                reps: 12,
                base_weight: 25.0,
            },
        ],
    },
    DemoDay {
        name: "Pull",
        exercises: &[
            DemoExercise {
                name: "Deadlift",
                sets: 3,
                reps: 5,
                base_weight: 100.0,
            },
            DemoExercise {
                name: "Barbell Row",
                sets: 4,
                reps: 8,
                base_weight: 55.0,
            },
            DemoExercise {
                name: "Barbell Curl",
                sets: 3,
                reps: 12,
                base_weight: 20.0,
            },
        ],
    },
    DemoDay {
        name: "Legs",
        exercises: &[
            DemoExercise {
                name: "Barbell Back Squat",
                sets: 4,
                reps: 8,
                base_weight: 80.0,
            },
            DemoExercise {
                name: "Romanian Deadlift",
                sets: 3,
                reps: 10,
                base_weight: 70.0,
            },
            DemoExercise {
                name: "Leg Press",
                sets: 3,
                reps: 12,
                base_weight: 120.0,
            },
        ],
    },
];

/// Sessions per calendar week for the demo split
const SESSIONS_PER_WEEK: u32 = 3;

/// Probability that a planned session was skipped instead of trained
const SKIP_PROBABILITY: f64 = 0.08;

#[tokio::main]
async fn main() -> Result<()> {
    let args = SeedArgs::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    info!("=== IronLog Demo Data Seeder ===");

    // Load database URL
    let database_url = args
        .database_url
        .or_else(|| env::var("DATABASE_URL").ok())
        .unwrap_or_else(|| "sqlite:./data/ironlog.db".into());

    info!("Connecting to database: {}", database_url);
    let database = Database::new(&database_url).await?;

    if args.reset {
        info!("Resetting data for device '{}'...", args.device_id);
        reset_device_data(database.pool(), &args.device_id).await?;
    }

    info!("Step 1: Creating demo routine...");
    let routine = seed_routine(&database, &args.device_id).await?;
    info!("  Routine '{}' ({})", routine.name, routine.id);

    info!(
        "Step 2: Generating {} weeks of training history...",
        args.weeks
    );
    let (set_count, progress) = seed_training_history(&database, &routine, args.weeks).await?;
    info!(
        "  Logged {} sets across {} completed sessions ({} skipped)",
        set_count,
        progress.completed_sessions.len(),
        progress.skipped_sessions.len()
    );

    info!("Step 3: Recording body measurements...");
    let measurement_count = seed_measurements(&database, &args.device_id, args.weeks).await?;
    info!("  Recorded {} measurements", measurement_count);

    info!("");
    info!("=== Seeding Complete ===");
    print_summary(database.pool(), &args.device_id).await?;

    Ok(())
}

/// Delete everything stored under the device
async fn reset_device_data(pool: &SqlitePool, device_id: &str) -> Result<()> {
    for table in [
        "exercise_sets",
        "session_progress",
        "body_measurements",
        "routines",
    ] {
        sqlx::query(&format!("DELETE FROM {table} WHERE device_id = ?"))
            .bind(device_id)
            .execute(pool)
            .await?;
    }
    Ok(())
}

/// Create (or reuse) the demo routine and make it active
async fn seed_routine(database: &Database, device_id: &str) -> Result<Routine> {
    let manager = RoutinesManager::new(database.pool().clone());

    // Reuse an existing demo routine so reseeding stays idempotent
    if let Some(existing) = manager
        .list(device_id)
        .await?
        .into_iter()
        .find(|r| r.name == "Push Pull Legs")
    {
        info!("  Found existing demo routine");
        return Ok(existing);
    }

    let now = Utc::now();
    let routine = Routine {
        id: Uuid::new_v4(),
        device_id: device_id.to_owned(),
        name: "Push Pull Legs".to_owned(),
        days: DEMO_PLAN
            .iter()
            .enumerate()
            .map(|(order, day)| RoutineDay {
                order: order as u32,
                name: day.name.to_owned(),
                exercises: day
                    .exercises
                    .iter()
                    .map(|exercise| RoutineExercise {
                        id: Uuid::new_v4(),
                        name: exercise.name.to_owned(),
                        target_sets: exercise.sets,
                        target_reps: exercise.reps,
                        rest_seconds: Some(120),
                    })
                    .collect(),
            })
            .collect(),
        total_sessions: 36,
        is_active: false,
        created_at: now,
        updated_at: now,
    };
    routine.validate()?;
    manager.create(&routine).await?;

    let activated = manager
        .activate(device_id, routine.id)
        .await?
        .unwrap_or(routine);
    Ok(activated)
}

/// Walk the plan week by week, logging jittered sets and advancing progress
async fn seed_training_history(
    database: &Database,
    routine: &Routine,
    weeks: u32,
) -> Result<(u64, SessionProgress)> {
    let sets_manager = SetsManager::new(database.pool().clone());
    let progress_manager = ProgressManager::new(database.pool().clone());
    let mut rng = StdRng::from_entropy();

    let mut progress = SessionProgress::new(&routine.device_id, routine.id);
    let mut set_count: u64 = 0;

    let planned_sessions = (weeks * SESSIONS_PER_WEEK).min(routine.total_sessions);
    let history_days = i64::from(weeks * 7);

    for session_number in 1..=planned_sessions {
        // Spread sessions evenly across the history window, oldest first
        let days_ago =
            history_days - i64::from(session_number - 1) * 7 / i64::from(SESSIONS_PER_WEEK) - 1;
        let trained_at =
            Utc::now() - Duration::days(days_ago.max(0)) + Duration::hours(rng.gen_range(-3..=3));

        if rng.gen_bool(SKIP_PROBABILITY) {
            skip_session(
                &mut progress,
                session_number,
                routine.total_sessions,
                trained_at,
            )?;
            continue;
        }

        // The routine's days were built from DEMO_PLAN in order, so the day's
        // order doubles as the plan index.
        let day_order = routine
            .day_for_session(session_number)
            .map_or(0, |day| day.order as usize);
        let day = &DEMO_PLAN[day_order];
        let week = routine.week_for_session(session_number).saturating_sub(1);

        for exercise in day.exercises {
            // Slow linear progression with plate-sized jitter
            let progressed = f64::from(week).mul_add(1.25, exercise.base_weight);
            for _ in 0..exercise.sets {
                let jitter = f64::from(rng.gen_range(-1i32..=1)) * 2.5;
                let weight_kg = (progressed + jitter).max(10.0);
                let reps = exercise
                    .reps
                    .saturating_add_signed(rng.gen_range(-2i32..=1))
                    .max(1);

                let set = ExerciseSet {
                    id: Uuid::new_v4(),
                    device_id: routine.device_id.clone(),
                    exercise: exercise.name.to_owned(),
                    reps,
                    weight_kg,
                    session_number,
                    routine_exercise_id: None,
                    created_at: trained_at,
                };
                sets_manager.create(&set).await?;
                set_count += 1;
            }
        }

        complete_session(
            &mut progress,
            session_number,
            routine.total_sessions,
            trained_at,
        )?;
    }

    progress_manager.upsert(&progress).await?;
    Ok((set_count, progress))
}

/// Record a weekly body weight trend with mild noise
async fn seed_measurements(database: &Database, device_id: &str, weeks: u32) -> Result<u32> {
    let manager = ironlog::database::MeasurementsManager::new(database.pool().clone());
    let mut rng = StdRng::from_entropy();

    let starting_weight = 84.0;
    for week in 0..weeks {
        let recorded_at = Utc::now() - Duration::days(i64::from((weeks - week) * 7));
        let drift = f64::from(week) * -0.15;
        let noise = rng.gen_range(-0.4..0.4);

        let measurement = BodyMeasurement {
            id: Uuid::new_v4(),
            device_id: device_id.to_owned(),
            weight_kg: Some(starting_weight + drift + noise),
            body_fat_pct: None,
            chest_cm: None,
            waist_cm: None,
            hips_cm: None,
            arm_cm: None,
            thigh_cm: None,
            notes: if week == 0 {
                Some("seeded baseline".to_owned())
            } else {
                None
            },
            recorded_at,
        };
        manager.create(&measurement).await?;
    }

    Ok(weeks)
}

/// Print summary statistics for the seeded device
async fn print_summary(pool: &SqlitePool, device_id: &str) -> Result<()> {
    print_count(
        pool,
        "Routines",
        "SELECT COUNT(*) FROM routines WHERE device_id = ?",
        device_id,
    )
    .await?;
    print_count(
        pool,
        "Exercise Sets",
        "SELECT COUNT(*) FROM exercise_sets WHERE device_id = ?",
        device_id,
    )
    .await?;
    print_count(
        pool,
        "Progress Records",
        "SELECT COUNT(*) FROM session_progress WHERE device_id = ?",
        device_id,
    )
    .await?;
    print_count(
        pool,
        "Measurements",
        "SELECT COUNT(*) FROM body_measurements WHERE device_id = ?",
        device_id,
    )
    .await?;

    info!("Done! Point a client at the server to browse the demo data.");
    Ok(())
}

/// Helper to print a single count query result
async fn print_count(pool: &SqlitePool, label: &str, query: &str, device_id: &str) -> Result<()> {
    let row: (i64,) = sqlx::query_as(query)
        .bind(device_id)
        .fetch_one(pool)
        .await?;
    info!("{}: {}", label, row.0);
    Ok(())
}
