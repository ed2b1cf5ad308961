// ABOUTME: Session progress engine with pure state transitions and snapshot merging
// ABOUTME: Tracks which numbered sessions are completed, skipped, or pending per device+routine
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

//! # Session Progress Engine
//!
//! Pure state logic for per device+routine session tracking. The engine owns
//! no IO: callers load a [`crate::models::SessionProgress`] record, apply a
//! transition, and persist the result.
//!
//! Two halves:
//!
//! - [`engine`]: validated complete/skip transitions, the per-session state
//!   machine view, and client snapshot sanitization
//! - [`merge`]: the commutative merge used to reconcile two progress
//!   snapshots (server sync and client revalidation share it)

pub mod engine;
pub mod merge;

pub use engine::{complete_session, sanitize_snapshot, session_state, skip_session, SessionState};
pub use merge::merge_progress;
