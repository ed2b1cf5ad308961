// ABOUTME: Main library entry point for the IronLog fitness tracking API
// ABOUTME: REST server, session progress engine, statistics aggregation, and client store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

// Crate-level attributes:
// - recursion_limit: Increased from default 128 to 256 for complex derive macros
//   (serde, thiserror) on deeply nested types like routine documents
// - deny(unsafe_code): Zero-tolerance unsafe policy
#![recursion_limit = "256"]
#![deny(unsafe_code)]

//! # IronLog
//!
//! A personal fitness-tracking REST API: training routines, an append-only
//! exercise set log, body measurements, and per-routine session progress,
//! backed by SQLite and identified by anonymous per-device identifiers.
//!
//! ## Features
//!
//! - **Routines**: plan CRUD with a single active routine per device
//! - **Session progress**: complete/skip state transitions plus an
//!   offline-friendly snapshot sync built on a commutative merge
//! - **Statistics**: volume, muscle distribution, consistency streaks,
//!   personal records, and weekly series derived from the raw set log
//! - **Exercise catalog**: builtin lift table with custom entries layered
//!   on top
//! - **Client store**: device-side cache tier with stale-while-revalidate
//!   reads against the REST backend
//!
//! ## Architecture
//!
//! The server follows a modular architecture:
//! - **Models**: document types shared by storage, services, and the wire
//! - **Progress**: pure session state transitions and the merge algorithm
//! - **Stats**: pure aggregation over set logs
//! - **Database**: SQLite persistence managers, one per domain
//! - **Routes**: thin axum handlers over the service layer
//! - **Client**: the device-side tiered progress store
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use ironlog::config::environment::ServerConfig;
//! use ironlog::errors::AppResult;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     // Load configuration
//!     let config = ServerConfig::from_env()?;
//!
//!     println!("IronLog server configured with port: HTTP={}",
//!              config.http_port);
//!
//!     Ok(())
//! }
//! ```

// ── Public API ──────────────────────────────────────────────────────────
// These modules are used by binary crates (src/bin/) and integration tests (tests/).
// They must remain `pub` so external consumers can access them.

/// Exercise catalog: builtin table plus database-backed custom entries
pub mod catalog;

/// Device-side tiered progress store (cache over REST backend)
pub mod client;

/// Configuration management and environment loading
pub mod config;

/// Application constants and configuration values
pub mod constants;

/// SQLite persistence managers, one per domain
pub mod database;

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Production logging and structured output
pub mod logging;

/// HTTP middleware (CORS policy)
pub mod middleware;

/// Document models shared by storage, services, and the wire
pub mod models;

/// Pure session progress engine: state transitions and merge
pub mod progress;

/// Centralized shared server resources
pub mod resources;

/// HTTP routes, one module per domain
pub mod routes;

/// HTTP server assembly and runtime
pub mod server;

/// Domain service layer between routes and persistence
pub mod services;

/// Pure statistics aggregation over exercise set logs
pub mod stats;
