// ABOUTME: Domain service layer for business logic extracted from route handlers
// ABOUTME: Orchestrates managers, the progress engine, and the stats engine
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

//! Domain service layer
//!
//! Business logic extracted from route handlers. Services load state through
//! the database managers, apply the pure engines (progress transitions,
//! stats aggregation), and persist the result, keeping the HTTP layer thin.

/// Session progress orchestration: get-or-create, complete, skip, sync
pub mod progress;

/// Statistics orchestration: log fetch, catalog resolution, aggregation
pub mod stats;
