// ABOUTME: Centralized resource management for shared server components
// ABOUTME: Single construction point for the database, catalog, and configuration handles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

//! Shared state handed to every route handler.

use std::sync::Arc;

use crate::catalog::{ExerciseCatalog, LayeredCatalog};
use crate::config::environment::ServerConfig;
use crate::database::{Database, ExerciseCatalogManager};

/// Resources shared across all HTTP handlers
///
/// Wrapped in a single `Arc` by the router, so the fields themselves stay
/// plain handles. The database pool is internally reference counted and
/// cheap to clone into per-request managers.
pub struct ServerResources {
    /// Database handle backing all persistence managers
    pub database: Database,
    /// Exercise catalog, custom entries layered over the builtin table
    pub catalog: Arc<dyn ExerciseCatalog>,
    /// Server configuration
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Create server resources from a connected database and configuration
    #[must_use]
    pub fn new(database: Database, config: Arc<ServerConfig>) -> Self {
        let custom = ExerciseCatalogManager::new(database.pool().clone());
        let catalog: Arc<dyn ExerciseCatalog> = Arc::new(LayeredCatalog::new(custom));
        Self {
            database,
            catalog,
            config,
        }
    }
}
