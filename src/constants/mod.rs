// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Groups routine limits, stats defaults, client cache sizing, and env lookups
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

//! Constants module
//!
//! This module organizes application constants by domain for better
//! maintainability. Constants are grouped into logical domains rather than
//! being in a single large file.

use std::env;

/// Routine and session domain limits
pub mod limits {
    /// Minimum planned sessions in a routine cycle
    pub const MIN_TOTAL_SESSIONS: u32 = 12;

    /// Maximum planned sessions in a routine cycle
    pub const MAX_TOTAL_SESSIONS: u32 = 72;

    /// Largest JSON body accepted by the API
    pub const MAX_JSON_BODY_BYTES: usize = 1_048_576;

    /// Default page size for set history queries
    pub const DEFAULT_SETS_PAGE_SIZE: u32 = 100;

    /// Hard cap on the page size for set history queries
    pub const MAX_SETS_PAGE_SIZE: u32 = 500;
}

/// Statistics aggregation defaults
pub mod stats {
    /// Number of entries in the top-exercise ranking
    pub const TOP_EXERCISES_LIMIT: usize = 5;

    /// Assumed training days per week when no routine is active
    pub const FALLBACK_DAYS_PER_WEEK: u32 = 3;
}

/// Device-side progress store defaults
pub mod client {
    /// Default capacity of the LRU progress cache
    pub const DEFAULT_CACHE_CAPACITY: usize = 64;
}

/// Service identity strings used in logs
pub mod service_names {
    /// Structured-log service name for the API server
    pub const IRONLOG_SERVER: &str = "ironlog-server";
}

/// HTTP server timings
pub mod server {
    /// Per-request timeout applied by the timeout layer
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;

    /// Maximum number of pooled SQLite connections
    pub const DB_MAX_CONNECTIONS: u32 = 5;
}

/// Environment-based configuration
pub mod env_config {
    use super::env;

    /// Get HTTP server port from environment or default
    #[must_use]
    pub fn http_port() -> u16 {
        env::var("HTTP_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8080)
    }

    /// Get database URL from environment or default
    #[must_use]
    pub fn database_url() -> String {
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:./data/ironlog.db".to_string())
    }

    /// Get log level from environment or default
    #[must_use]
    pub fn log_level() -> String {
        env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string())
    }

    /// Get CORS allowed origins from environment or default
    #[must_use]
    pub fn cors_allowed_origins() -> String {
        env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string())
    }
}
