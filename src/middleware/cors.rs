// ABOUTME: CORS middleware configuration for HTTP API endpoints
// ABOUTME: Provides Cross-Origin Resource Sharing setup for web and mobile client access
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use std::time::Duration;

use http::{header::HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// How long browsers may cache preflight responses
const PREFLIGHT_MAX_AGE_SECS: u64 = 3600;

/// Configure CORS settings for the IronLog server
///
/// Cross-origin access is controlled by the `CORS_ALLOWED_ORIGINS`
/// configuration value: "*" (or empty) allows any origin for development,
/// a comma-separated list restricts access for production.
///
/// # Examples
///
/// ```bash
/// # Allow all origins (development)
/// export CORS_ALLOWED_ORIGINS="*"
///
/// # Allow specific origins (production)
/// export CORS_ALLOWED_ORIGINS="https://app.example.com,https://admin.example.com"
/// ```
pub fn setup_cors(config: &crate::config::environment::ServerConfig) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(allowed_origins(&config.cors.allowed_origins))
        .allow_headers([
            HeaderName::from_static("content-type"),
            HeaderName::from_static("accept"),
            HeaderName::from_static("origin"),
            HeaderName::from_static("x-requested-with"),
            HeaderName::from_static("x-request-id"),
        ])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .max_age(Duration::from_secs(PREFLIGHT_MAX_AGE_SECS))
}

/// Resolve the configured origin policy
///
/// Empty and wildcard configurations allow any origin, as does a list whose
/// entries all fail to parse; startup must not be blocked by a bad origin.
fn allowed_origins(configured: &str) -> AllowOrigin {
    if configured.is_empty() || configured == "*" {
        return AllowOrigin::any();
    }

    let origins = parse_origin_list(configured);
    if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    }
}

fn parse_origin_list(configured: &str) -> Vec<HeaderValue> {
    configured
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect()
}
