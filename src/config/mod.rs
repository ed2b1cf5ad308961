// ABOUTME: Configuration management module for centralized server settings
// ABOUTME: Exposes the environment-driven ServerConfig used across the application
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

//! Configuration module for the IronLog server
//!
//! Configuration is environment-only: a `.env` file is honored in development
//! and every setting has a sensible default, so a bare `ironlog-server`
//! invocation works out of the box.

/// Environment and server configuration
pub mod environment;

pub use environment::{DatabaseUrl, Environment, LogLevel, ServerConfig};
