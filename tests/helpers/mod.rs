// ABOUTME: Helper module index for integration tests
// ABOUTME: Exposes the Axum request/response test utilities
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

/// HTTP testing utilities for exercising routers without a socket
pub mod axum_test;
