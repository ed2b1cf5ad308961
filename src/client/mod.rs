// ABOUTME: Device-side progress store: local cache tier over the authoritative REST backend
// ABOUTME: Offline-first reads with stale-while-revalidate and write-through sync
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

//! Client progress store
//!
//! Mobile and desktop clients keep a local copy of session progress so the
//! workout screen renders without waiting on the network. This module models
//! that as a two-tier store: a [`ProgressCache`] in front of a
//! [`ProgressBackend`], reconciled by the same pure merge the server uses
//! for sync.

/// Authoritative server tier (trait + reqwest implementation)
pub mod backend;
/// Local cache tier (trait + LRU implementation)
pub mod cache;
/// The combined two-tier store
pub mod store;

pub use backend::{HttpProgressBackend, ProgressBackend};
pub use cache::{MemoryProgressCache, ProgressCache};
pub use store::{ReadSource, TieredProgressStore, TieredRead};
