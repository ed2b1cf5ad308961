// ABOUTME: Exercise catalog resolving logged names to muscle, equipment, and kind metadata
// ABOUTME: Compiled-in table layered under device-defined custom entries; custom wins
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

//! # Exercise Catalog
//!
//! Maps free-text exercise names to [`ExerciseInfo`] metadata. Lookups
//! normalize the name (lowercase, collapsed whitespace) and consult two
//! layers: device-defined custom entries in the database, then the
//! compiled-in [`builtin`] table with its alias index. Custom entries
//! shadow builtin ones of the same normalized name.
//!
//! The statistics engine is the main consumer: it resolves every distinct
//! exercise name in the set log to a muscle group, and names no layer can
//! resolve fall into the `Other` bucket rather than failing aggregation.

pub mod builtin;

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::database::ExerciseCatalogManager;
use crate::errors::AppResult;
use crate::models::ExerciseInfo;

pub use builtin::BuiltinCatalog;

/// Boundary trait for exercise metadata resolution
#[async_trait]
pub trait ExerciseCatalog: Send + Sync {
    /// Resolve an exercise name to its catalog entry
    async fn lookup(&self, name: &str) -> AppResult<Option<ExerciseInfo>>;

    /// Every entry the catalog knows about, ordered by name
    async fn entries(&self) -> AppResult<Vec<ExerciseInfo>>;
}

/// Normalize an exercise name for catalog keying: lowercase with runs of
/// whitespace collapsed to single spaces.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Custom database entries layered over the builtin table
pub struct LayeredCatalog {
    custom: ExerciseCatalogManager,
    builtin: BuiltinCatalog,
}

impl LayeredCatalog {
    /// Layer custom entries from the database over the builtin table
    #[must_use]
    pub const fn new(custom: ExerciseCatalogManager) -> Self {
        Self {
            custom,
            builtin: BuiltinCatalog,
        }
    }
}

#[async_trait]
impl ExerciseCatalog for LayeredCatalog {
    async fn lookup(&self, name: &str) -> AppResult<Option<ExerciseInfo>> {
        let normalized = normalize_name(name);
        if let Some(custom) = self.custom.get(&normalized).await? {
            return Ok(Some(custom));
        }
        self.builtin.lookup(name).await
    }

    async fn entries(&self) -> AppResult<Vec<ExerciseInfo>> {
        let mut merged: BTreeMap<String, ExerciseInfo> = self
            .builtin
            .entries()
            .await?
            .into_iter()
            .map(|info| (normalize_name(&info.name), info))
            .collect();
        for info in self.custom.list().await? {
            merged.insert(normalize_name(&info.name), info);
        }
        Ok(merged.into_values().collect())
    }
}
