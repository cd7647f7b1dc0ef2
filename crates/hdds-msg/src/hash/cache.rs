// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Compute-once cache of type hashes keyed by full type name.

use super::TypeHash;
use crate::error::SchemaError;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

/// Cache hit/miss statistics.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LookupStats {
    pub hits: u64,
    pub misses: u64,
}

/// Append-only map from type name to hash.
///
/// Each name owns a `OnceLock` slot: concurrent first reads may both
/// compute, but only one value is ever published and an entry never changes
/// afterwards. Failed computations publish nothing.
#[derive(Debug, Default)]
pub struct HashCache {
    entries: DashMap<String, Arc<OnceLock<TypeHash>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl HashCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached hash for `name`, computing and publishing it on
    /// first use.
    pub fn get_or_compute<F>(&self, name: &str, compute: F) -> Result<TypeHash, SchemaError>
    where
        F: FnOnce() -> Result<TypeHash, SchemaError>,
    {
        let slot = match self.entries.get(name) {
            Some(entry) => Arc::clone(entry.value()),
            None => Arc::clone(self.entries.entry(name.to_string()).or_default().value()),
        };

        if let Some(hash) = slot.get() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(*hash);
        }

        let computed = compute()?;
        self.misses.fetch_add(1, Ordering::Relaxed);
        let published = *slot.get_or_init(|| computed);
        if published == computed {
            log::debug!("[hdds-msg] published type hash {} for {}", published, name);
        }
        Ok(published)
    }

    /// Cached hash, if already computed.
    pub fn get(&self, name: &str) -> Option<TypeHash> {
        self.entries.get(name).and_then(|entry| entry.value().get().copied())
    }

    /// Number of published hashes.
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.value().get().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn stats(&self) -> LookupStats {
        LookupStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
