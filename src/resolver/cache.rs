//! Per-item resolution cache.
//!
//! Scoped to one content item: every unique reference ID is looked up at most
//! once even when it occurs in several rich-text fields resolved
//! concurrently. Entries are write-once; a concurrent duplicate insert keeps
//! the first value, which is safe because the same ID always resolves to the
//! same result within one pass.

use dashmap::DashMap;

use super::{ResolvedAsset, ResolvedRoute};

/// Lookup outcomes, including negative ones, keyed by reference ID.
///
/// The inner `Option` distinguishes "resolved" from "looked up and failed";
/// a missing key means the ID has not been attempted yet.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    assets: DashMap<String, Option<ResolvedAsset>>,
    routes: DashMap<String, Option<ResolvedRoute>>,
}

impl ResolutionCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lookup outcome for an asset ID, if it has been attempted.
    #[must_use]
    pub fn asset(&self, id: &str) -> Option<Option<ResolvedAsset>> {
        self.assets.get(id).map(|entry| entry.value().clone())
    }

    /// Record an asset lookup outcome. First write wins.
    pub fn record_asset(&self, id: &str, outcome: Option<ResolvedAsset>) {
        self.assets.entry(id.to_string()).or_insert(outcome);
    }

    /// Lookup outcome for a page ID, if it has been attempted.
    #[must_use]
    pub fn route(&self, id: &str) -> Option<Option<ResolvedRoute>> {
        self.routes.get(id).map(|entry| entry.value().clone())
    }

    /// Record a page lookup outcome. First write wins.
    pub fn record_route(&self, id: &str, outcome: Option<ResolvedRoute>) {
        self.routes.entry(id.to_string()).or_insert(outcome);
    }
}
