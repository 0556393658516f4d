//! Per-content-type fetch layer.
//!
//! Each site content section (conditions, drugs, wellness, ayurveda, yoga)
//! is described by a [`ContentSpec`]: its route prefix plus the ordered list
//! of API endpoint candidates its detail and listing lookups are tried
//! against. The candidate lists exist because the CMS exposes different path
//! shapes for types added at different times; first success wins.
//!
//! Unlike placeholder lookups, a detail fetch that fails across every
//! candidate is a page-level outcome: the caller gets `NotFound` and renders
//! its 404, nothing is swallowed here.

use serde_json::Value;
use thiserror::Error;

use crate::cms::{CmsClient, CmsError, EndpointCandidates};

/// Failure of a content-item fetch.
#[derive(Debug, Error)]
pub enum ContentError {
    /// Every endpoint candidate 404ed; the item does not exist.
    #[error("content item not found: {slug}")]
    NotFound { slug: String },

    #[error(transparent)]
    Cms(#[from] CmsError),
}

/// One content section's API and routing description.
#[derive(Debug, Clone)]
pub struct ContentSpec {
    pub name: String,
    pub route_prefix: String,
    pub detail_candidates: EndpointCandidates,
    pub listing_candidates: EndpointCandidates,
}

impl ContentSpec {
    /// Fetch a content item's detail payload by slug.
    ///
    /// The payload stays untyped (`serde_json::Value`): which rich-text
    /// fields exist varies per type, and the caller picks the ones it feeds
    /// into the pipeline.
    pub async fn fetch_detail(&self, client: &CmsClient, slug: &str) -> Result<Value, ContentError> {
        self.detail_candidates
            .fetch_first(client, slug)
            .await
            .map_err(|err| {
                if err.is_not_found() {
                    ContentError::NotFound { slug: slug.to_string() }
                } else {
                    ContentError::Cms(err)
                }
            })
    }

    /// Fetch the section's listing payload.
    pub async fn fetch_listing(&self, client: &CmsClient) -> Result<Value, ContentError> {
        self.listing_candidates
            .fetch_first(client, "")
            .await
            .map_err(ContentError::from)
    }
}

/// The five content sections of the site, with their endpoint fallbacks.
///
/// Candidate order reflects the CMS's actual surface: the per-type page
/// endpoint first, then the older generic spelling.
#[must_use]
pub fn default_content_specs() -> Vec<ContentSpec> {
    [
        ("conditions", "/conditions", "condition-pages", "conditions"),
        ("drugs", "/drugs", "drug-pages", "drugs"),
        ("wellness", "/wellness", "wellness-pages", "wellness"),
        ("ayurveda", "/ayurveda", "ayurveda-pages", "ayurveda"),
        ("yoga", "/yoga", "yoga-pages", "yoga"),
    ]
    .into_iter()
    .map(|(name, prefix, primary, legacy)| ContentSpec {
        name: name.to_string(),
        route_prefix: prefix.to_string(),
        detail_candidates: EndpointCandidates::new(vec![
            format!("/api/v2/{primary}/?slug={{slug}}"),
            format!("/api/v2/{legacy}/?slug={{slug}}"),
            format!("/api/cms/{legacy}/{{slug}}/"),
        ]),
        listing_candidates: EndpointCandidates::new(vec![
            format!("/api/v2/{primary}/"),
            format!("/api/v2/{legacy}/"),
        ]),
    })
    .collect()
}
