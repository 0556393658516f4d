//! Placeholder resolution: embedded images and internal links.
//!
//! Both resolvers follow the same two-pass shape: a read-only extraction pass
//! (scraper) collects the unique reference IDs, all lookups settle into a
//! mapping, and only then a streaming rewrite pass (lol_html) substitutes
//! every placeholder. Building the full mapping first keeps the output stable
//! regardless of lookup completion order.

mod cache;
pub mod embeds;
pub mod links;

pub use cache::ResolutionCache;
pub use embeds::{extract_image_embeds, resolve_image_embeds};
pub use links::{extract_internal_links, resolve_internal_links};

/// An embedded-image placeholder extracted from rich text.
///
/// Transient: exists only while one document is being resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmbedReference {
    pub id: String,
}

/// Kind of an internal-link placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    Page,
    Document,
}

/// An internal-link placeholder extracted from rich text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InternalLinkReference {
    pub id: String,
    pub kind: LinkKind,
}

/// A resolved embed reference: ID → proxied asset URL (plus alt fallback).
#[derive(Debug, Clone)]
pub struct ResolvedAsset {
    pub id: String,
    pub url: String,
    /// Asset title, used as alt text when the embed carries none.
    pub title: String,
}

/// A resolved page-link reference.
#[derive(Debug, Clone)]
pub struct ResolvedRoute {
    pub id: String,
    pub content_type: String,
    pub slug: String,
    pub route: String,
}
