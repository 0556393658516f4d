//! CMS rich-text resolution pipeline.
//!
//! CMS-authored rich text arrives as HTML fragments containing
//! environment-relative media paths, opaque embedded-image placeholders and
//! opaque internal-link placeholders. This crate rewrites those fragments
//! into stable, directly renderable HTML plus an ordered heading outline:
//!
//! 1. Media URLs (`src`, `srcset`, CSS `url()`) are rewritten to the site's
//!    proxied media prefix.
//! 2. `<embed embedtype="image">` placeholders are resolved against the CMS
//!    image API and replaced with `<img>` elements.
//! 3. `<a linktype="page">` / `<a linktype="document">` placeholders are
//!    resolved to frontend routes and direct download URLs.
//! 4. `h2`/`h3` headings get deterministic anchor ids and are collected into
//!    a table-of-contents outline.
//!
//! Lookup failures degrade locally (placeholder removal, `#` hrefs) and are
//! logged; they never fail the page as a whole.

pub mod cms;
pub mod config;
pub mod content;
pub mod hosts;
pub mod media;
pub mod outline;
pub mod pipeline;
pub mod resolver;
pub mod routes;

pub use cms::{CmsClient, CmsError, EndpointCandidates, ImageDetail, PageDetail};
pub use config::ResolverConfig;
pub use content::{ContentError, ContentSpec, default_content_specs};
pub use hosts::normalize_cms_base;
pub use media::{rewrite_asset_url, rewrite_media_urls};
pub use outline::{ContentOutlineEntry, extract_outline};
pub use pipeline::{ResolvedField, ResolvedItem, ResolverPipeline, RichTextDocument};
pub use resolver::{
    EmbedReference, InternalLinkReference, LinkKind, ResolutionCache, ResolvedAsset, ResolvedRoute,
};
pub use routes::{RouteRule, RouteTable};
