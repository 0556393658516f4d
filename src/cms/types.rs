//! Typed CMS API payloads.
//!
//! The deserializers are deliberately tolerant: every field the pipeline can
//! live without is defaulted, so a CMS schema drift degrades one lookup
//! instead of failing the page.

use serde::Deserialize;

/// Response of `GET {cms_base}/api/v2/images/{id}/`.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageDetail {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub meta: ImageMeta,
    /// Preview rendition, present on some CMS versions.
    #[serde(default)]
    pub preview: Option<Rendition>,
    /// Original rendition, the last-resort URL source.
    #[serde(default)]
    pub original: Option<Rendition>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageMeta {
    #[serde(default)]
    pub download_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Rendition {
    pub url: String,
}

impl ImageDetail {
    /// Best available asset URL: download, then preview, then original.
    ///
    /// `None` when the payload carries no usable URL at all, which the
    /// resolver treats like a failed lookup.
    #[must_use]
    pub fn best_url(&self) -> Option<&str> {
        self.meta
            .download_url
            .as_deref()
            .or_else(|| self.preview.as_ref().map(|r| r.url.as_str()))
            .or_else(|| self.original.as_ref().map(|r| r.url.as_str()))
            .filter(|url| !url.is_empty())
    }
}

/// Response of `GET {cms_base}/api/v2/pages/{id}/`.
#[derive(Debug, Clone, Deserialize)]
pub struct PageDetail {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub meta: PageMeta,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageMeta {
    /// Dotted content-type path, e.g. `conditions.ConditionPage`.
    #[serde(rename = "type", default)]
    pub type_name: String,
    /// Clean slug, or on some legacy pages a full CMS section path.
    #[serde(default)]
    pub slug: String,
}
