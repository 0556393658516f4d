//! Error type for CMS lookups.

use thiserror::Error;

/// Failure of a single CMS API call.
///
/// These are recovered locally by the resolution stages (placeholder removal,
/// `#` hrefs); they are logged but never surfaced as page-level errors.
#[derive(Debug, Error)]
pub enum CmsError {
    #[error("CMS request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CMS returned status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("failed to decode CMS response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl CmsError {
    /// Whether this failure was a 404 from the CMS.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}
