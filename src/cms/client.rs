//! Thin async client over the CMS HTTP API.

use serde::de::DeserializeOwned;

use super::{CmsError, ImageDetail, PageDetail};
use crate::config::ResolverConfig;

/// Async CMS API client.
///
/// Wraps a shared `reqwest::Client` carrying the mandatory per-call timeout.
/// All URLs are built against the host-normalized base so responses (and the
/// document URLs derived here) are safe to hand to a browser.
#[derive(Debug, Clone)]
pub struct CmsClient {
    http: reqwest::Client,
    base: String,
}

impl CmsClient {
    /// Build a client from pipeline configuration.
    ///
    /// # Errors
    /// Fails only if the underlying HTTP client cannot be constructed.
    pub fn new(config: &ResolverConfig) -> Result<Self, CmsError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            http,
            base: config.safe_cms_base(),
        })
    }

    /// The host-normalized CMS base this client talks to.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// `GET {base}{path}`, decoded as JSON.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CmsError> {
        let url = format!("{}{}", self.base, path);
        let response = self.http.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CmsError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| CmsError::Decode { url, source })
    }

    /// Look up an image asset by its opaque embed reference ID.
    pub async fn image_detail(&self, id: &str) -> Result<ImageDetail, CmsError> {
        self.get_json(&format!("/api/v2/images/{id}/")).await
    }

    /// Look up page metadata by its opaque link reference ID.
    pub async fn page_detail(&self, id: &str) -> Result<PageDetail, CmsError> {
        self.get_json(&format!("/api/v2/pages/{id}/")).await
    }

    /// Direct view/download URL for a CMS document.
    ///
    /// Deterministic; no lookup is needed for document links.
    #[must_use]
    pub fn document_url(&self, id: &str) -> String {
        format!("{}/documents/{id}/", self.base)
    }
}
