//! Ordered endpoint fallback chains.
//!
//! The CMS API surface is inconsistent across content types: the same kind of
//! detail lookup lives under different paths depending on when the type was
//! added. Rather than inlining "try this, then that" control flow at every
//! call site, the ordered candidate list is data: first successful,
//! decodable response wins.

use serde::de::DeserializeOwned;

use super::{CmsClient, CmsError};

/// An ordered list of endpoint path templates.
///
/// Templates may contain a `{slug}` placeholder substituted at fetch time.
#[derive(Debug, Clone)]
pub struct EndpointCandidates {
    paths: Vec<String>,
}

impl EndpointCandidates {
    #[must_use]
    pub fn new(paths: Vec<String>) -> Self {
        Self { paths }
    }

    #[must_use]
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Render a template with the given slug.
    #[must_use]
    pub fn render(template: &str, slug: &str) -> String {
        template.replace("{slug}", slug)
    }

    /// Try each candidate in order; the first success short-circuits.
    ///
    /// # Errors
    /// Returns the last candidate's error when every candidate fails, so an
    /// all-404 chain surfaces as a 404.
    pub async fn fetch_first<T: DeserializeOwned>(
        &self,
        client: &CmsClient,
        slug: &str,
    ) -> Result<T, CmsError> {
        let mut last_error: Option<CmsError> = None;

        for template in &self.paths {
            let path = Self::render(template, slug);
            match client.get_json::<T>(&path).await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    log::debug!("Endpoint candidate {path} failed: {err}");
                    last_error = Some(err);
                }
            }
        }

        Err(last_error.unwrap_or(CmsError::Status {
            status: 404,
            url: "no endpoint candidates configured".to_string(),
        }))
    }
}
