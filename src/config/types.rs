//! Core configuration type for the resolution pipeline.

use std::time::Duration;

use crate::hosts::normalize_cms_base;
use crate::routes::RouteTable;

/// Configuration for one resolution pipeline.
///
/// Built via [`ResolverConfig::builder`]; `build()` validates the CMS base
/// URL and the request timeout so misconfiguration surfaces at startup, not
/// per-request.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Configured CMS origin, e.g. `http://localhost:8000`.
    pub(crate) cms_base: String,
    /// Externally visible hostname substituted for loopback/internal CMS hosts.
    pub(crate) public_host: Option<String>,
    /// Site-side proxied media path that CMS media URLs are rewritten to.
    pub(crate) media_prefix: String,
    /// The site's own host. Anchors pointing elsewhere are marked external.
    /// When unset, every scheme-qualified anchor is treated as external.
    pub(crate) site_host: Option<String>,
    /// Extra container-internal host spellings treated like loopback.
    pub(crate) internal_hosts: Vec<String>,
    /// Per-CMS-call timeout. Mandatory so a slow CMS cannot stall a page.
    pub(crate) request_timeout: Duration,
    /// Content-type → route prefix table.
    pub(crate) routes: RouteTable,
}

impl ResolverConfig {
    /// Start building a config.
    #[must_use]
    pub fn builder() -> super::ResolverConfigBuilder {
        super::ResolverConfigBuilder::default()
    }

    /// The configured CMS origin, exactly as supplied.
    #[must_use]
    pub fn cms_base(&self) -> &str {
        &self.cms_base
    }

    /// The CMS base with internal hosts substituted for the public one.
    ///
    /// This is the base every outgoing URL is built from.
    #[must_use]
    pub fn safe_cms_base(&self) -> String {
        normalize_cms_base(&self.cms_base, self.public_host.as_deref(), &self.internal_hosts)
    }

    #[must_use]
    pub fn public_host(&self) -> Option<&str> {
        self.public_host.as_deref()
    }

    #[must_use]
    pub fn media_prefix(&self) -> &str {
        &self.media_prefix
    }

    #[must_use]
    pub fn site_host(&self) -> Option<&str> {
        self.site_host.as_deref()
    }

    #[must_use]
    pub fn internal_hosts(&self) -> &[String] {
        &self.internal_hosts
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    #[must_use]
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }
}
