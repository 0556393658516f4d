//! Builder for [`ResolverConfig`] with upfront validation.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use url::Url;

use super::ResolverConfig;
use crate::routes::RouteTable;

/// Default per-CMS-call timeout: 10 seconds.
///
/// Long enough for a cold CMS cache, short enough that one stuck lookup
/// cannot hold a page render hostage.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Default site-side proxied media path.
pub const DEFAULT_MEDIA_PREFIX: &str = "/cms-media";

/// Builder for [`ResolverConfig`].
#[derive(Debug, Default)]
pub struct ResolverConfigBuilder {
    cms_base: Option<String>,
    public_host: Option<String>,
    media_prefix: Option<String>,
    site_host: Option<String>,
    internal_hosts: Vec<String>,
    request_timeout: Option<Duration>,
    routes: Option<RouteTable>,
}

impl ResolverConfigBuilder {
    #[must_use]
    pub fn cms_base(mut self, base: impl Into<String>) -> Self {
        self.cms_base = Some(base.into());
        self
    }

    #[must_use]
    pub fn public_host(mut self, host: impl Into<String>) -> Self {
        self.public_host = Some(host.into());
        self
    }

    #[must_use]
    pub fn media_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.media_prefix = Some(prefix.into());
        self
    }

    #[must_use]
    pub fn site_host(mut self, host: impl Into<String>) -> Self {
        self.site_host = Some(host.into());
        self
    }

    #[must_use]
    pub fn internal_host(mut self, host: impl Into<String>) -> Self {
        self.internal_hosts.push(host.into());
        self
    }

    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn routes(mut self, routes: RouteTable) -> Self {
        self.routes = Some(routes);
        self
    }

    /// Validate and build the config.
    ///
    /// # Errors
    /// Fails when the CMS base is missing or unparseable, the media prefix is
    /// not an absolute path, or the timeout is zero.
    pub fn build(self) -> Result<ResolverConfig> {
        let cms_base = self.cms_base.context("cms_base is required")?;
        Url::parse(&cms_base).with_context(|| format!("cms_base is not a valid URL: {cms_base}"))?;

        let media_prefix = self
            .media_prefix
            .unwrap_or_else(|| DEFAULT_MEDIA_PREFIX.to_string());
        if !media_prefix.starts_with('/') || media_prefix.len() < 2 {
            bail!("media_prefix must be a non-empty absolute path, got: {media_prefix}");
        }

        let request_timeout = self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT);
        if request_timeout.is_zero() {
            bail!("request_timeout must be non-zero");
        }

        Ok(ResolverConfig {
            cms_base: cms_base.trim_end_matches('/').to_string(),
            public_host: self.public_host,
            media_prefix: media_prefix.trim_end_matches('/').to_string(),
            site_host: self.site_host,
            internal_hosts: self.internal_hosts,
            request_timeout,
            routes: self.routes.unwrap_or_default(),
        })
    }
}
