//! Host normalization for the CMS base URL.
//!
//! The CMS base is usually configured for the deployment environment
//! (`http://localhost:8000` in development, `http://wagtail:8000` inside a
//! container network). URLs built from those hosts are not reachable from an
//! end-user's browser, so before any URL leaves the pipeline the base is
//! rewritten to the externally visible hostname, preserving scheme and port.

use url::Url;

/// Loopback and wildcard host spellings that are never externally reachable.
pub const LOOPBACK_HOSTS: &[&str] = &["localhost", "127.0.0.1", "0.0.0.0"];

/// Container-internal hostnames commonly used for the CMS service.
pub const DEFAULT_INTERNAL_HOSTS: &[&str] = &["wagtail", "cms", "backend"];

/// Check whether a host is loopback, wildcard, or a known internal spelling.
#[must_use]
pub fn is_internal_host(host: &str, extra_internal_hosts: &[String]) -> bool {
    let host = host.to_ascii_lowercase();
    LOOPBACK_HOSTS.contains(&host.as_str())
        || DEFAULT_INTERNAL_HOSTS.contains(&host.as_str())
        || extra_internal_hosts.iter().any(|h| h.eq_ignore_ascii_case(&host))
}

/// Rewrite a configured CMS base URL into one safe to hand to an end-user's
/// device.
///
/// If the base's host is loopback/wildcard/internal and an externally visible
/// hostname is known, the host is substituted while scheme and port are kept.
/// An explicitly external origin always wins: it is returned unchanged.
///
/// Pure function of its inputs; unparseable bases pass through unchanged so a
/// misconfiguration degrades instead of failing page resolution.
#[must_use]
pub fn normalize_cms_base(
    cms_base: &str,
    public_host: Option<&str>,
    extra_internal_hosts: &[String],
) -> String {
    let Some(public_host) = public_host else {
        return trim_trailing_slash(cms_base);
    };

    let Ok(mut url) = Url::parse(cms_base) else {
        log::warn!("CMS base URL is not parseable, leaving as-is: {cms_base}");
        return trim_trailing_slash(cms_base);
    };

    let is_internal = url
        .host_str()
        .is_some_and(|host| is_internal_host(host, extra_internal_hosts));

    if is_internal && url.set_host(Some(public_host)).is_err() {
        log::warn!("Cannot substitute public host {public_host} into CMS base {cms_base}");
        return trim_trailing_slash(cms_base);
    }

    trim_trailing_slash(url.as_str())
}

fn trim_trailing_slash(base: &str) -> String {
    base.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_loopback_host() {
        let base = normalize_cms_base("http://localhost:8000", Some("health.example.com"), &[]);
        assert_eq!(base, "http://health.example.com:8000");
    }

    #[test]
    fn substitutes_wildcard_host() {
        let base = normalize_cms_base("http://0.0.0.0:8000/", Some("health.example.com"), &[]);
        assert_eq!(base, "http://health.example.com:8000");
    }

    #[test]
    fn substitutes_container_host() {
        let base = normalize_cms_base("http://wagtail:8000", Some("health.example.com"), &[]);
        assert_eq!(base, "http://health.example.com:8000");
    }

    #[test]
    fn substitutes_configured_internal_host() {
        let extra = vec!["cms-internal".to_string()];
        let base = normalize_cms_base("http://cms-internal:8000", Some("health.example.com"), &extra);
        assert_eq!(base, "http://health.example.com:8000");
    }

    #[test]
    fn explicit_origin_wins() {
        let base = normalize_cms_base("https://cms.example.com", Some("health.example.com"), &[]);
        assert_eq!(base, "https://cms.example.com");
    }

    #[test]
    fn no_public_host_leaves_base_alone() {
        let base = normalize_cms_base("http://localhost:8000", None, &[]);
        assert_eq!(base, "http://localhost:8000");
    }

    #[test]
    fn unparseable_base_passes_through() {
        let base = normalize_cms_base("not a url", Some("health.example.com"), &[]);
        assert_eq!(base, "not a url");
    }
}
