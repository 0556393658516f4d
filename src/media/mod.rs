//! Media URL rewriting.
//!
//! CMS rich text carries asset URLs in whatever form the authoring
//! environment produced: relative `/media/...` paths, or absolute URLs
//! against loopback and container-internal hosts. All of them are rewritten
//! to the site's proxied media prefix so the browser fetches assets through
//! the site, never from a CMS-internal address.
//!
//! This stage is a pure string transform: no network, no DOM. It covers
//! `src`/`href` attributes (single- or double-quoted, or unquoted), every
//! candidate in a `srcset`, and CSS `url()` values. `/media/` mentioned in
//! prose text is left alone: the relative pass only fires at quote, `=`, or
//! `url(` positions, and the looser comma/whitespace delimiters apply inside
//! `srcset` attribute values only. The transform is idempotent; an accidental
//! double prefix is collapsed to a single one.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use url::Url;

use crate::config::ResolverConfig;
use crate::hosts::is_internal_host;

/// Matches an absolute CMS media URL up to and including `/media/`.
/// Captures: (1) host, (2) optional port.
static ABS_MEDIA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)https?://([a-zA-Z0-9._-]+)(:\d+)?/media/")
        .expect("ABS_MEDIA_RE: hardcoded regex is valid")
});

/// Matches a relative `/media/` path at the start of an attribute value or
/// CSS `url()`. Captures: (1) the delimiter preceding the path. Deliberately
/// excludes comma and whitespace so prose text is never rewritten; those
/// delimiters are valid only inside `srcset` values.
static REL_MEDIA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(["'(=])/media/"#).expect("REL_MEDIA_RE: hardcoded regex is valid")
});

/// Matches a whole quoted `srcset` attribute. Captures: (1) double-quoted
/// value, (2) single-quoted value.
static SRCSET_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)srcset\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("SRCSET_ATTR_RE: hardcoded regex is valid")
});

/// Matches a relative `/media/` candidate inside a `srcset` value.
/// Captures: (1) the delimiter (value start, comma, or whitespace).
static SRCSET_CANDIDATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^|[\s,])/media/").expect("SRCSET_CANDIDATE_RE: hardcoded regex is valid")
});

/// Rewrite every CMS asset URL in an HTML fragment to the proxied media
/// prefix.
///
/// Idempotent: reapplying to already-rewritten output is a no-op.
#[must_use]
pub fn rewrite_media_urls(html: &str, config: &ResolverConfig) -> String {
    let prefix = config.media_prefix();

    let result = ABS_MEDIA_RE.replace_all(html, |caps: &Captures| {
        if is_cms_host(&caps[1], config) {
            format!("{prefix}/")
        } else {
            caps[0].to_string()
        }
    });

    let result = SRCSET_ATTR_RE.replace_all(&result, |caps: &Captures| {
        let (quote, value) = match (caps.get(1), caps.get(2)) {
            (Some(value), _) => ('"', value.as_str()),
            (_, Some(value)) => ('\'', value.as_str()),
            _ => ('"', ""),
        };
        let rewritten =
            SRCSET_CANDIDATE_RE.replace_all(value, |c: &Captures| format!("{}{prefix}/", &c[1]));
        format!("srcset={quote}{rewritten}{quote}")
    });

    let result = REL_MEDIA_RE.replace_all(&result, |caps: &Captures| format!("{}{prefix}/", &caps[1]));

    collapse_double_prefix(result, prefix)
}

/// Rewrite a single asset URL (as returned by a CMS lookup) to the proxied
/// media prefix. Non-CMS URLs pass through unchanged.
#[must_use]
pub fn rewrite_asset_url(url: &str, config: &ResolverConfig) -> String {
    let prefix = config.media_prefix();

    let rewritten = if let Some(caps) = ABS_MEDIA_RE.captures(url) {
        let full = caps.get(0).map_or("", |m| m.as_str());
        if url.starts_with(full) && is_cms_host(&caps[1], config) {
            format!("{prefix}/{}", &url[full.len()..])
        } else {
            url.to_string()
        }
    } else if let Some(rest) = url.strip_prefix("/media/") {
        format!("{prefix}/{rest}")
    } else {
        url.to_string()
    };

    collapse_double_prefix(Cow::Owned(rewritten), prefix)
}

/// Hosts whose media URLs belong to the CMS: loopback/wildcard spellings,
/// configured internal hosts, the configured CMS host, and the public host.
fn is_cms_host(host: &str, config: &ResolverConfig) -> bool {
    if is_internal_host(host, config.internal_hosts()) {
        return true;
    }
    if config.public_host().is_some_and(|h| h.eq_ignore_ascii_case(host)) {
        return true;
    }
    Url::parse(config.cms_base())
        .ok()
        .and_then(|u| u.host_str().map(|h| h.eq_ignore_ascii_case(host)))
        .unwrap_or(false)
}

/// Collapse `{prefix}{prefix}/` runs back down to a single prefix.
fn collapse_double_prefix(html: Cow<'_, str>, prefix: &str) -> String {
    let doubled = format!("{prefix}{prefix}/");
    let single = format!("{prefix}/");
    let mut result = html.into_owned();
    while result.contains(&doubled) {
        result = result.replace(&doubled, &single);
    }
    result
}
