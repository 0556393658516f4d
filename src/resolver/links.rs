//! Internal-link resolution.
//!
//! Rich text links to other CMS content through opaque placeholders:
//!
//! ```html
//! <a linktype="page" id="7">type 1 diabetes</a>
//! <a linktype="document" id="12">dosage chart (PDF)</a>
//! ```
//!
//! Page IDs are resolved to CMS page metadata (one lookup per unique ID) and
//! rewritten to frontend routes via the route table. Document links are
//! deterministic and rewritten to a direct view/download URL opening in a new
//! tab. After substitution no CMS-internal attributes remain on any anchor,
//! and externally-hosted anchors are hardened to open in a new tab with safe
//! `rel` attributes. A page ID that fails to resolve yields `href="#"`.

use std::collections::HashMap;
use std::sync::LazyLock;

use anyhow::{Context, Result, anyhow};
use futures::future::join_all;
use lol_html::{HtmlRewriter, Settings, element};
use scraper::{Html, Selector};
use url::Url;

use super::{InternalLinkReference, LinkKind, ResolutionCache, ResolvedRoute};
use crate::cms::CmsClient;
use crate::config::ResolverConfig;

static PAGE_LINK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"a[linktype="page"]"#).expect("hardcoded selector is valid")
});

static DOCUMENT_LINK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"a[linktype="document"]"#).expect("hardcoded selector is valid")
});

/// Extract unique page-link and document-link references from a fragment.
#[must_use]
pub fn extract_internal_links(html: &str) -> Vec<InternalLinkReference> {
    let document = Html::parse_fragment(html);
    let mut refs: Vec<InternalLinkReference> = Vec::new();

    let mut collect = |selector: &Selector, kind: LinkKind| {
        for element in document.select(selector) {
            if let Some(id) = element.value().attr("id") {
                let id = id.trim();
                if !id.is_empty() && !refs.iter().any(|r| r.id == id && r.kind == kind) {
                    refs.push(InternalLinkReference {
                        id: id.to_string(),
                        kind,
                    });
                }
            }
        }
    };

    collect(&PAGE_LINK_SELECTOR, LinkKind::Page);
    collect(&DOCUMENT_LINK_SELECTOR, LinkKind::Document);
    refs
}

/// Resolve every internal-link placeholder in a fragment.
///
/// Infallible by design: a rewrite error returns the fragment unchanged, and
/// per-ID lookup failures degrade that anchor to `href="#"`.
pub async fn resolve_internal_links(
    html: &str,
    client: &CmsClient,
    config: &ResolverConfig,
    cache: &ResolutionCache,
) -> String {
    let refs = extract_internal_links(html);
    let page_refs: Vec<InternalLinkReference> = refs
        .iter()
        .filter(|r| r.kind == LinkKind::Page)
        .cloned()
        .collect();

    let routes = if page_refs.is_empty() {
        HashMap::new()
    } else {
        lookup_routes(&page_refs, client, config, cache).await
    };

    match substitute_links(html, &routes, client, config) {
        Ok(resolved) => resolved,
        Err(err) => {
            log::warn!("Link substitution failed, leaving fragment unchanged: {err:#}");
            html.to_string()
        }
    }
}

/// Settle every pending page lookup and return the full ID → route mapping.
///
/// Also used by the orchestrator to prewarm the per-item cache. Document
/// links need no lookup; only page references are fetched.
pub(crate) async fn lookup_routes(
    refs: &[InternalLinkReference],
    client: &CmsClient,
    config: &ResolverConfig,
    cache: &ResolutionCache,
) -> HashMap<String, Option<ResolvedRoute>> {
    let mut routes: HashMap<String, Option<ResolvedRoute>> = HashMap::new();
    let mut pending = Vec::new();

    for reference in refs {
        if reference.kind != LinkKind::Page {
            continue;
        }
        match cache.route(&reference.id) {
            Some(outcome) => {
                routes.insert(reference.id.clone(), outcome);
            }
            None => pending.push(reference.id.clone()),
        }
    }

    let lookups = pending.into_iter().map(|id| async move {
        let outcome = match client.page_detail(&id).await {
            Ok(page) => {
                let route = config.routes().route_for(&page.meta.type_name, &page.meta.slug);
                Some(ResolvedRoute {
                    id: id.clone(),
                    content_type: page.meta.type_name,
                    slug: page.meta.slug,
                    route,
                })
            }
            Err(err) => {
                log::warn!("Page lookup for link {id} failed: {err}");
                None
            }
        };
        (id, outcome)
    });

    for (id, outcome) in join_all(lookups).await {
        cache.record_route(&id, outcome);
        let settled = cache.route(&id).unwrap_or(None);
        routes.insert(id, settled);
    }

    routes
}

/// Rewrite all anchors in one streaming pass: page links, document links,
/// then external-anchor hardening for everything else.
fn substitute_links(
    html: &str,
    routes: &HashMap<String, Option<ResolvedRoute>>,
    client: &CmsClient,
    config: &ResolverConfig,
) -> Result<String> {
    let mut output = Vec::with_capacity(html.len());

    let mut rewriter = HtmlRewriter::new(
        Settings {
            element_content_handlers: vec![element!("a", |el| {
                match el.get_attribute("linktype").as_deref() {
                    Some("page") => {
                        let id = el.get_attribute("id").unwrap_or_default();
                        let href = routes
                            .get(id.trim())
                            .and_then(|outcome| outcome.as_ref())
                            .map_or_else(|| "#".to_string(), |route| route.route.clone());
                        el.set_attribute("href", &href)?;
                        strip_cms_attributes(el);
                    }
                    Some("document") => {
                        let id = el.get_attribute("id").unwrap_or_default();
                        let id = id.trim();
                        if id.is_empty() {
                            el.set_attribute("href", "#")?;
                        } else {
                            el.set_attribute("href", &client.document_url(id))?;
                            el.set_attribute("target", "_blank")?;
                            el.set_attribute("rel", "noopener noreferrer")?;
                        }
                        strip_cms_attributes(el);
                    }
                    Some(other) => {
                        // Unknown placeholder kind: degrade rather than leak
                        // CMS-internal syntax into output.
                        log::warn!("Unknown linktype \"{other}\", degrading anchor to #");
                        el.set_attribute("href", "#")?;
                        strip_cms_attributes(el);
                    }
                    None => {
                        if let Some(href) = el.get_attribute("href") {
                            if is_external_href(&href, config.site_host()) {
                                el.set_attribute("target", "_blank")?;
                                el.set_attribute("rel", "noopener noreferrer nofollow")?;
                            }
                        }
                    }
                }
                Ok(())
            })],
            ..Settings::default()
        },
        |chunk: &[u8]| output.extend_from_slice(chunk),
    );

    rewriter
        .write(html.as_bytes())
        .map_err(|e| anyhow!("HTML rewrite error: {e}"))?;
    rewriter
        .end()
        .map_err(|e| anyhow!("HTML rewrite finalization error: {e}"))?;

    String::from_utf8(output).context("Invalid UTF-8 in rewritten HTML")
}

fn strip_cms_attributes(el: &mut lol_html::html_content::Element) {
    el.remove_attribute("linktype");
    el.remove_attribute("id");
}

/// A scheme-qualified anchor pointing at a non-site host.
///
/// With no site host configured every absolute http(s) anchor counts as
/// external.
fn is_external_href(href: &str, site_host: Option<&str>) -> bool {
    let Ok(url) = Url::parse(href) else {
        // Relative hrefs fail to parse without a base; those are internal.
        return false;
    };
    if !matches!(url.scheme(), "http" | "https") {
        return false;
    }
    match (url.host_str(), site_host) {
        (Some(host), Some(site)) => !host.eq_ignore_ascii_case(site),
        (Some(_), None) => true,
        (None, _) => false,
    }
}
