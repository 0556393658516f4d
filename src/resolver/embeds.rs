//! Embedded-image resolution.
//!
//! Rich text references images through opaque placeholders:
//!
//! ```html
//! <embed embedtype="image" id="42" alt="Tadasana" format="fullwidth"/>
//! ```
//!
//! Each unique ID is resolved to an asset URL through the CMS image API
//! (once per document, not per occurrence) and every placeholder is replaced
//! with a renderable `<img>`. IDs that fail to resolve are dropped from the
//! output; when the author explicitly placed the image via a `format`
//! attribute, a visible "image unavailable" notice is left instead. Raw
//! placeholder markup never survives into output.

use std::collections::HashMap;
use std::sync::LazyLock;

use anyhow::{Context, Result, anyhow};
use futures::future::join_all;
use lol_html::html_content::ContentType;
use lol_html::{HtmlRewriter, Settings, element};
use scraper::{Html, Selector};

use super::{EmbedReference, ResolutionCache, ResolvedAsset};
use crate::cms::CmsClient;
use crate::config::ResolverConfig;
use crate::media::rewrite_asset_url;

static IMAGE_EMBED_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"embed[embedtype="image"]"#).expect("hardcoded selector is valid")
});

/// Extract the unique embedded-image references from a fragment, in document
/// order. Read-only pass; scraper is simpler than lol_html for extraction.
#[must_use]
pub fn extract_image_embeds(html: &str) -> Vec<EmbedReference> {
    let document = Html::parse_fragment(html);
    let mut refs = Vec::new();

    for element in document.select(&IMAGE_EMBED_SELECTOR) {
        if let Some(id) = element.value().attr("id") {
            let id = id.trim();
            if !id.is_empty() && !refs.iter().any(|r: &EmbedReference| r.id == id) {
                refs.push(EmbedReference { id: id.to_string() });
            }
        }
    }

    refs
}

/// Resolve every image embed in a fragment against the CMS.
///
/// One asset lookup per unique ID per document; outcomes (including
/// failures) go through the shared per-item cache so the same ID in another
/// field is never fetched twice. Infallible by design: on any rewrite error
/// the original fragment is returned unchanged.
pub async fn resolve_image_embeds(
    html: &str,
    client: &CmsClient,
    config: &ResolverConfig,
    cache: &ResolutionCache,
) -> String {
    let refs = extract_image_embeds(html);
    if refs.is_empty() {
        return html.to_string();
    }

    let assets = lookup_assets(&refs, client, config, cache).await;

    match substitute_embeds(html, &assets) {
        Ok(resolved) => resolved,
        Err(err) => {
            log::warn!("Embed substitution failed, leaving fragment unchanged: {err:#}");
            html.to_string()
        }
    }
}

/// Settle every pending lookup and return the full ID → outcome mapping.
///
/// Also used by the orchestrator to prewarm the per-item cache before fields
/// resolve concurrently, so an ID shared across fields is fetched once.
pub(crate) async fn lookup_assets(
    refs: &[EmbedReference],
    client: &CmsClient,
    config: &ResolverConfig,
    cache: &ResolutionCache,
) -> HashMap<String, Option<ResolvedAsset>> {
    let mut assets: HashMap<String, Option<ResolvedAsset>> = HashMap::new();
    let mut pending = Vec::new();

    for reference in refs {
        match cache.asset(&reference.id) {
            Some(outcome) => {
                assets.insert(reference.id.clone(), outcome);
            }
            None => pending.push(reference.id.clone()),
        }
    }

    let lookups = pending.into_iter().map(|id| async move {
        let outcome = match client.image_detail(&id).await {
            Ok(detail) => match detail.best_url() {
                Some(url) => Some(ResolvedAsset {
                    id: id.clone(),
                    url: rewrite_asset_url(url, config),
                    title: detail.title.clone(),
                }),
                None => {
                    log::warn!("Image {id} has no usable URL field, dropping embed");
                    None
                }
            },
            Err(err) => {
                log::warn!("Image lookup for embed {id} failed: {err}");
                None
            }
        };
        (id, outcome)
    });

    for (id, outcome) in join_all(lookups).await {
        cache.record_asset(&id, outcome);
        // Read back through the cache so a concurrent field that won the
        // write-once race and this field substitute the same result.
        let settled = cache.asset(&id).unwrap_or(None);
        assets.insert(id, settled);
    }

    assets
}

/// Replace every placeholder using the settled mapping.
fn substitute_embeds(html: &str, assets: &HashMap<String, Option<ResolvedAsset>>) -> Result<String> {
    let mut output = Vec::with_capacity(html.len());

    let mut rewriter = HtmlRewriter::new(
        Settings {
            element_content_handlers: vec![element!(r#"embed[embedtype="image"]"#, |el| {
                let id = el.get_attribute("id").unwrap_or_default();

                match assets.get(id.trim()).and_then(Clone::clone) {
                    Some(asset) => {
                        let alt = el
                            .get_attribute("alt")
                            .filter(|alt| !alt.is_empty())
                            .unwrap_or_else(|| asset.title.clone());
                        el.replace(&image_element(&asset.url, &alt), ContentType::Html);
                    }
                    None => {
                        if el.get_attribute("format").is_some() {
                            el.replace(
                                r#"<p class="image-unavailable">Image unavailable</p>"#,
                                ContentType::Html,
                            );
                        } else {
                            el.remove();
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

fn image_element(src: &str, alt: &str) -> String {
    format!(
        r#"<img src="{}" alt="{}" loading="lazy">"#,
        html_escape::encode_double_quoted_attribute(src),
        html_escape::encode_double_quoted_attribute(alt),
    )
}
