//! Pipeline orchestration.
//!
//! Runs the stages in order for every rich-text field of one content item:
//! media rewriting (synchronous), then embed and internal-link resolution
//! (concurrent across fields, sharing one per-item cache so an ID appearing
//! in several fields is fetched once), then heading extraction on the body
//! field only. Each field degrades independently; one field's lookup
//! failures never block the others.

use futures::future::join_all;

use crate::cms::{CmsClient, CmsError};
use crate::config::ResolverConfig;
use crate::media::rewrite_media_urls;
use crate::outline::{ContentOutlineEntry, extract_outline};
use crate::resolver::{
    EmbedReference, InternalLinkReference, ResolutionCache, embeds, links, resolve_image_embeds,
    resolve_internal_links,
};

/// A named rich-text fragment of one content item (e.g. "body",
/// "references"). Immutable input; resolution produces a new fragment.
#[derive(Debug, Clone)]
pub struct RichTextDocument {
    pub name: String,
    pub html: String,
}

impl RichTextDocument {
    pub fn new(name: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            html: html.into(),
        }
    }
}

/// One field after resolution.
#[derive(Debug, Clone)]
pub struct ResolvedField {
    pub name: String,
    pub html: String,
}

/// A fully resolved content item: all fields plus the body outline.
#[derive(Debug, Clone, Default)]
pub struct ResolvedItem {
    pub fields: Vec<ResolvedField>,
    pub outline: Vec<ContentOutlineEntry>,
}

impl ResolvedItem {
    /// Resolved HTML of a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.html.as_str())
    }
}

/// The resolution pipeline for one site.
///
/// Construct once per configuration and reuse; each `resolve_item` call gets
/// its own per-item cache.
#[derive(Debug, Clone)]
pub struct ResolverPipeline {
    config: ResolverConfig,
    client: CmsClient,
}

impl ResolverPipeline {
    /// Build a pipeline from configuration.
    ///
    /// # Errors
    /// Fails only if the HTTP client cannot be constructed.
    pub fn new(config: ResolverConfig) -> Result<Self, CmsError> {
        let client = CmsClient::new(&config)?;
        Ok(Self { config, client })
    }

    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    #[must_use]
    pub fn client(&self) -> &CmsClient {
        &self.client
    }

    /// Resolve a single rich-text field against a shared per-item cache.
    pub async fn resolve_field(
        &self,
        document: &RichTextDocument,
        cache: &ResolutionCache,
    ) -> ResolvedField {
        let media_rewritten = rewrite_media_urls(&document.html, &self.config);
        let embeds_resolved =
            resolve_image_embeds(&media_rewritten, &self.client, &self.config, cache).await;
        let links_resolved =
            resolve_internal_links(&embeds_resolved, &self.client, &self.config, cache).await;

        log::debug!("Resolved field {}", document.name);
        ResolvedField {
            name: document.name.clone(),
            html: links_resolved,
        }
    }

    /// Resolve all rich-text fields of one content item.
    ///
    /// `body_field` names the field the outline is extracted from; pass the
    /// item's main body. Fields are resolved concurrently and independently.
    pub async fn resolve_item(
        &self,
        body_field: &str,
        documents: &[RichTextDocument],
    ) -> ResolvedItem {
        let cache = ResolutionCache::new();
        self.prewarm_cache(documents, &cache).await;

        let fields = join_all(
            documents
                .iter()
                .map(|document| self.resolve_field(document, &cache)),
        )
        .await;

        let mut item = ResolvedItem {
            fields,
            outline: Vec::new(),
        };

        if let Some(field) = item.fields.iter_mut().find(|f| f.name == body_field) {
            let (html, outline) = extract_outline(&field.html);
            field.html = html;
            item.outline = outline;
        }

        item
    }

    /// Settle every unique reference ID across all fields into the shared
    /// cache before the fields resolve concurrently. Without this, two
    /// fields carrying the same ID would race past the cache miss and fetch
    /// it twice.
    async fn prewarm_cache(&self, documents: &[RichTextDocument], cache: &ResolutionCache) {
        let mut embed_refs: Vec<EmbedReference> = Vec::new();
        let mut link_refs: Vec<InternalLinkReference> = Vec::new();

        for document in documents {
            for reference in embeds::extract_image_embeds(&document.html) {
                if !embed_refs.contains(&reference) {
                    embed_refs.push(reference);
                }
            }
            for reference in links::extract_internal_links(&document.html) {
                if !link_refs.contains(&reference) {
                    link_refs.push(reference);
                }
            }
        }

        futures::join!(
            embeds::lookup_assets(&embed_refs, &self.client, &self.config, cache),
            links::lookup_routes(&link_refs, &self.client, &self.config, cache),
        );
    }

    /// Resolve one standalone fragment (no outline, no cross-field cache).
    pub async fn resolve_fragment(&self, html: &str) -> String {
        let cache = ResolutionCache::new();
        let document = RichTextDocument::new("fragment", html);
        self.resolve_field(&document, &cache).await.html
    }
}
