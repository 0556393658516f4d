//! Heading extraction for on-page navigation.
//!
//! Scans resolved body HTML for `h2`/`h3` elements, assigns each a
//! deterministic anchor id derived from its text, and returns the ordered
//! outline together with the HTML carrying matching `id` attributes. Runs
//! after embed/link resolution so headings inside resolved content are
//! captured. Headings that already carry an `id` keep it.

use std::cell::Cell;
use std::collections::HashMap;
use std::sync::LazyLock;

use anyhow::{Context, Result, anyhow};
use lol_html::{HtmlRewriter, Settings, element};
use scraper::{Html, Selector};
use serde::Serialize;

static HEADING_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h2, h3").expect("hardcoded selector is valid"));

/// One entry of the content outline, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentOutlineEntry {
    /// Heading level; only 2 and 3 participate.
    pub level: u8,
    /// Visible heading text, tags stripped, whitespace collapsed.
    pub text: String,
    /// Anchor id injected onto the heading element.
    #[serde(rename = "anchorId")]
    pub anchor_id: String,
}

/// Derive an anchor id from heading text: lowercase, non-word characters
/// stripped, whitespace collapsed to hyphens.
#[must_use]
pub fn slugify_anchor(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Extract the outline and inject anchor ids.
///
/// Returns the HTML with `id` attributes on its `h2`/`h3` elements plus the
/// ordered outline. Empty-text headings are skipped for the outline but left
/// in the HTML untouched. On a rewrite error the input passes through with an
/// empty outline rather than failing the page.
#[must_use]
pub fn extract_outline(html: &str) -> (String, Vec<ContentOutlineEntry>) {
    let entries = collect_entries(html);
    if entries.iter().all(Option::is_none) {
        return (html.to_string(), Vec::new());
    }

    match inject_anchor_ids(html, &entries) {
        Ok(injected) => (injected, entries.into_iter().flatten().collect()),
        Err(err) => {
            log::warn!("Anchor id injection failed, returning body unchanged: {err:#}");
            (html.to_string(), Vec::new())
        }
    }
}

/// Read-only pass: one slot per `h2`/`h3` in document order. `None` marks a
/// heading with no text, which gets no anchor.
fn collect_entries(html: &str) -> Vec<Option<ContentOutlineEntry>> {
    let document = Html::parse_fragment(html);
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut entries = Vec::new();

    for element in document.select(&HEADING_SELECTOR) {
        let level = if element.value().name().eq_ignore_ascii_case("h2") { 2 } else { 3 };
        let text = element
            .text()
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");

        if text.is_empty() {
            entries.push(None);
            continue;
        }

        let anchor_id = match element.value().attr("id").map(str::trim) {
            Some(existing) if !existing.is_empty() => existing.to_string(),
            _ => {
                let base = slugify_anchor(&text);
                let count = seen.entry(base.clone()).or_insert(0);
                *count += 1;
                if *count == 1 { base } else { format!("{base}-{count}") }
            }
        };

        entries.push(Some(ContentOutlineEntry { level, text, anchor_id }));
    }

    entries
}

/// Streaming pass: inject the precomputed anchor ids positionally. Both
/// passes walk headings in document order, so the index lines up. The pairing
/// is verified: if the streaming pass visits a different number of headings
/// than the collection pass produced, injection fails and the caller falls
/// back to the unchanged fragment instead of misplacing ids.
fn inject_anchor_ids(html: &str, entries: &[Option<ContentOutlineEntry>]) -> Result<String> {
    let mut output = Vec::with_capacity(html.len());
    // Shared position counter: the h2 and h3 handlers fire interleaved in
    // document order, matching the collection pass.
    let index = Cell::new(0usize);

    fn apply(
        el: &mut lol_html::html_content::Element<'_, '_>,
        entries: &[Option<ContentOutlineEntry>],
        index: &Cell<usize>,
    ) -> lol_html::HandlerResult {
        let i = index.get();
        index.set(i + 1);
        if let Some(Some(entry)) = entries.get(i) {
            el.set_attribute("id", &entry.anchor_id)?;
        }
        Ok(())
    }

    let mut rewriter = HtmlRewriter::new(
        Settings {
            element_content_handlers: vec![
                element!("h2", |el| apply(el, entries, &index)),
                element!("h3", |el| apply(el, entries, &index)),
            ],
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

    let visited = index.get();
    if visited != entries.len() {
        return Err(anyhow!(
            "heading count diverged between collection and rewrite: {} vs {visited}",
            entries.len()
        ));
    }

    String::from_utf8(output).context("Invalid UTF-8 in rewritten HTML")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_basic() {
        assert_eq!(slugify_anchor("Causes"), "causes");
        assert_eq!(slugify_anchor("Genetic Causes"), "genetic-causes");
        assert_eq!(slugify_anchor("  What's  new?  "), "what-s-new");
        assert_eq!(slugify_anchor("Type-1 Diabetes"), "type-1-diabetes");
    }

    #[test]
    fn extracts_levels_in_document_order() {
        let html = "<h2>Causes</h2><p>text</p><h3>Genetic Causes</h3>";
        let (body, outline) = extract_outline(html);

        assert_eq!(
            outline,
            vec![
                ContentOutlineEntry {
                    level: 2,
                    text: "Causes".into(),
                    anchor_id: "causes".into()
                },
                ContentOutlineEntry {
                    level: 3,
                    text: "Genetic Causes".into(),
                    anchor_id: "genetic-causes".into()
                },
            ]
        );
        assert!(body.contains(r#"<h2 id="causes">Causes</h2>"#));
        assert!(body.contains(r#"<h3 id="genetic-causes">Genetic Causes</h3>"#));
    }

    #[test]
    fn only_h2_and_h3_participate() {
        let html = "<h1>Title</h1><h2>Section</h2><h4>Minor</h4>";
        let (body, outline) = extract_outline(html);
        assert_eq!(outline.len(), 1);
        assert_eq!(outline[0].anchor_id, "section");
        assert!(body.contains("<h1>Title</h1>"));
        assert!(body.contains("<h4>Minor</h4>"));
    }

    #[test]
    fn duplicate_headings_get_numbered_anchors() {
        let html = "<h2>Dosage</h2><h2>Dosage</h2><h2>Dosage</h2>";
        let (_, outline) = extract_outline(html);
        let ids: Vec<&str> = outline.iter().map(|e| e.anchor_id.as_str()).collect();
        assert_eq!(ids, vec!["dosage", "dosage-2", "dosage-3"]);
    }

    #[test]
    fn existing_id_is_preserved() {
        let html = r#"<h2 id="hand-written">Causes</h2>"#;
        let (body, outline) = extract_outline(html);
        assert_eq!(outline[0].anchor_id, "hand-written");
        assert!(body.contains(r#"id="hand-written""#));
    }

    #[test]
    fn heading_with_inline_markup_uses_text_content() {
        let html = "<h2>Living <em>with</em> diabetes</h2>";
        let (body, outline) = extract_outline(html);
        assert_eq!(outline[0].text, "Living with diabetes");
        assert_eq!(outline[0].anchor_id, "living-with-diabetes");
        assert!(body.contains(r#"<h2 id="living-with-diabetes">"#));
    }

    #[test]
    fn mismatched_heading_count_fails_injection() {
        let entries = vec![Some(ContentOutlineEntry {
            level: 2,
            text: "A".into(),
            anchor_id: "a".into(),
        })];
        assert!(inject_anchor_ids("<h2>A</h2><h2>B</h2>", &entries).is_err());
    }

    #[test]
    fn no_headings_yields_empty_outline() {
        let html = "<p>No headings here.</p>";
        let (body, outline) = extract_outline(html);
        assert_eq!(body, html);
        assert!(outline.is_empty());
    }
}
