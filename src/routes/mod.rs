//! Content-type → frontend-route mapping.
//!
//! The CMS reports a page's content type as a dotted class path such as
//! `conditions.ConditionPage`. Each site content section maps that type to a
//! route prefix; the full route is `{prefix}/{slug}`. One table serves every
//! content section, replacing the per-type copies of this logic the site
//! used to carry.
//!
//! Some CMS pages report a full legacy CMS path in place of a clean slug
//! (e.g. `health/conditions/type-1-diabetes`). Those are translated through
//! an ordered prefix table; overlapping prefixes are matched longest-first so
//! the more specific section always wins.

/// A single content-type matcher.
///
/// `matcher` is compared case-insensitively as a substring of the CMS page
/// type. An empty `matcher` is the catch-all.
#[derive(Debug, Clone)]
pub struct RouteRule {
    pub matcher: String,
    pub prefix: String,
}

impl RouteRule {
    pub fn new(matcher: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            matcher: matcher.into(),
            prefix: prefix.into(),
        }
    }
}

/// Ordered route table plus the legacy-path prefix translations.
#[derive(Debug, Clone)]
pub struct RouteTable {
    rules: Vec<RouteRule>,
    legacy_prefixes: Vec<(String, String)>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            rules: vec![
                RouteRule::new("condition", "/conditions"),
                RouteRule::new("drug", "/drugs"),
                RouteRule::new("ayurveda", "/ayurveda"),
                RouteRule::new("yoga", "/yoga"),
                RouteRule::new("wellness", "/wellness"),
            ],
            legacy_prefixes: vec![
                ("health/conditions".into(), "/conditions".into()),
                ("health/condition".into(), "/conditions".into()),
                ("health/drugs-supplements".into(), "/drugs".into()),
                ("health/drugs".into(), "/drugs".into()),
                ("wellness/ayurveda".into(), "/ayurveda".into()),
                ("wellness/yoga".into(), "/yoga".into()),
                ("wellness".into(), "/wellness".into()),
            ],
        }
    }
}

impl RouteTable {
    pub fn new(rules: Vec<RouteRule>, legacy_prefixes: Vec<(String, String)>) -> Self {
        Self {
            rules,
            legacy_prefixes,
        }
    }

    /// Route prefix for a CMS content type. Falls back to the site root.
    #[must_use]
    pub fn prefix_for_type(&self, type_name: &str) -> &str {
        let type_lower = type_name.to_ascii_lowercase();
        self.rules
            .iter()
            .find(|rule| {
                rule.matcher.is_empty() || type_lower.contains(&rule.matcher.to_ascii_lowercase())
            })
            .map_or("", |rule| rule.prefix.as_str())
    }

    /// Translate a legacy CMS section path into a frontend route.
    ///
    /// Prefixes are matched longest-first; the terminal path segment becomes
    /// the slug. Returns `None` when no prefix matches.
    #[must_use]
    pub fn translate_legacy_path(&self, path: &str) -> Option<String> {
        let path = path.trim_matches('/');
        let slug = path.rsplit('/').next()?;
        if slug.is_empty() {
            return None;
        }

        let mut candidates: Vec<&(String, String)> = self.legacy_prefixes.iter().collect();
        candidates.sort_by_key(|(legacy, _)| std::cmp::Reverse(legacy.len()));

        candidates
            .iter()
            .find(|(legacy, _)| {
                path.strip_prefix(legacy.as_str())
                    .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
            })
            .map(|(_, prefix)| format!("{prefix}/{slug}"))
    }

    /// Derive the frontend route for a resolved CMS page.
    ///
    /// A slug containing `/` is treated as a legacy CMS path and translated;
    /// otherwise the route is the type's prefix plus the slug.
    #[must_use]
    pub fn route_for(&self, type_name: &str, slug: &str) -> String {
        let slug = slug.trim_matches('/');
        if slug.contains('/') {
            if let Some(route) = self.translate_legacy_path(slug) {
                return route;
            }
            // Unknown legacy section: fall back to the terminal segment.
            let terminal = slug.rsplit('/').next().unwrap_or(slug);
            return format!("{}/{}", self.prefix_for_type(type_name), terminal);
        }
        format!("{}/{}", self.prefix_for_type(type_name), slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condition_type_maps_to_conditions_prefix() {
        let table = RouteTable::default();
        assert_eq!(
            table.route_for("conditions.ConditionPage", "type-1-diabetes"),
            "/conditions/type-1-diabetes"
        );
    }

    #[test]
    fn drug_type_maps_to_drugs_prefix() {
        let table = RouteTable::default();
        assert_eq!(table.route_for("drugs.DrugPage", "metformin"), "/drugs/metformin");
    }

    #[test]
    fn unknown_type_falls_back_to_root() {
        let table = RouteTable::default();
        assert_eq!(table.route_for("home.HomePage", "about-us"), "/about-us");
    }

    #[test]
    fn type_matching_is_case_insensitive() {
        let table = RouteTable::default();
        assert_eq!(table.route_for("Yoga.YogaPosePage", "tadasana"), "/yoga/tadasana");
    }

    #[test]
    fn legacy_path_is_translated() {
        let table = RouteTable::default();
        assert_eq!(
            table.route_for("conditions.ConditionPage", "health/conditions/type-1-diabetes"),
            "/conditions/type-1-diabetes"
        );
    }

    #[test]
    fn overlapping_legacy_prefixes_match_longest_first() {
        let table = RouteTable::default();
        // "wellness/ayurveda/..." must not be caught by the bare "wellness" prefix.
        assert_eq!(
            table.translate_legacy_path("wellness/ayurveda/abhyanga"),
            Some("/ayurveda/abhyanga".to_string())
        );
        assert_eq!(
            table.translate_legacy_path("wellness/sleep-hygiene"),
            Some("/wellness/sleep-hygiene".to_string())
        );
    }

    #[test]
    fn legacy_prefix_requires_segment_boundary() {
        let table = RouteTable::default();
        // "wellnessish/..." shares a string prefix but not a path segment.
        assert_eq!(table.translate_legacy_path("wellnessish/thing"), None);
    }

    #[test]
    fn unknown_legacy_section_falls_back_to_terminal_segment() {
        let table = RouteTable::default();
        assert_eq!(
            table.route_for("conditions.ConditionPage", "archive/old/type-1-diabetes"),
            "/conditions/type-1-diabetes"
        );
    }
}
