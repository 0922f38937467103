use regex::{Regex, RegexBuilder};
use std::collections::HashSet;

use crumbscope_types::{Breadcrumb, BreadcrumbLevel, BreadcrumbType};

use crate::data::data_search_text;

/// How the search term is matched against text
#[derive(Clone)]
enum Matcher {
    /// Escaped, case-insensitive regex (the normal path)
    Regex(Regex),
    /// Lowercased literal, used when the regex cannot be built
    Folded(String),
}

/// Compiled search filter for breadcrumbs
#[derive(Clone)]
pub struct CrumbFilter {
    /// Matcher for the search term (None = empty term)
    matcher: Option<Matcher>,

    /// Original search term
    term: String,

    /// Levels to include (empty = all)
    levels: HashSet<BreadcrumbLevel>,

    /// Breadcrumb types to include (empty = all)
    kinds: HashSet<BreadcrumbType>,
}

impl CrumbFilter {
    /// Create a case-insensitive substring filter. Regex metacharacters in
    /// `term` are matched literally.
    pub fn new(term: &str) -> Self {
        let matcher = if term.is_empty() {
            None
        } else {
            match RegexBuilder::new(&regex::escape(term))
                .case_insensitive(true)
                .build()
            {
                Ok(re) => Some(Matcher::Regex(re)),
                Err(e) => {
                    tracing::debug!(error = %e, "search term too large for regex, using literal match");
                    Some(Matcher::Folded(term.to_lowercase()))
                }
            }
        };

        Self {
            matcher,
            term: term.to_string(),
            levels: HashSet::new(),
            kinds: HashSet::new(),
        }
    }

    /// Set levels to filter by
    pub fn with_levels(mut self, levels: HashSet<BreadcrumbLevel>) -> Self {
        self.levels = levels;
        self
    }

    /// Set breadcrumb types to filter by
    pub fn with_kinds(mut self, kinds: HashSet<BreadcrumbType>) -> Self {
        self.kinds = kinds;
        self
    }

    /// Check if a breadcrumb passes this filter
    pub fn matches(&self, crumb: &Breadcrumb) -> bool {
        if !self.levels.is_empty() && !self.levels.contains(&crumb.level) {
            return false;
        }

        if !self.kinds.is_empty() && !self.kinds.contains(&crumb.kind) {
            return false;
        }

        if self.matcher.is_none() {
            return true;
        }

        let cheap_fields = [
            crumb.message.as_deref(),
            crumb.category.as_deref(),
            Some(crumb.level.label()),
        ];
        if cheap_fields.into_iter().flatten().any(|text| self.is_match(text)) {
            return true;
        }

        // Only stringify the payload when nothing else matched
        crumb
            .data
            .as_ref()
            .is_some_and(|data| self.is_match(&data_search_text(data)))
    }

    /// Check if `text` contains the search term
    pub fn is_match(&self, text: &str) -> bool {
        match &self.matcher {
            Some(Matcher::Regex(re)) => re.is_match(text),
            Some(Matcher::Folded(needle)) => text.to_lowercase().contains(needle.as_str()),
            None => true,
        }
    }

    /// Find all match positions in a string (for highlighting)
    pub fn find_matches(&self, text: &str) -> Vec<(usize, usize)> {
        match &self.matcher {
            Some(Matcher::Regex(re)) => re.find_iter(text).map(|m| (m.start(), m.end())).collect(),
            Some(Matcher::Folded(needle)) => {
                let folded = text.to_lowercase();
                // Offsets are only meaningful when folding kept byte lengths
                if folded.len() != text.len() {
                    return Vec::new();
                }
                folded
                    .match_indices(needle.as_str())
                    .map(|(start, m)| (start, start + m.len()))
                    .collect()
            }
            None => Vec::new(),
        }
    }

    /// Indices of the breadcrumbs that pass, in input order
    pub fn apply(&self, crumbs: &[Breadcrumb]) -> Vec<usize> {
        crumbs
            .iter()
            .enumerate()
            .filter(|(_, crumb)| self.matches(crumb))
            .map(|(i, _)| i)
            .collect()
    }

    /// Get the original search term
    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn levels(&self) -> &HashSet<BreadcrumbLevel> {
        &self.levels
    }

    pub fn kinds(&self) -> &HashSet<BreadcrumbType> {
        &self.kinds
    }

    /// Check if filter is empty (matches everything)
    pub fn is_empty(&self) -> bool {
        self.matcher.is_none() && self.levels.is_empty() && self.kinds.is_empty()
    }

    /// Check if filter has a search term
    pub fn has_term(&self) -> bool {
        self.matcher.is_some()
    }
}

impl Default for CrumbFilter {
    fn default() -> Self {
        Self::new("")
    }
}

impl std::fmt::Debug for CrumbFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrumbFilter")
            .field("term", &self.term)
            .field("levels", &self.levels)
            .field("kinds", &self.kinds)
            .finish()
    }
}

/// Quick filter presets
pub struct FilterPresets;

impl FilterPresets {
    /// Errors and fatals only
    pub fn errors_only() -> CrumbFilter {
        CrumbFilter::default()
            .with_levels([BreadcrumbLevel::Error, BreadcrumbLevel::Fatal].into_iter().collect())
    }

    /// Warnings and above
    pub fn warnings_and_above() -> CrumbFilter {
        let levels = BreadcrumbLevel::ALL
            .into_iter()
            .filter(|l| l.severity() >= BreadcrumbLevel::Warning.severity())
            .collect();
        CrumbFilter::default().with_levels(levels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn crumb(message: &str, category: &str, level: BreadcrumbLevel) -> Breadcrumb {
        Breadcrumb::new(message, level)
            .with_category(category)
            .with_kind(BreadcrumbType::Info)
    }

    /// The seven breadcrumbs used throughout these tests
    fn sample() -> Vec<Breadcrumb> {
        use BreadcrumbLevel::{Info, Warning};
        vec![
            crumb("sup", "default", Warning),
            crumb("hey", "error", Info),
            crumb("hello", "default", Warning),
            crumb("bye", "default", Warning),
            crumb("ok", "error", Warning),
            crumb("sup", "default", Warning),
            crumb("sup", "default", Info),
        ]
    }

    #[test]
    fn test_empty_term_is_identity() {
        let crumbs = sample();
        let filter = CrumbFilter::new("");
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&crumbs), (0..crumbs.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_message_substring() {
        let crumbs = sample();
        assert_eq!(CrumbFilter::new("sup").apply(&crumbs), vec![0, 5, 6]);
        assert_eq!(CrumbFilter::new("up").apply(&crumbs), vec![0, 5, 6]);
        assert!(CrumbFilter::new("hi").apply(&crumbs).is_empty());
    }

    #[test]
    fn test_level_label_match() {
        let crumbs = sample();
        assert_eq!(CrumbFilter::new("war").apply(&crumbs), vec![0, 2, 3, 4, 5]);
    }

    #[test]
    fn test_category_match() {
        let crumbs = sample();
        assert_eq!(CrumbFilter::new("error").apply(&crumbs), vec![1, 4]);
    }

    #[test]
    fn test_case_insensitive() {
        let crumbs = sample();
        assert_eq!(CrumbFilter::new("SUP").apply(&crumbs), vec![0, 5, 6]);
        assert_eq!(CrumbFilter::new("WaRnInG").apply(&crumbs).len(), 5);
    }

    #[test]
    fn test_metacharacters_are_literal() {
        let crumbs = vec![
            Breadcrumb::new("GET /api/users?id=1", BreadcrumbLevel::Info),
            Breadcrumb::new("GET /api/usersXid=1", BreadcrumbLevel::Info),
        ];
        assert_eq!(CrumbFilter::new("users?id").apply(&crumbs), vec![0]);
        assert!(CrumbFilter::new(".*").apply(&crumbs).is_empty());
    }

    #[test]
    fn test_data_match_with_to_string_key() {
        let crumbs = vec![
            Breadcrumb::new("sup", BreadcrumbLevel::Info)
                .with_data(json!({"nested": {"toString": "hello"}})),
        ];
        assert_eq!(CrumbFilter::new("hello").apply(&crumbs), vec![0]);
        assert_eq!(CrumbFilter::new("tostring").apply(&crumbs), vec![0]);
        assert!(CrumbFilter::new("goodbye").apply(&crumbs).is_empty());
    }

    #[test]
    fn test_result_is_ordered_subsequence() {
        let crumbs = sample();
        for term in ["s", "e", "o", "default", "info", "zzz"] {
            let indices = CrumbFilter::new(term).apply(&crumbs);
            assert!(indices.windows(2).all(|w| w[0] < w[1]), "term {term}");
            assert!(indices.iter().all(|&i| i < crumbs.len()));
        }
    }

    #[test]
    fn test_level_facet() {
        let crumbs = sample();
        let filter = CrumbFilter::new("sup").with_levels([BreadcrumbLevel::Info].into_iter().collect());
        assert_eq!(filter.apply(&crumbs), vec![6]);
    }

    #[test]
    fn test_kind_facet() {
        let mut crumbs = sample();
        crumbs[3].kind = BreadcrumbType::Http;
        let filter = CrumbFilter::default().with_kinds([BreadcrumbType::Http].into_iter().collect());
        assert_eq!(filter.apply(&crumbs), vec![3]);
    }

    #[test]
    fn test_presets() {
        let crumbs = vec![
            Breadcrumb::new("a", BreadcrumbLevel::Debug),
            Breadcrumb::new("b", BreadcrumbLevel::Warning),
            Breadcrumb::new("c", BreadcrumbLevel::Error),
            Breadcrumb::new("d", BreadcrumbLevel::Fatal),
        ];
        assert_eq!(FilterPresets::errors_only().apply(&crumbs), vec![2, 3]);
        assert_eq!(FilterPresets::warnings_and_above().apply(&crumbs), vec![1, 2, 3]);
    }

    #[test]
    fn test_find_matches() {
        let filter = CrumbFilter::new("sup");
        let matches = filter.find_matches("Sup? sup!");
        assert_eq!(matches, vec![(0, 3), (5, 8)]);
    }
}
