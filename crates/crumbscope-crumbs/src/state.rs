use std::collections::HashSet;

use crumbscope_types::{Breadcrumb, BreadcrumbLevel, BreadcrumbType};

use crate::filter::CrumbFilter;
use crate::store::BreadcrumbStore;

/// Cache of visible indices so re-renders don't re-filter
#[derive(Default)]
struct FilterCache {
    /// The store the cache was built from; holding it keeps its identity unique
    cached_store: Option<BreadcrumbStore>,
    /// Indices into the store, in order
    indices: Vec<usize>,
    is_valid: bool,
}

impl FilterCache {
    fn needs_refresh(&self, store: &BreadcrumbStore) -> bool {
        !self.is_valid
            || !self
                .cached_store
                .as_ref()
                .is_some_and(|cached| cached.same_as(store))
    }

    fn update(&mut self, store: &BreadcrumbStore, indices: Vec<usize>) {
        self.cached_store = Some(store.clone());
        self.indices = indices;
        self.is_valid = true;
    }

    fn invalidate(&mut self) {
        self.is_valid = false;
    }
}

/// Search state of one breadcrumb panel.
///
/// Owns the search term and facet selections; every change recompiles the
/// filter and the visible set is re-derived on the next read.
#[derive(Default)]
pub struct FilterState {
    search_term: String,
    levels: HashSet<BreadcrumbLevel>,
    kinds: HashSet<BreadcrumbType>,
    filter: CrumbFilter,
    cache: FilterCache,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search_term(mut self, term: &str) -> Self {
        self.set_search_term(term);
        self
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn filter(&self) -> &CrumbFilter {
        &self.filter
    }

    pub fn set_search_term(&mut self, term: &str) {
        if self.search_term != term {
            self.search_term = term.to_string();
            self.recompile();
        }
    }

    pub fn push_char(&mut self, c: char) {
        self.search_term.push(c);
        self.recompile();
    }

    pub fn backspace(&mut self) {
        if self.search_term.pop().is_some() {
            self.recompile();
        }
    }

    /// Clear the search term (facets are kept)
    pub fn clear(&mut self) {
        if !self.search_term.is_empty() {
            self.search_term.clear();
            self.recompile();
        }
    }

    pub fn toggle_level(&mut self, level: BreadcrumbLevel) {
        if !self.levels.remove(&level) {
            self.levels.insert(level);
        }
        self.recompile();
    }

    pub fn toggle_kind(&mut self, kind: BreadcrumbType) {
        if !self.kinds.remove(&kind) {
            self.kinds.insert(kind);
        }
        self.recompile();
    }

    /// Step the type facet through every breadcrumb type, then back to none
    pub fn cycle_kind(&mut self) -> Option<BreadcrumbType> {
        let next = match self.kinds.len() {
            0 => BreadcrumbType::ALL.first().copied(),
            1 => self.kinds.iter().next().and_then(|current| {
                let i = BreadcrumbType::ALL.iter().position(|k| k == current)?;
                BreadcrumbType::ALL.get(i + 1).copied()
            }),
            _ => None,
        };
        self.kinds = next.into_iter().collect();
        self.recompile();
        next
    }

    /// Take the facets of a preset filter, keeping the search term
    pub fn apply_preset(&mut self, preset: &CrumbFilter) {
        self.levels = preset.levels().clone();
        self.kinds = preset.kinds().clone();
        self.recompile();
    }

    pub fn clear_facets(&mut self) {
        self.levels.clear();
        self.kinds.clear();
        self.recompile();
    }

    pub fn levels(&self) -> &HashSet<BreadcrumbLevel> {
        &self.levels
    }

    pub fn kinds(&self) -> &HashSet<BreadcrumbType> {
        &self.kinds
    }

    /// Whether anything narrows the list
    pub fn is_active(&self) -> bool {
        !self.filter.is_empty()
    }

    /// Indices of visible breadcrumbs, re-derived only when needed
    pub fn visible_indices(&mut self, store: &BreadcrumbStore) -> &[usize] {
        if self.cache.needs_refresh(store) {
            let indices = self.filter.apply(store.all());
            tracing::debug!(
                term = %self.search_term,
                visible = indices.len(),
                total = store.len(),
                "recomputed visible breadcrumbs"
            );
            self.cache.update(store, indices);
        }
        &self.cache.indices
    }

    /// Visible breadcrumbs in original order
    pub fn visible<'s>(&mut self, store: &'s BreadcrumbStore) -> Vec<&'s Breadcrumb> {
        self.visible_indices(store)
            .iter()
            .filter_map(|&i| store.get(i))
            .collect()
    }

    fn recompile(&mut self) {
        self.filter = CrumbFilter::new(&self.search_term)
            .with_levels(self.levels.clone())
            .with_kinds(self.kinds.clone());
        self.cache.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterPresets;

    fn store() -> BreadcrumbStore {
        BreadcrumbStore::new(vec![
            Breadcrumb::new("sup", BreadcrumbLevel::Warning),
            Breadcrumb::new("hey", BreadcrumbLevel::Info),
            Breadcrumb::new("supper", BreadcrumbLevel::Info),
        ])
    }

    #[test]
    fn test_typing_narrows_and_backspace_widens() {
        let store = store();
        let mut state = FilterState::new();
        assert_eq!(state.visible_indices(&store), &[0, 1, 2]);

        for c in "supp".chars() {
            state.push_char(c);
        }
        assert_eq!(state.visible_indices(&store), &[2]);

        state.backspace();
        assert_eq!(state.visible_indices(&store), &[0, 2]);

        state.clear();
        assert_eq!(state.visible_indices(&store), &[0, 1, 2]);
        assert!(!state.is_active());
    }

    #[test]
    fn test_facets_combine_with_term() {
        let store = store();
        let mut state = FilterState::new().with_search_term("sup");
        state.toggle_level(BreadcrumbLevel::Info);
        assert_eq!(state.visible_indices(&store), &[2]);

        state.toggle_level(BreadcrumbLevel::Info);
        assert_eq!(state.visible_indices(&store), &[0, 2]);
    }

    #[test]
    fn test_kind_facet() {
        let store = BreadcrumbStore::new(vec![
            Breadcrumb::new("GET /api", BreadcrumbLevel::Info).with_kind(BreadcrumbType::Http),
            Breadcrumb::new("clicked", BreadcrumbLevel::Info).with_kind(BreadcrumbType::Ui),
            Breadcrumb::new("POST /api", BreadcrumbLevel::Error).with_kind(BreadcrumbType::Http),
        ]);
        let mut state = FilterState::new();
        state.toggle_kind(BreadcrumbType::Http);
        assert_eq!(state.visible_indices(&store), &[0, 2]);

        state.toggle_level(BreadcrumbLevel::Error);
        assert_eq!(state.visible_indices(&store), &[2]);

        state.clear_facets();
        assert_eq!(state.visible_indices(&store), &[0, 1, 2]);
    }

    #[test]
    fn test_cycle_kind_wraps_to_none() {
        let mut state = FilterState::new();
        assert_eq!(state.cycle_kind(), Some(BreadcrumbType::Default));
        assert_eq!(state.cycle_kind(), Some(BreadcrumbType::Http));

        state.toggle_kind(BreadcrumbType::Ui);
        assert_eq!(state.kinds().len(), 2);
        assert_eq!(state.cycle_kind(), None);
        assert!(state.kinds().is_empty());

        for _ in 0..BreadcrumbType::ALL.len() {
            state.cycle_kind();
        }
        assert_eq!(state.kinds().iter().next(), Some(&BreadcrumbType::Init));
        assert_eq!(state.cycle_kind(), None);
    }

    #[test]
    fn test_preset_keeps_term() {
        let store = store();
        let mut state = FilterState::new().with_search_term("sup");
        state.apply_preset(&FilterPresets::warnings_and_above());
        assert_eq!(state.visible_indices(&store), &[0]);
        assert_eq!(state.search_term(), "sup");
    }

    #[test]
    fn test_same_length_store_is_refiltered() {
        let mut state = FilterState::new().with_search_term("sup");
        assert_eq!(state.visible_indices(&store()), &[0, 2]);

        let other = BreadcrumbStore::new(vec![
            Breadcrumb::new("hey", BreadcrumbLevel::Info),
            Breadcrumb::new("sup", BreadcrumbLevel::Info),
            Breadcrumb::new("yo", BreadcrumbLevel::Info),
        ]);
        assert_eq!(state.visible_indices(&other), &[1]);
        assert_eq!(state.visible_indices(&other.clone()), &[1]);
    }

    #[test]
    fn test_store_swap_invalidates_cache() {
        let mut state = FilterState::new().with_search_term("hey");
        assert_eq!(state.visible_indices(&store()), &[1]);

        let bigger = BreadcrumbStore::new(vec![
            Breadcrumb::new("hey", BreadcrumbLevel::Info),
            Breadcrumb::new("hey there", BreadcrumbLevel::Info),
            Breadcrumb::new("x", BreadcrumbLevel::Info),
            Breadcrumb::new("y", BreadcrumbLevel::Info),
        ]);
        let visible: Vec<_> = state
            .visible(&bigger)
            .into_iter()
            .filter_map(|c| c.message.as_deref())
            .collect();
        assert_eq!(visible, vec!["hey", "hey there"]);
    }
}
