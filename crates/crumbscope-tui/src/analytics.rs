//! Search analytics events.
//!
//! Events are identified by a stable key and carry a human readable name.
//! Tracking emits a structured `tracing` event under the `analytics` target.

/// Every known search analytics event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SearchEventKey {
    Searched,
    OperatorAutocompleted,
    SavedSearchSelected,
    SettingsSearchOpen,
    CommandPaletteOpen,
    SidebarHelpOpen,
    SettingsSearchSelect,
    CommandPaletteSelect,
    SidebarHelpSelect,
    SettingsSearchQuery,
    CommandPaletteQuery,
    SidebarHelpQuery,
}

impl SearchEventKey {
    pub const ALL: [SearchEventKey; 12] = [
        Self::Searched,
        Self::OperatorAutocompleted,
        Self::SavedSearchSelected,
        Self::SettingsSearchOpen,
        Self::CommandPaletteOpen,
        Self::SidebarHelpOpen,
        Self::SettingsSearchSelect,
        Self::CommandPaletteSelect,
        Self::SidebarHelpSelect,
        Self::SettingsSearchQuery,
        Self::CommandPaletteQuery,
        Self::SidebarHelpQuery,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Searched => "search.searched",
            Self::OperatorAutocompleted => "search.operator_autocompleted",
            Self::SavedSearchSelected => "organization_saved_search.selected",
            Self::SettingsSearchOpen => "settings_search.open",
            Self::CommandPaletteOpen => "command_palette.open",
            Self::SidebarHelpOpen => "sidebar_help.open",
            Self::SettingsSearchSelect => "settings_search.select",
            Self::CommandPaletteSelect => "command_palette.select",
            Self::SidebarHelpSelect => "sidebar_help.select",
            Self::SettingsSearchQuery => "settings_search.query",
            Self::CommandPaletteQuery => "command_palette.query",
            Self::SidebarHelpQuery => "sidebar_help.query",
        }
    }

    /// Display name reported alongside the key
    pub fn name(&self) -> &'static str {
        match self {
            Self::Searched => "Search: Performed search",
            Self::OperatorAutocompleted => "Search: Operator Autocompleted",
            Self::SavedSearchSelected => "Organization Saved Search: Selected saved search",
            Self::SettingsSearchOpen => "settings_search Open",
            Self::CommandPaletteOpen => "command_palette Open",
            Self::SidebarHelpOpen => "sidebar_help Open",
            Self::SettingsSearchSelect => "settings_search Select",
            Self::CommandPaletteSelect => "command_palette Select",
            Self::SidebarHelpSelect => "sidebar_help Select",
            Self::SettingsSearchQuery => "settings_search Query",
            Self::CommandPaletteQuery => "command_palette Query",
            Self::SidebarHelpQuery => "sidebar_help Query",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.key() == key)
    }
}

/// One analytics event with its parameters
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchEvent {
    pub key: SearchEventKey,
    pub params: Vec<(&'static str, String)>,
}

impl SearchEvent {
    pub fn new(key: SearchEventKey) -> Self {
        Self {
            key,
            params: Vec::new(),
        }
    }

    pub fn with(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.params.push((name, value.into()));
        self
    }

    /// A completed search over `search_type`
    pub fn searched(query: &str, search_type: &str) -> Self {
        Self::new(SearchEventKey::Searched)
            .with("query", query)
            .with("search_type", search_type)
    }

    /// An item picked from a searchable menu
    pub fn palette_selected(result_type: &str, source_type: &str, query: &str) -> Self {
        let event = Self::new(SearchEventKey::CommandPaletteSelect)
            .with("result_type", result_type)
            .with("source_type", source_type);
        if query.is_empty() {
            event
        } else {
            event.with("query", query)
        }
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn track(&self) {
        tracing::info!(
            target: "analytics",
            event = self.key.key(),
            name = self.key.name(),
            params = ?self.params,
            "tracked"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_round_trip() {
        for key in SearchEventKey::ALL {
            assert_eq!(SearchEventKey::from_key(key.key()), Some(key));
        }
        assert_eq!(SearchEventKey::from_key("search.unknown"), None);
    }

    #[test]
    fn test_searched_event() {
        let event = SearchEvent::searched("sup", "breadcrumbs");
        assert_eq!(event.key.name(), "Search: Performed search");
        assert_eq!(event.param("query"), Some("sup"));
        assert_eq!(event.param("search_type"), Some("breadcrumbs"));
        assert_eq!(event.param("search_source"), None);
    }

    #[test]
    fn test_palette_select_omits_empty_query() {
        let event = SearchEvent::palette_selected("s3", "add_repository", "");
        assert_eq!(event.param("query"), None);
        assert_eq!(event.param("result_type"), Some("s3"));
    }
}
