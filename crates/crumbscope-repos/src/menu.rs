use std::collections::HashSet;

use crumbscope_types::{CustomRepo, RepoKind};

/// Organization feature that enables custom repositories at all
pub const FEATURE_CUSTOM_SYMBOL_SOURCES: &str = "custom-symbol-sources";
/// Organization feature that allows more than one App Store Connect source
pub const FEATURE_APP_STORE_CONNECT_MULTIPLE: &str = "app-store-connect-multiple";
/// Scope needed to change repositories
pub const SCOPE_PROJECT_WRITE: &str = "project:write";

/// Features of the organization and scopes of the current user
#[derive(Clone, Debug, Default)]
pub struct Access {
    pub features: HashSet<String>,
    pub scopes: HashSet<String>,
}

impl Access {
    pub fn new<F, S>(features: F, scopes: S) -> Self
    where
        F: IntoIterator,
        F::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        Self {
            features: features.into_iter().map(Into::into).collect(),
            scopes: scopes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has_feature(&self, feature: &str) -> bool {
        self.features.contains(feature)
    }

    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.contains(scope)
    }

    /// Whether the "Add Repository" menu can be opened
    pub fn can_add(&self, is_loading: bool) -> bool {
        !is_loading
            && self.has_feature(FEATURE_CUSTOM_SYMBOL_SOURCES)
            && self.has_scope(SCOPE_PROJECT_WRITE)
    }

    /// Why adding is not possible, if it isn't
    pub fn add_disabled_reason(&self) -> Option<&'static str> {
        if !self.has_feature(FEATURE_CUSTOM_SYMBOL_SOURCES) {
            Some("This feature is not enabled on your installation.")
        } else if !self.has_scope(SCOPE_PROJECT_WRITE) {
            Some("You do not have permission to add custom repositories.")
        } else {
            None
        }
    }
}

/// One entry of the "Add Repository" menu
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuItem {
    pub kind: RepoKind,
    pub label: &'static str,
    pub search_key: &'static str,
    pub disabled: bool,
}

impl MenuItem {
    /// Case-insensitive match on label and search keywords
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        query.is_empty()
            || self.label.to_lowercase().contains(&query)
            || self.search_key.contains(&query)
    }
}

/// Build the "Add Repository" menu for the current repository list
pub fn add_repository_items(repositories: &[CustomRepo], access: &Access) -> Vec<MenuItem> {
    let has_app_store_connect = repositories
        .iter()
        .any(|r| r.kind() == RepoKind::AppStoreConnect);
    let allow_multiple = access.has_feature(FEATURE_APP_STORE_CONNECT_MULTIPLE);

    RepoKind::ALL
        .into_iter()
        .map(|kind| MenuItem {
            kind,
            label: kind.label(),
            search_key: kind.search_key(),
            disabled: kind == RepoKind::AppStoreConnect && has_app_store_connect && !allow_multiple,
        })
        .collect()
}
