use std::sync::Arc;

use parking_lot::RwLock;
use serde::Deserialize;
use serde_json::Value;

use crumbscope_types::CustomRepo;

use crate::error::ApiError;

/// The parts of a project this application cares about
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Project {
    pub slug: String,
    pub custom_repositories: Vec<CustomRepo>,
}

#[derive(Deserialize)]
struct ProjectPayload {
    #[serde(default)]
    slug: String,
    /// The server stores the list as a JSON string
    #[serde(rename = "symbolSources", default)]
    symbol_sources: Option<String>,
}

impl Project {
    /// Decode a project API response
    pub fn from_value(value: Value) -> Result<Self, ApiError> {
        let payload: ProjectPayload = serde_json::from_value(value)?;
        let custom_repositories = match payload.symbol_sources.as_deref().map(str::trim) {
            None | Some("") => Vec::new(),
            Some(text) => serde_json::from_str(text)?,
        };

        Ok(Self {
            slug: payload.slug,
            custom_repositories,
        })
    }

    /// Encode a repository list the way the project endpoint expects it
    pub fn symbol_sources(repositories: &[CustomRepo]) -> Result<String, serde_json::Error> {
        serde_json::to_string(repositories)
    }
}

#[derive(Default)]
struct StoreInner {
    project: Project,
    /// Bumped on every update so views can tell when to refresh
    revision: u64,
}

/// Shared handle to the current project.
///
/// Passed explicitly to whoever needs it; clones share the same project.
#[derive(Clone, Default)]
pub struct ProjectStore {
    inner: Arc<RwLock<StoreInner>>,
}

impl ProjectStore {
    pub fn new(project: Project) -> Self {
        Self {
            inner: Arc::new(RwLock::new(StoreInner {
                project,
                revision: 0,
            })),
        }
    }

    /// Replace the project after a successful save or load
    pub fn update_success(&self, project: Project) {
        let mut inner = self.inner.write();
        inner.project = project;
        inner.revision += 1;
    }

    pub fn project(&self) -> Project {
        self.inner.read().project.clone()
    }

    pub fn slug(&self) -> String {
        self.inner.read().project.slug.clone()
    }

    /// Snapshot of the configured repositories
    pub fn repositories(&self) -> Vec<CustomRepo> {
        self.inner.read().project.custom_repositories.clone()
    }

    pub fn revision(&self) -> u64 {
        self.inner.read().revision
    }
}
