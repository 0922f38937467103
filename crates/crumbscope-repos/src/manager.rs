use std::sync::Arc;

use serde_json::{Value, json};

use crumbscope_types::{CustomRepo, RepoKind, RepoSource};

use crate::client::{ApiClient, Method};
use crate::error::RepoError;
use crate::location::{CUSTOM_REPOSITORY_PARAM, Location};
use crate::notify::Notifier;
use crate::project::{Project, ProjectStore};

/// Notification texts for one save
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestMessages {
    pub success: &'static str,
    pub error: &'static str,
}

/// Pick notification texts by comparing list sizes before and after
pub fn get_request_messages(updated_len: usize, current_len: usize) -> RequestMessages {
    if updated_len > current_len {
        RequestMessages {
            success: "Successfully added custom repository",
            error: "An error occurred while adding a new custom repository",
        }
    } else if updated_len < current_len {
        RequestMessages {
            success: "Successfully removed custom repository",
            error: "An error occurred while removing the custom repository",
        }
    } else {
        RequestMessages {
            success: "Successfully updated custom repository",
            error: "An error occurred while updating the custom repository",
        }
    }
}

/// Result of a successful save
#[derive(Clone, Debug, PartialEq)]
pub struct PersistOutcome {
    pub project: Project,
    /// The caller must reload everything (a synced repository went away)
    pub reload_required: bool,
}

/// An open edit dialog
#[derive(Clone, Debug, PartialEq)]
pub struct EditDialog {
    pub index: usize,
    pub repository: CustomRepo,
}

/// Manages a project's custom repository list.
///
/// The local list is never changed ahead of the server: every mutation
/// builds the complete new list, saves it with a single PUT, and only a
/// successful response updates the [`ProjectStore`]. Calls are independent;
/// overlapping saves are neither queued nor cancelled.
pub struct CustomRepositories<C, N> {
    api: Arc<C>,
    notifier: Arc<N>,
    store: ProjectStore,
    org_slug: String,
    project_slug: String,
}

impl<C, N> Clone for CustomRepositories<C, N> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            notifier: Arc::clone(&self.notifier),
            store: self.store.clone(),
            org_slug: self.org_slug.clone(),
            project_slug: self.project_slug.clone(),
        }
    }
}

impl<C: ApiClient, N: Notifier> CustomRepositories<C, N> {
    pub fn new(
        api: Arc<C>,
        notifier: Arc<N>,
        store: ProjectStore,
        org_slug: impl Into<String>,
        project_slug: impl Into<String>,
    ) -> Self {
        Self {
            api,
            notifier,
            store,
            org_slug: org_slug.into(),
            project_slug: project_slug.into(),
        }
    }

    fn project_path(&self) -> String {
        format!("/projects/{}/{}/", self.org_slug, self.project_slug)
    }

    pub fn store(&self) -> &ProjectStore {
        &self.store
    }

    /// Current list as last confirmed by the server
    pub fn repositories(&self) -> Vec<CustomRepo> {
        self.store.repositories()
    }

    /// Fetch the project and replace the store's copy
    pub async fn load(&self) -> Result<Project, RepoError> {
        let value = self
            .api
            .request(&self.project_path(), Method::Get, None)
            .await?;
        let project = Project::from_value(value)?;

        tracing::info!(
            project = %self.project_slug,
            repositories = project.custom_repositories.len(),
            "loaded project"
        );
        self.store.update_success(project.clone());
        Ok(project)
    }

    /// Append a repository
    pub async fn add(&self, repository: CustomRepo) -> Result<PersistOutcome, RepoError> {
        let current = self.repositories();
        let current_len = current.len();
        let mut items = current;
        items.push(repository);
        self.persist(items, current_len, false).await
    }

    /// Replace the repository at `index`
    pub async fn update(
        &self,
        index: usize,
        repository: CustomRepo,
    ) -> Result<PersistOutcome, RepoError> {
        let mut items = self.repositories();
        let len = items.len();
        let slot = items
            .get_mut(index)
            .ok_or(RepoError::IndexOutOfRange { index, len })?;
        *slot = repository;
        self.persist(items, len, false).await
    }

    /// Replace the repository with the same id
    pub async fn update_by_id(&self, repository: CustomRepo) -> Result<PersistOutcome, RepoError> {
        let index = self
            .index_of(&repository.id)
            .ok_or_else(|| RepoError::UnknownId(repository.id.clone()))?;
        self.update(index, repository).await
    }

    /// Remove the repository with `id`
    pub async fn delete(&self, id: &str) -> Result<PersistOutcome, RepoError> {
        let mut items = self.repositories();
        let current_len = items.len();
        let index = items
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| RepoError::UnknownId(id.to_string()))?;

        let removed = items.remove(index);
        let refresh = removed.kind().requires_sync();
        self.persist(items, current_len, refresh).await
    }

    /// Save `items` as the complete list.
    ///
    /// `current_len` is the size of the list the change was based on and
    /// selects the notification wording.
    pub async fn persist(
        &self,
        items: Vec<CustomRepo>,
        current_len: usize,
        refresh: bool,
    ) -> Result<PersistOutcome, RepoError> {
        let messages = get_request_messages(items.len(), current_len);

        let result = self.send(&items).await;
        let response = match result {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "saving custom repositories failed");
                self.notifier.notify_error(messages.error);
                return Err(e);
            }
        };

        let project = self.confirmed_project(response, items);
        self.store.update_success(project.clone());
        self.notifier.notify_success(messages.success);
        tracing::info!(
            repositories = project.custom_repositories.len(),
            reload = refresh,
            "saved custom repositories"
        );

        Ok(PersistOutcome {
            project,
            reload_required: refresh,
        })
    }

    async fn send(&self, items: &[CustomRepo]) -> Result<Value, RepoError> {
        let symbol_sources = Project::symbol_sources(items).map_err(crate::error::ApiError::from)?;
        let body = json!({ "symbolSources": symbol_sources });
        Ok(self
            .api
            .request(&self.project_path(), Method::Put, Some(body))
            .await?)
    }

    /// Project as confirmed by the server, falling back to what was sent
    /// when the response doesn't echo the list back
    fn confirmed_project(&self, response: Value, sent: Vec<CustomRepo>) -> Project {
        let echoes_sources = response.get("symbolSources").is_some();
        match Project::from_value(response) {
            Ok(mut project) => {
                if !echoes_sources {
                    project.custom_repositories = sent;
                }
                if project.slug.is_empty() {
                    project.slug = self.store.slug();
                }
                project
            }
            Err(e) => {
                tracing::warn!(error = %e, "unreadable project in save response");
                Project {
                    slug: self.store.slug(),
                    custom_repositories: sent,
                }
            }
        }
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.repositories().iter().position(|r| r.id == id)
    }

    /// Resolve the edit dialog named by the location's query, if any
    pub fn open_edit_dialog(&self, location: &Location) -> Option<EditDialog> {
        let id = location.get(CUSTOM_REPOSITORY_PARAM)?;
        let repositories = self.repositories();
        let index = repositories.iter().position(|r| r.id == id)?;
        Some(EditDialog {
            index,
            repository: repositories[index].clone(),
        })
    }

    /// Request the edit dialog for `id`
    pub fn edit(&self, location: &mut Location, id: &str) {
        location.set(CUSTOM_REPOSITORY_PARAM, id);
    }

    pub fn close_dialog(&self, location: &mut Location) {
        location.remove(CUSTOM_REPOSITORY_PARAM);
    }
}

/// A new, unsaved repository of `kind` with a fresh id
pub fn draft_repository(kind: RepoKind, name: impl Into<String>) -> CustomRepo {
    CustomRepo::new(uuid::Uuid::new_v4().to_string(), name, RepoSource::empty(kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::notify::Notification;
    use parking_lot::Mutex;

    /// Echoes PUT bodies back the way the project endpoint does
    #[derive(Default)]
    struct FakeApi {
        calls: Mutex<Vec<(Method, Option<Value>)>>,
        fail: bool,
        initial: Option<Value>,
    }

    impl ApiClient for FakeApi {
        async fn request(
            &self,
            _path: &str,
            method: Method,
            body: Option<Value>,
        ) -> Result<Value, ApiError> {
            self.calls.lock().push((method, body.clone()));
            if self.fail {
                return Err(ApiError::Status {
                    status: 500,
                    body: "boom".to_string(),
                });
            }
            match (method, body) {
                (Method::Put, Some(body)) => Ok(json!({
                    "slug": "web",
                    "symbolSources": body["symbolSources"].clone(),
                })),
                _ => Ok(self.initial.clone().unwrap_or_else(|| json!({"slug": "web"}))),
            }
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        seen: Mutex<Vec<Notification>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify_success(&self, text: &str) {
            self.seen.lock().push(Notification::Success(text.to_string()));
        }

        fn notify_error(&self, text: &str) {
            self.seen.lock().push(Notification::Error(text.to_string()));
        }
    }

    fn http(id: &str) -> CustomRepo {
        let mut source = RepoSource::empty(RepoKind::Http);
        source.set_locator(format!("https://{}.example.com", id));
        CustomRepo::new(id, id.to_uppercase(), source)
    }

    fn manager(
        api: FakeApi,
        repos: Vec<CustomRepo>,
    ) -> (
        CustomRepositories<FakeApi, RecordingNotifier>,
        Arc<FakeApi>,
        Arc<RecordingNotifier>,
    ) {
        let api = Arc::new(api);
        let notifier = Arc::new(RecordingNotifier::default());
        let store = ProjectStore::new(Project {
            slug: "web".to_string(),
            custom_repositories: repos,
        });
        let manager = CustomRepositories::new(
            Arc::clone(&api),
            Arc::clone(&notifier),
            store,
            "acme",
            "web",
        );
        (manager, api, notifier)
    }

    fn sent_ids(body: &Option<Value>) -> Vec<String> {
        let text = body.as_ref().unwrap()["symbolSources"].as_str().unwrap();
        let sent: Vec<CustomRepo> = serde_json::from_str(text).unwrap();
        sent.into_iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_request_messages() {
        assert_eq!(get_request_messages(3, 2).success, "Successfully added custom repository");
        assert_eq!(get_request_messages(1, 2).success, "Successfully removed custom repository");
        assert_eq!(
            get_request_messages(2, 2).error,
            "An error occurred while updating the custom repository"
        );
    }

    #[tokio::test]
    async fn test_delete_persists_remaining_list_once() {
        let (manager, api, notifier) =
            manager(FakeApi::default(), vec![http("a"), http("b"), http("c")]);

        let outcome = manager.delete("b").await.unwrap();

        let calls = api.calls.lock();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, Method::Put);
        assert_eq!(sent_ids(&calls[0].1), vec!["a", "c"]);
        assert!(!outcome.reload_required);

        let ids: Vec<_> = manager.repositories().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(
            notifier.seen.lock().as_slice(),
            &[Notification::Success("Successfully removed custom repository".to_string())]
        );
    }

    #[tokio::test]
    async fn test_failed_delete_leaves_list_unchanged() {
        let api = FakeApi {
            fail: true,
            ..FakeApi::default()
        };
        let (manager, api, notifier) = manager(api, vec![http("a"), http("b")]);

        let result = manager.delete("a").await;

        assert!(matches!(result, Err(RepoError::Api(_))));
        assert_eq!(api.calls.lock().len(), 1);
        assert_eq!(manager.repositories().len(), 2);
        assert_eq!(manager.store().revision(), 0);
        assert_eq!(
            notifier.seen.lock().as_slice(),
            &[Notification::Error(
                "An error occurred while removing the custom repository".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn test_delete_unknown_id_does_not_persist() {
        let (manager, api, notifier) = manager(FakeApi::default(), vec![http("a")]);

        let result = manager.delete("zzz").await;

        assert!(matches!(result, Err(RepoError::UnknownId(id)) if id == "zzz"));
        assert!(api.calls.lock().is_empty());
        assert!(notifier.seen.lock().is_empty());
    }

    #[tokio::test]
    async fn test_deleting_synced_repository_requires_reload() {
        let asc = CustomRepo::new("asc", "iOS", RepoSource::empty(RepoKind::AppStoreConnect));
        let (manager, _, _) = manager(FakeApi::default(), vec![http("a"), asc]);

        let outcome = manager.delete("asc").await.unwrap();
        assert!(outcome.reload_required);
        assert_eq!(outcome.project.custom_repositories.len(), 1);
    }

    #[tokio::test]
    async fn test_add_appends() {
        let (manager, api, notifier) = manager(FakeApi::default(), vec![http("a")]);

        manager.add(http("b")).await.unwrap();

        assert_eq!(sent_ids(&api.calls.lock()[0].1), vec!["a", "b"]);
        assert_eq!(manager.repositories().len(), 2);
        assert_eq!(
            notifier.seen.lock()[0],
            Notification::Success("Successfully added custom repository".to_string())
        );
    }

    #[tokio::test]
    async fn test_update_replaces_in_place() {
        let (manager, _, notifier) = manager(FakeApi::default(), vec![http("a"), http("b")]);

        let mut edited = http("b");
        edited.name = "Renamed".to_string();
        manager.update_by_id(edited).await.unwrap();

        let repos = manager.repositories();
        assert_eq!(repos[1].name, "Renamed");
        assert_eq!(repos[0].name, "A");
        assert_eq!(
            notifier.seen.lock()[0].text(),
            "Successfully updated custom repository"
        );
    }

    #[tokio::test]
    async fn test_update_out_of_range() {
        let (manager, api, _) = manager(FakeApi::default(), vec![http("a")]);
        let result = manager.update(4, http("x")).await;
        assert!(matches!(result, Err(RepoError::IndexOutOfRange { index: 4, len: 1 })));
        assert!(api.calls.lock().is_empty());
    }

    #[tokio::test]
    async fn test_load_fills_store() {
        let api = FakeApi {
            initial: Some(json!({
                "slug": "web",
                "symbolSources": r#"[{"type":"gcs","id":"g","name":"G","bucket":"syms"}]"#
            })),
            ..FakeApi::default()
        };
        let (manager, _, _) = manager(api, Vec::new());

        manager.load().await.unwrap();
        assert_eq!(manager.repositories()[0].kind(), RepoKind::Gcs);
    }

    #[tokio::test]
    async fn test_edit_after_concurrent_delete_targets_id() {
        let (manager, _, _) =
            manager(FakeApi::default(), vec![http("a"), http("b"), http("c")]);
        let mut location = Location::new();
        manager.edit(&mut location, "b");
        let dialog = manager.open_edit_dialog(&location).unwrap();
        assert_eq!(dialog.index, 1);

        manager.delete("a").await.unwrap();

        let mut edited = dialog.repository;
        edited.name = "B2".to_string();
        manager.update_by_id(edited).await.unwrap();

        let repos: Vec<_> = manager
            .repositories()
            .into_iter()
            .map(|r| (r.id, r.name))
            .collect();
        assert_eq!(
            repos,
            vec![
                ("b".to_string(), "B2".to_string()),
                ("c".to_string(), "C".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_save_keeps_unmodelled_fields() {
        let api = FakeApi {
            initial: Some(json!({
                "slug": "web",
                "symbolSources": json!([
                    {
                        "type": "http",
                        "id": "a",
                        "name": "A",
                        "url": "https://a.example.com",
                        "filters": {"filetypes": ["pe"]}
                    },
                    {"type": "s3", "id": "b", "name": "B", "bucket": "syms"},
                    {"type": "sftp", "id": "s", "name": "Legacy", "host": "files.example.com"}
                ])
                .to_string()
            })),
            ..FakeApi::default()
        };
        let (manager, api, _) = manager(api, Vec::new());

        manager.load().await.unwrap();
        assert_eq!(manager.repositories()[2].kind(), RepoKind::Unsupported);

        manager.delete("b").await.unwrap();

        let calls = api.calls.lock();
        let text = calls[1].1.as_ref().unwrap()["symbolSources"].as_str().unwrap();
        let sent: Value = serde_json::from_str(text).unwrap();
        assert_eq!(sent.as_array().unwrap().len(), 2);
        assert_eq!(sent[0]["filters"]["filetypes"][0], "pe");
        assert_eq!(sent[1]["type"], "sftp");
        assert_eq!(sent[1]["host"], "files.example.com");
    }

    #[test]
    fn test_edit_dialog_follows_query() {
        let (manager, _, _) = manager(FakeApi::default(), vec![http("a"), http("b")]);
        let mut location = Location::from_query("tab=sources");

        assert!(manager.open_edit_dialog(&location).is_none());

        manager.edit(&mut location, "b");
        let dialog = manager.open_edit_dialog(&location).unwrap();
        assert_eq!(dialog.index, 1);
        assert_eq!(dialog.repository.id, "b");

        manager.edit(&mut location, "missing");
        assert!(manager.open_edit_dialog(&location).is_none());

        manager.close_dialog(&mut location);
        assert_eq!(location.to_query(), "tab=sources");
    }

    #[test]
    fn test_draft_ids_are_unique() {
        let a = draft_repository(RepoKind::S3, "one");
        let b = draft_repository(RepoKind::S3, "two");
        assert_ne!(a.id, b.id);
        assert_eq!(a.kind(), RepoKind::S3);
    }
}
