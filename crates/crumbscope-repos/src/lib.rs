//! Custom repository management for crumbscope
//!
//! This crate provides the API clients, the shared project store, and the
//! list manager that adds, edits, and deletes a project's custom debug-file
//! repositories.

mod client;
mod error;
mod location;
mod manager;
mod menu;
mod notify;
mod project;

pub use client::{AnyClient, ApiClient, FileApiClient, HttpApiClient, Method};
pub use error::{ApiError, RepoError};
pub use location::{CUSTOM_REPOSITORY_PARAM, Location};
pub use manager::{
    CustomRepositories, EditDialog, PersistOutcome, RequestMessages, draft_repository,
    get_request_messages,
};
pub use menu::{
    Access, FEATURE_APP_STORE_CONNECT_MULTIPLE, FEATURE_CUSTOM_SYMBOL_SOURCES, MenuItem,
    SCOPE_PROJECT_WRITE, add_repository_items,
};
pub use notify::{ChannelNotifier, Notification, Notifier, TracingNotifier};
pub use project::{Project, ProjectStore};

// Re-export types used in our public API
pub use crumbscope_types::{CustomRepo, RepoKind, RepoSource};
