//! TUI components for crumbscope
//!
//! This crate provides the terminal user interface for crumbscope,
//! including state management, keybindings, event handling, and UI components.

pub mod analytics;
pub mod app;
pub mod config;
pub mod tui;
pub mod ui;

pub use analytics::{SearchEvent, SearchEventKey};
pub use app::{Action, AppState, ControlState, RepoCommand, Screen};
pub use config::{KeyBinding, KeyBindings, KeyContext};
pub use tui::{Event, EventHandler, Tui};
pub use ui::components::{HelpOverlay, StatusBar, Toasts};
pub use ui::screens::{BreadcrumbsScreen, RepositoriesScreen};
pub use ui::{Layout, Theme};
