use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::widgets::ListState;

use crumbscope_crumbs::{BreadcrumbStore, FilterPresets, FilterState};
use crumbscope_repos::{
    Access, CUSTOM_REPOSITORY_PARAM, EditDialog, Location, MenuItem, Notification,
    add_repository_items, draft_repository,
};
use crumbscope_types::{CustomRepo, EventSnapshot, RepoKind};

use super::{Action, RepoCommand};
use crate::analytics::{SearchEvent, SearchEventKey};
use crate::config::KeyContext;

/// How long a toast stays on screen
const TOAST_TTL: Duration = Duration::from_secs(4);
const PAGE_SIZE: usize = 20;
const SEARCH_TYPE: &str = "breadcrumbs";

/// Screen enumeration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Breadcrumbs,
    Repositories,
}

impl Screen {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Breadcrumbs => "Breadcrumbs",
            Self::Repositories => "Custom Repositories",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Self::Breadcrumbs => Self::Repositories,
            Self::Repositories => Self::Breadcrumbs,
        }
    }
}

/// Save state of the repository panel
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ControlState {
    #[default]
    Idle,
    Saving,
    Saved,
    Error(String),
}

impl ControlState {
    pub fn label(&self) -> Option<String> {
        match self {
            Self::Idle => None,
            Self::Saving => Some("⟳ Saving…".to_string()),
            Self::Saved => Some("✓ Saved".to_string()),
            Self::Error(msg) => Some(format!("✗ {}", msg)),
        }
    }
}

/// The open "Add Repository" menu
#[derive(Clone, Debug, Default)]
pub struct MenuState {
    pub query: String,
    pub selected: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialogMode {
    Add,
    Edit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialogField {
    Name,
    Locator,
}

/// Form for a new or existing repository
#[derive(Clone, Debug)]
pub struct DialogState {
    pub mode: DialogMode,
    pub repository: CustomRepo,
    pub name: String,
    pub locator: String,
    pub focus: DialogField,
    pub error: Option<String>,
}

impl DialogState {
    pub fn for_add(repository: CustomRepo) -> Self {
        Self::with_mode(DialogMode::Add, repository)
    }

    pub fn for_edit(dialog: EditDialog) -> Self {
        Self::with_mode(DialogMode::Edit, dialog.repository)
    }

    fn with_mode(mode: DialogMode, repository: CustomRepo) -> Self {
        Self {
            mode,
            name: repository.name.clone(),
            locator: repository.source.locator().to_string(),
            repository,
            focus: DialogField::Name,
            error: None,
        }
    }

    pub fn kind(&self) -> RepoKind {
        self.repository.kind()
    }

    pub fn title(&self) -> String {
        match self.mode {
            DialogMode::Add => format!("Add {} Repository", self.kind().label()),
            DialogMode::Edit => format!("Edit {}", self.repository.name),
        }
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            DialogField::Name => &mut self.name,
            DialogField::Locator => &mut self.locator,
        }
    }

    pub fn input(&mut self, c: char) {
        self.focused_mut().push(c);
        self.error = None;
    }

    pub fn backspace(&mut self) {
        self.focused_mut().pop();
    }

    pub fn next_field(&mut self) {
        self.focus = match self.focus {
            DialogField::Name => DialogField::Locator,
            DialogField::Locator => DialogField::Name,
        };
    }

    /// The repository with the form's values applied
    pub fn build(&self) -> Result<CustomRepo, String> {
        let name = self.name.trim();
        let locator = self.locator.trim();
        if name.is_empty() {
            return Err("Name is required".to_string());
        }
        if locator.is_empty() {
            return Err(format!("{} is required", self.kind().locator_label()));
        }

        let mut repository = self.repository.clone();
        repository.name = name.to_string();
        repository.source.set_locator(locator.to_string());
        Ok(repository)
    }
}

/// A notification on screen
#[derive(Clone, Debug)]
pub struct Toast {
    pub notification: Notification,
    pub shown_at: Instant,
}

/// Global application state
pub struct AppState {
    /// Current screen being displayed
    pub current_screen: Screen,

    /// Is help overlay visible?
    pub show_help: bool,

    /// Whether app should quit
    pub should_quit: bool,

    /// Dirty flag for rendering - only render when true
    pub render_dirty: bool,

    /// Error message to display (if any)
    pub error_message: Option<String>,

    // Breadcrumb viewer
    pub store: BreadcrumbStore,
    pub snapshot: EventSnapshot,
    pub filter: FilterState,
    /// Is the search bar taking input?
    pub search_active: bool,
    /// First rendered line of the breadcrumb list
    pub scroll: usize,
    pub relative_time: bool,
    pub show_data: bool,

    // Repository panel
    /// Slug of the project the repositories belong to
    pub project: String,
    pub repositories: Vec<CustomRepo>,
    pub repo_list: ListState,
    pub access: Access,
    pub loading: bool,
    pub menu: Option<MenuState>,
    pub dialog: Option<DialogState>,
    /// Id awaiting delete confirmation
    pub confirm_delete: Option<String>,
    pub control: ControlState,
    pending_saves: usize,
    pub location: Location,

    pub toasts: VecDeque<Toast>,
}

impl AppState {
    pub fn new(store: BreadcrumbStore, snapshot: EventSnapshot, access: Access) -> Self {
        Self {
            current_screen: Screen::Breadcrumbs,
            show_help: false,
            should_quit: false,
            render_dirty: true,
            error_message: None,
            store,
            snapshot,
            filter: FilterState::new(),
            search_active: false,
            scroll: 0,
            relative_time: false,
            show_data: true,
            project: String::new(),
            repositories: Vec::new(),
            repo_list: ListState::default(),
            access,
            loading: true,
            menu: None,
            dialog: None,
            confirm_delete: None,
            control: ControlState::Idle,
            pending_saves: 0,
            location: Location::new(),
            toasts: VecDeque::new(),
        }
    }

    /// Apply an action; returns work for the repository manager, if any
    pub fn update(&mut self, action: Action) -> Option<RepoCommand> {
        if !matches!(action, Action::Tick) {
            self.render_dirty = true;
        }

        match action {
            Action::Quit => self.should_quit = true,
            Action::GoBack => self.go_back(),
            Action::Navigate(screen) => self.navigate_to(screen),
            Action::NextScreen => self.navigate_to(self.current_screen.next()),
            Action::ToggleHelp => {
                self.show_help = !self.show_help;
                if self.show_help {
                    SearchEvent::new(SearchEventKey::SidebarHelpOpen).track();
                }
            }

            // Search
            Action::OpenSearch => self.search_active = true,
            Action::ApplySearch => {
                self.search_active = false;
                if !self.filter.search_term().is_empty() {
                    SearchEvent::searched(self.filter.search_term(), SEARCH_TYPE).track();
                }
            }
            Action::CloseSearch => {
                self.search_active = false;
                self.filter.clear();
                self.scroll = 0;
            }
            Action::SearchInput(c) => {
                self.filter.push_char(c);
                self.scroll = 0;
            }
            Action::SearchBackspace => {
                self.filter.backspace();
                self.scroll = 0;
            }
            Action::SearchClear | Action::ClearFilter => {
                self.filter.clear();
                self.scroll = 0;
            }
            Action::ToggleLevel(level) => {
                self.filter.toggle_level(level);
                self.scroll = 0;
            }
            Action::CycleKind => {
                self.filter.cycle_kind();
                self.scroll = 0;
            }
            Action::ErrorsOnly => {
                self.filter.apply_preset(&FilterPresets::errors_only());
                self.scroll = 0;
            }
            Action::WarningsAndAbove => {
                self.filter.apply_preset(&FilterPresets::warnings_and_above());
                self.scroll = 0;
            }
            Action::ClearFacets => {
                self.filter.clear_facets();
                self.scroll = 0;
            }

            // Breadcrumb viewer; the renderer clamps the offset
            Action::ScrollUp(n) => self.scroll = self.scroll.saturating_sub(n),
            Action::ScrollDown(n) => self.scroll = self.scroll.saturating_add(n),
            Action::PageUp => self.scroll = self.scroll.saturating_sub(PAGE_SIZE),
            Action::PageDown => self.scroll = self.scroll.saturating_add(PAGE_SIZE),
            Action::ScrollToTop => self.scroll = 0,
            Action::ScrollToBottom => self.scroll = usize::MAX,
            Action::ToggleRelativeTime => self.relative_time = !self.relative_time,
            Action::ToggleData => self.show_data = !self.show_data,

            // Repository list
            Action::ListUp => self.list_up(),
            Action::ListDown => self.list_down(),
            Action::EditSelected => {
                if self.ensure_can_modify() {
                    let repository = self.selected_repository()?;
                    if repository.kind() == RepoKind::Unsupported {
                        let msg = format!("{} can't be edited here", repository.source.details());
                        self.show_error(msg);
                        return None;
                    }
                    let id = repository.id.clone();
                    return Some(RepoCommand::Edit(id));
                }
            }
            Action::DeleteSelected => {
                if self.ensure_can_modify() {
                    self.confirm_delete = self.selected_repository().map(|r| r.id.clone());
                }
            }
            Action::ConfirmDelete => {
                let id = self.confirm_delete.take()?;
                self.persist_started();
                return Some(RepoCommand::Delete(id));
            }
            Action::CancelDelete => self.confirm_delete = None,
            Action::RefreshRepositories => {
                self.loading = true;
                return Some(RepoCommand::Reload);
            }

            // Add menu
            Action::OpenAddMenu => self.open_add_menu(),
            Action::MenuUp => self.menu_move(false),
            Action::MenuDown => self.menu_move(true),
            Action::MenuInput(c) => {
                if let Some(menu) = &mut self.menu {
                    menu.query.push(c);
                    menu.selected = 0;
                }
            }
            Action::MenuBackspace => {
                if let Some(menu) = &mut self.menu {
                    menu.query.pop();
                    menu.selected = 0;
                }
            }
            Action::MenuSelect => self.menu_select(),
            Action::MenuClose => self.menu = None,

            // Dialog
            Action::DialogNextField => {
                if let Some(dialog) = &mut self.dialog {
                    dialog.next_field();
                }
            }
            Action::DialogInput(c) => {
                if let Some(dialog) = &mut self.dialog {
                    dialog.input(c);
                }
            }
            Action::DialogBackspace => {
                if let Some(dialog) = &mut self.dialog {
                    dialog.backspace();
                }
            }
            Action::DialogSave => return self.dialog_save(),
            Action::DialogClose => {
                let dialog = self.dialog.take()?;
                if dialog.mode == DialogMode::Edit {
                    return Some(RepoCommand::CloseDialog);
                }
            }

            Action::Notify(notification) => self.push_toast(notification),
            Action::DismissToast => {
                self.toasts.pop_front();
            }
            Action::ShowError(msg) => self.show_error(msg),
            Action::DismissError => self.dismiss_error(),

            Action::Tick => {
                if self.expire_toasts(Instant::now()) {
                    self.render_dirty = true;
                }
            }
            Action::Render => {}
        }

        None
    }

    /// Which keybindings apply right now, innermost overlay first
    pub fn key_context(&self) -> KeyContext {
        if self.dialog.is_some() {
            KeyContext::Dialog
        } else if self.confirm_delete.is_some() {
            KeyContext::ConfirmDelete
        } else if self.menu.is_some() {
            KeyContext::AddMenu
        } else if self.search_active {
            KeyContext::SearchInput
        } else {
            match self.current_screen {
                Screen::Breadcrumbs => KeyContext::Breadcrumbs,
                Screen::Repositories => KeyContext::Repositories,
            }
        }
    }

    /// Insert pasted text into whichever field has focus
    pub fn paste(&mut self, text: &str) {
        let text: String = text.chars().filter(|c| !c.is_control()).collect();
        match self.key_context() {
            KeyContext::SearchInput => {
                let term = format!("{}{}", self.filter.search_term(), text);
                self.filter.set_search_term(&term);
                self.scroll = 0;
            }
            KeyContext::AddMenu => {
                if let Some(menu) = &mut self.menu {
                    menu.query.push_str(&text);
                    menu.selected = 0;
                }
            }
            KeyContext::Dialog => {
                if let Some(dialog) = &mut self.dialog {
                    text.chars().for_each(|c| dialog.input(c));
                }
            }
            _ => return,
        }
        self.render_dirty = true;
    }

    /// Navigate to a screen, closing transient overlays
    pub fn navigate_to(&mut self, screen: Screen) {
        self.current_screen = screen;
        self.search_active = false;
        self.menu = None;
        self.confirm_delete = None;
        if screen == Screen::Repositories && self.repo_list.selected().is_none() {
            self.select_first();
        }
    }

    fn go_back(&mut self) {
        match self.current_screen {
            Screen::Repositories => self.navigate_to(Screen::Breadcrumbs),
            Screen::Breadcrumbs => {
                self.filter.clear();
                self.filter.clear_facets();
                self.scroll = 0;
            }
        }
    }

    /// Number of breadcrumbs passing the filter
    pub fn visible_count(&mut self) -> usize {
        self.filter.visible_indices(&self.store).len()
    }

    // ------------------------------------------------------------------
    // Repository list
    // ------------------------------------------------------------------

    pub fn selected_repository(&self) -> Option<&CustomRepo> {
        self.repo_list
            .selected()
            .and_then(|i| self.repositories.get(i))
    }

    /// Replace the list after a load or save, keeping the selection in range
    pub fn set_repositories(&mut self, repositories: Vec<CustomRepo>) {
        self.repositories = repositories;
        self.loading = false;
        self.render_dirty = true;

        match self.repo_list.selected() {
            _ if self.repositories.is_empty() => self.repo_list.select(None),
            Some(i) if i >= self.repositories.len() => {
                self.repo_list.select(Some(self.repositories.len() - 1))
            }
            None => self.select_first(),
            Some(_) => {}
        }
    }

    fn select_first(&mut self) {
        if !self.repositories.is_empty() {
            self.repo_list.select(Some(0));
        }
    }

    /// Move selection up
    pub fn list_up(&mut self) {
        let len = self.repositories.len();
        if len == 0 {
            return;
        }

        let i = match self.repo_list.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.repo_list.select(Some(i));
    }

    /// Move selection down
    pub fn list_down(&mut self) {
        let len = self.repositories.len();
        if len == 0 {
            return;
        }

        let i = match self.repo_list.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.repo_list.select(Some(i));
    }

    fn ensure_can_modify(&mut self) -> bool {
        if self.access.can_add(self.loading) {
            return true;
        }
        let reason = self
            .access
            .add_disabled_reason()
            .unwrap_or("Repositories are still loading.");
        self.show_error(reason.to_string());
        false
    }

    // ------------------------------------------------------------------
    // Add menu
    // ------------------------------------------------------------------

    fn open_add_menu(&mut self) {
        if self.ensure_can_modify() {
            self.menu = Some(MenuState::default());
            SearchEvent::new(SearchEventKey::CommandPaletteOpen).track();
        }
    }

    /// Menu entries matching the current query
    pub fn menu_items(&self) -> Vec<MenuItem> {
        let query = self.menu.as_ref().map(|m| m.query.as_str()).unwrap_or("");
        add_repository_items(&self.repositories, &self.access)
            .into_iter()
            .filter(|item| item.matches(query))
            .collect()
    }

    fn menu_move(&mut self, down: bool) {
        let len = self.menu_items().len();
        let Some(menu) = &mut self.menu else {
            return;
        };
        if len == 0 {
            menu.selected = 0;
        } else if down {
            menu.selected = (menu.selected + 1) % len;
        } else {
            menu.selected = (menu.selected + len - 1) % len;
        }
    }

    fn menu_select(&mut self) {
        let items = self.menu_items();
        let Some(menu) = &self.menu else {
            return;
        };
        let Some(item) = items.get(menu.selected) else {
            return;
        };
        if item.disabled {
            self.show_error(format!(
                "Only one {} repository is allowed in this project.",
                item.label
            ));
            return;
        }

        SearchEvent::palette_selected(item.kind.as_str(), "add_repository", &menu.query).track();
        self.dialog = Some(DialogState::for_add(draft_repository(item.kind, "")));
        self.menu = None;
    }

    // ------------------------------------------------------------------
    // Dialog
    // ------------------------------------------------------------------

    /// Open the edit dialog the location query resolved to
    pub fn sync_edit_dialog(&mut self, dialog: Option<EditDialog>) {
        if self.dialog.is_some() {
            return;
        }
        if let Some(dialog) = dialog {
            self.dialog = Some(DialogState::for_edit(dialog));
            self.render_dirty = true;
        }
    }

    /// Whether the location asks for an edit dialog
    pub fn wants_edit_dialog(&self) -> bool {
        self.location.get(CUSTOM_REPOSITORY_PARAM).is_some()
    }

    fn dialog_save(&mut self) -> Option<RepoCommand> {
        let dialog = self.dialog.as_mut()?;
        let repository = match dialog.build() {
            Ok(repository) => repository,
            Err(msg) => {
                dialog.error = Some(msg);
                return None;
            }
        };

        let command = match dialog.mode {
            DialogMode::Add => RepoCommand::Add(repository),
            DialogMode::Edit => RepoCommand::Update(repository),
        };
        self.dialog = None;
        self.persist_started();
        Some(command)
    }

    // ------------------------------------------------------------------
    // Saves and notifications
    // ------------------------------------------------------------------

    pub fn persist_started(&mut self) {
        self.pending_saves += 1;
        self.control = ControlState::Saving;
    }

    pub fn persist_finished(&mut self, result: Result<(), String>) {
        self.pending_saves = self.pending_saves.saturating_sub(1);
        self.control = match result {
            Err(msg) => ControlState::Error(msg),
            Ok(()) if self.pending_saves > 0 => ControlState::Saving,
            Ok(()) => ControlState::Saved,
        };
        self.render_dirty = true;
    }

    pub fn pending_saves(&self) -> usize {
        self.pending_saves
    }

    pub fn push_toast(&mut self, notification: Notification) {
        self.toasts.push_back(Toast {
            notification,
            shown_at: Instant::now(),
        });
        self.render_dirty = true;
    }

    /// Drop toasts older than their lifetime; true if any went away
    pub fn expire_toasts(&mut self, now: Instant) -> bool {
        let before = self.toasts.len();
        self.toasts
            .retain(|t| now.saturating_duration_since(t.shown_at) < TOAST_TTL);
        self.toasts.len() != before
    }

    /// Show an error message
    pub fn show_error(&mut self, msg: String) {
        self.error_message = Some(msg);
    }

    /// Dismiss the error message
    pub fn dismiss_error(&mut self) {
        self.error_message = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crumbscope_repos::{FEATURE_CUSTOM_SYMBOL_SOURCES, SCOPE_PROJECT_WRITE};
    use crumbscope_types::{Breadcrumb, BreadcrumbLevel, RepoSource};

    fn full_access() -> Access {
        Access::new([FEATURE_CUSTOM_SYMBOL_SOURCES], [SCOPE_PROJECT_WRITE])
    }

    fn state() -> AppState {
        let store = BreadcrumbStore::new(vec![
            Breadcrumb::new("sup", BreadcrumbLevel::Info),
            Breadcrumb::new("hey", BreadcrumbLevel::Warning),
            Breadcrumb::new("sup again", BreadcrumbLevel::Error),
        ]);
        let mut state = AppState::new(store, EventSnapshot::default(), full_access());
        state.set_repositories(vec![
            CustomRepo::new("a", "Symbols", RepoSource::empty(RepoKind::Http)),
            CustomRepo::new("b", "Bucket", RepoSource::empty(RepoKind::S3)),
        ]);
        state
    }

    #[test]
    fn test_typing_filters_live() {
        let mut state = state();
        state.update(Action::OpenSearch);
        for c in "sup".chars() {
            state.update(Action::SearchInput(c));
        }
        assert_eq!(state.visible_count(), 2);

        state.update(Action::ApplySearch);
        assert!(!state.search_active);
        assert_eq!(state.filter.search_term(), "sup");

        state.update(Action::CloseSearch);
        assert_eq!(state.visible_count(), 3);
    }

    #[test]
    fn test_level_facet() {
        let mut state = state();
        state.update(Action::ToggleLevel(BreadcrumbLevel::Warning));
        assert_eq!(state.visible_count(), 1);
        state.update(Action::ClearFacets);
        assert_eq!(state.visible_count(), 3);
    }

    #[test]
    fn test_presets_and_kind_facet() {
        let mut state = state();
        state.update(Action::ErrorsOnly);
        assert_eq!(state.visible_count(), 1);
        state.update(Action::WarningsAndAbove);
        assert_eq!(state.visible_count(), 2);

        state.update(Action::ClearFacets);
        state.update(Action::CycleKind);
        assert_eq!(state.visible_count(), 3);
        state.update(Action::CycleKind);
        assert_eq!(state.visible_count(), 0);
    }

    #[test]
    fn test_list_wraps() {
        let mut state = state();
        assert_eq!(state.repo_list.selected(), Some(0));
        state.update(Action::ListUp);
        assert_eq!(state.repo_list.selected(), Some(1));
        state.update(Action::ListDown);
        assert_eq!(state.repo_list.selected(), Some(0));
    }

    #[test]
    fn test_delete_needs_confirmation() {
        let mut state = state();
        assert_eq!(state.update(Action::DeleteSelected), None);
        assert_eq!(state.confirm_delete.as_deref(), Some("a"));

        let command = state.update(Action::ConfirmDelete);
        assert_eq!(command, Some(RepoCommand::Delete("a".to_string())));
        assert_eq!(state.control, ControlState::Saving);

        state.persist_finished(Ok(()));
        assert_eq!(state.control, ControlState::Saved);
    }

    #[test]
    fn test_read_only_access_blocks_changes() {
        let mut state = state();
        state.access = Access::new([FEATURE_CUSTOM_SYMBOL_SOURCES], Vec::<String>::new());

        assert_eq!(state.update(Action::EditSelected), None);
        state.update(Action::OpenAddMenu);
        assert!(state.menu.is_none());
        assert_eq!(
            state.error_message.as_deref(),
            Some("You do not have permission to add custom repositories.")
        );
    }

    #[test]
    fn test_add_flow() {
        let mut state = state();
        state.update(Action::OpenAddMenu);
        for c in "gcs".chars() {
            state.update(Action::MenuInput(c));
        }
        assert_eq!(state.menu_items().len(), 1);
        state.update(Action::MenuSelect);

        let dialog = state.dialog.as_ref().unwrap();
        assert_eq!(dialog.kind(), RepoKind::Gcs);
        assert_eq!(dialog.mode, DialogMode::Add);

        // Empty form is rejected
        assert_eq!(state.update(Action::DialogSave), None);
        assert_eq!(
            state.dialog.as_ref().unwrap().error.as_deref(),
            Some("Name is required")
        );

        for c in "Builds".chars() {
            state.update(Action::DialogInput(c));
        }
        state.update(Action::DialogNextField);
        for c in "my-bucket".chars() {
            state.update(Action::DialogInput(c));
        }

        match state.update(Action::DialogSave) {
            Some(RepoCommand::Add(repo)) => {
                assert_eq!(repo.name, "Builds");
                assert_eq!(repo.source.locator(), "my-bucket");
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(state.dialog.is_none());
    }

    #[test]
    fn test_edit_dialog_from_location() {
        let mut state = state();
        assert_eq!(
            state.update(Action::EditSelected),
            Some(RepoCommand::Edit("a".to_string()))
        );

        state.sync_edit_dialog(Some(EditDialog {
            index: 0,
            repository: state.repositories[0].clone(),
        }));
        let dialog = state.dialog.as_ref().unwrap();
        assert_eq!(dialog.mode, DialogMode::Edit);
        assert_eq!(dialog.name, "Symbols");

        assert_eq!(state.update(Action::DialogClose), Some(RepoCommand::CloseDialog));
        assert!(state.dialog.is_none());
    }

    #[test]
    fn test_edit_save_targets_id() {
        let mut state = state();
        state.sync_edit_dialog(Some(EditDialog {
            index: 1,
            repository: state.repositories[1].clone(),
        }));
        state.update(Action::DialogInput('2'));
        state.update(Action::DialogNextField);
        for c in "syms".chars() {
            state.update(Action::DialogInput(c));
        }

        match state.update(Action::DialogSave) {
            Some(RepoCommand::Update(repo)) => {
                assert_eq!(repo.id, "b");
                assert_eq!(repo.name, "Bucket2");
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert_eq!(state.pending_saves(), 1);
    }

    #[test]
    fn test_unsupported_repository_is_not_editable() {
        let mut state = state();
        state.set_repositories(vec![CustomRepo::new(
            "s",
            "Legacy",
            RepoSource::Unsupported {
                kind: "sftp".to_string(),
            },
        )]);
        assert_eq!(state.update(Action::EditSelected), None);
        assert!(state.error_message.is_some());
    }

    #[test]
    fn test_key_context_prefers_overlays() {
        let mut state = state();
        assert_eq!(state.key_context(), KeyContext::Breadcrumbs);
        state.update(Action::OpenSearch);
        assert_eq!(state.key_context(), KeyContext::SearchInput);

        state.update(Action::Navigate(Screen::Repositories));
        assert_eq!(state.key_context(), KeyContext::Repositories);
        state.update(Action::OpenAddMenu);
        assert_eq!(state.key_context(), KeyContext::AddMenu);
        state.update(Action::MenuSelect);
        assert_eq!(state.key_context(), KeyContext::Dialog);
    }

    #[test]
    fn test_paste_into_search() {
        let mut state = state();
        state.update(Action::OpenSearch);
        state.paste("su\np");
        assert_eq!(state.filter.search_term(), "sup");
        assert_eq!(state.visible_count(), 2);
    }

    #[test]
    fn test_overlapping_saves() {
        let mut state = state();
        state.persist_started();
        state.persist_started();

        state.persist_finished(Ok(()));
        assert_eq!(state.control, ControlState::Saving);
        state.persist_finished(Err("boom".to_string()));
        assert_eq!(state.control, ControlState::Error("boom".to_string()));
        assert_eq!(state.pending_saves(), 0);
    }

    #[test]
    fn test_toasts_expire() {
        let mut state = state();
        state.push_toast(Notification::Success("saved".to_string()));
        assert!(!state.expire_toasts(Instant::now()));
        assert!(state.expire_toasts(Instant::now() + TOAST_TTL));
        assert!(state.toasts.is_empty());
    }

    #[test]
    fn test_selection_clamped_after_shrink() {
        let mut state = state();
        state.update(Action::ListDown);
        state.set_repositories(vec![CustomRepo::new(
            "a",
            "Symbols",
            RepoSource::empty(RepoKind::Http),
        )]);
        assert_eq!(state.repo_list.selected(), Some(0));

        state.set_repositories(Vec::new());
        assert_eq!(state.repo_list.selected(), None);
    }
}
