use crumbscope_repos::Notification;
use crumbscope_types::{BreadcrumbLevel, CustomRepo};

use crate::app::Screen;

/// All possible actions in the application (command pattern)
#[derive(Clone, Debug)]
pub enum Action {
    // Navigation
    Navigate(Screen),
    NextScreen,
    GoBack,
    Quit,

    // UI toggles
    ToggleHelp,

    // Search in the breadcrumb list
    OpenSearch,
    ApplySearch,
    CloseSearch,
    SearchInput(char),
    SearchBackspace,
    SearchClear,
    ClearFilter,

    // Facets
    ToggleLevel(BreadcrumbLevel),
    CycleKind,
    ErrorsOnly,
    WarningsAndAbove,
    ClearFacets,

    // Breadcrumb viewer
    ScrollUp(usize),
    ScrollDown(usize),
    ScrollToTop,
    ScrollToBottom,
    PageUp,
    PageDown,
    ToggleRelativeTime,
    ToggleData,

    // Repository list
    ListUp,
    ListDown,
    EditSelected,
    DeleteSelected,
    ConfirmDelete,
    CancelDelete,
    RefreshRepositories,

    // Add repository menu
    OpenAddMenu,
    MenuUp,
    MenuDown,
    MenuSelect,
    MenuInput(char),
    MenuBackspace,
    MenuClose,

    // Repository dialog
    DialogNextField,
    DialogInput(char),
    DialogBackspace,
    DialogSave,
    DialogClose,

    // Notifications
    Notify(Notification),
    DismissToast,

    // Error handling
    ShowError(String),
    DismissError,

    // Tick (for periodic updates)
    Tick,

    // Render request
    Render,
}

/// Work the event loop performs against the repository manager
#[derive(Clone, Debug, PartialEq)]
pub enum RepoCommand {
    Add(CustomRepo),
    /// Save an edited repository, matched by its id
    Update(CustomRepo),
    Delete(String),
    /// Open the edit dialog for this id through the location query
    Edit(String),
    CloseDialog,
    Reload,
}
