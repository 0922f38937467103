mod add_menu;
mod confirm;
mod help_overlay;
mod highlight;
mod repo_dialog;
mod status_bar;
mod toast;

pub use add_menu::AddMenu;
pub use confirm::ConfirmPopup;
pub use help_overlay::HelpOverlay;
pub use highlight::{fit_highlighted, highlighted_spans, pad_to_width, truncate_to_width};
pub use repo_dialog::RepoDialog;
pub use status_bar::StatusBar;
pub use toast::Toasts;
