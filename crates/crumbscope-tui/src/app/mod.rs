mod action;
mod state;

pub use action::{Action, RepoCommand};
pub use state::{
    AppState, ControlState, DialogField, DialogMode, DialogState, MenuState, Screen, Toast,
};
