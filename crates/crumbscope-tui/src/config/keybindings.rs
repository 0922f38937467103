use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

use crumbscope_types::BreadcrumbLevel;

use crate::app::Action;

/// A key combination
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::CONTROL,
        }
    }

    pub fn shift(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::SHIFT,
        }
    }

    pub fn from_event(event: &KeyEvent) -> Self {
        Self {
            code: event.code,
            modifiers: event.modifiers,
        }
    }
}

/// Context for keybindings
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyContext {
    Global,
    Breadcrumbs,
    SearchInput,
    Repositories,
    AddMenu,
    Dialog,
    ConfirmDelete,
}

impl KeyContext {
    /// Contexts that turn plain characters into text input
    fn takes_text(&self) -> bool {
        matches!(self, Self::SearchInput | Self::AddMenu | Self::Dialog)
    }
}

/// Keybinding configuration
pub struct KeyBindings {
    bindings: HashMap<KeyContext, HashMap<KeyBinding, Action>>,
}

impl KeyBindings {
    pub fn new() -> Self {
        let mut bindings = HashMap::new();

        // Global bindings
        let mut global = HashMap::new();
        global.insert(KeyBinding::new(KeyCode::Char('?')), Action::ToggleHelp);
        global.insert(KeyBinding::new(KeyCode::Tab), Action::NextScreen);
        global.insert(KeyBinding::new(KeyCode::Esc), Action::GoBack);
        global.insert(KeyBinding::ctrl(KeyCode::Char('c')), Action::Quit);
        global.insert(KeyBinding::new(KeyCode::Char('q')), Action::Quit);
        global.insert(KeyBinding::new(KeyCode::Char('x')), Action::DismissToast);
        bindings.insert(KeyContext::Global, global);

        // Breadcrumb viewer - less-like navigation
        let mut crumbs = HashMap::new();
        crumbs.insert(KeyBinding::new(KeyCode::Char('j')), Action::ScrollDown(1));
        crumbs.insert(KeyBinding::new(KeyCode::Down), Action::ScrollDown(1));
        crumbs.insert(KeyBinding::new(KeyCode::Char('k')), Action::ScrollUp(1));
        crumbs.insert(KeyBinding::new(KeyCode::Up), Action::ScrollUp(1));
        crumbs.insert(KeyBinding::ctrl(KeyCode::Char('f')), Action::PageDown);
        crumbs.insert(KeyBinding::ctrl(KeyCode::Char('b')), Action::PageUp);
        crumbs.insert(KeyBinding::ctrl(KeyCode::Char('d')), Action::PageDown);
        crumbs.insert(KeyBinding::ctrl(KeyCode::Char('u')), Action::PageUp);
        crumbs.insert(KeyBinding::new(KeyCode::PageDown), Action::PageDown);
        crumbs.insert(KeyBinding::new(KeyCode::PageUp), Action::PageUp);
        crumbs.insert(KeyBinding::new(KeyCode::Char('g')), Action::ScrollToTop);
        crumbs.insert(KeyBinding::shift(KeyCode::Char('G')), Action::ScrollToBottom);
        crumbs.insert(KeyBinding::new(KeyCode::Home), Action::ScrollToTop);
        crumbs.insert(KeyBinding::new(KeyCode::End), Action::ScrollToBottom);
        crumbs.insert(KeyBinding::new(KeyCode::Char('/')), Action::OpenSearch);
        crumbs.insert(KeyBinding::new(KeyCode::Char('n')), Action::ClearFilter);
        crumbs.insert(KeyBinding::new(KeyCode::Char('t')), Action::ToggleRelativeTime);
        crumbs.insert(KeyBinding::new(KeyCode::Char('d')), Action::ToggleData);
        crumbs.insert(KeyBinding::new(KeyCode::Char('0')), Action::ClearFacets);
        crumbs.insert(KeyBinding::new(KeyCode::Char('c')), Action::CycleKind);
        crumbs.insert(KeyBinding::new(KeyCode::Char('e')), Action::ErrorsOnly);
        crumbs.insert(KeyBinding::new(KeyCode::Char('w')), Action::WarningsAndAbove);
        for (key, level) in [
            ('1', BreadcrumbLevel::Fatal),
            ('2', BreadcrumbLevel::Error),
            ('3', BreadcrumbLevel::Warning),
            ('4', BreadcrumbLevel::Info),
            ('5', BreadcrumbLevel::Debug),
        ] {
            crumbs.insert(KeyBinding::new(KeyCode::Char(key)), Action::ToggleLevel(level));
        }
        bindings.insert(KeyContext::Breadcrumbs, crumbs);

        // Search input bindings (when search bar is active)
        let mut search = HashMap::new();
        search.insert(KeyBinding::new(KeyCode::Enter), Action::ApplySearch);
        search.insert(KeyBinding::new(KeyCode::Esc), Action::CloseSearch);
        search.insert(KeyBinding::new(KeyCode::Backspace), Action::SearchBackspace);
        search.insert(KeyBinding::ctrl(KeyCode::Char('u')), Action::SearchClear);
        search.insert(KeyBinding::ctrl(KeyCode::Char('c')), Action::CloseSearch);
        bindings.insert(KeyContext::SearchInput, search);

        // Repository list bindings
        let mut repos = HashMap::new();
        repos.insert(KeyBinding::new(KeyCode::Char('j')), Action::ListDown);
        repos.insert(KeyBinding::new(KeyCode::Down), Action::ListDown);
        repos.insert(KeyBinding::new(KeyCode::Char('k')), Action::ListUp);
        repos.insert(KeyBinding::new(KeyCode::Up), Action::ListUp);
        repos.insert(KeyBinding::new(KeyCode::Enter), Action::EditSelected);
        repos.insert(KeyBinding::new(KeyCode::Char('e')), Action::EditSelected);
        repos.insert(KeyBinding::new(KeyCode::Char('a')), Action::OpenAddMenu);
        repos.insert(KeyBinding::new(KeyCode::Char('d')), Action::DeleteSelected);
        repos.insert(KeyBinding::new(KeyCode::Delete), Action::DeleteSelected);
        repos.insert(KeyBinding::new(KeyCode::Char('r')), Action::RefreshRepositories);
        bindings.insert(KeyContext::Repositories, repos);

        // Add menu bindings
        let mut menu = HashMap::new();
        menu.insert(KeyBinding::new(KeyCode::Up), Action::MenuUp);
        menu.insert(KeyBinding::new(KeyCode::Down), Action::MenuDown);
        menu.insert(KeyBinding::ctrl(KeyCode::Char('p')), Action::MenuUp);
        menu.insert(KeyBinding::ctrl(KeyCode::Char('n')), Action::MenuDown);
        menu.insert(KeyBinding::new(KeyCode::Enter), Action::MenuSelect);
        menu.insert(KeyBinding::new(KeyCode::Esc), Action::MenuClose);
        menu.insert(KeyBinding::new(KeyCode::Backspace), Action::MenuBackspace);
        menu.insert(KeyBinding::ctrl(KeyCode::Char('c')), Action::MenuClose);
        bindings.insert(KeyContext::AddMenu, menu);

        // Repository dialog bindings
        let mut dialog = HashMap::new();
        dialog.insert(KeyBinding::new(KeyCode::Tab), Action::DialogNextField);
        dialog.insert(KeyBinding::shift(KeyCode::BackTab), Action::DialogNextField);
        dialog.insert(KeyBinding::new(KeyCode::Enter), Action::DialogSave);
        dialog.insert(KeyBinding::ctrl(KeyCode::Char('s')), Action::DialogSave);
        dialog.insert(KeyBinding::new(KeyCode::Esc), Action::DialogClose);
        dialog.insert(KeyBinding::new(KeyCode::Backspace), Action::DialogBackspace);
        bindings.insert(KeyContext::Dialog, dialog);

        // Delete confirmation
        let mut confirm = HashMap::new();
        confirm.insert(KeyBinding::new(KeyCode::Char('y')), Action::ConfirmDelete);
        confirm.insert(KeyBinding::new(KeyCode::Enter), Action::ConfirmDelete);
        confirm.insert(KeyBinding::new(KeyCode::Char('n')), Action::CancelDelete);
        confirm.insert(KeyBinding::new(KeyCode::Esc), Action::CancelDelete);
        bindings.insert(KeyContext::ConfirmDelete, confirm);

        Self { bindings }
    }

    /// Look up action for key event in given context
    pub fn get_action(&self, context: KeyContext, key: &KeyEvent) -> Option<Action> {
        let binding = KeyBinding::from_event(key);

        // First check context-specific bindings
        if let Some(action) = self
            .bindings
            .get(&context)
            .and_then(|bindings| bindings.get(&binding))
        {
            return Some(action.clone());
        }

        // Text contexts swallow plain characters instead of falling back
        if context.takes_text() {
            return Self::text_action(context, key);
        }

        // Fall back to global bindings
        self.bindings
            .get(&KeyContext::Global)?
            .get(&binding)
            .cloned()
    }

    /// Regular character input for the text-taking contexts
    fn text_action(context: KeyContext, key: &KeyEvent) -> Option<Action> {
        let KeyCode::Char(c) = key.code else {
            return None;
        };
        if !(key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT) {
            return None;
        }

        match context {
            KeyContext::SearchInput => Some(Action::SearchInput(c)),
            KeyContext::AddMenu => Some(Action::MenuInput(c)),
            KeyContext::Dialog => Some(Action::DialogInput(c)),
            _ => None,
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_context_binding_wins() {
        let bindings = KeyBindings::new();
        assert!(matches!(
            bindings.get_action(KeyContext::Repositories, &key(KeyCode::Char('d'))),
            Some(Action::DeleteSelected)
        ));
        assert!(matches!(
            bindings.get_action(KeyContext::Breadcrumbs, &key(KeyCode::Char('d'))),
            Some(Action::ToggleData)
        ));
    }

    #[test]
    fn test_global_fallback() {
        let bindings = KeyBindings::new();
        assert!(matches!(
            bindings.get_action(KeyContext::Breadcrumbs, &key(KeyCode::Char('q'))),
            Some(Action::Quit)
        ));
    }

    #[test]
    fn test_text_contexts_take_characters() {
        let bindings = KeyBindings::new();
        assert!(matches!(
            bindings.get_action(KeyContext::SearchInput, &key(KeyCode::Char('q'))),
            Some(Action::SearchInput('q'))
        ));
        assert!(matches!(
            bindings.get_action(KeyContext::Dialog, &key(KeyCode::Char('?'))),
            Some(Action::DialogInput('?'))
        ));
        assert!(matches!(
            bindings.get_action(
                KeyContext::AddMenu,
                &KeyEvent::new(KeyCode::Char('S'), KeyModifiers::SHIFT)
            ),
            Some(Action::MenuInput('S'))
        ));
        assert!(bindings.get_action(KeyContext::Dialog, &key(KeyCode::F(1))).is_none());
    }

    #[test]
    fn test_level_keys() {
        let bindings = KeyBindings::new();
        assert!(matches!(
            bindings.get_action(KeyContext::Breadcrumbs, &key(KeyCode::Char('3'))),
            Some(Action::ToggleLevel(BreadcrumbLevel::Warning))
        ));
        assert!(matches!(
            bindings.get_action(KeyContext::Breadcrumbs, &key(KeyCode::Char('c'))),
            Some(Action::CycleKind)
        ));
        assert!(matches!(
            bindings.get_action(KeyContext::Breadcrumbs, &key(KeyCode::Char('e'))),
            Some(Action::ErrorsOnly)
        ));
        assert!(matches!(
            bindings.get_action(KeyContext::Repositories, &key(KeyCode::Char('e'))),
            Some(Action::EditSelected)
        ));
    }
}
