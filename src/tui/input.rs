use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Represents the result of handling a key event while browsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Quit the application
    Quit,
    /// Move to next document
    Next,
    /// Move to previous document
    Previous,
    /// Start typing a search query
    Search,
    /// Start typing a path to import
    Import,
    /// Rebuild the catalog from disk
    Reload,
    /// Open the selected document externally
    Open,
    /// Toggle help overlay
    Help,
    /// No action
    None,
}

/// Result of a key press while a text prompt is active
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextInput {
    Insert(char),
    Backspace,
    Submit,
    Cancel,
    None,
}

/// Maps keyboard events to actions
pub fn handle_key_event(key: KeyEvent) -> KeyAction {
    match (key.code, key.modifiers) {
        // Quit: q, Esc or Ctrl+C
        (KeyCode::Char('q'), KeyModifiers::NONE) => KeyAction::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => KeyAction::Quit,
        (KeyCode::Esc, KeyModifiers::NONE) => KeyAction::Quit,

        // Navigation
        (KeyCode::Down, KeyModifiers::NONE) => KeyAction::Next,
        (KeyCode::Up, KeyModifiers::NONE) => KeyAction::Previous,
        (KeyCode::Char('j'), KeyModifiers::NONE) => KeyAction::Next,
        (KeyCode::Char('k'), KeyModifiers::NONE) => KeyAction::Previous,

        (KeyCode::Char('/'), KeyModifiers::NONE) => KeyAction::Search,
        (KeyCode::Char('f'), KeyModifiers::CONTROL) => KeyAction::Search,
        (KeyCode::Char('a'), KeyModifiers::NONE) => KeyAction::Import,
        (KeyCode::Char('r'), KeyModifiers::NONE) => KeyAction::Reload,

        (KeyCode::Char('o'), KeyModifiers::NONE) => KeyAction::Open,
        (KeyCode::Enter, KeyModifiers::NONE) => KeyAction::Open,

        (KeyCode::Char('?'), _) => KeyAction::Help,

        _ => KeyAction::None,
    }
}

/// Maps keyboard events while typing into a prompt
pub fn handle_text_input(key: KeyEvent) -> TextInput {
    match (key.code, key.modifiers) {
        (KeyCode::Enter, _) => TextInput::Submit,
        (KeyCode::Esc, _) => TextInput::Cancel,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => TextInput::Cancel,
        (KeyCode::Backspace, _) => TextInput::Backspace,
        (KeyCode::Char(c), KeyModifiers::NONE) | (KeyCode::Char(c), KeyModifiers::SHIFT) => {
            TextInput::Insert(c)
        }
        _ => TextInput::None,
    }
}
