//! Keyboard input handling
//!
//! Crossterm key events become [`UiEvent`]s. Printable keys go through the
//! same key-name tables the browser uses, so both frontends agree on the
//! keyboard layout.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::app::WidgetKind;
use crate::keypad::{key_to_action, KeyAction};
use crate::prank::PrankKey;

/// What a key press asks of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    /// Scientific calculator key
    Key(KeyAction),
    /// Prank calculator key
    Prank(PrankKey),
    /// Switch between the two widgets
    SwitchWidget,
    /// Show or hide the help panel
    ToggleHelp,
    /// Quit the application
    Quit,
    /// Ignored input
    None,
}

/// Maps key events to UI events
#[derive(Debug, Default)]
pub struct InputHandler;

impl InputHandler {
    /// Creates a new input handler
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Maps a key event for the active widget
    #[must_use]
    pub fn handle_key(&self, event: KeyEvent, widget: WidgetKind) -> UiEvent {
        let KeyEvent {
            code,
            modifiers,
            kind,
            ..
        } = event;

        if kind == KeyEventKind::Release {
            return UiEvent::None;
        }

        if modifiers.contains(KeyModifiers::CONTROL) {
            return match code {
                KeyCode::Char('c' | 'q') => UiEvent::Quit,
                _ => UiEvent::None,
            };
        }

        match code {
            KeyCode::Tab => return UiEvent::SwitchWidget,
            KeyCode::Char('?') => return UiEvent::ToggleHelp,
            _ => {}
        }

        match widget {
            WidgetKind::Scientific => Self::scientific_key(code),
            WidgetKind::Prank => key_name(code)
                .and_then(|name| PrankKey::from_key(&name))
                .map_or(UiEvent::None, UiEvent::Prank),
        }
    }

    fn scientific_key(code: KeyCode) -> UiEvent {
        let action = match code {
            KeyCode::F(1) => Some(KeyAction::Shift),
            KeyCode::F(2) => Some(KeyAction::Alpha),
            KeyCode::F(3) => Some(KeyAction::Angle),
            KeyCode::F(4) => Some(KeyAction::Mode),
            KeyCode::Up => Some(KeyAction::Replay),
            KeyCode::Char('a') => Some(KeyAction::Answer),
            KeyCode::Char('m') => Some(KeyAction::MemoryAdd),
            _ => key_name(code).and_then(|name| key_to_action(&name)),
        };
        action.map_or(UiEvent::None, UiEvent::Key)
    }
}

/// Browser-style key name for a crossterm key code
#[must_use]
pub fn key_name(code: KeyCode) -> Option<String> {
    let name = match code {
        KeyCode::Char(c) => return Some(c.to_string()),
        KeyCode::Enter => "Enter",
        KeyCode::Esc => "Escape",
        KeyCode::Backspace => "Backspace",
        KeyCode::Delete => "Delete",
        _ => return None,
    };
    Some(name.to_string())
}
