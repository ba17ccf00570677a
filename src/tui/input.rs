//! Input handling and keybindings.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Result of handling a key event.
#[derive(Debug, PartialEq, Eq)]
pub enum KeyAction {
    /// No action, keep waiting.
    None,
    /// Quit the application.
    Quit,
    /// Ctrl-C typed into the raw-mode terminal.
    Interrupt,
}

/// Maps a key event to an action.
pub fn handle_key(key: KeyEvent) -> KeyAction {
    // Release and repeat events are reported on some platforms; act on presses only.
    if key.kind != KeyEventKind::Press {
        return KeyAction::None;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            KeyAction::Interrupt
        }
        KeyCode::Char('q') | KeyCode::Char('Q') => KeyAction::Quit,
        _ => KeyAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn q_quits_in_both_cases() {
        assert_eq!(handle_key(key(KeyCode::Char('q'))), KeyAction::Quit);
        assert_eq!(handle_key(key(KeyCode::Char('Q'))), KeyAction::Quit);
    }

    #[test]
    fn ctrl_c_interrupts() {
        let mut event = key(KeyCode::Char('c'));
        event.modifiers = KeyModifiers::CONTROL;
        assert_eq!(handle_key(event), KeyAction::Interrupt);
    }

    #[test]
    fn other_keys_are_ignored() {
        for code in [
            KeyCode::Char('c'),
            KeyCode::Char('x'),
            KeyCode::Esc,
            KeyCode::Enter,
            KeyCode::Up,
        ] {
            assert_eq!(handle_key(key(code)), KeyAction::None, "{:?}", code);
        }
    }

    #[test]
    fn release_events_are_ignored() {
        let mut event = key(KeyCode::Char('q'));
        event.kind = KeyEventKind::Release;
        assert_eq!(handle_key(event), KeyAction::None);
    }
}
