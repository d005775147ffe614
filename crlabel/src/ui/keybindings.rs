//! Keyboard and mouse bindings for crlabel.
//!
//! Input either mutates view state directly (scrolling, cursor, overlay) or is
//! turned into a session [`Event`] that the event loop dispatches, so session
//! state only ever changes through `AppState::dispatch`.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;

use crlabel_core::session::Event;
use crlabel_core::types::Label;

use crate::app::{AppState, Mode};

/// What the event loop should do after an input event.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyAction {
    Continue,
    Quit,
    /// Dispatch this event to the session.
    Session(Event),
}

pub fn handle_key(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match state.mode {
        Mode::HelpOverlay => handle_help(key, state),
        Mode::Normal => handle_normal(key, state),
    }
}

// ---------------------------------------------------------------------------
// Normal mode
// ---------------------------------------------------------------------------

fn handle_normal(key: KeyEvent, state: &mut AppState) -> KeyAction {
    if let Some(action) = handle_scroll_key(key, state) {
        return action;
    }

    match key.code {
        KeyCode::Char(c @ '1'..='6') => match Label::from_hotkey(c) {
            Some(label) => submit(label, state),
            None => KeyAction::Continue,
        },
        KeyCode::Char('h') | KeyCode::Left => {
            state.label_cursor_left();
            KeyAction::Continue
        }
        KeyCode::Char('l') | KeyCode::Right => {
            state.label_cursor_right();
            KeyAction::Continue
        }
        KeyCode::Enter | KeyCode::Char(' ') => submit(state.selected_label(), state),

        KeyCode::Char('[') => { state.prev_change(); KeyAction::Continue }
        KeyCode::Char(']') => { state.next_change(); KeyAction::Continue }
        KeyCode::Char('c') => { state.center_on_anchor(); KeyAction::Continue }

        KeyCode::Char('r') => KeyAction::Session(Event::Retry),

        KeyCode::Char('?') => {
            state.help_scroll = 0;
            state.mode = Mode::HelpOverlay;
            KeyAction::Continue
        }
        KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,
        _ => KeyAction::Continue,
    }
}

/// Moves the cursor onto `label` and asks for it to be submitted. Whether the
/// submission is allowed is the session's call.
fn submit(label: Label, state: &mut AppState) -> KeyAction {
    if let Some(i) = Label::ALL.iter().position(|&l| l == label) {
        state.label_cursor = i;
    }
    KeyAction::Session(Event::LabelClicked(label))
}

/// j / k / g / G and the Ctrl page keys. `None` lets the key fall through.
fn handle_scroll_key(key: KeyEvent, state: &mut AppState) -> Option<KeyAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => state.scroll_down(1),
        KeyCode::Char('k') | KeyCode::Up => state.scroll_up(1),
        KeyCode::Char('g') | KeyCode::Home => state.scroll_top(),
        KeyCode::Char('G') | KeyCode::End => state.scroll_bottom(),
        KeyCode::Char('d') if ctrl => state.half_page_down(),
        KeyCode::Char('u') if ctrl => state.half_page_up(),
        KeyCode::Char('f') if ctrl => state.full_page_down(),
        KeyCode::Char('b') if ctrl => state.full_page_up(),
        KeyCode::PageDown => state.full_page_down(),
        KeyCode::PageUp => state.full_page_up(),
        _ => return None,
    }
    Some(KeyAction::Continue)
}

// ---------------------------------------------------------------------------
// HelpOverlay mode
// ---------------------------------------------------------------------------

fn handle_help(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            state.help_scroll = state.help_scroll.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.help_scroll = state.help_scroll.saturating_sub(1);
        }
        KeyCode::Char('g') => state.help_scroll = 0,
        KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => state.mode = Mode::Normal,
        _ => {}
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// Mouse events
// ---------------------------------------------------------------------------

/// Left click on a label button submits it; the wheel scrolls the diff (or
/// the help overlay while it is open) by 3 lines.
pub fn handle_mouse(mouse: MouseEvent, state: &mut AppState) -> KeyAction {
    let help = state.mode == Mode::HelpOverlay;
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) if !help => {
            let pos = Position { x: mouse.column, y: mouse.row };
            let hit = state
                .label_rects
                .iter()
                .find(|(_, rect)| rect.contains(pos))
                .map(|&(label, _)| label);
            match hit {
                Some(label) => submit(label, state),
                None => KeyAction::Continue,
            }
        }
        MouseEventKind::ScrollUp if help => {
            state.help_scroll = state.help_scroll.saturating_sub(3);
            KeyAction::Continue
        }
        MouseEventKind::ScrollDown if help => {
            state.help_scroll = state.help_scroll.saturating_add(3);
            KeyAction::Continue
        }
        MouseEventKind::ScrollUp => {
            state.scroll_up(3);
            KeyAction::Continue
        }
        MouseEventKind::ScrollDown => {
            state.scroll_down(3);
            KeyAction::Continue
        }
        _ => KeyAction::Continue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crlabel_core::session::SessionConfig;
    use ratatui::layout::Rect;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> AppState {
        AppState::new(SessionConfig::default(), "txt")
    }

    #[test]
    fn digits_submit_their_label() {
        let mut state = app();
        assert_eq!(
            handle_key(key(KeyCode::Char('3')), &mut state),
            KeyAction::Session(Event::LabelClicked(Label::FalsePositive))
        );
        assert_eq!(state.selected_label(), Label::FalsePositive);
        assert_eq!(handle_key(key(KeyCode::Char('7')), &mut state), KeyAction::Continue);
    }

    #[test]
    fn cursor_and_enter_submit_selected() {
        let mut state = app();
        handle_key(key(KeyCode::Char('l')), &mut state);
        handle_key(key(KeyCode::Right), &mut state);
        assert_eq!(
            handle_key(key(KeyCode::Enter), &mut state),
            KeyAction::Session(Event::LabelClicked(Label::FalsePositive))
        );
    }

    #[test]
    fn help_overlay_swallows_quit() {
        let mut state = app();
        handle_key(key(KeyCode::Char('?')), &mut state);
        assert_eq!(state.mode, Mode::HelpOverlay);
        assert_eq!(handle_key(key(KeyCode::Char('q')), &mut state), KeyAction::Continue);
        assert_eq!(state.mode, Mode::Normal);
        assert_eq!(handle_key(key(KeyCode::Char('q')), &mut state), KeyAction::Quit);
    }

    #[test]
    fn r_requests_retry() {
        let mut state = app();
        assert_eq!(handle_key(key(KeyCode::Char('r')), &mut state), KeyAction::Session(Event::Retry));
    }

    #[test]
    fn click_on_button_submits_it() {
        let mut state = app();
        state.label_rects = vec![
            (Label::Discuss, Rect::new(0, 10, 12, 1)),
            (Label::Skip, Rect::new(12, 10, 8, 1)),
        ];
        let click = |column, row| MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(
            handle_mouse(click(14, 10), &mut state),
            KeyAction::Session(Event::LabelClicked(Label::Skip))
        );
        assert_eq!(handle_mouse(click(14, 3), &mut state), KeyAction::Continue);
    }
}
