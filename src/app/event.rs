// Input event handling
//
// Keyboard, mouse and focus events from crossterm, translated into
// AppState operations.

use std::time::Instant;

use super::AppState;
use crate::theme::ThemePreference;
use crossterm::event::{Event, KeyCode, KeyEventKind, MouseEvent, MouseEventKind};

/// Dispatch one terminal event
///
/// Resize needs no handling here: the next draw records the new field
/// area and `AppState::sync_viewport` picks it up.
///
/// # Returns
/// `false` once the application should exit
pub fn handle_event(app: &mut AppState, event: Event, now: Instant) -> bool {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key_event(app, key.code),
        Event::Mouse(mouse) => {
            handle_mouse_event(app, mouse, now);
            true
        }
        Event::FocusLost => {
            app.animator.on_pointer_leave();
            true
        }
        _ => app.running,
    }
}

/// Handle keyboard events and update application state
///
/// Returns `true` if the application should continue running,
/// `false` if it should exit.
///
/// # Key Bindings
/// - `q`, `Q`, `Esc` - Quit the application
/// - `t`, `T` - Toggle light/dark
/// - `l`, `L` - Always light
/// - `d`, `D` - Always dark
/// - `s`, `S` - Follow the OS color scheme
/// - `Space` - Pause/resume particle motion
pub fn handle_key_event(app: &mut AppState, key: KeyCode) -> bool {
    match key {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
            app.running = false;
            false
        }
        KeyCode::Char('t') | KeyCode::Char('T') => {
            app.toggle_theme();
            true
        }
        KeyCode::Char('l') | KeyCode::Char('L') => {
            app.set_theme(ThemePreference::Light);
            true
        }
        KeyCode::Char('d') | KeyCode::Char('D') => {
            app.set_theme(ThemePreference::Dark);
            true
        }
        KeyCode::Char('s') | KeyCode::Char('S') => {
            app.set_theme(ThemePreference::System);
            true
        }
        KeyCode::Char(' ') => {
            app.toggle_pause();
            true
        }
        _ => true,
    }
}

/// Feed pointer motion to the animator
pub fn handle_mouse_event(app: &mut AppState, mouse: MouseEvent, now: Instant) {
    match mouse.kind {
        MouseEventKind::Moved | MouseEventKind::Drag(_) => {
            app.on_mouse_move(mouse.column, mouse.row, now);
        }
        _ => {}
    }
}
