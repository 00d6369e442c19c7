//! Terminal input mapped to application actions

use crate::{
    error::{AppError, Result},
    types::FocusTarget,
    ui::ScreenLayout,
};
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use std::time::Duration;

/// Something the user asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Dispatch a latency measurement
    Request,
    /// Open the channel page
    OpenChannel,
    /// Press whichever button has focus
    ActivateFocused,
    /// Move focus to the other button
    CycleFocus,
    /// Focus and press a specific button
    Press(FocusTarget),
    ToggleInspector,
    Quit,
}

/// Wait up to `timeout` for the next terminal event
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    let ready = event::poll(timeout).map_err(|e| AppError::terminal(format!("Failed to poll input: {}", e)))?;
    if !ready {
        return Ok(None);
    }
    event::read()
        .map(Some)
        .map_err(|e| AppError::terminal(format!("Failed to read input: {}", e)))
}

pub fn map_key(key: KeyEvent) -> Option<Action> {
    // Windows reports releases too
    if key.kind != KeyEventKind::Press {
        return None;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('r') => Some(Action::Request),
        KeyCode::Char('o') => Some(Action::OpenChannel),
        KeyCode::Char('i') => Some(Action::ToggleInspector),
        KeyCode::Tab | KeyCode::BackTab => Some(Action::CycleFocus),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Action::ActivateFocused),
        _ => None,
    }
}

/// Left clicks on a button press it; everything else is ignored
pub fn map_mouse(mouse: MouseEvent, layout: &ScreenLayout) -> Option<Action> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => layout.hit_test(mouse.column, mouse.row).map(Action::Press),
        _ => None,
    }
}

pub fn map_event(event: &Event, layout: &ScreenLayout) -> Option<Action> {
    match event {
        Event::Key(key) => map_key(*key),
        Event::Mouse(mouse) => map_mouse(*mouse, layout),
        _ => None,
    }
}
