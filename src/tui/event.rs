use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// TUI-specific input events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuiEvent {
    // Always handled, whatever has focus
    ForceQuit,
    Resize,
    OpenBookmarks,

    // Interpreted by whoever has focus (browser or bookmark overlay)
    CursorUp,
    CursorDown,
    PageUp,
    PageDown,
    Submit,
    Back,
    Escape,
    InputChar(char),
}

/// Poll for an event, blocking up to `timeout`.
pub fn poll_event_timeout(timeout: std::time::Duration) -> Option<TuiEvent> {
    if !event::poll(timeout).ok()? {
        return None;
    }
    match event::read().ok()? {
        Event::Key(key_event) => map_key(key_event),
        Event::Resize(_, _) => Some(TuiEvent::Resize),
        _ => None,
    }
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> Option<TuiEvent> {
    poll_event_timeout(std::time::Duration::ZERO)
}

pub fn map_key(key_event: KeyEvent) -> Option<TuiEvent> {
    // Ignore key releases reported by terminals with enhanced keyboard support
    if key_event.kind == KeyEventKind::Release {
        return None;
    }
    log::debug!("Key event: {:?} with modifiers {:?}", key_event.code, key_event.modifiers);
    match (key_event.modifiers, key_event.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(TuiEvent::ForceQuit),
        (KeyModifiers::CONTROL, KeyCode::Char('o')) => Some(TuiEvent::OpenBookmarks),
        (_, KeyCode::Char(c)) => Some(TuiEvent::InputChar(c)),
        (_, KeyCode::Enter) | (_, KeyCode::Right) => Some(TuiEvent::Submit),
        (_, KeyCode::Backspace) | (_, KeyCode::Left) => Some(TuiEvent::Back),
        (_, KeyCode::Esc) => Some(TuiEvent::Escape),
        (_, KeyCode::Up) => Some(TuiEvent::CursorUp),
        (_, KeyCode::Down) => Some(TuiEvent::CursorDown),
        (_, KeyCode::PageUp) => Some(TuiEvent::PageUp),
        (_, KeyCode::PageDown) => Some(TuiEvent::PageDown),
        _ => None,
    }
}
