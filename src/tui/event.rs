use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Quit,
    Back,
    Help,
    ToggleStress,
    StressLevel(u8),
    ForceGc,
    Confirm,
    Cancel,
    Reset,
    ToggleMode,
    CycleShape,
    BaseUp,
    BaseDown,
    PowerUp,
    PowerDown,
    None,
}

/// Waits at most `timeout` for a key press. Doubles as the frame limiter:
/// the caller passes whatever is left of the frame budget.
pub fn poll_event(timeout: Duration) -> std::io::Result<Event> {
    if event::poll(timeout)? {
        if let CrosstermEvent::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(map_key_event(key));
            }
        }
    }
    Ok(Event::None)
}

pub fn map_key_event(key: KeyEvent) -> Event {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => Event::Quit,
        (KeyCode::Esc, _) => Event::Back,
        (KeyCode::Char('?'), _) => Event::Help,
        (KeyCode::Char('g'), _) => Event::ToggleStress,
        (KeyCode::Char('1'), _) => Event::StressLevel(1),
        (KeyCode::Char('2'), _) => Event::StressLevel(2),
        (KeyCode::Char('3'), _) => Event::StressLevel(3),
        (KeyCode::Char('f'), _) => Event::ForceGc,
        (KeyCode::Char('y'), _) | (KeyCode::Char('Y'), _) => Event::Confirm,
        (KeyCode::Char('n'), _) | (KeyCode::Char('N'), _) => Event::Cancel,
        (KeyCode::Char('r'), _) => Event::Reset,
        (KeyCode::Tab, _) => Event::ToggleMode,
        (KeyCode::Char('s'), _) => Event::CycleShape,
        (KeyCode::Up, _) => Event::BaseUp,
        (KeyCode::Down, _) => Event::BaseDown,
        (KeyCode::Right, _) => Event::PowerUp,
        (KeyCode::Left, _) => Event::PowerDown,
        _ => Event::None,
    }
}
