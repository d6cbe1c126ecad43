use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};

use crate::shared::InputEvent;

// poll the terminal for at most `timeout`, resolve keys into input events
pub fn poll_input(timeout: Duration) -> anyhow::Result<Vec<InputEvent>> {
    if !event::poll(timeout)? {
        return Ok(vec![]);
    }

    if let Event::Key(key) = event::read()? {
        if key.kind != KeyEventKind::Press {
            return Ok(vec![]);
        }
        return Ok(handle_key(key.code).into_iter().collect());
    }
    Ok(vec![])
}

fn handle_key(code: KeyCode) -> Option<InputEvent> {
    let event = match code {
        KeyCode::Esc | KeyCode::Char('q') => InputEvent::Quit,

        KeyCode::Up | KeyCode::Char('k') => InputEvent::CursorUp,
        KeyCode::Down | KeyCode::Char('j') => InputEvent::CursorDown,
        KeyCode::Left | KeyCode::Char('h') => InputEvent::CursorLeft,
        KeyCode::Right | KeyCode::Char('l') => InputEvent::CursorRight,

        KeyCode::Char(' ') | KeyCode::Enter => InputEvent::ToggleBlock,
        KeyCode::Char('p') => InputEvent::Play,
        KeyCode::Char('s') => InputEvent::Stop,

        _ => return None,
    };
    Some(event)
}
