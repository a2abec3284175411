use ratatui::crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::action::Action;
use crate::app::Focus;

/// Map a crossterm terminal event to a TUI action.
///
/// While the input box has focus, printable keys edit the query; the result
/// lists use single-letter shortcuts instead.
pub fn map_event(event: &Event, focus: Focus) -> Action {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => map_key(key, focus),
        Event::Resize(w, h) => Action::Resize(*w, *h),
        _ => Action::None,
    }
}

fn map_key(key: &KeyEvent, focus: Focus) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Action::Quit,
            KeyCode::Char('s') => Action::Stop,
            KeyCode::Char('l') => Action::Clear,
            _ => Action::None,
        };
    }

    match key.code {
        KeyCode::Tab => return Action::FocusNext,
        KeyCode::Esc => return Action::FocusInput,
        _ => {}
    }

    if focus == Focus::Input {
        return match key.code {
            KeyCode::Enter => Action::Search,
            KeyCode::Backspace => Action::Backspace,
            KeyCode::Char(c) => Action::InputChar(c),
            KeyCode::Down => Action::FocusNext,
            _ => Action::None,
        };
    }

    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('j') | KeyCode::Down => Action::MoveDown,
        KeyCode::Char('k') | KeyCode::Up => Action::MoveUp,
        KeyCode::Char('g') | KeyCode::Home => Action::GoTop,
        KeyCode::Char('G') | KeyCode::End => Action::GoBottom,
        KeyCode::Char('c') | KeyCode::Enter => Action::CopyLink,
        KeyCode::Char('o') => Action::OpenRecipe,
        KeyCode::Char('?') => Action::ToggleHelp,
        KeyCode::Char('/') => Action::FocusInput,
        _ => Action::None,
    }
}
