use std::collections::HashMap;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::backend::game::Action;

pub type Keybinds = HashMap<KeyCode, Action>;

/// What a terminal event asks the application to do.
#[derive(Eq, PartialEq, Clone, Copy, Hash, Debug)]
pub enum Signal {
    Game(Action),
    Restart,
    Redraw,
}

pub fn default_keybinds() -> Keybinds {
    HashMap::from([
        (KeyCode::Left, Action::MoveLeft),
        (KeyCode::Right, Action::MoveRight),
        (KeyCode::Down, Action::SoftDrop),
        (KeyCode::Up, Action::RotateRight),
        (KeyCode::Esc, Action::Quit),
    ])
}

/// Translates one crossterm event; `None` means the event is ignored.
pub fn signal(keybinds: &Keybinds, event: &Event) -> Option<Signal> {
    match event {
        // Abort.
        Event::Key(KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            ..
        }) => Some(Signal::Game(Action::Quit)),
        Event::Key(KeyEvent {
            code: KeyCode::Char('r'),
            kind: KeyEventKind::Press,
            ..
        }) => Some(Signal::Restart),
        // Candidate key pressed.
        Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press | KeyEventKind::Repeat,
            ..
        }) => keybinds.get(code).copied().map(Signal::Game),
        Event::Resize(..) | Event::FocusGained => Some(Signal::Redraw),
        // Don't care about other events: ignore.
        _ => None,
    }
}
