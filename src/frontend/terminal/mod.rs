pub mod game_input_handler;
pub mod game_renderer;

use std::{
    io::{self, Write},
    time::{Duration, Instant},
};

use crossterm::{cursor, event, style, terminal, ExecutableCommand};
use log::{debug, info};

use crate::backend::game::{Action, Feedback, Game};

use game_input_handler::{Keybinds, Signal};
use game_renderer::GameRenderer;

#[derive(PartialEq, Clone, Debug)]
pub struct Settings {
    pub keybinds: Keybinds,
    /// Interval of automatic descents; `None` leaves dropping to the player.
    pub gravity: Option<Duration>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            keybinds: game_input_handler::default_keybinds(),
            gravity: None,
        }
    }
}

/// Owns the terminal for the lifetime of one session.
#[derive(Debug)]
pub struct App<T: Write> {
    pub term: T,
    pub settings: Settings,
    game: Game,
    raw_mode: bool,
}

impl<T: Write> Drop for App<T> {
    fn drop(&mut self) {
        // Console epilogue: de-initialization.
        if self.raw_mode {
            let _ = terminal::disable_raw_mode();
        }
        let _ = self.term.execute(style::ResetColor);
        let _ = self.term.execute(cursor::Show);
        let _ = self.term.execute(terminal::LeaveAlternateScreen);
    }
}

impl<T: Write> App<T> {
    /// Takes over the terminal. Any failure here is fatal for the caller.
    pub fn new(term: T, settings: Settings, game: Game) -> io::Result<Self> {
        let mut app = Self {
            term,
            settings,
            game,
            raw_mode: false,
        };
        // Console prologue: initialization.
        app.term.execute(terminal::EnterAlternateScreen)?;
        app.term.execute(terminal::SetTitle("blockfall"))?;
        app.term.execute(cursor::Hide)?;
        terminal::enable_raw_mode()?;
        app.raw_mode = true;
        Ok(app)
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Main loop: wait for one event (or the gravity deadline), apply it,
    /// redraw. Returns a farewell message.
    pub fn run(&mut self) -> io::Result<String> {
        let mut renderer = GameRenderer::centered(&self.game, terminal::size()?);
        renderer.render(&mut self.term, &self.game)?;
        let mut next_fall = self.settings.gravity.map(|g| Instant::now() + g);
        let msg = loop {
            let event = match next_fall {
                None => Some(event::read()?),
                Some(deadline) => {
                    let timeout = deadline.saturating_duration_since(Instant::now());
                    if event::poll(timeout)? {
                        Some(event::read()?)
                    } else {
                        None
                    }
                }
            };
            let feedback = match event {
                // Gravity deadline passed.
                None => {
                    next_fall = self.settings.gravity.map(|g| Instant::now() + g);
                    self.game.gravity()
                }
                Some(event) => match game_input_handler::signal(&self.settings.keybinds, &event)
                {
                    Some(Signal::Game(Action::Quit)) => {
                        self.game.update(Action::Quit);
                        break format!(
                            "quit after {} pieces. Have a nice day!",
                            self.game.pieces_locked()
                        );
                    }
                    Some(Signal::Game(action)) => self.game.update(action),
                    Some(Signal::Restart) if self.game.end().is_some() => {
                        self.game.restart();
                        Vec::new()
                    }
                    Some(Signal::Redraw) => {
                        renderer = GameRenderer::centered(&self.game, terminal::size()?);
                        Vec::new()
                    }
                    Some(Signal::Restart) | None => continue,
                },
            };
            for event in &feedback {
                match event {
                    Feedback::GameOver(reason) => info!("game over: {reason}"),
                    event => debug!("{event:?}"),
                }
            }
            renderer.render(&mut self.term, &self.game)?;
        };
        Ok(msg)
    }
}
