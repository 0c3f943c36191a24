use std::fmt;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{
    backend::{
        field::Field, piece::ActivePiece, queue::PieceQueue, tetromino::Tetromino,
        tetromino_generators::RandomGen,
    },
    config::{ConfigError, GameConfig},
};

pub type FeedbackEvents = Vec<Feedback>;

/// One discrete player input.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug, Serialize, Deserialize)]
pub enum Action {
    MoveLeft,
    MoveRight,
    SoftDrop,
    RotateRight,
    Quit,
}

#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug, Serialize, Deserialize)]
pub enum GameOver {
    /// A freshly spawned piece overlapped locked cells: the field is full.
    BlockOut,
    /// The shape source stopped yielding pieces.
    OutOfPieces,
    Forfeit,
}

#[derive(Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum Feedback {
    /// The action was not applied because the target cells were blocked.
    Rejected(Action),
    PieceLocked(ActivePiece),
    Spawned(Tetromino),
    GameOver(GameOver),
}

pub struct Game {
    // INVARIANT: `end.is_some() || active_piece.is_some()`.
    // INVARIANT: the falling cells on `field` are exactly `active_piece.tiles()`.
    config: GameConfig,
    field: Field,
    active_piece: Option<ActivePiece>,
    next_pieces: PieceQueue,
    tetromino_generator: Box<dyn Iterator<Item = Tetromino>>,
    end: Option<GameOver>,
    pieces_played: [u32; 7],
}

impl fmt::Display for GameOver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            GameOver::BlockOut => "no room left for the next piece",
            GameOver::OutOfPieces => "no pieces left to play",
            GameOver::Forfeit => "game quit",
        };
        write!(f, "{msg}")
    }
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("config", &self.config)
            .field("active_piece", &self.active_piece)
            .field("next_pieces", &self.next_pieces)
            .field("end", &self.end)
            .field("pieces_played", &self.pieces_played)
            .finish_non_exhaustive()
    }
}

impl Game {
    /// New game drawing uniformly random shapes, seeded from `config.seed`
    /// when present.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        let generator = match config.seed {
            Some(seed) => RandomGen::seeded(seed),
            None => RandomGen::from_entropy(),
        };
        Self::with_generator(config, generator)
    }

    pub fn with_generator(
        config: GameConfig,
        tetromino_generator: impl Iterator<Item = Tetromino> + 'static,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut game = Game {
            field: Field::new(config.width, config.height),
            active_piece: None,
            next_pieces: PieceQueue::with_capacity(config.queue_capacity),
            tetromino_generator: Box::new(tetromino_generator),
            end: None,
            pieces_played: [0; 7],
            config,
        };
        game.start();
        Ok(game)
    }

    fn start(&mut self) {
        while !self.next_pieces.is_full() {
            let Some(piece) = self.generate_piece() else {
                break;
            };
            self.next_pieces.enqueue(piece);
        }
        if self.spawn_next().is_none() {
            info!("shape source yielded no pieces");
            self.end = Some(GameOver::OutOfPieces);
        }
        self.repaint();
    }

    /// Empties the field and preview, then starts over with fresh pieces from
    /// the same shape source.
    pub fn restart(&mut self) {
        info!("restarting game after {} pieces", self.pieces_locked());
        self.field.reset();
        self.next_pieces = PieceQueue::with_capacity(self.config.queue_capacity);
        self.active_piece = None;
        self.end = None;
        self.pieces_played = [0; 7];
        self.start();
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn next_pieces(&self) -> &PieceQueue {
        &self.next_pieces
    }

    pub fn active_piece(&self) -> Option<&ActivePiece> {
        self.active_piece.as_ref()
    }

    pub fn end(&self) -> Option<GameOver> {
        self.end
    }

    pub fn pieces_played(&self) -> &[u32; 7] {
        &self.pieces_played
    }

    pub fn pieces_locked(&self) -> u32 {
        self.pieces_played.iter().sum()
    }

    /// Processes exactly one action: apply it, lock the piece if it rests on
    /// something, then repaint the falling cells.
    pub fn update(&mut self, action: Action) -> FeedbackEvents {
        let mut feedback = FeedbackEvents::new();
        if self.end.is_some() {
            return feedback;
        }
        let Some(mut piece) = self.active_piece else {
            self.finish(GameOver::OutOfPieces, &mut feedback);
            return feedback;
        };
        let applied = match action {
            Action::MoveLeft => piece.try_move(&self.field, -1, 0),
            Action::MoveRight => piece.try_move(&self.field, 1, 0),
            Action::SoftDrop => piece.try_move(&self.field, 0, 1),
            Action::RotateRight => piece.try_rotate_right(&self.field),
            Action::Quit => {
                self.finish(GameOver::Forfeit, &mut feedback);
                return feedback;
            }
        };
        if !applied {
            feedback.push(Feedback::Rejected(action));
        }
        self.active_piece = Some(piece);
        if piece.is_touching_down(&self.field) {
            self.lock(piece, &mut feedback);
        }
        self.repaint();
        feedback
    }

    /// Timer-driven descent, equivalent to a soft drop.
    pub fn gravity(&mut self) -> FeedbackEvents {
        self.update(Action::SoftDrop)
    }

    fn lock(&mut self, piece: ActivePiece, feedback: &mut FeedbackEvents) {
        piece.lock_into_field(&mut self.field);
        self.pieces_played[piece.shape()] += 1;
        debug!("locked {} at {:?}", piece.shape(), piece.pos());
        feedback.push(Feedback::PieceLocked(piece));
        self.active_piece = None;
        match self.spawn_next() {
            None => self.finish(GameOver::OutOfPieces, feedback),
            Some(next) if self.field.overlaps_locked(&next) => {
                // Never paint over locked cells.
                self.active_piece = None;
                self.finish(GameOver::BlockOut, feedback);
            }
            Some(next) => feedback.push(Feedback::Spawned(next.shape())),
        }
    }

    /// Activates the front of the preview queue and tops the queue back up.
    fn spawn_next(&mut self) -> Option<ActivePiece> {
        let next = self.next_pieces.dequeue()?;
        if let Some(fresh) = self.generate_piece() {
            self.next_pieces.enqueue(fresh);
        }
        debug!("spawned {} at {:?}", next.shape(), next.pos());
        self.active_piece = Some(next);
        Some(next)
    }

    fn generate_piece(&mut self) -> Option<ActivePiece> {
        let shape = self.tetromino_generator.next()?;
        Some(ActivePiece::spawn(shape, self.config.spawn))
    }

    fn repaint(&mut self) {
        self.field.clear_transient();
        if let Some(piece) = &self.active_piece {
            self.field.paint_transient(piece);
        }
    }

    fn finish(&mut self, reason: GameOver, feedback: &mut FeedbackEvents) {
        info!(
            "game over ({reason}) after {} locked pieces",
            self.pieces_locked()
        );
        self.end = Some(reason);
        feedback.push(Feedback::GameOver(reason));
    }
}
