pub mod field;
pub mod game;
pub mod piece;
pub mod queue;
pub mod tetromino;
pub mod tetromino_generators;

pub use field::{Cell, Field};
pub use game::{Action, Feedback, FeedbackEvents, Game, GameOver};
pub use piece::ActivePiece;
pub use queue::PieceQueue;
pub use tetromino::{Coord, Minos, Offset, Tetromino};
pub use tetromino_generators::RandomGen;
