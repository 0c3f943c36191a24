use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backend::{
    piece::ActivePiece,
    tetromino::{Coord, InvalidShapeId, Tetromino},
};

/// Offset added to a shape id to mark a cell as locked.
pub const LOCKED_TAG_OFFSET: u8 = 10;

#[derive(Eq, PartialEq, Clone, Copy, Hash, Default, Debug, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    /// Occupied by the falling piece; cleared and repainted every tick.
    Falling(Tetromino),
    /// Occupied by a piece that came to rest.
    Locked(Tetromino),
}

#[derive(Eq, PartialEq, Clone, Copy, Debug, Error)]
#[error("cell tag {0} is neither empty, falling (1..=7) nor locked (11..=17)")]
pub struct InvalidCellTag(pub u8);

impl Cell {
    /// Integer tag: `0` empty, `1..=7` falling, `11..=17` locked.
    pub const fn tag(&self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Falling(shape) => shape.id(),
            Cell::Locked(shape) => shape.id() + LOCKED_TAG_OFFSET,
        }
    }

    pub const fn is_locked(&self) -> bool {
        matches!(self, Cell::Locked(_))
    }

    pub const fn shape(&self) -> Option<Tetromino> {
        match self {
            Cell::Empty => None,
            Cell::Falling(shape) | Cell::Locked(shape) => Some(*shape),
        }
    }
}

impl TryFrom<u8> for Cell {
    type Error = InvalidCellTag;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        let shape =
            |id: u8| Tetromino::try_from(id).map_err(|InvalidShapeId(_)| InvalidCellTag(tag));
        match tag {
            0 => Ok(Cell::Empty),
            1..=7 => Ok(Cell::Falling(shape(tag)?)),
            11..=17 => Ok(Cell::Locked(shape(tag - LOCKED_TAG_OFFSET)?)),
            _ => Err(InvalidCellTag(tag)),
        }
    }
}

pub type Line = Vec<Cell>;

/// The playfield. Row `0` is the top, `y` grows downward.
#[derive(Eq, PartialEq, Clone, Debug)]
pub struct Field {
    width: usize,
    height: usize,
    lines: Vec<Line>,
}

impl Field {
    pub const DEFAULT_WIDTH: usize = 10;
    pub const DEFAULT_HEIGHT: usize = 20;

    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            lines: vec![vec![Cell::Empty; width]; height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, (x, y): Coord) -> Option<Cell> {
        self.lines.get(y)?.get(x).copied()
    }

    /// # Panics
    ///
    /// Callers must only ask for coordinates inside the field.
    pub fn occupancy(&self, (x, y): Coord) -> Cell {
        self.lines[y][x]
    }

    /// Walls, floor and locked cells block. Falling cells never do, so the
    /// active piece cannot collide with its own previous position.
    pub fn is_blocking(&self, coord: Coord) -> bool {
        self.get(coord).map_or(true, |cell| cell.is_locked())
    }

    pub fn is_locked(&self, coord: Coord) -> bool {
        self.get(coord).is_some_and(|cell| cell.is_locked())
    }

    /// Must follow [`Field::clear_transient`] so no stale falling cells remain.
    ///
    /// # Panics
    ///
    /// Every tile of `piece` must lie inside the field.
    pub fn paint_transient(&mut self, piece: &ActivePiece) {
        for (x, y) in piece.tiles() {
            self.lines[y][x] = Cell::Falling(piece.shape());
        }
    }

    pub fn clear_transient(&mut self) {
        for cell in self.lines.iter_mut().flatten() {
            if let Cell::Falling(_) = cell {
                *cell = Cell::Empty;
            }
        }
    }

    /// # Panics
    ///
    /// Every tile of `piece` must lie inside the field.
    pub fn lock(&mut self, piece: &ActivePiece) {
        for (x, y) in piece.tiles() {
            self.lines[y][x] = Cell::Locked(piece.shape());
        }
    }

    /// True if any of the piece's cells is locked or off the field, i.e. there
    /// is no room left for it.
    pub fn overlaps_locked(&self, piece: &ActivePiece) -> bool {
        piece.tiles().into_iter().any(|coord| self.is_blocking(coord))
    }

    /// Empties every cell, locked ones included.
    pub fn reset(&mut self) {
        for cell in self.lines.iter_mut().flatten() {
            *cell = Cell::Empty;
        }
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Row-major snapshot of the cell tags.
    pub fn tags(&self) -> Vec<Vec<u8>> {
        self.lines
            .iter()
            .map(|line| line.iter().map(Cell::tag).collect())
            .collect()
    }
}

impl Default for Field {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WIDTH, Self::DEFAULT_HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(field: &Field, pred: impl Fn(&Cell) -> bool) -> usize {
        field.lines().iter().flatten().filter(|c| pred(c)).count()
    }

    #[test]
    fn tags_skip_eight_to_ten() {
        for tag in 0..=u8::MAX {
            match Cell::try_from(tag) {
                Ok(cell) => assert_eq!(cell.tag(), tag),
                Err(InvalidCellTag(t)) => assert!(t == tag && ((8..=10).contains(&t) || t > 17)),
            }
        }
        assert_eq!(Cell::Locked(Tetromino::T).tag(), 17);
        assert_eq!(Cell::Falling(Tetromino::I).tag(), 1);
    }

    #[test]
    fn out_of_bounds_blocks() {
        let field = Field::default();
        assert!(field.is_blocking((10, 0)));
        assert!(field.is_blocking((0, 20)));
        assert!(!field.is_blocking((9, 19)));
        assert!(!field.is_locked((10, 0)));
    }

    #[test]
    fn falling_cells_do_not_block() {
        let mut field = Field::default();
        let piece = ActivePiece::spawn(Tetromino::O, (4, 1));
        field.paint_transient(&piece);
        for coord in piece.tiles() {
            assert_eq!(field.occupancy(coord), Cell::Falling(Tetromino::O));
            assert!(!field.is_blocking(coord));
        }
    }

    #[test]
    fn lock_marks_cells_blocking() {
        let mut field = Field::default();
        let piece = ActivePiece::spawn(Tetromino::L, (4, 5));
        field.paint_transient(&piece);
        piece.lock_into_field(&mut field);
        for coord in piece.tiles() {
            assert_eq!(field.occupancy(coord).tag(), Tetromino::L.id() + 10);
            assert!(field.is_blocking(coord));
        }
        assert!(field.overlaps_locked(&piece));
    }

    #[test]
    fn clear_then_paint_leaves_exactly_one_piece() {
        let mut field = Field::default();
        let locked = ActivePiece::spawn(Tetromino::I, (4, 19));
        field.lock(&locked);
        let mut piece = ActivePiece::spawn(Tetromino::S, (4, 1));
        field.paint_transient(&piece);
        assert!(piece.try_move(&field, 1, 3));
        field.clear_transient();
        field.paint_transient(&piece);
        assert_eq!(count(&field, |c| *c == Cell::Falling(Tetromino::S)), 4);
        assert_eq!(count(&field, |c| matches!(c, Cell::Falling(_))), 4);
        assert_eq!(count(&field, Cell::is_locked), 4);
    }

    #[test]
    #[should_panic]
    fn painting_off_the_field_panics() {
        let mut field = Field::default();
        field.paint_transient(&ActivePiece::spawn(Tetromino::I, (8, 5)));
    }

    #[test]
    #[should_panic]
    fn locking_off_the_field_panics() {
        let mut field = Field::default();
        field.lock(&ActivePiece::spawn(Tetromino::O, (4, 20)));
    }

    #[test]
    fn reset_removes_locked_cells() {
        let mut field = Field::new(6, 8);
        field.lock(&ActivePiece::spawn(Tetromino::T, (2, 3)));
        field.reset();
        assert!(field.tags().iter().flatten().all(|&t| t == 0));
        assert_eq!((field.width(), field.height()), (6, 8));
    }
}
