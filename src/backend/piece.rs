use serde::{Deserialize, Serialize};

use crate::backend::{
    field::Field,
    tetromino::{add, rotate_offset, rotate_right, Coord, Minos, Offset, Tetromino},
};

/// The falling tetromino: shape, current orientation and anchor.
///
/// Once placed by the game, every tile lies on the field: moves and rotations
/// are only committed after all four probes were found free.
#[derive(Eq, PartialEq, Clone, Copy, Hash, Debug, Serialize, Deserialize)]
pub struct ActivePiece {
    shape: Tetromino,
    minos: Minos,
    pos: Coord,
}

impl ActivePiece {
    pub fn spawn(shape: Tetromino, pos: Coord) -> Self {
        Self {
            shape,
            minos: shape.minos(),
            pos,
        }
    }

    pub fn shape(&self) -> Tetromino {
        self.shape
    }

    pub fn minos(&self) -> Minos {
        self.minos
    }

    pub fn pos(&self) -> Coord {
        self.pos
    }

    /// Field coordinates of the four tiles.
    ///
    /// A tile left of column 0 or above row 0 wraps to a huge coordinate,
    /// which every field query treats as out of bounds.
    pub fn tiles(&self) -> [Coord; 4] {
        let (x, y) = self.pos;
        self.minos
            .map(|(dx, dy)| (x.wrapping_add_signed(dx), y.wrapping_add_signed(dy)))
    }

    fn fits(&self, field: &Field, minos: Minos, offset: Offset) -> bool {
        minos.iter().all(|&(dx, dy)| {
            add(self.pos, (dx + offset.0, dy + offset.1))
                .is_some_and(|coord| !field.is_blocking(coord))
        })
    }

    /// Shifts the anchor by `(dx, dy)` if every shifted tile is free.
    pub fn try_move(&mut self, field: &Field, dx: isize, dy: isize) -> bool {
        if !self.fits(field, self.minos, (dx, dy)) {
            return false;
        }
        match add(self.pos, (dx, dy)) {
            Some(pos) => {
                self.pos = pos;
                true
            }
            None => false,
        }
    }

    /// Turns the piece a quarter clockwise in place around its anchor.
    ///
    /// Each mino `(dx, dy)` is probed at `(x - dy, y + dx)`; no kicks.
    pub fn try_rotate_right(&mut self, field: &Field) -> bool {
        let probes = self.minos.map(rotate_offset);
        if !self.fits(field, probes, (0, 0)) {
            return false;
        }
        self.minos = rotate_right(self.minos);
        true
    }

    /// The piece rests on the floor or on a locked cell.
    pub fn is_touching_down(&self, field: &Field) -> bool {
        self.tiles().iter().any(|&(x, y)| {
            y.checked_add(1)
                .is_some_and(|below| below == field.height() || field.is_locked((x, below)))
        })
    }

    pub fn lock_into_field(&self, field: &mut Field) {
        field.lock(self);
    }
}
