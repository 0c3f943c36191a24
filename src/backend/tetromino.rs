use std::{fmt, ops};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Coord = (usize, usize);
pub type Offset = (isize, isize);
pub type Minos = [Offset; 4];

#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug, Serialize, Deserialize)]
pub enum Tetromino {
    I,
    O,
    S,
    Z,
    J,
    L,
    T,
}

#[derive(Eq, PartialEq, Clone, Copy, Debug, Error)]
#[error("shape id {0} is not in 1..=7")]
pub struct InvalidShapeId(pub u8);

impl Tetromino {
    pub const ALL: [Tetromino; 7] = [
        Tetromino::I,
        Tetromino::O,
        Tetromino::S,
        Tetromino::Z,
        Tetromino::J,
        Tetromino::L,
        Tetromino::T,
    ];

    /// Canonical starting orientation, relative to the anchor.
    /// `y` grows downward, so `-1` is the row above the anchor.
    #[rustfmt::skip]
    pub const fn minos(&self) -> Minos {
        match self {
            Tetromino::I => [(0, 0), (-1, 0), (1, 0), (2, 0)],   // ⠤⠤
            Tetromino::O => [(0, 0), (0, -1), (1, 0), (1, -1)],  // ⠶
            Tetromino::S => [(0, 0), (-1, 0), (0, -1), (1, -1)], // ⠴⠂
            Tetromino::Z => [(0, 0), (-1, -1), (0, -1), (1, 0)], // ⠲⠄
            Tetromino::J => [(0, 0), (-1, -1), (-1, 0), (1, 0)], // ⠦⠄
            Tetromino::L => [(0, 0), (-1, 0), (1, 0), (1, -1)],  // ⠤⠆
            Tetromino::T => [(0, 0), (-1, 0), (0, -1), (1, 0)],  // ⠴⠄
        }
    }

    /// Shape id in `1..=7`, the tag a falling cell of this shape carries.
    pub const fn id(&self) -> u8 {
        match self {
            Tetromino::I => 1,
            Tetromino::O => 2,
            Tetromino::S => 3,
            Tetromino::Z => 4,
            Tetromino::J => 5,
            Tetromino::L => 6,
            Tetromino::T => 7,
        }
    }
}

impl TryFrom<u8> for Tetromino {
    type Error = InvalidShapeId;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        use Tetromino::*;
        Ok(match id {
            1 => I,
            2 => O,
            3 => S,
            4 => Z,
            5 => J,
            6 => L,
            7 => T,
            _ => Err(InvalidShapeId(id))?,
        })
    }
}

impl fmt::Display for Tetromino {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl<T> ops::Index<Tetromino> for [T; 7] {
    type Output = T;

    fn index(&self, idx: Tetromino) -> &Self::Output {
        &self[usize::from(idx.id() - 1)]
    }
}

impl<T> ops::IndexMut<Tetromino> for [T; 7] {
    fn index_mut(&mut self, idx: Tetromino) -> &mut Self::Output {
        &mut self[usize::from(idx.id() - 1)]
    }
}

/// Quarter turn clockwise about the anchor: `(dx, dy) -> (-dy, dx)`.
pub const fn rotate_offset((dx, dy): Offset) -> Offset {
    (-dy, dx)
}

pub fn rotate_right(minos: Minos) -> Minos {
    minos.map(rotate_offset)
}

pub fn add((x0, y0): Coord, (x1, y1): Offset) -> Option<Coord> {
    Some((x0.checked_add_signed(x1)?, y0.checked_add_signed(y1)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_try_from() {
        for shape in Tetromino::ALL {
            assert_eq!(Tetromino::try_from(shape.id()), Ok(shape));
        }
    }

    #[test]
    fn ids_outside_domain_are_rejected() {
        assert_eq!(Tetromino::try_from(0), Err(InvalidShapeId(0)));
        assert_eq!(Tetromino::try_from(8), Err(InvalidShapeId(8)));
    }

    #[test]
    fn every_shape_has_four_distinct_minos_including_anchor() {
        for shape in Tetromino::ALL {
            let minos = shape.minos();
            assert!(minos.contains(&(0, 0)), "{shape} has no anchor mino");
            for (i, a) in minos.iter().enumerate() {
                assert!(!minos[i + 1..].contains(a), "{shape} repeats {a:?}");
            }
        }
    }

    #[test]
    fn rotation_keeps_anchor_fixed() {
        assert_eq!(rotate_offset((0, 0)), (0, 0));
        assert_eq!(rotate_offset((1, 0)), (0, 1));
        assert_eq!(rotate_offset((0, 1)), (-1, 0));
    }

    #[test]
    fn four_rotations_are_identity() {
        for shape in Tetromino::ALL {
            let minos = shape.minos();
            let turned = (0..4).fold(minos, |m, _| rotate_right(m));
            assert_eq!(turned, minos);
        }
    }

    #[test]
    fn add_rejects_negative_coordinates() {
        assert_eq!(add((4, 1), (-1, -1)), Some((3, 0)));
        assert_eq!(add((0, 1), (-1, 0)), None);
        assert_eq!(add((4, 0), (0, -1)), None);
    }

    #[test]
    fn shape_indexed_arrays() {
        let mut counts = [0u32; 7];
        counts[Tetromino::T] += 2;
        counts[Tetromino::I] += 1;
        assert_eq!(counts, [1, 0, 0, 0, 0, 0, 2]);
    }
}
