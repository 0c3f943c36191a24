use std::collections::{vec_deque, VecDeque};

use crate::backend::piece::ActivePiece;

/// Bounded FIFO of upcoming pieces, shown as the preview strip.
#[derive(Eq, PartialEq, Clone, Debug)]
pub struct PieceQueue {
    // INVARIANT: `elements.len() <= capacity`.
    elements: VecDeque<ActivePiece>,
    capacity: usize,
}

impl PieceQueue {
    pub const DEFAULT_CAPACITY: usize = 5;

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            elements: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.elements.len() >= self.capacity
    }

    /// Appends `piece` unless the queue is full; returns whether it was added.
    pub fn enqueue(&mut self, piece: ActivePiece) -> bool {
        if self.is_full() {
            return false;
        }
        self.elements.push_back(piece);
        true
    }

    pub fn dequeue(&mut self) -> Option<ActivePiece> {
        self.elements.pop_front()
    }

    pub fn front(&self) -> Option<&ActivePiece> {
        self.elements.front()
    }

    pub fn iter(&self) -> vec_deque::Iter<'_, ActivePiece> {
        self.elements.iter()
    }
}

impl Default for PieceQueue {
    fn default() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }
}

impl<'a> IntoIterator for &'a PieceQueue {
    type Item = &'a ActivePiece;
    type IntoIter = vec_deque::Iter<'a, ActivePiece>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
