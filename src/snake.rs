use std::collections::VecDeque;
use std::convert::TryFrom;

use crate::error::SnakeError;
use crate::{GridInt, Position};
use Direction::*;
use MoveResult::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

#[derive(Debug, PartialEq, Eq)]
pub enum MoveResult {
    Moved { new_head: Position },
    HitWall,
    HitSelf,
}

/// Head cell plus the trailing segments, nearest-to-head first.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    head: Position,
    tail: VecDeque<Position>,
    direction: Direction,
    last_move: Direction,
}

impl Direction {
    /// Grid delta (dx, dy), y grows downwards
    pub fn delta(self) -> (GridInt, GridInt) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }
}

impl TryFrom<(GridInt, GridInt)> for Direction {
    type Error = SnakeError;

    fn try_from(vector: (GridInt, GridInt)) -> Result<Self, Self::Error> {
        match vector {
            (0, -1) => Ok(Up),
            (0, 1) => Ok(Down),
            (-1, 0) => Ok(Left),
            (1, 0) => Ok(Right),
            (dx, dy) => Err(SnakeError::InvalidDirection(dx, dy)),
        }
    }
}

impl Snake {
    pub fn new(head: Position, direction: Direction) -> Self {
        Snake { head, tail: VecDeque::new(), direction, last_move: direction }
    }

    pub fn head(&self) -> Position {
        self.head
    }

    pub fn tail(&self) -> &VecDeque<Position> {
        &self.tail
    }

    pub fn len(&self) -> usize {
        self.tail.len() + 1
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn occupies(&self, pos: Position) -> bool {
        self.head == pos || self.tail.contains(&pos)
    }

    /// Cell the head would enter on the next step
    pub fn next_head(&self) -> Position {
        let (dx, dy) = self.direction.delta();
        (self.head.0 + dx, self.head.1 + dy)
    }

    pub fn move_step(&mut self, width: GridInt, height: GridInt) -> MoveResult {
        let new_head = self.next_head();

        if new_head.0 < 0 || new_head.1 < 0 || new_head.0 >= width || new_head.1 >= height {
            return HitWall;
        }

        // The last segment moves out of the way this step, so it can't be bitten
        let staying = self.tail.len().saturating_sub(1);
        if self.tail.iter().take(staying).any(|seg| *seg == new_head) {
            return HitSelf;
        }

        self.tail.push_front(self.head);
        self.tail.pop_back();
        self.head = new_head;
        self.last_move = self.direction;

        Moved { new_head }
    }

    /// Returns false when the turn was refused. A snake with a tail can't turn
    /// straight back onto its own neck, which lies opposite the last move made
    /// (not the last direction asked for).
    pub fn set_direction(&mut self, new_direction: Direction) -> bool {
        if !self.tail.is_empty() && new_direction == self.last_move.opposite() {
            return false;
        }

        self.direction = new_direction;
        true
    }

    /// Adds one segment stacked on the current last one; it unfolds on the next step.
    pub fn grow(&mut self) {
        let last = self.tail.back().copied().unwrap_or(self.head);
        self.tail.push_back(last);
    }
}
