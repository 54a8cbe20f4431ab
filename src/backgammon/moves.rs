use std::fmt;

use crate::{backgammon::Player, misc::TinyVec};

/// A single checker move: an origin index and a signed, direction adjusted
/// distance (positive for White, negative for Black).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub position: u8,
    pub distance: i8,
}

impl Move {
    pub fn new(position: u8, distance: i8) -> Self {
        Move { position, distance }
    }

    /// Builds the move of `player` playing `die` from `position`.
    pub fn for_player(player: Player, position: u8, die: u8) -> Self {
        Move { position, distance: player.sign() * die as i8 }
    }

    /// The die value this move consumes.
    pub fn die(&self) -> u8 {
        self.distance.unsigned_abs()
    }

    pub fn target(&self) -> i8 {
        self.position as i8 + self.distance
    }
}

/// Where a checker ends up after a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Destination {
    Point(u8),
    Off,
}

/// The moves of one turn, in play order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MoveSequence {
    moves: TinyVec<Move, 4>,
}

impl MoveSequence {
    pub fn new() -> Self {
        MoveSequence { moves: TinyVec::new() }
    }

    pub fn push(&mut self, mv: Move) {
        self.moves.push(mv);
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Move> {
        self.moves.iter()
    }

    pub fn first(&self) -> Option<&Move> {
        self.moves.first()
    }

    pub fn last(&self) -> Option<&Move> {
        self.moves.last()
    }
}

impl FromIterator<Move> for MoveSequence {
    fn from_iter<I: IntoIterator<Item = Move>>(iter: I) -> Self {
        let mut sequence = MoveSequence::new();
        for mv in iter {
            sequence.push(mv);
        }
        sequence
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let target = self.target();
        match self.position {
            0 | 25 => write!(f, "bar")?,
            n => write!(f, "{}", n)?,
        }
        if (1..=24).contains(&target) {
            write!(f, " -> {}", target)
        } else {
            write!(f, " -> off")
        }
    }
}

impl fmt::Debug for MoveSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Moves: ")?;
        for (i, mv) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", mv)?;
        }
        Ok(())
    }
}

impl fmt::Display for MoveSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
