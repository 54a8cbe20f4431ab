use std::{fmt, ops::RangeInclusive};

/// White moves from point 1 towards point 24 and enters from index 0,
/// Black moves the other way and enters from index 25.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Player {
    White,
    Black,
}

impl Player {
    pub const ALL: [Player; 2] = [Player::White, Player::Black];

    pub fn opposite(&self) -> Player {
        match self {
            Player::White => Player::Black,
            Player::Black => Player::White,
        }
    }

    /// Sign of this player's checkers on the board, also the direction of travel.
    pub fn sign(&self) -> i8 {
        match self {
            Player::White => 1,
            Player::Black => -1,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Player::White => 0,
            Player::Black => 1,
        }
    }

    pub fn bar(&self) -> u8 {
        match self {
            Player::White => 0,
            Player::Black => 25,
        }
    }

    pub fn home(&self) -> RangeInclusive<u8> {
        match self {
            Player::White => 19..=24,
            Player::Black => 1..=6,
        }
    }

    /// Whether a target index lies past this player's bear-off edge.
    pub fn goes_off(&self, target: i8) -> bool {
        match self {
            Player::White => target > 24,
            Player::Black => target < 1,
        }
    }

    /// How far along its path a checker on `index` is, 0 on the bar and 24 on
    /// the last point before bearing off.
    pub fn progress(&self, index: u8) -> u8 {
        match self {
            Player::White => index,
            Player::Black => 25 - index,
        }
    }

    pub fn owns(&self, count: i8) -> bool {
        count.signum() == self.sign()
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::White => write!(f, "white"),
            Player::Black => write!(f, "black"),
        }
    }
}
