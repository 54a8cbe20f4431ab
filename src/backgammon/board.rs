use std::fmt;

use crate::{backgammon::Player, error::BoardError};

pub const POINTS: usize = 26;
pub const CHECKERS_PER_SIDE: u8 = 15;

/// Representation of a Backgammon board as 26 signed counts.
/// Index 0 is White's bar, index 25 is Black's bar and 1..=24 are the points.
/// Positive counts belong to White, negative counts to Black, so a point can
/// never hold both colors. The number of borne off checkers is tracked next to
/// the counts so that every side always accounts for all of its checkers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    points: [i8; POINTS],
    off: [u8; 2],
}

impl Board {
    /// Creates a new board with the default starting position.
    pub fn new() -> Self {
        Board {
            points: [
                0, 2, 0, 0, 0, 0, -5, 0, -3, 0, 0, 0, 5, -5, 0, 0, 0, 3, 0, 5, 0, 0, 0, 0, -2, 0,
            ],
            off: [0, 0],
        }
    }

    /// Builds a board from raw signed counts. Checkers missing from the array
    /// are considered borne off.
    pub fn from_points(points: [i8; POINTS]) -> Result<Self, BoardError> {
        for player in Player::ALL {
            let bar = points[player.bar() as usize];
            if bar != 0 && !player.owns(bar) {
                return Err(BoardError::WrongBarColor { bar: player.bar() });
            }
        }

        let mut off = [0; 2];
        for player in Player::ALL {
            let total: u32 = points
                .iter()
                .filter(|&&count| player.owns(count))
                .map(|&count| count.unsigned_abs() as u32)
                .sum();
            if total > CHECKERS_PER_SIDE as u32 {
                return Err(BoardError::TooManyCheckers { player, count: total });
            }
            off[player.index()] = CHECKERS_PER_SIDE - total as u8;
        }

        if off == [CHECKERS_PER_SIDE; 2] {
            return Err(BoardError::NoCheckers);
        }

        Ok(Board { points, off })
    }

    pub fn points(&self) -> &[i8; POINTS] {
        &self.points
    }

    /// Signed count on an index, 0 for anything outside the board.
    pub fn get(&self, index: u8) -> i8 {
        self.points.get(index as usize).copied().unwrap_or(0)
    }

    pub fn owner(&self, index: u8) -> Option<Player> {
        match self.get(index).signum() {
            1 => Some(Player::White),
            -1 => Some(Player::Black),
            _ => None,
        }
    }

    /// Number of `player`'s checkers on an index.
    pub fn count(&self, index: u8, player: Player) -> u8 {
        let value = self.get(index);
        if player.owns(value) {
            value.unsigned_abs()
        } else {
            0
        }
    }

    pub fn bar(&self, player: Player) -> u8 {
        self.count(player.bar(), player)
    }

    pub fn borne_off(&self, player: Player) -> u8 {
        self.off[player.index()]
    }

    /// Checkers of `player` still in play, bar included.
    pub fn checkers(&self, player: Player) -> u8 {
        (0..POINTS as u8).map(|i| self.count(i, player)).sum()
    }

    /// Checkers of `player` outside the home range, bar included.
    pub fn outside_home(&self, player: Player) -> u8 {
        let home = player.home();
        (0..POINTS as u8)
            .filter(|i| !home.contains(i))
            .map(|i| self.count(i, player))
            .sum()
    }

    /// Total number of pips `player` still has to travel to bear everything off.
    pub fn pip_count(&self, player: Player) -> u32 {
        (0..POINTS as u8)
            .map(|i| self.count(i, player) as u32 * (25 - player.progress(i)) as u32)
            .sum()
    }

    /// A color wins once it has no checkers left on the board or the bar.
    pub fn winner(&self) -> Option<Player> {
        Player::ALL
            .into_iter()
            .find(|&player| self.checkers(player) == 0)
    }

    pub(crate) fn remove_checker(&mut self, index: u8, player: Player) {
        self.points[index as usize] -= player.sign();
    }

    /// Places a checker and sends a lone enemy checker to its bar.
    /// Returns whether a checker was captured.
    pub(crate) fn place_checker(&mut self, index: u8, player: Player) -> bool {
        let enemy = player.opposite();
        let captured = self.count(index, enemy) == 1;
        if captured {
            self.points[index as usize] = 0;
            self.points[enemy.bar() as usize] += enemy.sign();
        }
        self.points[index as usize] += player.sign();
        captured
    }

    pub(crate) fn bear_off(&mut self, player: Player) {
        self.off[player.index()] += 1;
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let row = |f: &mut fmt::Formatter<'_>, points: &mut dyn Iterator<Item = u8>| -> fmt::Result {
            for (i, point) in points.enumerate() {
                if i == 6 {
                    write!(f, " |")?;
                }
                write!(f, " {:3}", self.get(point))?;
            }
            Ok(())
        };

        writeln!(f, " 12  11  10   9   8   7 |   6   5   4   3   2   1")?;
        row(f, &mut (1..=12u8).rev())?;
        writeln!(f, "   W bar: {}  off: {}", self.bar(Player::White), self.borne_off(Player::White))?;
        writeln!(f, "==================================================")?;
        row(f, &mut (13..=24u8))?;
        writeln!(f, "   B bar: {}  off: {}", self.bar(Player::Black), self.borne_off(Player::Black))?;
        write!(f, " 13  14  15  16  17  18 |  19  20  21  22  23  24")
    }
}
