mod board;
pub use board::{Board, CHECKERS_PER_SIDE, POINTS};

mod player;
pub use player::Player;

mod moves;
pub use moves::{Destination, Move, MoveSequence};

mod dice;
pub use dice::{Dice, DiceUsage, DiceValues};

pub mod rules;

mod movegen;
pub use movegen::{MoveEnumerator, legal_moves};
