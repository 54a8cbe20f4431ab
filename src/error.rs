use std::path::PathBuf;

use crate::backgammon::Player;

/// Why the rules reject a single checker move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Illegality {
    #[error("position {0} is neither a point nor the mover's bar")]
    InvalidOrigin(u8),

    #[error("distance {0} is outside the mover's range")]
    InvalidDistance(i8),

    #[error("a checker on the bar has to enter first")]
    BarNotCleared,

    #[error("no checker on the bar")]
    EmptyBar,

    #[error("no own checker on point {0}")]
    NotYourChecker(u8),

    #[error("bearing off needs every checker in the home board")]
    BearOffNotAllowed,

    #[error("point {0} is closed")]
    ClosedPoint(u8),

    #[error("sequence does not use the dice as fully as the rules require")]
    NotMaximal,
}

/// Errors surfaced to whoever submits a move to a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("{requested} tried to move but it is {active}'s turn")]
    NotYourTurn { requested: Player, active: Player },

    #[error("game is over, {winner} won")]
    GameOver { winner: Player },

    #[error("no die with value {0} left")]
    DieNotAvailable(u8),

    #[error("illegal move: {0}")]
    IllegalMove(#[from] Illegality),
}

/// Errors when building a board from raw counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("{player} has {count} checkers, at most 15 allowed")]
    TooManyCheckers { player: Player, count: u32 },

    #[error("bar {bar} holds checkers of the wrong color")]
    WrongBarColor { bar: u8 },

    #[error("neither side has a checker left in play")]
    NoCheckers,
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

/// Errors of a bot against bot match.
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    #[error("{0} bot panicked")]
    BotPanicked(Player),

    #[error("bot gave up: {0}")]
    Bot(#[from] MoveError),

    #[error("both bots stopped before the game was decided")]
    Unfinished,
}
