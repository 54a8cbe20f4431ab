use std::sync::{Mutex, PoisonError};

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    backgammon::{Board, CHECKERS_PER_SIDE, Player},
    engine::Evaluator,
};

const CHECKERS: f64 = CHECKERS_PER_SIDE as f64;

/// Likes enemy checkers on the bar and dislikes own ones there.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Killer;

impl Evaluator for Killer {
    fn evaluate(&self, board: &Board, player: Player) -> f64 {
        (board.bar(player.opposite()) as f64 - board.bar(player) as f64) / CHECKERS
    }

    fn bounds(&self) -> Option<(f64, f64)> {
        Some((-1.0, 1.0))
    }

    fn name(&self) -> &str {
        "killer"
    }
}

/// Races: rewards own checkers for how far they travelled, a borne off
/// checker being worth a bit more than one on the last point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PushForward;

impl PushForward {
    fn advancement(board: &Board, player: Player) -> f64 {
        let travelled: u32 = (0..=25u8)
            .map(|index| board.count(index, player) as u32 * player.progress(index) as u32)
            .sum();
        travelled as f64 / 28.0 + board.borne_off(player) as f64
    }
}

impl Evaluator for PushForward {
    fn evaluate(&self, board: &Board, player: Player) -> f64 {
        (Self::advancement(board, player) - Self::advancement(board, player.opposite())) / CHECKERS
    }

    fn bounds(&self) -> Option<(f64, f64)> {
        Some((-2.0, 2.0))
    }

    fn name(&self) -> &str {
        "push-forward"
    }
}

/// Avoids leaving single checkers open to a hit, and likes the opponent's.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Doors;

impl Doors {
    fn blots(board: &Board, player: Player) -> u32 {
        (1..=24u8).filter(|&index| board.count(index, player) == 1).count() as u32
    }
}

impl Evaluator for Doors {
    fn evaluate(&self, board: &Board, player: Player) -> f64 {
        -(Self::blots(board, player) as f64 - Self::blots(board, player.opposite()) as f64) / CHECKERS
    }

    fn bounds(&self) -> Option<(f64, f64)> {
        Some((-1.0, 1.0))
    }

    fn name(&self) -> &str {
        "doors"
    }
}

/// Ignores the board and draws a uniform score in `[-1, 1)`.
pub struct Random {
    rng: Mutex<StdRng>,
}

impl Random {
    pub fn new() -> Self {
        Random { rng: Mutex::new(StdRng::from_os_rng()) }
    }

    pub fn seeded(seed: u64) -> Self {
        Random { rng: Mutex::new(StdRng::seed_from_u64(seed)) }
    }
}

impl Default for Random {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator for Random {
    fn evaluate(&self, _board: &Board, _player: Player) -> f64 {
        self.rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .random_range(-1.0..1.0)
    }

    fn bounds(&self) -> Option<(f64, f64)> {
        Some((-1.0, 1.0))
    }

    fn name(&self) -> &str {
        "random"
    }
}

/// Names one of the built-in heuristics, e.g. in a config file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    Killer,
    #[default]
    PushForward,
    Doors,
    Random,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [Strategy::Killer, Strategy::PushForward, Strategy::Doors, Strategy::Random];

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Killer => "killer",
            Strategy::PushForward => "push-forward",
            Strategy::Doors => "doors",
            Strategy::Random => "random",
        }
    }

    /// `seed` only matters for [`Strategy::Random`]; `None` seeds from the OS.
    pub fn build(self, seed: Option<u64>) -> Box<dyn Evaluator> {
        match self {
            Strategy::Killer => Box::new(Killer),
            Strategy::PushForward => Box::new(PushForward),
            Strategy::Doors => Box::new(Doors),
            Strategy::Random => Box::new(seed.map_or_else(Random::new, Random::seeded)),
        }
    }
}

/// Sum of several evaluators. Bounds add up as long as every part has them.
pub struct Composite {
    parts: Vec<Box<dyn Evaluator>>,
    name: String,
}

impl Composite {
    pub fn new() -> Self {
        Composite { parts: Vec::new(), name: String::new() }
    }

    pub fn with(mut self, part: impl Evaluator + 'static) -> Self {
        self.push(Box::new(part));
        self
    }

    fn push(&mut self, part: Box<dyn Evaluator>) {
        if !self.name.is_empty() {
            self.name.push('+');
        }
        self.name.push_str(part.name());
        self.parts.push(part);
    }

    /// Builds the sum of `strategies`. Random parts get consecutive seeds
    /// starting at `seed`.
    pub fn from_strategies(strategies: &[Strategy], seed: Option<u64>) -> Self {
        let mut composite = Composite::new();
        for (i, strategy) in strategies.iter().enumerate() {
            composite.push(strategy.build(seed.map(|seed| seed.wrapping_add(i as u64))));
        }
        composite
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl Default for Composite {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator for Composite {
    fn evaluate(&self, board: &Board, player: Player) -> f64 {
        self.parts.iter().map(|part| part.evaluate(board, player)).sum()
    }

    fn bounds(&self) -> Option<(f64, f64)> {
        self.parts.iter().try_fold((0.0, 0.0), |(lower, upper), part| {
            part.bounds().map(|(l, u)| (lower + l, upper + u))
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
