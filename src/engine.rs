use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::backgammon::{Board, Dice, MoveSequence, Player, legal_moves};

pub const MAX_DEPTH: u8 = 3;

/// Scores a board for `player`, higher is better.
pub trait Evaluator: Send + Sync {
    fn evaluate(&self, board: &Board, player: Player) -> f64;

    /// Inclusive range of every value [`Evaluator::evaluate`] can return.
    /// Known bounds let chance nodes be cut off early.
    fn bounds(&self) -> Option<(f64, f64)> {
        None
    }

    fn name(&self) -> &str {
        "custom"
    }
}

impl<F> Evaluator for F
where
    F: Fn(&Board, Player) -> f64 + Send + Sync,
{
    fn evaluate(&self, board: &Board, player: Player) -> f64 {
        self(board, player)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Chance plies searched after the move being chosen.
    pub depth: u8,
    pub prune: bool,
    /// Score the root candidates on the rayon pool.
    pub parallel: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            depth: 1,
            prune: true,
            parallel: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchResult {
    pub sequence: MoveSequence,
    pub board: Board,
    pub value: f64,
}

pub struct Search<'a, E: Evaluator + ?Sized> {
    evaluator: &'a E,
    config: SearchConfig,
}

impl<'a, E: Evaluator + ?Sized> Search<'a, E> {
    pub fn new(evaluator: &'a E, config: SearchConfig) -> Self {
        Search { evaluator, config }
    }

    /// Picks the turn with the highest expected value for `player`. Ties go to
    /// the candidate enumerated first, so equal inputs give equal answers.
    pub fn best_move(&self, board: &Board, dice: &[u8], player: Player) -> SearchResult {
        let candidates = legal_moves(board, dice, player);
        let opponent = player.opposite();
        let depth = self.config.depth;

        let values: Vec<f64> = if self.config.parallel && candidates.len() > 1 {
            candidates
                .par_iter()
                .map(|(_, next)| self.chance(next, player, opponent, depth, f64::NEG_INFINITY, f64::INFINITY))
                .collect()
        } else {
            let mut alpha = f64::NEG_INFINITY;
            candidates
                .iter()
                .map(|(_, next)| {
                    let value = self.chance(next, player, opponent, depth, alpha, f64::INFINITY);
                    if self.config.prune {
                        alpha = alpha.max(value);
                    }
                    value
                })
                .collect()
        };

        let mut best = 0;
        for (i, &value) in values.iter().enumerate() {
            log::trace!("{:?} scores {}", candidates[i].0, value);
            if value > values[best] {
                best = i;
            }
        }

        let (sequence, next) = candidates[best];
        log::debug!(
            "{} picks {:?} out of {} candidates ({}, value {})",
            player,
            sequence,
            candidates.len(),
            self.evaluator.name(),
            values[best]
        );
        SearchResult { sequence, board: next, value: values[best] }
    }

    /// Expected value for `perspective` of `board` before `to_move` rolls.
    pub fn expected_value(&self, board: &Board, to_move: Player, perspective: Player) -> f64 {
        self.chance(board, perspective, to_move, self.config.depth, f64::NEG_INFINITY, f64::INFINITY)
    }

    fn bounds(&self) -> (f64, f64) {
        match self.evaluator.bounds() {
            Some(bounds) if self.config.prune => bounds,
            _ => (f64::NEG_INFINITY, f64::INFINITY),
        }
    }

    fn chance(&self, board: &Board, root: Player, mover: Player, plies: u8, alpha: f64, beta: f64) -> f64 {
        if plies == 0 || board.winner().is_some() {
            return self.evaluator.evaluate(board, root);
        }

        let (lower, upper) = self.bounds();
        let mut total = 0.0;
        let mut remaining = Dice::TOTAL_WEIGHT;

        for (dice, weight) in Dice::ALL_WITH_WEIGHT.iter() {
            remaining -= weight;
            let (child_alpha, child_beta) = if self.config.prune {
                (
                    (Dice::TOTAL_WEIGHT * alpha - total - mass(remaining, upper)) / weight,
                    (Dice::TOTAL_WEIGHT * beta - total - mass(remaining, lower)) / weight,
                )
            } else {
                (f64::NEG_INFINITY, f64::INFINITY)
            };

            let value = self.decision(board, &dice.remaining().to_vec(), root, mover, plies, child_alpha, child_beta);
            total += weight * value;

            if self.config.prune {
                let most = total + mass(remaining, upper);
                if most <= Dice::TOTAL_WEIGHT * alpha || (child_alpha.is_finite() && value <= child_alpha) {
                    return (most / Dice::TOTAL_WEIGHT).min(alpha);
                }
                let least = total + mass(remaining, lower);
                if least >= Dice::TOTAL_WEIGHT * beta || (child_beta.is_finite() && value >= child_beta) {
                    return (least / Dice::TOTAL_WEIGHT).max(beta);
                }
            }
        }

        total / Dice::TOTAL_WEIGHT
    }

    #[allow(clippy::too_many_arguments)]
    fn decision(
        &self,
        board: &Board,
        dice: &[u8],
        root: Player,
        mover: Player,
        plies: u8,
        mut alpha: f64,
        mut beta: f64,
    ) -> f64 {
        let maximizing = mover == root;
        let mut best = if maximizing { f64::NEG_INFINITY } else { f64::INFINITY };

        for (_, next) in legal_moves(board, dice, mover) {
            let value = self.chance(&next, root, mover.opposite(), plies - 1, alpha, beta);
            if maximizing {
                best = best.max(value);
                if self.config.prune {
                    if best >= beta {
                        break;
                    }
                    alpha = alpha.max(best);
                }
            } else {
                best = best.min(value);
                if self.config.prune {
                    if best <= alpha {
                        break;
                    }
                    beta = beta.min(best);
                }
            }
        }

        best
    }
}

/// Probability mass times a bound, where an empty mass contributes nothing
/// even against an infinite bound.
fn mass(weight: f64, bound: f64) -> f64 {
    if weight == 0.0 { 0.0 } else { weight * bound }
}

/// Expectiminimax: every legal turn is scored by a chance node over the 21
/// distinct rolls, the opponent minimising, until `config.depth` is spent.
pub fn find_best_move<E: Evaluator + ?Sized>(
    board: &Board,
    dice: &[u8],
    player: Player,
    evaluator: &E,
    config: SearchConfig,
) -> SearchResult {
    Search::new(evaluator, config).best_move(board, dice, player)
}
