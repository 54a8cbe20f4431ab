use std::{
    sync::Arc,
    thread::{self, JoinHandle},
};

use crate::{
    backgammon::{MoveSequence, Player},
    engine::{Evaluator, SearchConfig, find_best_move},
    error::MoveError,
    game::{Game, Snapshot},
};

/// What a bot did before it stopped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BotReport {
    pub turns: u32,
    pub moves: u32,
}

/// Plays one color of a game with the expectiminimax search.
pub struct Bot<E> {
    color: Player,
    evaluator: E,
    search: SearchConfig,
    turn_limit: Option<u32>,
}

impl<E: Evaluator> Bot<E> {
    pub fn new(color: Player, evaluator: E, search: SearchConfig) -> Self {
        Bot { color, evaluator, search, turn_limit: None }
    }

    /// Stops playing once the game reaches turn `limit`.
    pub fn with_turn_limit(mut self, limit: u32) -> Self {
        self.turn_limit = Some(limit);
        self
    }

    pub fn color(&self) -> Player {
        self.color
    }

    /// The turn the search picks for the position in `snapshot`.
    pub fn choose(&self, snapshot: &Snapshot) -> MoveSequence {
        let dice = snapshot.remaining_dice().to_vec();
        find_best_move(&snapshot.board, &dice, self.color, &self.evaluator, self.search).sequence
    }

    /// Plays whenever it is this bot's turn and sleeps on the game's channel
    /// otherwise. Returns once the game is decided, the channel is closed or
    /// the turn limit is reached.
    pub fn run(&self, game: &Game) -> Result<BotReport, MoveError> {
        let events = game.subscribe(self.color);
        let mut report = BotReport::default();
        let mut failed_turn = None;

        loop {
            let snapshot = game.snapshot();
            if snapshot.is_finished() {
                return Ok(report);
            }
            if self.turn_limit.is_some_and(|limit| snapshot.turn > limit) {
                log::debug!("{} bot stops at turn {}", self.color, snapshot.turn);
                return Ok(report);
            }

            if snapshot.active == self.color {
                let sequence = self.choose(&snapshot);
                match game.play(self.color, &sequence) {
                    Ok(()) => {
                        report.turns += 1;
                        report.moves += sequence.len() as u32;
                    }
                    Err(err) => {
                        log::warn!("{} bot could not play {}: {}", self.color, sequence, err);
                        if failed_turn == Some(snapshot.turn) {
                            return Err(err);
                        }
                        failed_turn = Some(snapshot.turn);
                    }
                }
                continue;
            }

            if events.recv().is_err() {
                log::debug!("{} bot lost its game channel", self.color);
                return Ok(report);
            }
        }
    }
}

impl<E: Evaluator + 'static> Bot<E> {
    /// Runs the bot on its own thread. The game is closed when the bot stops,
    /// so a waiting opponent does not block forever.
    pub fn spawn(self, game: Arc<Game>) -> JoinHandle<Result<BotReport, MoveError>> {
        thread::spawn(move || {
            let result = self.run(&game);
            game.close();
            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        backgammon::{Board, Dice, POINTS},
        game::GameConfig,
        strategy::{Killer, PushForward},
    };

    fn board(checkers: &[(usize, i8)]) -> Board {
        let mut points = [0; POINTS];
        for &(index, count) in checkers {
            points[index] = count;
        }
        Board::from_points(points).unwrap()
    }

    fn seeded(seed: u64) -> GameConfig {
        GameConfig { seed: Some(seed), ..GameConfig::default() }
    }

    const GREEDY: SearchConfig = SearchConfig { depth: 0, prune: true, parallel: false };

    #[test]
    fn test_bot_finishes_the_game() {
        let game = Game::from_position(board(&[(24, 1), (23, 1), (3, -4)]), Player::White, Dice::new(2, 1), seeded(5));
        let bot = Bot::new(Player::White, PushForward, GREEDY);
        let report = bot.run(&game).unwrap();
        assert_eq!(report, BotReport { turns: 1, moves: 2 });
        assert_eq!(game.winner(), Some(Player::White));
    }

    #[test]
    fn test_bot_chooses_full_turn() {
        let game = Game::from_position(Board::new(), Player::White, Dice::new(6, 5), seeded(5));
        let bot = Bot::new(Player::White, Killer, GREEDY);
        assert_eq!(bot.choose(&game.snapshot()).len(), 2);
    }

    #[test]
    fn test_bot_returns_when_game_is_closed() {
        let game = Game::from_position(Board::new(), Player::Black, Dice::new(6, 5), seeded(5));
        game.close();
        let report = Bot::new(Player::White, Killer, GREEDY).run(&game).unwrap();
        assert_eq!(report, BotReport::default());
    }

    #[test]
    fn test_spawned_bot_wakes_up_on_its_turn() {
        let game = Arc::new(Game::from_position(Board::new(), Player::Black, Dice::new(6, 5), seeded(5)));
        let handle = Bot::new(Player::White, PushForward, GREEDY).with_turn_limit(2).spawn(game.clone());

        let sequence = Bot::new(Player::Black, PushForward, GREEDY).choose(&game.snapshot());
        game.play(Player::Black, &sequence).unwrap();

        let report = handle.join().unwrap().unwrap();
        assert_eq!(report.turns, 1);
        assert_eq!(game.snapshot().active, Player::Black);
    }
}
