use std::{fmt, sync::Arc, thread::JoinHandle};

use crate::{
    backgammon::{Board, Player},
    bot::{Bot, BotReport},
    config::EngineConfig,
    engine::Evaluator,
    error::{MatchError, MoveError},
    game::Game,
    strategy::{Composite, Strategy},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchReport {
    pub winner: Player,
    pub turns: u32,
    pub board: Board,
    pub white: BotReport,
    pub black: BotReport,
    /// State changes seen by the judge.
    pub events: usize,
}

impl MatchReport {
    pub fn bot(&self, color: Player) -> &BotReport {
        match color {
            Player::White => &self.white,
            Player::Black => &self.black,
        }
    }
}

/// Plays one game between a white and a black bot, each on its own thread.
pub fn play_match<W, B>(white: W, black: B, config: &EngineConfig) -> Result<MatchReport, MatchError>
where
    W: Evaluator + 'static,
    B: Evaluator + 'static,
{
    let white_name = white.name().to_string();
    let black_name = black.name().to_string();

    let game = Arc::new(Game::with_config(config.game));
    let events = game.observe();

    let white = Bot::new(Player::White, white, config.search)
        .with_turn_limit(config.judge.max_turns)
        .spawn(game.clone());
    let black = Bot::new(Player::Black, black, config.search)
        .with_turn_limit(config.judge.max_turns)
        .spawn(game.clone());

    let white = join(Player::White, white);
    let black = join(Player::Black, black);
    let (white, black) = (white??, black??);

    let snapshot = game.snapshot();
    let winner = snapshot.winner.ok_or(MatchError::Unfinished)?;
    let report = MatchReport {
        winner,
        turns: snapshot.turn,
        board: snapshot.board,
        white,
        black,
        events: events.try_iter().count(),
    };

    let (winner_name, loser_name) = match winner {
        Player::White => (white_name, black_name),
        Player::Black => (black_name, white_name),
    };
    log::info!(
        "{} ({}) beats {} ({}) in {} turns",
        winner,
        winner_name,
        winner.opposite(),
        loser_name,
        report.turns
    );
    Ok(report)
}

fn join(
    color: Player,
    handle: JoinHandle<Result<BotReport, MoveError>>,
) -> Result<Result<BotReport, MoveError>, MatchError> {
    handle.join().map_err(|_| MatchError::BotPanicked(color))
}

/// Wins per color over a series of matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub games: u32,
    pub wins: [u32; 2],
    pub unfinished: u32,
}

impl Tally {
    pub fn record(&mut self, result: &Result<MatchReport, MatchError>) {
        self.games += 1;
        match result {
            Ok(report) => self.wins[report.winner.index()] += 1,
            Err(_) => self.unfinished += 1,
        }
    }

    pub fn win_rate(&self, color: Player) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.wins[color.index()] as f64 / self.games as f64 * 100.0
    }
}

/// The evaluator a bot of `color` plays with. Random parts are seeded from
/// the game seed, differently per color.
pub fn contestant(strategies: &[Strategy], color: Player, config: &EngineConfig) -> Composite {
    let seed = config.game.seed.map(|seed| seed.wrapping_mul(32).wrapping_add(color.index() as u64 * 16));
    Composite::from_strategies(strategies, seed)
}

/// Plays `config.judge.games` matches, game `n` seeded with `seed + n`, and
/// hands every result to `inspect` before counting it.
pub fn play_series(
    white: &[Strategy],
    black: &[Strategy],
    config: &EngineConfig,
    mut inspect: impl FnMut(u32, &Result<MatchReport, MatchError>),
) -> Tally {
    let mut tally = Tally::default();
    let mut game_config = config.clone();
    for game in 0..config.judge.games {
        game_config.game.seed = config.game.seed.map(|seed| seed.wrapping_add(game as u64));
        let result = play_match(
            contestant(white, Player::White, &game_config),
            contestant(black, Player::Black, &game_config),
            &game_config,
        );
        inspect(game, &result);
        tally.record(&result);
    }
    tally
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pairing {
    /// Index into the lineup.
    pub white: usize,
    pub black: usize,
    pub tally: Tally,
}

/// Results of every contestant playing every other one with both colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundRobin {
    pub names: Vec<String>,
    pub pairings: Vec<Pairing>,
}

impl RoundRobin {
    /// Games `first` won against `second`, with either color.
    pub fn wins(&self, first: usize, second: usize) -> u32 {
        self.pairings
            .iter()
            .map(|pairing| {
                if (pairing.white, pairing.black) == (first, second) {
                    pairing.tally.wins[Player::White.index()]
                } else if (pairing.white, pairing.black) == (second, first) {
                    pairing.tally.wins[Player::Black.index()]
                } else {
                    0
                }
            })
            .sum()
    }
}

/// Win matrix: the row contestant's wins against the column contestant.
impl fmt::Display for RoundRobin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.names.iter().map(String::len).max().unwrap_or(0).max(4);
        write!(f, "{:width$}", "")?;
        for name in self.names.iter() {
            write!(f, " {:>width$}", name)?;
        }
        writeln!(f)?;
        for (first, name) in self.names.iter().enumerate() {
            write!(f, "{:width$}", name)?;
            for second in 0..self.names.len() {
                if first == second {
                    write!(f, " {:>width$}", "-")?;
                } else {
                    write!(f, " {:>width$}", self.wins(first, second))?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Every entry of `lineup` plays every other one, as white and as black.
pub fn round_robin(lineup: &[Vec<Strategy>], config: &EngineConfig) -> RoundRobin {
    let names: Vec<String> = lineup
        .iter()
        .map(|strategies| Composite::from_strategies(strategies, Some(0)).name().to_string())
        .collect();
    let mut pairings = Vec::new();
    for white in 0..lineup.len() {
        for black in 0..lineup.len() {
            if white == black {
                continue;
            }
            let tally = play_series(&lineup[white], &lineup[black], config, |_, _| {});
            log::info!(
                "{} against {}: {} to {}",
                names[white],
                names[black],
                tally.wins[Player::White.index()],
                tally.wins[Player::Black.index()]
            );
            pairings.push(Pairing { white, black, tally });
        }
    }
    RoundRobin { names, pairings }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        backgammon::CHECKERS_PER_SIDE,
        engine::SearchConfig,
        game::GameConfig,
        strategy::{Doors, Killer, PushForward},
    };

    fn config(seed: u64) -> EngineConfig {
        EngineConfig {
            search: SearchConfig { depth: 0, prune: true, parallel: false },
            game: GameConfig { seed: Some(seed), ..GameConfig::default() },
            ..EngineConfig::default()
        }
    }

    #[test]
    fn test_match_ends_with_a_winner() {
        let report = play_match(PushForward, Killer, &config(3)).unwrap();
        assert_eq!(report.board.winner(), Some(report.winner));
        assert_eq!(report.board.borne_off(report.winner), CHECKERS_PER_SIDE);
        assert!(report.bot(report.winner).moves >= CHECKERS_PER_SIDE as u32);
        assert!(report.turns > 1);
        assert!(report.events > report.turns as usize);
    }

    #[test]
    fn test_seeded_match_is_reproducible() {
        let first = play_match(Doors, PushForward, &config(9)).unwrap();
        let second = play_match(Doors, PushForward, &config(9)).unwrap();
        assert_eq!(first.winner, second.winner);
        assert_eq!(first.turns, second.turns);
        assert_eq!(first.board, second.board);
    }

    #[test]
    fn test_turn_limit_abandons_match() {
        let mut config = config(4);
        config.judge.max_turns = 2;
        assert!(matches!(play_match(Killer, Killer, &config), Err(MatchError::Unfinished)));
    }

    #[test]
    fn test_tally() {
        let mut tally = Tally::default();
        tally.record(&play_match(PushForward, Doors, &config(5)));
        tally.record(&Err(MatchError::Unfinished));
        assert_eq!(tally.games, 2);
        assert_eq!(tally.unfinished, 1);
        assert_eq!(tally.win_rate(Player::White) + tally.win_rate(Player::Black), 50.0);
    }

    #[test]
    fn test_random_bot_finishes() {
        let white = contestant(&[Strategy::Random], Player::White, &config(6));
        let report = play_match(white, PushForward, &config(6)).unwrap();
        assert_eq!(report.board.winner(), Some(report.winner));
    }

    #[test]
    fn test_composite_bots_play_a_series() {
        let mut config = config(12);
        config.judge.games = 3;
        let mut seen = Vec::new();
        let tally = play_series(
            &[Strategy::Killer, Strategy::PushForward],
            &[Strategy::Doors, Strategy::Random],
            &config,
            |game, result| seen.push((game, result.is_ok())),
        );
        assert_eq!(tally.games, 3);
        assert_eq!(tally.wins[0] + tally.wins[1] + tally.unfinished, 3);
        assert_eq!(seen.iter().map(|(game, _)| *game).collect::<Vec<_>>(), vec![0, 1, 2]);
        let again = play_series(&[Strategy::Killer, Strategy::PushForward], &[Strategy::Doors, Strategy::Random], &config, |_, _| {});
        assert_eq!(tally, again);
    }

    #[test]
    fn test_round_robin_win_matrix() {
        let mut config = config(20);
        config.judge.games = 2;
        let lineup = vec![vec![Strategy::Killer, Strategy::PushForward], vec![Strategy::Doors]];
        let result = round_robin(&lineup, &config);

        assert_eq!(result.names, vec!["killer+push-forward".to_string(), "doors".to_string()]);
        assert_eq!(result.pairings.len(), 2);
        assert!(result.pairings.iter().all(|pairing| pairing.white != pairing.black));
        assert!(result.pairings.iter().all(|pairing| pairing.tally.games == 2));

        let decided: u32 = result.pairings.iter().map(|pairing| pairing.tally.wins.iter().sum::<u32>()).sum();
        assert_eq!(result.wins(0, 1) + result.wins(1, 0), decided);
        assert_eq!(result.wins(0, 0), 0);

        let matrix = result.to_string();
        let lines: Vec<_> = matrix.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("killer+push-forward"));
        assert!(lines[1].ends_with(&result.wins(0, 1).to_string()));
        assert!(lines[2].trim_end().ends_with('-'));
    }
}
