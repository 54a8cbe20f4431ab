use std::{path::Path, process::ExitCode, time::Instant};

use backgammon::{
    backgammon::Player,
    config::EngineConfig,
    engine::Evaluator,
    judge::{play_series, round_robin},
    strategy::Composite,
};

fn main() -> ExitCode {
    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::load(Path::new(&path)),
        None => Ok(EngineConfig::default()),
    };
    let config = match config {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    if !config.judge.lineup.is_empty() {
        let start = Instant::now();
        let result = round_robin(&config.judge.lineup, &config);
        println!("Wins of each row against each column, {} games per pairing:", config.judge.games);
        print!("{}", result);
        println!("Round robin took: {:?}", start.elapsed());
        return ExitCode::SUCCESS;
    }

    let (white, black) = (&config.judge.white, &config.judge.black);
    let mut start = Instant::now();
    let tally = play_series(white, black, &config, |game, result| {
        match result {
            Ok(report) => {
                println!("=========================================================");
                println!("{}", report.board);
                println!(
                    "{} wins after {} turns, white moved {} checkers, black moved {}",
                    report.winner, report.turns, report.white.moves, report.black.moves
                );
            }
            Err(err) => println!("game {} not decided: {}", game + 1, err),
        }
        println!("Game took: {:?}", start.elapsed());
        start = Instant::now();
    });

    println!("============================================");
    println!(
        "Games: {}, White ({}) Wins: {}, Black ({}) Wins: {}, Unfinished: {}",
        tally.games,
        Composite::from_strategies(white, None).name(),
        tally.wins[Player::White.index()],
        Composite::from_strategies(black, None).name(),
        tally.wins[Player::Black.index()],
        tally.unfinished
    );
    println!(
        "White Win Rate: {:.2}%, Black Win Rate: {:.2}%",
        tally.win_rate(Player::White),
        tally.win_rate(Player::Black)
    );
    ExitCode::SUCCESS
}
