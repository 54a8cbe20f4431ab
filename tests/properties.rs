use backgammon::{
    backgammon::{Board, CHECKERS_PER_SIDE, Dice, MoveEnumerator, Player, legal_moves, rules},
    game::{Game, GameConfig},
};
use rand::{Rng, SeedableRng, rngs::StdRng};

fn assert_consistent(board: &Board) {
    for player in Player::ALL {
        assert_eq!(
            board.checkers(player) + board.borne_off(player),
            CHECKERS_PER_SIDE,
            "{} lost track of a checker\n{}",
            player,
            board
        );
    }
    assert!(board.get(Player::White.bar()) >= 0);
    assert!(board.get(Player::Black.bar()) <= 0);
    assert_eq!(Board::from_points(*board.points()).as_ref(), Ok(board));
}

/// Plays random legal turns from the start until someone wins, calling
/// `visit` on every position and roll along the way.
fn random_playout(seed: u64, mut visit: impl FnMut(&Board, &[u8], Player)) -> Player {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut board = Board::new();
    let mut player = if rng.random_bool(0.5) { Player::White } else { Player::Black };

    for _ in 0..5000 {
        if let Some(winner) = board.winner() {
            return winner;
        }
        let dice = Dice::roll(&mut rng).remaining().to_vec();
        visit(&board, &dice, player);

        let moves = legal_moves(&board, &dice, player);
        let (sequence, next) = moves[rng.random_range(0..moves.len())];

        let mut replay = board;
        for mv in sequence.iter() {
            replay = rules::apply(&replay, mv.position, mv.distance, player).unwrap();
            assert_consistent(&replay);
        }
        assert_eq!(replay, next);

        board = next;
        player = player.opposite();
    }
    panic!("random game {} did not finish", seed);
}

#[test]
fn checkers_are_conserved_in_random_games() {
    for seed in 0..20 {
        let winner = random_playout(seed, |board, _, _| assert_consistent(board));
        assert!(Player::ALL.contains(&winner));
    }
}

#[test]
fn nothing_to_play_iff_only_empty_sequence() {
    for seed in 100..110 {
        random_playout(seed, |board, dice, player| {
            let sequences: Vec<_> = MoveEnumerator::new(*board, dice, player).collect();
            let only_empty = sequences.iter().all(|(sequence, _)| sequence.is_empty());
            assert_eq!(rules::has_any_legal_move(board, dice, player), !only_empty);
        });
    }
}

#[test]
fn legal_turns_use_as_many_dice_as_possible() {
    for seed in 200..205 {
        random_playout(seed, |board, dice, player| {
            let longest = MoveEnumerator::new(*board, dice, player)
                .map(|(sequence, _)| sequence.len())
                .max()
                .unwrap_or(0);
            let moves = legal_moves(board, dice, player);
            assert!(!moves.is_empty());
            assert!(moves.iter().all(|(sequence, _)| sequence.len() == longest));
        });
    }
}

#[test]
fn game_driven_by_random_players_finishes() {
    for seed in 0..5 {
        let game = Game::with_config(GameConfig { seed: Some(seed), ..GameConfig::default() });
        let mut rng = StdRng::seed_from_u64(seed + 1000);
        let mut last_turn = 0;

        while game.winner().is_none() {
            let snapshot = game.snapshot();
            assert_consistent(&snapshot.board);
            assert!(snapshot.turn > last_turn);
            last_turn = snapshot.turn;

            let dice = snapshot.remaining_dice().to_vec();
            let moves = legal_moves(&snapshot.board, &dice, snapshot.active);
            let (sequence, next) = moves[rng.random_range(0..moves.len())];
            game.play(snapshot.active, &sequence).unwrap();
            if game.winner().is_none() {
                assert_eq!(game.snapshot().board, next);
            }
            assert!(last_turn < 5000, "game {} did not finish", seed);
        }

        let snapshot = game.snapshot();
        assert_consistent(&snapshot.board);
        assert_eq!(snapshot.board.winner(), snapshot.winner);
    }
}
