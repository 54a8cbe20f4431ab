use hashbrown::HashSet;

use crate::backgammon::{Board, DiceValues, Move, MoveSequence, POINTS, Player, rules};

/// Lazily walks every way of playing a dice multiset from a board.
///
/// The walk is depth first over an explicit stack. Every branch that runs out
/// of dice, or cannot play any of the dice it has left, yields its moves
/// together with the resulting board, so sequences of different lengths can
/// be produced for the same roll. Use [`legal_moves`] for the sequences the
/// rules actually allow.
pub struct MoveEnumerator {
    player: Player,
    stack: Vec<Frame>,
}

struct Frame {
    board: Board,
    dice: DiceValues,
    sequence: MoveSequence,
    die: usize,
    origin: u8,
    expanded: bool,
}

impl MoveEnumerator {
    /// Only the first four values of `dice` are considered.
    pub fn new(board: Board, dice: &[u8], player: Player) -> Self {
        MoveEnumerator {
            player,
            stack: vec![Frame::new(board, DiceValues::from_slice(dice), MoveSequence::new())],
        }
    }
}

impl Iterator for MoveEnumerator {
    type Item = (MoveSequence, Board);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = self.stack.last_mut()?;
            if frame.dice.is_empty() {
                return self.stack.pop().map(Frame::into_leaf);
            }
            match frame.advance(self.player) {
                Some(child) => {
                    frame.expanded = true;
                    self.stack.push(child);
                }
                None => {
                    if let Some(frame) = self.stack.pop() {
                        if !frame.expanded {
                            return Some(frame.into_leaf());
                        }
                    }
                }
            }
        }
    }
}

impl Frame {
    fn new(board: Board, dice: DiceValues, sequence: MoveSequence) -> Self {
        Frame { board, dice, sequence, die: 0, origin: 0, expanded: false }
    }

    fn into_leaf(self) -> (MoveSequence, Board) {
        (self.sequence, self.board)
    }

    /// Finds the next legal single move from this frame and returns the frame
    /// it leads to.
    fn advance(&mut self, player: Player) -> Option<Frame> {
        while let Some(&value) = self.dice.get(self.die) {
            let repeated = self.dice.iter().take(self.die).any(|&v| v == value);
            if !repeated {
                // plays of one value commute, keep them in travel order
                let floor = match self.sequence.last() {
                    Some(last) if last.die() == value => player.progress(last.position),
                    _ => 0,
                };
                while (self.origin as usize) < POINTS {
                    let origin = self.origin;
                    self.origin += 1;
                    if player.progress(origin) < floor {
                        continue;
                    }
                    let mv = Move::for_player(player, origin, value);
                    if let Ok(board) = rules::apply(&self.board, origin, mv.distance, player) {
                        let mut dice = self.dice;
                        dice.remove(&value);
                        let mut sequence = self.sequence;
                        sequence.push(mv);
                        return Some(Frame::new(board, dice, sequence));
                    }
                }
            }
            self.die += 1;
            self.origin = 0;
        }
        None
    }
}

/// The turns `player` may legally play with `dice`.
///
/// Only sequences using as many dice as possible are kept; when a single die
/// can be played the larger one has to be used if it can. Sequences reaching
/// the same board are reported once. When nothing can be played the result
/// is the single empty sequence.
pub fn legal_moves(board: &Board, dice: &[u8], player: Player) -> Vec<(MoveSequence, Board)> {
    let mut candidates: Vec<_> = MoveEnumerator::new(*board, dice, player).collect();

    let longest = candidates.iter().map(|(sequence, _)| sequence.len()).max().unwrap_or(0);
    candidates.retain(|(sequence, _)| sequence.len() == longest);

    if longest == 1 {
        if let Some(&largest) = dice.iter().max() {
            let plays_largest = |sequence: &MoveSequence| sequence.first().is_some_and(|mv| mv.die() == largest);
            if candidates.iter().any(|(sequence, _)| plays_largest(sequence)) {
                candidates.retain(|(sequence, _)| plays_largest(sequence));
            }
        }
    }

    let mut seen = HashSet::with_capacity(candidates.len());
    candidates.retain(|(_, board)| seen.insert(*board));
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(checkers: &[(usize, i8)]) -> Board {
        let mut points = [0; POINTS];
        for &(index, count) in checkers {
            points[index] = count;
        }
        Board::from_points(points).unwrap()
    }

    #[test]
    fn test_empty_dice_yields_empty_sequence() {
        let all: Vec<_> = MoveEnumerator::new(Board::new(), &[], Player::White).collect();
        assert_eq!(all.len(), 1);
        assert!(all[0].0.is_empty());
        assert_eq!(all[0].1, Board::new());
    }

    #[test]
    fn test_every_yielded_sequence_replays() {
        for player in Player::ALL {
            for dice in [[3u8, 1], [6, 6], [5, 2]] {
                let values = crate::backgammon::Dice::new(dice[0], dice[1]).remaining();
                for (sequence, result) in MoveEnumerator::new(Board::new(), &values.to_vec(), player) {
                    let mut replay = Board::new();
                    for mv in sequence.iter() {
                        replay = rules::apply(&replay, mv.position, mv.distance, player).unwrap();
                    }
                    assert_eq!(replay, result);
                }
            }
        }
    }

    #[test]
    fn test_opening_three_one() {
        let moves = legal_moves(&Board::new(), &[3, 1], Player::White);
        assert!(moves.iter().all(|(sequence, _)| sequence.len() == 2));
        // making the five point: 17 -> 20 and 19 -> 20
        assert!(moves.iter().any(|(_, b)| b.get(20) == 2 && b.get(17) == 2 && b.get(19) == 4));
        let unique: HashSet<_> = moves.iter().map(|(_, b)| *b).collect();
        assert_eq!(unique.len(), moves.len());
    }

    #[test]
    fn test_stuck_on_bar_yields_empty_sequence() {
        let blocked = board(&[(0, 1), (1, -2), (2, -2), (3, -2), (4, -2), (5, -2), (6, -2), (12, 3)]);
        let all: Vec<_> = MoveEnumerator::new(blocked, &[3, 5], Player::White).collect();
        assert_eq!(all.len(), 1);
        assert!(all[0].0.is_empty());
        assert!(!rules::has_any_legal_move(&blocked, &[3, 5], Player::White));

        let moves = legal_moves(&blocked, &[3, 5], Player::White);
        assert_eq!(moves.len(), 1);
        assert!(moves[0].0.is_empty());
    }

    #[test]
    fn test_both_dice_must_be_played() {
        // bearing off with the 6 needs the 1 to bring the checker on 18 home
        // first, while 20 -> 21 with the 1 leaves the 6 unplayable
        let b = board(&[(18, 1), (20, 1), (24, -2)]);
        let raw: Vec<_> = MoveEnumerator::new(b, &[6, 1], Player::White).collect();
        assert!(raw.iter().any(|(sequence, _)| sequence.len() == 1));
        let moves = legal_moves(&b, &[6, 1], Player::White);
        assert!(!moves.is_empty());
        assert!(moves.iter().all(|(sequence, _)| sequence.len() == 2));
    }

    #[test]
    fn test_larger_die_when_only_one_playable() {
        // white on 12: the 6 reaches 18, the 2 reaches 14; the other die
        // would then land on the closed 20
        let b = board(&[(12, 1), (20, -2)]);
        let moves = legal_moves(&b, &[6, 2], Player::White);
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].0.len(), 1);
        assert_eq!(moves[0].0.first().map(|mv| mv.die()), Some(6));
    }

    #[test]
    fn test_doubles_play_four_times() {
        let moves = legal_moves(&Board::new(), &[6, 6, 6, 6], Player::White);
        assert!(moves.iter().all(|(sequence, _)| sequence.len() == 4));
        // both back checkers run to 13 can not happen: 13 is black's
        assert!(moves.iter().all(|(_, b)| b.get(13) <= 0));
        for (sequence, _) in moves.iter() {
            let progress: Vec<_> = sequence.iter().map(|mv| Player::White.progress(mv.position)).collect();
            assert!(progress.windows(2).all(|w| w[0] <= w[1]), "{:?}", sequence);
        }
    }

    #[test]
    fn test_black_bears_off() {
        let b = board(&[(20, 1), (2, -1), (5, -1)]);
        assert_eq!(b.winner(), None);
        let moves = legal_moves(&b, &[5, 2], Player::Black);
        assert!(moves.iter().any(|(_, next)| next.winner() == Some(Player::Black)));
        assert!(moves.iter().all(|(_, next)| next.winner() != Some(Player::White)));
    }
}
