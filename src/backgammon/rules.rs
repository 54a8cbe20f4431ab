use crate::{
    backgammon::{Board, Destination, Player},
    error::{Illegality, MoveError},
};

/// Checks a single move and returns where the checker would end up.
/// `distance` carries the mover's direction: White plays `1..=6`, Black `-6..=-1`.
pub fn check(board: &Board, position: u8, distance: i8, player: Player) -> Result<Destination, Illegality> {
    let bar = player.bar();
    if !(1..=24).contains(&position) && position != bar {
        return Err(Illegality::InvalidOrigin(position));
    }

    if distance.signum() != player.sign() || distance.unsigned_abs() > 6 {
        return Err(Illegality::InvalidDistance(distance));
    }

    if position == bar {
        if board.bar(player) == 0 {
            return Err(Illegality::EmptyBar);
        }
    } else {
        if board.bar(player) > 0 {
            return Err(Illegality::BarNotCleared);
        }
        if board.count(position, player) == 0 {
            return Err(Illegality::NotYourChecker(position));
        }
    }

    let target = position as i8 + distance;
    if player.goes_off(target) {
        return if board.outside_home(player) == 0 {
            Ok(Destination::Off)
        } else {
            Err(Illegality::BearOffNotAllowed)
        };
    }

    let target = target as u8;
    if board.count(target, player.opposite()) >= 2 {
        return Err(Illegality::ClosedPoint(target));
    }

    Ok(Destination::Point(target))
}

pub fn is_legal(board: &Board, position: u8, distance: i8, player: Player) -> bool {
    check(board, position, distance, player).is_ok()
}

/// Applies one move to a copy of `board`. A lone enemy checker on the
/// destination is sent to its bar, a checker past the edge is borne off.
pub fn apply(board: &Board, position: u8, distance: i8, player: Player) -> Result<Board, MoveError> {
    let destination = check(board, position, distance, player)?;
    let mut next = *board;
    next.remove_checker(position, player);
    match destination {
        Destination::Point(target) => {
            next.place_checker(target, player);
        }
        Destination::Off => next.bear_off(player),
    }
    Ok(next)
}

/// Whether any of the remaining `dice` can be played at all.
pub fn has_any_legal_move(board: &Board, dice: &[u8], player: Player) -> bool {
    let bar = player.bar();
    let origins = if board.bar(player) > 0 { bar..=bar } else { 1..=24 };
    dice.iter().any(|&die| {
        let distance = player.sign() * die as i8;
        origins.clone().any(|position| is_legal(board, position, distance, player))
    })
}

/// The color with no checkers left on the board or bar.
pub fn winner(board: &Board) -> Option<Player> {
    board.winner()
}
