//! Making moves.
//!
//! A move relocates a chessman and clears its origin. Whatever stood on
//! the destination is overwritten; there is no capture log, no move
//! counter and no check detection. Notation for a move is derived
//! separately, see [`crate::notation::stdalg`].

use crate::{
    error::MoveError,
    model::{Board, ChessColor, ChessMove, Square, movegen::destinations},
};

/// Make a move on a copy of `board`, leaving `board` untouched.
///
/// If the origin square of `mv` is empty the copy is returned unchanged.
/// The move is not checked against the movement rules; use [`try_move`]
/// for requests that come from outside the engine.
pub fn apply_move(board: &Board, mv: ChessMove) -> Board {
    let mut res = *board;
    make_move(&mut res, mv);
    res
}

/// Make a move in place.
pub fn make_move(board: &mut Board, mv: ChessMove) {
    if let Some(cm) = board.get(mv.from) {
        board.set(mv.from, None);
        board.set(mv.to, Some(cm));
    }
}

/// Check a move request against the movement rules.
///
/// The origin must hold a chessman of `side` and `to` must be one of its
/// generated destinations.
pub fn validate_move(
    board: &Board,
    from: Square,
    to: Square,
    side: ChessColor,
) -> Result<ChessMove, MoveError> {
    let cm = board.get(from).ok_or(MoveError::EmptyOrigin(from))?;
    if cm.col() != side {
        return Err(MoveError::WrongSide {
            square: from,
            owner: cm.col(),
            side,
        });
    }
    if !destinations(board, from, side).contains(&to) {
        return Err(MoveError::Unreachable { from, to });
    }
    Ok(ChessMove::new(cm.piece(), from, to))
}

/// Validate a move request and, if accepted, make it on a copy.
pub fn try_move(
    board: &Board,
    from: Square,
    to: Square,
    side: ChessColor,
) -> Result<(Board, ChessMove), MoveError> {
    let mv = validate_move(board, from, to, side)?;
    Ok((apply_move(board, mv), mv))
}
