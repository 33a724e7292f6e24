use crate::attacks::is_in_check;
use crate::board::Board;
use crate::error::MoveError;
use crate::rules::pseudo_legal;
use crate::types::*;

/// Full legality for `color` moving `from -> to`: pseudo-legal, and the
/// resulting position does not leave `color`'s king attacked.
///
/// Only the position after this move is inspected.
pub fn is_legal(board: &Board, from: Square, to: Square, color: Color) -> Result<(), MoveError> {
    if !from.in_bounds() || !to.in_bounds() {
        return Err(MoveError::OutOfBounds);
    }
    let piece = board.get(from).ok_or(MoveError::EmptySquare(from))?;
    if piece.color != color {
        return Err(MoveError::WrongTurn(format!(
            "the piece on {from} belongs to {}",
            piece.color
        )));
    }

    pseudo_legal(board, from, to, piece)?;

    let after = board.with_move(from, to);
    if is_in_check(&after, color) {
        return Err(MoveError::SelfCheck);
    }
    Ok(())
}

/// Every legal move for `color`, origin squares in rank-then-file order.
pub fn legal_moves(board: &Board, color: Color) -> Vec<MoveRequest> {
    let mut out = Vec::with_capacity(64);
    legal_moves_into(board, color, &mut out);
    out
}

/// Same as [`legal_moves`] but reuses the caller's buffer.
pub fn legal_moves_into(board: &Board, color: Color, out: &mut Vec<MoveRequest>) {
    out.clear();
    for (from, _) in board.pieces(color) {
        for to in Square::all() {
            if is_legal(board, from, to, color).is_ok() {
                out.push(MoveRequest::new(from, to));
            }
        }
    }
}

/// Whether `color` has at least one legal move. Stops at the first hit.
pub fn has_legal_move(board: &Board, color: Color) -> bool {
    board
        .pieces(color)
        .any(|(from, _)| Square::all().any(|to| is_legal(board, from, to, color).is_ok()))
}

#[cfg(test)]
#[path = "legal_tests.rs"]
mod legal_tests;
