//! Terminal-position classification.

use crate::attacks::is_in_check;
use crate::board::Board;
use crate::legal::has_legal_move;
use crate::types::*;

/// Classify the position for the side to move.
///
/// Any legal move means `Active`, whether or not `color` is in check.
/// Otherwise `Checkmate` when in check, `Stalemate` when not. Exhaustive
/// over all own pieces and all 64 destinations, so call it at most once per
/// ply.
pub fn terminal_status(board: &Board, color: Color) -> GameStatus {
    if has_legal_move(board, color) {
        return GameStatus::Active;
    }
    if is_in_check(board, color) {
        GameStatus::Checkmate
    } else {
        GameStatus::Stalemate
    }
}

/// Bare kings, or a single bishop or knight against a bare king. Any pawn,
/// rook or queen on the board counts as sufficient material.
pub fn is_insufficient_material(board: &Board) -> bool {
    let mut minors = 0;
    for sq in Square::all() {
        let Some(pc) = board.get(sq) else { continue };
        match pc.kind {
            PieceKind::King => {}
            PieceKind::Knight | PieceKind::Bishop => minors += 1,
            PieceKind::Pawn | PieceKind::Rook | PieceKind::Queen => return false,
        }
    }
    minors <= 1
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod status_tests;
