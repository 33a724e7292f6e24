//! Pseudo-legal move rules: per-piece geometry against board occupancy.
//!
//! Nothing in here looks at check. The attack detector is built on top of
//! these rules, and the legal-move validator on top of the detector.

use crate::board::Board;
use crate::error::MoveError;
use crate::types::*;

/// Could `piece`, standing on `from`, reach `to` given current occupancy?
pub fn pseudo_legal(board: &Board, from: Square, to: Square, piece: Piece) -> Result<(), MoveError> {
    if !from.in_bounds() || !to.in_bounds() {
        return Err(MoveError::OutOfBounds);
    }
    if let Some(target) = board.get(to)
        && target.color == piece.color
    {
        return Err(MoveError::SameColorCapture);
    }

    match piece.kind {
        PieceKind::Pawn => pawn(board, from, to, piece.color),
        PieceKind::Knight => knight(from, to),
        PieceKind::Bishop => bishop(board, from, to),
        PieceKind::Rook => rook(board, from, to),
        PieceKind::Queen => queen(board, from, to),
        PieceKind::King => king(from, to),
    }
}

fn deltas(from: Square, to: Square) -> (i8, i8) {
    (
        to.rank as i8 - from.rank as i8,
        to.file as i8 - from.file as i8,
    )
}

fn pawn(board: &Board, from: Square, to: Square, color: Color) -> Result<(), MoveError> {
    let (dr, df) = deltas(from, to);
    let dir = color.pawn_direction();
    let dest_empty = board.get(to).is_none();

    // single push
    if df == 0 && dr == dir && dest_empty {
        return Ok(());
    }

    // double push from the starting rank, both squares clear
    if df == 0 && dr == 2 * dir && from.rank == color.pawn_start_rank() {
        let passed = from.offset(dir, 0);
        if dest_empty && passed.is_some_and(|sq| board.get(sq).is_none()) {
            return Ok(());
        }
    }

    // diagonal capture; same-color occupants were rejected already
    if df.abs() == 1 && dr == dir && !dest_empty {
        return Ok(());
    }

    Err(MoveError::WrongPieceShape(PieceKind::Pawn))
}

fn knight(from: Square, to: Square) -> Result<(), MoveError> {
    let (dr, df) = deltas(from, to);
    match (dr.abs(), df.abs()) {
        (1, 2) | (2, 1) => Ok(()),
        _ => Err(MoveError::WrongPieceShape(PieceKind::Knight)),
    }
}

fn king(from: Square, to: Square) -> Result<(), MoveError> {
    let (dr, df) = deltas(from, to);
    if dr.abs() <= 1 && df.abs() <= 1 {
        Ok(())
    } else {
        Err(MoveError::WrongPieceShape(PieceKind::King))
    }
}

fn is_diagonal(from: Square, to: Square) -> bool {
    let (dr, df) = deltas(from, to);
    dr != 0 && dr.abs() == df.abs()
}

fn is_straight(from: Square, to: Square) -> bool {
    let (dr, df) = deltas(from, to);
    (dr == 0) != (df == 0)
}

/// Every square strictly between `from` and `to` is empty. Callers
/// guarantee the two squares share a rank, file or diagonal.
fn path_clear(board: &Board, from: Square, to: Square) -> bool {
    let (dr, df) = deltas(from, to);
    let step = (dr.signum(), df.signum());
    let mut cur = from.offset(step.0, step.1);
    while let Some(sq) = cur {
        if sq == to {
            return true;
        }
        if board.get(sq).is_some() {
            return false;
        }
        cur = sq.offset(step.0, step.1);
    }
    true
}

fn bishop(board: &Board, from: Square, to: Square) -> Result<(), MoveError> {
    if !is_diagonal(from, to) {
        return Err(MoveError::WrongPieceShape(PieceKind::Bishop));
    }
    if !path_clear(board, from, to) {
        return Err(MoveError::PathBlocked);
    }
    Ok(())
}

fn rook(board: &Board, from: Square, to: Square) -> Result<(), MoveError> {
    if !is_straight(from, to) {
        return Err(MoveError::WrongPieceShape(PieceKind::Rook));
    }
    if !path_clear(board, from, to) {
        return Err(MoveError::PathBlocked);
    }
    Ok(())
}

fn queen(board: &Board, from: Square, to: Square) -> Result<(), MoveError> {
    match (bishop(board, from, to), rook(board, from, to)) {
        (Ok(()), _) | (_, Ok(())) => Ok(()),
        (Err(MoveError::PathBlocked), _) | (_, Err(MoveError::PathBlocked)) => {
            Err(MoveError::PathBlocked)
        }
        _ => Err(MoveError::WrongPieceShape(PieceKind::Queen)),
    }
}

#[cfg(test)]
#[path = "rules_tests.rs"]
mod rules_tests;
