//! Attack and check detection.
//!
//! Built strictly on the pseudo-legal rules: this module must never call
//! into the legal-move validator, which itself depends on `is_in_check`.

use tracing::warn;

use crate::board::Board;
use crate::rules::pseudo_legal;
use crate::types::*;

/// True iff some piece of `by` could pseudo-legally move onto `target`.
pub fn is_attacked(board: &Board, target: Square, by: Color) -> bool {
    board
        .pieces(by)
        .any(|(from, piece)| from != target && pseudo_legal(board, from, target, piece).is_ok())
}

/// Whether `color`'s king is attacked by the opposing side.
///
/// A board without that king is an integrity failure; it is reported as
/// "not in check" and logged rather than treated as fatal.
pub fn is_in_check(board: &Board, color: Color) -> bool {
    match board.find_king(color) {
        Some(ksq) => is_attacked(board, ksq, color.other()),
        None => {
            warn!(%color, "king not found on board; treating as not in check");
            false
        }
    }
}

#[cfg(test)]
#[path = "attacks_tests.rs"]
mod attacks_tests;
