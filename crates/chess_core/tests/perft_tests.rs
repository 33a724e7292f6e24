use std::time::Instant;

use rayon::prelude::*;

use chess_core::{Board, Color, legal_moves, perft};

const FULL_PERFT_ENV: &str = "FULL_PERFT";

/// Node counts from the standard starting position. None of these depths
/// reach castling, en passant or promotion, so the reference numbers apply.
const STARTPOS: &[(u8, u64)] = &[(1, 20), (2, 400), (3, 8_902), (4, 197_281)];

#[test]
fn perft_from_startpos() {
    let full = std::env::var(FULL_PERFT_ENV).is_ok();
    let board = Board::startpos();

    for &(depth, expected) in STARTPOS {
        if !full && depth > 3 {
            eprintln!("Skipping depth {depth} (expected {expected} nodes); set {FULL_PERFT_ENV}=1 to run it.");
            continue;
        }
        let start = Instant::now();
        let got = perft(&board, Color::White, depth);
        assert_eq!(got, expected, "perft mismatch at depth {depth}");
        eprintln!("depth {depth}: {got} nodes in {:.3?}", start.elapsed());
    }
}

#[test]
fn perft_divide_sums_to_total() {
    let board = Board::startpos();
    let divided: u64 = legal_moves(&board, Color::White)
        .par_iter()
        .map(|mv| perft(&board.with_move(mv.from, mv.to), Color::Black, 2))
        .sum();
    assert_eq!(divided, 8_902);
}

#[test]
fn perft_depth_zero_is_one() {
    assert_eq!(perft(&Board::startpos(), Color::White, 0), 1);
}

#[test]
fn perft_terminal_position() {
    // checkmated side has nothing to expand
    let board = Board::from_fen("R5k1/5ppp/8/8/8/8/8/6K1").unwrap();
    assert_eq!(perft(&board, Color::Black, 1), 0);
    assert_eq!(perft(&board, Color::Black, 3), 0);
}
