//! End-to-end checks of the game controller through the public API.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;

use chess_core::{
    Board, Color, Game, GameStatus, TimeControl, is_in_check, is_insufficient_material, legal_moves,
    parse_move_text, terminal_status,
};

fn play_line(game: &mut Game, line: &[&str]) {
    for text in line {
        let req = parse_move_text(text).unwrap();
        game.execute_move(req.from, req.to)
            .unwrap_or_else(|e| panic!("{text} rejected: {e}"));
    }
}

// =============================================================================
// Terminal positions
// =============================================================================

#[test]
fn test_scholars_mate() {
    let mut game = Game::new();
    play_line(
        &mut game,
        &["e2e4", "e7e5", "f1c4", "b8c6", "d1h5", "g8f6", "h5f7"],
    );
    assert_eq!(game.status(), GameStatus::Checkmate);
    assert_eq!(game.winner(), Some(Color::White));
    assert_eq!(game.history()[3].white_notation, "Qxf7#");
}

#[test]
fn test_stalemate_king_in_corner() {
    let board = Board::from_fen("k7/2K5/1Q6/8/8/8/8/8").unwrap();
    assert!(legal_moves(&board, Color::Black).is_empty());
    assert!(!is_in_check(&board, Color::Black));
    assert_eq!(terminal_status(&board, Color::Black), GameStatus::Stalemate);
}

#[test]
fn test_stalemate_king_and_pawn_endgame() {
    let board = Board::from_fen("6k1/6P1/6K1/8/8/8/8/8").unwrap();
    assert_eq!(terminal_status(&board, Color::Black), GameStatus::Stalemate);
    // White still has moves here
    assert_eq!(terminal_status(&board, Color::White), GameStatus::Active);
}

#[test]
fn test_insufficient_material_positions() {
    for fen in ["8/8/8/4k3/8/4K3/8/8", "8/8/8/4k3/8/4KN2/8/8", "8/8/2b5/4k3/8/4K3/8/8"] {
        let board = Board::from_fen(fen).unwrap();
        assert!(is_insufficient_material(&board), "{fen}");
    }
    for fen in ["8/8/8/4k3/8/4KR2/8/8", "8/8/8/4k3/4p3/4K3/8/8", "8/8/2b5/4k3/8/4KN2/8/8"] {
        let board = Board::from_fen(fen).unwrap();
        assert!(!is_insufficient_material(&board), "{fen}");
    }
}

// =============================================================================
// Random play properties
// =============================================================================

/// Play seeded random games and check the controller's invariants after
/// every ply.
fn random_game(seed: u64, max_plies: usize) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut game = Game::with_time_control(TimeControl::new(5, 5));

    for _ in 0..max_plies {
        if game.status() != GameStatus::Active {
            break;
        }
        let mover = game.side_to_move();
        let moves = legal_moves(game.board(), mover);
        let Some(mv) = moves.choose(&mut rng).copied() else {
            panic!("seed {seed}: active game without legal moves");
        };
        let pieces_before = game.board().piece_count();

        let outcome = game.execute_move(mv.from, mv.to).unwrap();

        // a legal move never leaves the mover in check
        assert!(!is_in_check(game.board(), mover), "seed {seed}: {mv}");
        // turns alternate
        assert_eq!(game.side_to_move(), mover.other());
        // captures remove exactly one piece, nothing ever appears
        let expected = pieces_before - usize::from(outcome.mv.is_capture());
        assert_eq!(game.board().piece_count(), expected, "seed {seed}: {mv}");
        // notation suffixes agree with the classifier
        assert_eq!(outcome.notation.ends_with('#'), outcome.is_checkmate);
        if outcome.is_checkmate {
            assert_eq!(game.status(), GameStatus::Checkmate);
            assert_eq!(game.winner(), Some(mover));
        }
    }
}

#[test]
fn test_random_games_hold_invariants() {
    (0..32u64).into_par_iter().for_each(|seed| random_game(seed, 120));
}
