//! Seeded random-vs-random games through the full game controller.

use rayon::prelude::*;

use chess_core::{Color, Engine, Game, GameStatus, ReplyMode, is_in_check};
use random_engine::RandomEngine;

const MAX_PLIES: usize = 200;

/// Play one game, with `white` choosing the human side's moves and a seeded
/// engine replying for Black inside each `execute_move` call.
fn selfplay(seed: u64) -> Game {
    let mut white = RandomEngine::with_seed(seed);
    let mut game = Game::new().with_opponent(
        Color::Black,
        Box::new(RandomEngine::with_seed(seed.wrapping_mul(31).wrapping_add(1))),
        ReplyMode::Immediate,
    );

    for _ in 0..MAX_PLIES {
        if game.status() != GameStatus::Active {
            break;
        }
        assert_eq!(game.side_to_move(), Color::White, "seed {seed}");
        let before = game.board().piece_count();
        let Some(mv) = white.search(game.board(), Color::White).best_move else {
            panic!("seed {seed}: active game without a white move");
        };

        let outcome = game.execute_move(mv.from, mv.to).unwrap();

        let mut removed = usize::from(outcome.mv.is_capture());
        for reply in &outcome.replies {
            assert_eq!(reply.mv.mover.color, Color::Black);
            removed += usize::from(reply.mv.is_capture());
        }
        assert!(outcome.replies.len() <= 1);
        assert_eq!(game.board().piece_count(), before - removed, "seed {seed}");
        if game.status() == GameStatus::Active {
            assert!(!is_in_check(game.board(), Color::Black), "seed {seed}");
        }
    }
    game
}

#[test]
fn random_selfplay_keeps_invariants() {
    let finished: Vec<GameStatus> = (0..24u64)
        .into_par_iter()
        .map(|seed| selfplay(seed).status())
        .collect();
    assert_eq!(finished.len(), 24);
}

#[test]
fn seeded_selfplay_is_reproducible() {
    let a = selfplay(1234);
    let b = selfplay(1234);
    assert_eq!(a.board(), b.board());
    assert_eq!(a.history(), b.history());
    assert_eq!(a.status(), b.status());
}

#[test]
fn finished_games_have_consistent_winner() {
    for seed in 0..8u64 {
        let game = selfplay(seed);
        match game.status() {
            GameStatus::Checkmate => assert!(game.winner().is_some()),
            GameStatus::Stalemate | GameStatus::Draw | GameStatus::Active => {
                assert_eq!(game.winner(), None)
            }
            GameStatus::Timeout => unreachable!("no clock ticks in self-play"),
        }
    }
}
