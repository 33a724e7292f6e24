//! Random Move Chess Engine
//!
//! Picks uniformly among all legal moves. Used as the default computer
//! opponent and as a driver for randomized self-play tests.

use chess_core::{legal_moves_into, Board, Color, Engine, MoveRequest, SearchResult};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::trace;


/// A chess engine that plays random legal moves.
///
/// Unseeded engines draw from entropy; [`RandomEngine::with_seed`] gives a
/// reproducible sequence, and [`Engine::new_game`] rewinds it.
#[derive(Debug, Clone)]
pub struct RandomEngine {
    seed: Option<u64>,
    rng: StdRng,
    moves: Vec<MoveRequest>,
}

impl Default for RandomEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomEngine {
    pub fn new() -> Self {
        Self {
            seed: None,
            rng: StdRng::from_entropy(),
            moves: Vec::with_capacity(64),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            rng: StdRng::seed_from_u64(seed),
            moves: Vec::with_capacity(64),
        }
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

impl Engine for RandomEngine {
    fn search(&mut self, board: &Board, color: Color) -> SearchResult {
        legal_moves_into(board, color, &mut self.moves);
        let best_move = self.moves.choose(&mut self.rng).copied();
        trace!(candidates = self.moves.len(), ?best_move, "random pick");

        SearchResult {
            best_move,
            nodes: self.moves.len() as u64,
        }
    }

    fn name(&self) -> &str {
        "Random v1.0"
    }

    fn new_game(&mut self) {
        if let Some(seed) = self.seed {
            self.rng = StdRng::seed_from_u64(seed);
        }
    }
}
