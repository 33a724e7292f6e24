//! Chess rules engine and game-state controller.
//!
//! Layering, bottom to top: [`board`] holds pieces, [`rules`] answers
//! pseudo-legal geometry, [`attacks`] detects attacked squares and check on
//! top of those rules, [`legal`] adds the self-check filter, [`status`]
//! classifies checkmate and stalemate, and [`game`] owns the whole state
//! machine. The detector never calls the validator.

pub mod attacks;
pub mod board;
pub mod cancel;
pub mod clock;
pub mod error;
pub mod game;
pub mod legal;
pub mod notation;
pub mod perft;
pub mod rules;
pub mod status;
pub mod types;

pub use attacks::*;
pub use board::*;
pub use cancel::CancelToken;
pub use clock::*;
pub use error::*;
pub use game::*;
pub use legal::*;
pub use notation::*;
pub use perft::perft;
pub use rules::pseudo_legal;
pub use status::*;
pub use types::*;

// =============================================================================
// Engine trait — move-selection policy for the non-human side
// =============================================================================

/// Result of a move selection
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The chosen move (None if no legal moves)
    pub best_move: Option<MoveRequest>,
    /// Number of candidate moves considered (optional, for stats)
    pub nodes: u64,
}

/// Trait that all move-selection policies must implement.
///
/// The game accepts any legal move a policy returns; `best_move: None` is
/// read as "no moves available" and settled as checkmate or stalemate.
pub trait Engine: Send {
    /// Choose a move for `color` on `board`.
    fn search(&mut self, board: &Board, color: Color) -> SearchResult;

    /// Returns the engine's name for display and logs
    fn name(&self) -> &str;

    /// Reset internal state for a new game
    fn new_game(&mut self) {}
}
