//! Game state machine: board, turn, clocks, history and status.
//!
//! All mutation goes through `execute_move`, `tick`, `toggle_pause`,
//! `change_time_control` and `restart` (or the equivalent [`Command`]s).

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::Engine;
use crate::attacks::is_in_check;
use crate::board::Board;
use crate::cancel::CancelToken;
use crate::clock::{Clock, ClockUpdate, TimeControl};
use crate::error::{GameError, MoveError};
use crate::legal::is_legal;
use crate::notation::encode;
use crate::status::{is_insufficient_material, terminal_status};
use crate::types::*;

/// One row of the move list. Created when White moves; Black's reply fills
/// `black_notation`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveHistoryEntry {
    pub ordinal: u32,
    pub white_notation: String,
    pub black_notation: String,
}

/// When the computer side's reply is played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplyMode {
    /// Inside the same `execute_move` call that handed it the turn.
    ///
    /// If the policy proposes an illegal move the human move still stands
    /// and the computer keeps the turn, so `engine_to_move` stays true and
    /// human moves are refused with `WrongTurn`. The host can retry with
    /// [`Game::play_engine_move`], which returns the policy's error, or
    /// restart.
    #[default]
    Immediate,
    /// Left to the host, which calls [`Game::play_engine_move`] later.
    Deferred,
}

/// The non-human side and the policy choosing its moves.
pub struct Opponent {
    pub color: Color,
    pub engine: Box<dyn Engine>,
    pub mode: ReplyMode,
}

/// Result of one applied move.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveOutcome {
    pub mv: Move,
    pub notation: String,
    pub is_check: bool,
    pub is_checkmate: bool,
    /// Game status after this move
    pub status: GameStatus,
    pub winner: Option<Color>,
    /// Computer replies applied in the same call (immediate mode only)
    pub replies: Vec<MoveOutcome>,
}

/// Explicit command interface for front ends.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    ExecuteMove { from: Square, to: Square },
    TogglePause,
    ChangeTimeControl { minutes: u32, increment: u32 },
    Restart,
    Tick { elapsed_seconds: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    Moved(MoveOutcome),
    PauseToggled { paused: bool },
    TimeControlChanged,
    Restarted,
    Ticked { status: GameStatus },
}

/// Serializable snapshot of a game, for export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub fen: String,
    pub side_to_move: Color,
    pub status: GameStatus,
    pub winner: Option<Color>,
    pub white_seconds: f64,
    pub black_seconds: f64,
    pub increment: u32,
    pub history: Vec<MoveHistoryEntry>,
}

type ClockListener = Box<dyn FnMut(ClockUpdate) + Send>;

pub struct Game {
    board: Board,
    side_to_move: Color,
    history: Vec<MoveHistoryEntry>,
    last_move: Option<Move>,
    clock: Clock,
    /// Time control restored by `restart`
    base_time_control: TimeControl,
    /// Time control currently in force
    time_control: TimeControl,
    status: GameStatus,
    winner: Option<Color>,
    opponent: Option<Opponent>,
    reply_token: CancelToken,
    clock_listeners: Vec<ClockListener>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Standard starting position, 5 minutes + 5 seconds, both sides human.
    pub fn new() -> Self {
        Self::with_time_control(TimeControl::default())
    }

    pub fn with_time_control(tc: TimeControl) -> Self {
        Self {
            board: Board::startpos(),
            side_to_move: Color::White,
            history: Vec::new(),
            last_move: None,
            clock: Clock::new(tc),
            base_time_control: tc,
            time_control: tc,
            status: GameStatus::Active,
            winner: None,
            opponent: None,
            reply_token: CancelToken::new(),
            clock_listeners: Vec::new(),
        }
    }

    /// Start from a FEN placement plus optional side-to-move field
    /// (`w`/`b`, default White). Castling and en-passant fields are ignored.
    pub fn from_fen(fen: &str, tc: TimeControl) -> Result<Self, GameError> {
        let board = Board::from_fen(fen)?;
        let side_to_move = match fen.split_whitespace().nth(1) {
            None | Some("w") => Color::White,
            Some("b") => Color::Black,
            Some(other) => {
                return Err(GameError::InvalidFen(format!(
                    "invalid side to move '{other}'"
                )));
            }
        };
        let mut game = Self {
            board,
            side_to_move,
            ..Self::with_time_control(tc)
        };
        // same classification a move into this position would get
        match terminal_status(&game.board, side_to_move) {
            GameStatus::Checkmate => game.finish(GameStatus::Checkmate, Some(side_to_move.other())),
            GameStatus::Stalemate => game.finish(GameStatus::Stalemate, None),
            _ if is_insufficient_material(&game.board) => game.finish(GameStatus::Draw, None),
            _ => {}
        }
        Ok(game)
    }

    /// Hand one side to a move-selection policy.
    pub fn with_opponent(mut self, color: Color, engine: Box<dyn Engine>, mode: ReplyMode) -> Self {
        self.set_opponent(color, engine, mode);
        self
    }

    pub fn set_opponent(&mut self, color: Color, mut engine: Box<dyn Engine>, mode: ReplyMode) {
        engine.new_game();
        self.opponent = Some(Opponent {
            color,
            engine,
            mode,
        });
    }

    /// Register a callback invoked with both clocks after every
    /// clock-affecting operation.
    pub fn subscribe_clock(&mut self, listener: impl FnMut(ClockUpdate) + Send + 'static) {
        self.clock_listeners.push(Box::new(listener));
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn history(&self) -> &[MoveHistoryEntry] {
        &self.history
    }

    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn time_control(&self) -> TimeControl {
        self.time_control
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    pub fn is_in_check(&self) -> bool {
        is_in_check(&self.board, self.side_to_move)
    }

    pub fn opponent_color(&self) -> Option<Color> {
        self.opponent.as_ref().map(|o| o.color)
    }

    /// Token for deferred work belonging to this game instance. Cancelled
    /// on restart.
    pub fn reply_token(&self) -> CancelToken {
        self.reply_token.clone()
    }

    /// The game is live and the computer side has the move.
    pub fn engine_to_move(&self) -> bool {
        self.status == GameStatus::Active && self.opponent_color() == Some(self.side_to_move)
    }

    pub fn record(&self) -> GameRecord {
        GameRecord {
            fen: self.board.to_fen(),
            side_to_move: self.side_to_move,
            status: self.status,
            winner: self.winner,
            white_seconds: self.clock.remaining(Color::White),
            black_seconds: self.clock.remaining(Color::Black),
            increment: self.clock.increment(),
            history: self.history.clone(),
        }
    }

    // -----------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------

    pub fn handle(&mut self, cmd: Command) -> Result<CommandOutcome, GameError> {
        match cmd {
            Command::ExecuteMove { from, to } => self.execute_move(from, to).map(CommandOutcome::Moved),
            Command::TogglePause => Ok(CommandOutcome::PauseToggled {
                paused: self.toggle_pause(),
            }),
            Command::ChangeTimeControl { minutes, increment } => {
                self.change_time_control(minutes, increment);
                Ok(CommandOutcome::TimeControlChanged)
            }
            Command::Restart => {
                self.restart();
                Ok(CommandOutcome::Restarted)
            }
            Command::Tick { elapsed_seconds } => Ok(CommandOutcome::Ticked {
                status: self.tick(elapsed_seconds),
            }),
        }
    }

    /// Validate and apply a move for the side to move. On rejection the game
    /// is left exactly as it was.
    pub fn execute_move(&mut self, from: Square, to: Square) -> Result<MoveOutcome, GameError> {
        if self.status.is_terminal() {
            return Err(MoveError::WrongTurn(format!("game is over ({})", self.status)).into());
        }
        if self.opponent_color() == Some(self.side_to_move) {
            return Err(MoveError::WrongTurn("waiting for the computer to move".to_string()).into());
        }
        if !from.in_bounds() || !to.in_bounds() {
            return Err(MoveError::OutOfBounds.into());
        }
        let piece = self.board.get(from).ok_or(MoveError::EmptySquare(from))?;
        if piece.color != self.side_to_move {
            return Err(MoveError::WrongTurn(format!("must move a {} piece", self.side_to_move)).into());
        }
        is_legal(&self.board, from, to, self.side_to_move)?;

        let mut outcome = self.apply_validated(from, to, piece);

        if self
            .opponent
            .as_ref()
            .is_some_and(|o| o.mode == ReplyMode::Immediate)
        {
            while self.engine_to_move() {
                match self.play_engine_move() {
                    Ok(Some(reply)) => outcome.replies.push(reply),
                    Ok(None) => break,
                    Err(e) => {
                        // the human move stands; the computer keeps the turn
                        warn!(error = %e, "computer reply rejected");
                        break;
                    }
                }
            }
            outcome.status = self.status;
            outcome.winner = self.winner;
        }
        Ok(outcome)
    }

    /// Ask the policy for the computer side's move and apply it through the
    /// same validation path as a human move.
    ///
    /// Returns `Ok(None)` when it is not the computer's turn, or when the
    /// policy reports no moves, in which case the position is settled as
    /// checkmate or stalemate.
    pub fn play_engine_move(&mut self) -> Result<Option<MoveOutcome>, GameError> {
        if !self.engine_to_move() {
            return Ok(None);
        }
        let color = self.side_to_move;
        let Some(opponent) = self.opponent.as_mut() else {
            return Ok(None);
        };
        let result = opponent.engine.search(&self.board, color);

        let Some(req) = result.best_move else {
            let classified = terminal_status(&self.board, color);
            let in_check = is_in_check(&self.board, color);
            if classified == GameStatus::Active {
                warn!(
                    engine = opponent.engine.name(),
                    "engine reported no moves in a live position"
                );
            }
            let status = if in_check {
                GameStatus::Checkmate
            } else {
                GameStatus::Stalemate
            };
            self.finish(status, in_check.then(|| color.other()));
            return Ok(None);
        };

        if let Err(reason) = is_legal(&self.board, req.from, req.to, color) {
            return Err(GameError::IllegalEngineMove {
                engine: opponent.engine.name().to_string(),
                reason,
            });
        }
        let Some(piece) = self.board.get(req.from) else {
            return Err(GameError::IllegalEngineMove {
                engine: opponent.engine.name().to_string(),
                reason: MoveError::EmptySquare(req.from),
            });
        };
        Ok(Some(self.apply_validated(req.from, req.to, piece)))
    }

    /// Subtract elapsed time from the side to move. No-op when paused or the
    /// game is over; an empty clock ends the game on time.
    pub fn tick(&mut self, elapsed_seconds: f64) -> GameStatus {
        if self.clock.is_paused() || self.status.is_terminal() {
            return self.status;
        }
        let color = self.side_to_move;
        if self.clock.tick(color, elapsed_seconds) {
            info!(loser = %color, "flag fell");
            self.finish(GameStatus::Timeout, Some(color.other()));
        }
        self.notify_clock();
        self.status
    }

    /// Tick by the wall time elapsed since the previous measurement.
    pub fn tick_now(&mut self) -> GameStatus {
        let elapsed = self.clock.take_elapsed();
        self.tick(elapsed)
    }

    /// Returns the new paused state.
    pub fn toggle_pause(&mut self) -> bool {
        let paused = self.clock.toggle_pause();
        debug!(paused, "pause toggled");
        self.notify_clock();
        paused
    }

    /// Reset both clocks to `minutes` and set the increment. Allowed at any
    /// time; the game status is untouched.
    pub fn change_time_control(&mut self, minutes: u32, increment: u32) {
        let tc = TimeControl::new(minutes, increment);
        self.clock.set_time_control(tc.initial_seconds as f64, increment);
        self.time_control = tc;
        info!(minutes, increment, "time control changed");
        self.notify_clock();
    }

    /// Back to the initial position with fresh clocks. Pending deferred work
    /// from before the restart is cancelled.
    pub fn restart(&mut self) {
        self.reply_token.cancel();
        self.reply_token = CancelToken::new();

        let tc = TimeControl {
            increment: self.clock.increment(),
            ..self.base_time_control
        };
        self.board = Board::startpos();
        self.side_to_move = Color::White;
        self.history.clear();
        self.last_move = None;
        self.clock.reset(tc);
        self.time_control = tc;
        self.status = GameStatus::Active;
        self.winner = None;
        if let Some(opponent) = self.opponent.as_mut() {
            opponent.engine.new_game();
        }
        info!("game restarted");
        self.notify_clock();
    }

    // -----------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------

    /// Apply a move already known to be legal and run all post-move
    /// bookkeeping.
    fn apply_validated(&mut self, from: Square, to: Square, piece: Piece) -> MoveOutcome {
        let mover = self.side_to_move;
        let opponent = mover.other();

        let captured = self.board.apply(from, to);
        let mv = Move {
            from,
            to,
            mover: piece,
            captured,
        };

        // classified once per ply; reused for notation and status
        let next_status = terminal_status(&self.board, opponent);
        let is_check = is_in_check(&self.board, opponent);
        let is_checkmate = is_check && next_status == GameStatus::Checkmate;
        let notation = encode(piece.kind, mv.is_capture(), to, is_check, is_checkmate);
        debug!(side = %mover, %notation, "move applied");

        self.record_notation(mover, notation.clone());
        self.last_move = Some(mv);
        self.clock.add_increment(mover);
        self.side_to_move = opponent;

        match next_status {
            GameStatus::Checkmate => self.finish(GameStatus::Checkmate, Some(mover)),
            GameStatus::Stalemate => self.finish(GameStatus::Stalemate, None),
            _ if is_insufficient_material(&self.board) => self.finish(GameStatus::Draw, None),
            _ => {}
        }
        self.notify_clock();

        MoveOutcome {
            mv,
            notation,
            is_check,
            is_checkmate,
            status: self.status,
            winner: self.winner,
            replies: Vec::new(),
        }
    }

    fn record_notation(&mut self, mover: Color, notation: String) {
        let next_ordinal = self.history.len() as u32 + 1;
        match mover {
            Color::White => self.history.push(MoveHistoryEntry {
                ordinal: next_ordinal,
                white_notation: notation,
                black_notation: String::new(),
            }),
            Color::Black => match self.history.last_mut() {
                Some(entry) if entry.black_notation.is_empty() => entry.black_notation = notation,
                // Black moved first (position set up with Black to move)
                _ => self.history.push(MoveHistoryEntry {
                    ordinal: next_ordinal,
                    white_notation: "...".to_string(),
                    black_notation: notation,
                }),
            },
        }
    }

    fn finish(&mut self, status: GameStatus, winner: Option<Color>) {
        if self.status.is_terminal() {
            return;
        }
        self.status = status;
        self.winner = winner;
        match winner {
            Some(w) => info!(%status, winner = %w, "game over"),
            None => info!(%status, "game over"),
        }
    }

    fn notify_clock(&mut self) {
        let update = self.clock.snapshot(self.side_to_move);
        for listener in &mut self.clock_listeners {
            listener(update);
        }
    }
}

#[cfg(test)]
#[path = "game_tests.rs"]
mod game_tests;
