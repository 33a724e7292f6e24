//! Plain-text views of the game for the terminal.

use std::fmt::Write;

use chess_core::{format_time, ClockUpdate, Color, Game, GameStatus, MoveHistoryEntry, MoveOutcome};

/// One-line description of whose turn it is or how the game ended.
pub fn status_line(game: &Game) -> String {
    let side = game.side_to_move();
    match game.status() {
        GameStatus::Active if game.is_in_check() => format!("Check! {side} to move"),
        GameStatus::Active if game.clock().is_paused() => format!("Paused. {side} to move"),
        GameStatus::Active => format!("{side} to move"),
        status => game_over_line(status, game.winner()),
    }
}

pub fn game_over_line(status: GameStatus, winner: Option<Color>) -> String {
    match (status, winner) {
        (GameStatus::Checkmate, Some(w)) => format!("Checkmate! {w} wins"),
        (GameStatus::Timeout, Some(w)) => format!("Time out! {w} wins"),
        (GameStatus::Stalemate, _) => "Stalemate. The game is a draw".to_string(),
        (GameStatus::Draw, _) => "Draw by insufficient material".to_string(),
        (status, _) => format!("Game over ({status})"),
    }
}

pub fn move_line(outcome: &MoveOutcome) -> String {
    let mv = &outcome.mv;
    format!(
        "{} plays {}{} ({})",
        mv.mover.color, mv.from, mv.to, outcome.notation
    )
}

/// Both clocks, with the running side marked and low clocks flagged.
pub fn clock_line(update: &ClockUpdate, low_time_seconds: f64) -> String {
    let side = |color: Color, seconds: f64| {
        let marker = if update.active == color { "*" } else { " " };
        let low = if seconds < low_time_seconds { " (low)" } else { "" };
        format!("{marker}{color} {}{low}", format_time(seconds))
    };
    format!(
        "{} | {}",
        side(Color::White, update.white_seconds),
        side(Color::Black, update.black_seconds)
    )
}

pub fn history_table(history: &[MoveHistoryEntry]) -> String {
    if history.is_empty() {
        return "No moves yet".to_string();
    }
    let mut out = String::new();
    for entry in history {
        let _ = writeln!(
            out,
            "{:>3}. {:<8} {}",
            entry.ordinal, entry.white_notation, entry.black_notation
        );
    }
    out.truncate(out.trim_end().len());
    out
}

pub fn board_view(game: &Game) -> String {
    format!("{}\n{}", game.board(), status_line(game))
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod render_tests;
