//! Per-side chess clock and time control settings.
//!
//! The clock only knows how to decrement and increment; something outside
//! the engine drives it by calling `tick` at a fixed interval.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::types::Color;

/// Base allotment per side plus per-move increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeControl {
    /// Initial time in seconds
    pub initial_seconds: u32,
    /// Increment per move in seconds
    pub increment: u32,
}

impl TimeControl {
    /// Largest allotment whose seconds still fit in `initial_seconds`.
    pub const MAX_MINUTES: u32 = u32::MAX / 60;

    /// Minutes above [`Self::MAX_MINUTES`] saturate.
    pub fn new(minutes: u32, increment: u32) -> Self {
        Self {
            initial_seconds: minutes.saturating_mul(60),
            increment,
        }
    }
}

impl Default for TimeControl {
    fn default() -> Self {
        Self::new(5, 5)
    }
}

impl std::fmt::Display for TimeControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}+{}", self.initial_seconds / 60, self.increment)
    }
}

/// Clock snapshot handed to clock-update subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClockUpdate {
    pub white_seconds: f64,
    pub black_seconds: f64,
    pub active: Color,
}

#[derive(Debug, Clone)]
pub struct Clock {
    white_seconds: f64,
    black_seconds: f64,
    increment: u32,
    paused: bool,
    /// Reference point for wall-clock elapsed measurement
    last_tick: Instant,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(TimeControl::default())
    }
}

impl Clock {
    pub fn new(tc: TimeControl) -> Self {
        Self {
            white_seconds: tc.initial_seconds as f64,
            black_seconds: tc.initial_seconds as f64,
            increment: tc.increment,
            paused: false,
            last_tick: Instant::now(),
        }
    }

    pub fn remaining(&self, color: Color) -> f64 {
        match color {
            Color::White => self.white_seconds,
            Color::Black => self.black_seconds,
        }
    }

    fn remaining_mut(&mut self, color: Color) -> &mut f64 {
        match color {
            Color::White => &mut self.white_seconds,
            Color::Black => &mut self.black_seconds,
        }
    }

    pub fn increment(&self) -> u32 {
        self.increment
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Credit the per-move increment to `color`.
    pub fn add_increment(&mut self, color: Color) {
        let inc = self.increment as f64;
        *self.remaining_mut(color) += inc;
    }

    /// Subtract `elapsed` seconds from `color`, floored at zero. Returns true
    /// if that clock is now empty. Paused clocks do not move.
    pub fn tick(&mut self, color: Color, elapsed: f64) -> bool {
        if self.paused {
            return false;
        }
        let left = self.remaining_mut(color);
        *left = (*left - elapsed.max(0.0)).max(0.0);
        *left == 0.0
    }

    /// Wall time since the previous call (or since the last reset/unpause),
    /// moving the reference point forward.
    pub fn take_elapsed(&mut self) -> f64 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_tick).as_secs_f64();
        self.last_tick = now;
        elapsed
    }

    /// Flip the paused flag. Unpausing resets the elapsed-time reference so
    /// time spent paused is never charged.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        if !self.paused {
            self.last_tick = Instant::now();
        }
        self.paused
    }

    /// Reset both sides to `seconds` with a new increment. Pause state is
    /// left alone.
    pub fn set_time_control(&mut self, seconds: f64, increment: u32) {
        self.white_seconds = seconds;
        self.black_seconds = seconds;
        self.increment = increment;
    }

    /// Fresh clock for a new game: running, full time, new reference point.
    pub fn reset(&mut self, tc: TimeControl) {
        *self = Self::new(tc);
    }

    pub fn is_low_time(&self, color: Color, threshold_seconds: f64) -> bool {
        self.remaining(color) < threshold_seconds
    }

    pub fn snapshot(&self, active: Color) -> ClockUpdate {
        ClockUpdate {
            white_seconds: self.white_seconds,
            black_seconds: self.black_seconds,
            active,
        }
    }
}

/// Format seconds as `M:SS`, truncating fractions.
pub fn format_time(seconds: f64) -> String {
    let total = seconds.max(0.0).floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod clock_tests;
