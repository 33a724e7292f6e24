use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn other(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub fn idx(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    /// Rank step a pawn of this color takes when advancing.
    pub fn pawn_direction(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// Rank from which a pawn of this color may advance two squares.
    pub fn pawn_start_rank(self) -> u8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::White => "White",
            Color::Black => "Black",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Uppercase letter used in notation, `None` for pawns.
    pub fn letter(self) -> Option<char> {
        match self {
            PieceKind::Pawn => None,
            PieceKind::Knight => Some('N'),
            PieceKind::Bishop => Some('B'),
            PieceKind::Rook => Some('R'),
            PieceKind::Queen => Some('Q'),
            PieceKind::King => Some('K'),
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PieceKind::Pawn => "pawn",
            PieceKind::Knight => "knight",
            PieceKind::Bishop => "bishop",
            PieceKind::Rook => "rook",
            PieceKind::Queen => "queen",
            PieceKind::King => "king",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }

    /// FEN-style character: uppercase for White, lowercase for Black.
    pub fn to_char(self) -> char {
        let c = match self.kind {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    pub fn from_char(ch: char) -> Option<Piece> {
        let color = if ch.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let kind = match ch.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return None,
        };
        Some(Piece { color, kind })
    }
}

/// A board coordinate. Rank 0 is Black's back rank (the "8" row), file 0 is
/// the a-file. Coordinates outside `0..8` are representable so that move
/// rules can reject them explicitly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Square {
    pub rank: u8,
    pub file: u8,
}

impl Square {
    pub const fn new(rank: u8, file: u8) -> Self {
        Self { rank, file }
    }

    pub fn in_bounds(self) -> bool {
        self.rank < 8 && self.file < 8
    }

    /// Offset by signed deltas, `None` if the result leaves the board.
    pub fn offset(self, d_rank: i8, d_file: i8) -> Option<Square> {
        let r = self.rank as i8 + d_rank;
        let f = self.file as i8 + d_file;
        if (0..8).contains(&r) && (0..8).contains(&f) {
            Some(Square::new(r as u8, f as u8))
        } else {
            None
        }
    }

    /// Parse algebraic notation like "e4".
    pub fn parse(s: &str) -> Option<Square> {
        let b = s.as_bytes();
        if b.len() != 2 {
            return None;
        }
        let (f, r) = (b[0], b[1]);
        if !(b'a'..=b'h').contains(&f) || !(b'1'..=b'8').contains(&r) {
            return None;
        }
        Some(Square::new(8 - (r - b'0'), f - b'a'))
    }

    /// Every on-board square, rank 0 first.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..8u8).flat_map(|rank| (0..8u8).map(move |file| Square::new(rank, file)))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + self.file) as char;
        let rank = 8 - self.rank;
        write!(f, "{file}{rank}")
    }
}

/// An applied move. `is_check` / `is_checkmate` are derived after the move is
/// on the board; they are not part of the input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub mover: Piece,
    pub captured: Option<Piece>,
}

impl Move {
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

/// Candidate `(from, to)` pair, as produced by move enumeration and
/// move-selection policies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MoveRequest {
    pub from: Square,
    pub to: Square,
}

impl MoveRequest {
    pub const fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for MoveRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Active,
    Checkmate,
    Stalemate,
    Timeout,
    Draw,
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        self != GameStatus::Active
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GameStatus::Active => "active",
            GameStatus::Checkmate => "checkmate",
            GameStatus::Stalemate => "stalemate",
            GameStatus::Timeout => "timeout",
            GameStatus::Draw => "draw",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
