use std::fmt;

use crate::error::GameError;
use crate::types::*;

/// 8x8 grid of optional pieces, indexed `[rank][file]`.
///
/// A plain data container: no validation happens here. `Clone` is a deep
/// copy and is what speculative what-if moves are played on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

impl Default for Board {
    fn default() -> Self {
        Self::startpos()
    }
}

impl Board {
    pub fn empty() -> Self {
        Self {
            squares: [[None; 8]; 8],
        }
    }

    /// Standard initial array: Black on ranks 0-1, White on ranks 6-7.
    pub fn startpos() -> Self {
        let mut b = Self::empty();
        for (file, &kind) in BACK_RANK.iter().enumerate() {
            b.squares[0][file] = Some(Piece::new(Color::Black, kind));
            b.squares[1][file] = Some(Piece::new(Color::Black, PieceKind::Pawn));
            b.squares[6][file] = Some(Piece::new(Color::White, PieceKind::Pawn));
            b.squares[7][file] = Some(Piece::new(Color::White, kind));
        }
        b
    }

    /// Parse the piece-placement field of a FEN string. Only the first
    /// whitespace-separated field is read.
    pub fn from_fen(fen: &str) -> Result<Self, GameError> {
        let placement = fen
            .split_whitespace()
            .next()
            .ok_or_else(|| GameError::InvalidFen("empty FEN".to_string()))?;

        let rows: Vec<&str> = placement.split('/').collect();
        if rows.len() != 8 {
            return Err(GameError::InvalidFen(format!(
                "expected 8 ranks, found {}",
                rows.len()
            )));
        }

        let mut board = Self::empty();
        // FEN lists rank 8 first, which is our rank 0.
        for (rank, row) in rows.iter().enumerate() {
            let mut file = 0usize;
            for ch in row.chars() {
                if let Some(d) = ch.to_digit(10) {
                    file += d as usize;
                } else {
                    let piece = Piece::from_char(ch).ok_or_else(|| {
                        GameError::InvalidFen(format!("invalid piece character '{ch}'"))
                    })?;
                    if file >= 8 {
                        return Err(GameError::InvalidFen(format!(
                            "too many files in rank '{row}'"
                        )));
                    }
                    board.squares[rank][file] = Some(piece);
                    file += 1;
                }
            }
            if file != 8 {
                return Err(GameError::InvalidFen(format!(
                    "rank '{row}' does not cover 8 files"
                )));
            }
        }
        Ok(board)
    }

    /// Piece-placement field of FEN for this board.
    pub fn to_fen(&self) -> String {
        let mut out = String::with_capacity(72);
        for (rank, row) in self.squares.iter().enumerate() {
            if rank > 0 {
                out.push('/');
            }
            let mut empty = 0;
            for sq in row {
                match sq {
                    Some(pc) => {
                        if empty > 0 {
                            out.push_str(&empty.to_string());
                            empty = 0;
                        }
                        out.push(pc.to_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push_str(&empty.to_string());
            }
        }
        out
    }

    /// Occupant of `sq`; off-board squares read as empty.
    pub fn get(&self, sq: Square) -> Option<Piece> {
        if !sq.in_bounds() {
            return None;
        }
        self.squares[sq.rank as usize][sq.file as usize]
    }

    pub fn set(&mut self, sq: Square, piece: Option<Piece>) {
        if sq.in_bounds() {
            self.squares[sq.rank as usize][sq.file as usize] = piece;
        }
    }

    pub fn find_king(&self, color: Color) -> Option<Square> {
        self.pieces(color)
            .find(|(_, pc)| pc.kind == PieceKind::King)
            .map(|(sq, _)| sq)
    }

    /// Every square holding a piece of `color`, in rank-then-file order.
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| match self.get(sq) {
            Some(pc) if pc.color == color => Some((sq, pc)),
            _ => None,
        })
    }

    pub fn piece_count(&self) -> usize {
        self.squares.iter().flatten().filter(|s| s.is_some()).count()
    }

    /// Move whatever stands on `from` to `to`, returning the previous
    /// occupant of `to`. No legality checks.
    pub fn apply(&mut self, from: Square, to: Square) -> Option<Piece> {
        let moving = self.get(from);
        let captured = self.get(to);
        self.set(to, moving);
        self.set(from, None);
        captured
    }

    /// Clone of this board with `from -> to` applied.
    pub fn with_move(&self, from: Square, to: Square) -> Board {
        let mut next = self.clone();
        next.apply(from, to);
        next
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (rank, row) in self.squares.iter().enumerate() {
            write!(f, "{} ", 8 - rank)?;
            for sq in row {
                let ch = sq.map(Piece::to_char).unwrap_or('.');
                write!(f, " {ch}")?;
            }
            writeln!(f)?;
        }
        write!(f, "   a b c d e f g h")
    }
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod board_tests;
