//! Move text in and out: coordinate input (`e2e4`) and algebraic output
//! (`Nxd5+`).

use crate::error::MoveError;
use crate::types::*;

/// Algebraic text for a completed move:
/// `<piece letter><x if capture><destination><+ or #>`. Pawns get no
/// letter; mate takes precedence over check.
pub fn encode(kind: PieceKind, is_capture: bool, to: Square, is_check: bool, is_checkmate: bool) -> String {
    let mut s = String::with_capacity(6);
    if let Some(letter) = kind.letter() {
        s.push(letter);
    }
    if is_capture {
        s.push('x');
    }
    s.push_str(&to.to_string());
    if is_checkmate {
        s.push('#');
    } else if is_check {
        s.push('+');
    }
    s
}

/// Parse a 4-character coordinate move such as `e2e4`.
pub fn parse_move_text(txt: &str) -> Result<MoveRequest, MoveError> {
    let txt = txt.trim();
    if txt.len() != 4 || !txt.is_ascii() {
        return Err(MoveError::InvalidFormat(format!(
            "'{txt}' is not four characters like e2e4"
        )));
    }
    let from = Square::parse(&txt[0..2])
        .ok_or_else(|| MoveError::InvalidFormat(format!("bad origin square '{}'", &txt[0..2])))?;
    let to = Square::parse(&txt[2..4])
        .ok_or_else(|| MoveError::InvalidFormat(format!("bad destination square '{}'", &txt[2..4])))?;
    Ok(MoveRequest::new(from, to))
}

#[cfg(test)]
#[path = "notation_tests.rs"]
mod notation_tests;
