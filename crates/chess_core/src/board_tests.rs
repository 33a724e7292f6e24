use super::*;

const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

#[test]
fn test_startpos_layout() {
    let b = Board::startpos();
    assert_eq!(b.piece_count(), 32);
    assert_eq!(
        b.get(Square::new(0, 4)),
        Some(Piece::new(Color::Black, PieceKind::King))
    );
    assert_eq!(
        b.get(Square::new(7, 3)),
        Some(Piece::new(Color::White, PieceKind::Queen))
    );
    assert_eq!(b.get(Square::new(4, 4)), None);
    assert_eq!(b.to_fen(), START_FEN);
}

#[test]
fn test_fen_round_trip() {
    let fen = "k7/8/1QK5/8/8/8/8/8";
    let b = Board::from_fen(fen).unwrap();
    assert_eq!(b.to_fen(), fen);
    assert_eq!(b.piece_count(), 3);
    assert_eq!(b.find_king(Color::Black), Some(Square::new(0, 0)));
    assert_eq!(b.find_king(Color::White), Some(Square::new(2, 2)));
}

#[test]
fn test_fen_ignores_trailing_fields() {
    let b = Board::from_fen(&format!("{START_FEN} w KQkq - 0 1")).unwrap();
    assert_eq!(b, Board::startpos());
}

#[test]
fn test_fen_rejects_garbage() {
    assert!(Board::from_fen("").is_err());
    assert!(Board::from_fen("8/8/8").is_err());
    assert!(Board::from_fen("9/8/8/8/8/8/8/8").is_err());
    assert!(Board::from_fen("x7/8/8/8/8/8/8/8").is_err());
    assert!(Board::from_fen("7/8/8/8/8/8/8/8").is_err());
}

#[test]
fn test_clone_is_independent() {
    let b = Board::startpos();
    let mut c = b.clone();
    c.set(Square::new(6, 4), None);
    assert!(b.get(Square::new(6, 4)).is_some());
    assert!(c.get(Square::new(6, 4)).is_none());
}

#[test]
fn test_apply_returns_captured() {
    let mut b = Board::from_fen("4k3/8/8/3p4/8/8/8/3RK3").unwrap();
    let captured = b.apply(Square::new(7, 3), Square::new(3, 3));
    assert_eq!(captured, Some(Piece::new(Color::Black, PieceKind::Pawn)));
    assert_eq!(b.piece_count(), 3);
    assert_eq!(
        b.get(Square::new(3, 3)),
        Some(Piece::new(Color::White, PieceKind::Rook))
    );
}

#[test]
fn test_off_board_reads_empty() {
    let b = Board::startpos();
    assert_eq!(b.get(Square::new(8, 0)), None);
    assert_eq!(b.find_king(Color::White), Some(Square::new(7, 4)));
    assert_eq!(Board::empty().find_king(Color::White), None);
}
