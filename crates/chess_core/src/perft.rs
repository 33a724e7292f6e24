use crate::{board::Board, legal::legal_moves_into, types::*};

/// Pure perft node count.
/// Counts all legal positions from the current one down to `depth`.
pub fn perft(board: &Board, color: Color, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    fn inner(board: &Board, color: Color, depth: u8, layers: &mut [Vec<MoveRequest>]) -> u64 {
        if depth == 0 {
            return 1;
        }

        let Some((buf, rest)) = layers.split_first_mut() else {
            return 1;
        };

        legal_moves_into(board, color, buf);
        if depth == 1 {
            return buf.len() as u64;
        }

        let mut nodes = 0u64;
        for mv in buf.iter() {
            let next = board.with_move(mv.from, mv.to);
            nodes += inner(&next, color.other(), depth - 1, rest);
        }
        nodes
    }

    let mut layers = vec![Vec::with_capacity(64); depth as usize];
    inner(board, color, depth, &mut layers[..])
}
