//! Perft (performance test) for move generation correctness verification.

use tracing::error;

use crate::moves::Move;
use crate::position::Position;

/// Count the leaf nodes of the legal move tree at `depth`.
///
/// Depth 0 returns 1 (the current position). Depth 1 returns the number of
/// legal moves without making them.
pub fn perft(pos: &mut Position, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = pos.gen_all_legal();
    if depth == 1 {
        return moves.len() as u64;
    }

    let key = pos.key();
    let mut nodes = 0u64;
    for mv in moves.iter() {
        pos.make_move(mv);
        nodes += perft(pos, depth - 1);
        pos.unmake_move(mv);
        if pos.key() != key {
            error!(%mv, depth, "key not restored after unmake");
        }
    }
    nodes
}

/// Perft split by root move, sorted by the move's coordinate notation.
pub fn divide(pos: &mut Position, depth: usize) -> Vec<(Move, u64)> {
    let moves = pos.gen_all_legal();
    let mut results: Vec<(Move, u64)> = moves
        .iter()
        .map(|mv| {
            pos.make_move(mv);
            let count = perft(pos, depth.saturating_sub(1));
            pos.unmake_move(mv);
            (mv, count)
        })
        .collect();
    results.sort_by_key(|(mv, _)| mv.to_uci());
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::STARTING_FEN;

    fn perft_fen(fen: &str, depth: usize) -> u64 {
        let mut pos: Position = fen.parse().unwrap();
        let before = pos.clone();
        let nodes = perft(&mut pos, depth);
        assert!(pos == before, "perft left the position modified");
        nodes
    }

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    const POSITION3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
    const POSITION4: &str = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";
    const POSITION5: &str = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8";

    #[test]
    fn perft_depth_0() {
        assert_eq!(perft_fen(STARTING_FEN, 0), 1);
    }

    #[test]
    fn perft_startpos_shallow() {
        assert_eq!(perft_fen(STARTING_FEN, 1), 20);
        assert_eq!(perft_fen(STARTING_FEN, 2), 400);
        assert_eq!(perft_fen(STARTING_FEN, 3), 8_902);
    }

    #[test]
    fn perft_startpos_depth_4() {
        assert_eq!(perft_fen(STARTING_FEN, 4), 197_281);
    }

    #[test]
    #[ignore] // slow
    fn perft_startpos_depth_5() {
        assert_eq!(perft_fen(STARTING_FEN, 5), 4_865_609);
    }

    #[test]
    fn perft_kiwipete_shallow() {
        assert_eq!(perft_fen(KIWIPETE, 1), 48);
        assert_eq!(perft_fen(KIWIPETE, 2), 2_039);
        assert_eq!(perft_fen(KIWIPETE, 3), 97_862);
    }

    #[test]
    #[ignore] // slow
    fn perft_kiwipete_depth_4() {
        assert_eq!(perft_fen(KIWIPETE, 4), 4_085_603);
    }

    #[test]
    #[ignore] // slow
    fn perft_kiwipete_depth_5() {
        assert_eq!(perft_fen(KIWIPETE, 5), 193_690_690);
    }

    #[test]
    fn perft_pos3() {
        assert_eq!(perft_fen(POSITION3, 1), 14);
        assert_eq!(perft_fen(POSITION3, 2), 191);
        assert_eq!(perft_fen(POSITION3, 3), 2_812);
        assert_eq!(perft_fen(POSITION3, 4), 43_238);
    }

    #[test]
    #[ignore] // slow
    fn perft_pos3_depth_5() {
        assert_eq!(perft_fen(POSITION3, 5), 674_624);
    }

    #[test]
    fn perft_pos4() {
        assert_eq!(perft_fen(POSITION4, 1), 6);
        assert_eq!(perft_fen(POSITION4, 2), 264);
        assert_eq!(perft_fen(POSITION4, 3), 9_467);
    }

    #[test]
    #[ignore] // slow
    fn perft_pos4_depth_4() {
        assert_eq!(perft_fen(POSITION4, 4), 422_333);
    }

    #[test]
    fn perft_pos5() {
        assert_eq!(perft_fen(POSITION5, 1), 44);
        assert_eq!(perft_fen(POSITION5, 2), 1_486);
        assert_eq!(perft_fen(POSITION5, 3), 62_379);
    }

    #[test]
    #[ignore] // slow
    fn perft_pos5_depth_4() {
        assert_eq!(perft_fen(POSITION5, 4), 2_103_487);
    }

    #[test]
    fn divide_startpos_depth_1() {
        let mut pos = Position::startpos();
        let results = divide(&mut pos, 1);
        assert_eq!(results.len(), 20);
        assert!(results.iter().all(|&(_, count)| count == 1));
        assert_eq!(results[0].0.to_uci(), "a2a3");
    }

    #[test]
    fn divide_sums_to_perft() {
        let mut pos: Position = KIWIPETE.parse().unwrap();
        let total: u64 = divide(&mut pos, 2).iter().map(|&(_, n)| n).sum();
        assert_eq!(total, 2_039);
    }
}
