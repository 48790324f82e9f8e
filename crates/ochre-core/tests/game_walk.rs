use ochre_core::{Move, MoveList, Position, STARTING_FEN};

/// Deterministic pseudo-random walk through legal moves.
fn walk(fen: &str, plies: usize, mut seed: u64) {
    let mut pos: Position = fen.parse().unwrap();
    let start = pos.clone();
    let mut played: Vec<Move> = Vec::new();

    for _ in 0..plies {
        let moves = pos.gen_all_legal();
        if moves.is_empty() {
            break;
        }
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let mv = moves[(seed >> 33) as usize % moves.len()];
        pos.make_move(mv);
        played.push(mv);

        assert_eq!(pos.key(), pos.key_from_scratch(), "key drift after {mv}");
        assert_eq!(pos.pawn_key(), pos.pawn_key_from_scratch(), "pawn key drift after {mv}");
        assert!(pos.is_consistent(), "board and piece lists disagree after {mv}");

        let reparsed: Position = pos.to_string().parse().unwrap();
        assert_eq!(reparsed.key(), pos.key(), "FEN round trip changed the key: {pos}");
    }

    while let Some(mv) = played.pop() {
        pos.unmake_move(mv);
    }
    assert_eq!(pos, start);
}

#[test]
fn random_walks_keep_state_consistent() {
    for (i, fen) in [
        STARTING_FEN,
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
    ]
    .into_iter()
    .enumerate()
    {
        for seed in 0..8 {
            walk(fen, 120, seed * 31 + i as u64);
        }
    }
}

#[test]
fn generated_lists_agree_with_evasions_during_walk() {
    let mut pos = Position::startpos();
    let mut seed = 7u64;
    for _ in 0..200 {
        let legal = pos.gen_all_legal();
        if legal.is_empty() {
            break;
        }
        if pos.is_in_check() {
            let mut evasions = MoveList::new();
            pos.gen_check_evasions(&mut evasions);
            let mut filtered: Vec<String> = Vec::new();
            for mv in evasions.iter() {
                if pos.is_legal(mv) {
                    filtered.push(mv.to_uci());
                }
            }
            let mut expected: Vec<String> = legal.iter().map(|mv| mv.to_uci()).collect();
            filtered.sort();
            expected.sort();
            assert_eq!(filtered, expected, "{pos}");
        }
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
        let mv = legal[(seed >> 33) as usize % legal.len()];
        pos.make_move(mv);
    }
}
