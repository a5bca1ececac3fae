// Copyright 2022 The Minerva Authors.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use minerva_engine::{CastleStatus, Color, ColoredPiece, FenError, Position, STARTING_POSITION};

#[test]
fn fen_smoke() {
    let pos = Position::from_fen("8/8/8/8/8/8/8/8 w - - 0 0").unwrap();

    assert_eq!(Color::White, pos.side_to_move);
    assert_eq!(CastleStatus::empty(), pos.castling);
    assert!(!pos.has_en_passant());
    assert_eq!(0, pos.halfmove_clock);
    assert_eq!(0, pos.full_moves);
}

// Round-tripping valid FEN strings must reproduce them exactly.
// The positions come from https://gist.github.com/peterellisjones/8c46c28141c162d1d8a0f0badbc9cff9
#[test]
fn emit_inverts_parse() {
    let tests = [
        "r6r/1b2k1bq/8/8/7B/8/8/R3K2R b KQ - 3 2",
        "8/8/8/2k5/2pP4/8/B7/4K3 b - d3 0 3",
        "r1bqkbnr/pppppppp/n7/8/8/P7/1PPPPPPP/RNBQKBNR w KQkq - 2 2",
        "r3k2r/p1pp1pb1/bn2Qnp1/2qPN3/1p2P3/2N5/PPPBBPPP/R3K2R b KQkq - 3 2",
        "2kr3r/p1ppqpb1/bn2Qnp1/3PN3/1p2P3/2N5/PPPBBPPP/R3K2R b KQ - 3 2",
        "rnb2k1r/pp1Pbppp/2p5/q7/2B5/8/PPPQNnPP/RNB1K2R w KQ - 3 9",
        "2r5/3pk3/8/2P5/8/2K5/8/8 w - - 5 4",
        "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
        "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
        "3k4/3p4/8/K1P4r/8/8/8/8 b - - 0 1",
        "8/8/4k3/8/2p5/8/B2P2K1/8 w - - 0 1",
        "8/8/1k6/2b5/2pP4/8/5K2/8 b - d3 0 1",
        "5k2/8/8/8/8/8/8/4K2R w K - 0 1",
        "3k4/8/8/8/8/8/8/R3K3 w Q - 0 1",
        "r3k2r/1b4bq/8/8/8/8/7B/R3K2R w KQkq - 0 1",
        "r3k2r/8/3Q4/8/8/5q2/8/R3K2R b KQkq - 0 1",
        "2K2r2/4P3/8/8/8/8/8/3k4 w - - 0 1",
        "8/8/1P2K3/8/2n5/1q6/8/5k2 b - - 0 1",
        "4k3/1P6/8/8/8/8/K7/8 w - - 0 1",
        "8/P1k5/K7/8/8/8/8/8 w - - 0 1",
        "K1k5/8/P7/8/8/8/8/8 w - - 0 1",
        "8/k1P5/8/1K6/8/8/8/8 w - - 0 1",
        "8/8/2k5/5q2/5n2/8/5K2/8 b - - 0 1",
        "rnbqkb1r/pp2pppp/5n2/2pp4/3P1B2/3BP3/PPP2PPP/RN1QK1NR b KQkq - 1 4",
    ];

    for fen in tests {
        let pos = Position::from_fen(fen).unwrap();
        assert_eq!(fen, pos.as_fen(), "expecting identical FEN strings");
    }
}

// Parsing a FEN string gives the correct full chessboard, in order.
#[test]
fn full_board_layout() {
    use ColoredPiece::*;

    let pos = Position::from_fen("r6r/1b2k1bq/8/8/7B/8/8/R3K2R b KQ - 3 2").unwrap();

    // The array starts at a1, so rank 1 comes first.
    #[rustfmt::skip]
    let expected = [
        WhiteRook, Empty, Empty, Empty, WhiteKing, Empty, Empty, WhiteRook,
        Empty, Empty, Empty, Empty, Empty, Empty, Empty, Empty,
        Empty, Empty, Empty, Empty, Empty, Empty, Empty, Empty,
        Empty, Empty, Empty, Empty, Empty, Empty, Empty, WhiteBishop,
        Empty, Empty, Empty, Empty, Empty, Empty, Empty, Empty,
        Empty, Empty, Empty, Empty, Empty, Empty, Empty, Empty,
        Empty, BlackBishop, Empty, Empty, BlackKing, Empty, BlackBishop, BlackQueen,
        BlackRook, Empty, Empty, Empty, Empty, Empty, Empty, BlackRook,
    ];

    assert_eq!(expected, pos.squares);
}

#[test]
fn bitboards_are_populated() {
    let pos = Position::from_fen(STARTING_POSITION).unwrap();

    assert_eq!(16, pos.occupied[Color::White as usize].count());
    assert_eq!(16, pos.occupied[Color::Black as usize].count());
    assert_eq!(
        16,
        pos.pieces[minerva_engine::Piece::Pawn as usize].count()
    );
    assert_eq!(2, pos.pieces[minerva_engine::Piece::King as usize].count());
    pos.validate();
}

#[test]
fn invalid_fens_are_rejected() {
    let tests: [(&str, &str); 7] = [
        (
            "r6r/1b2k1bq/8/8/8/8/R3K2R b KQ - 3 2",
            "missing a rank",
        ),
        (
            "8/8/8/2k5/2pP4/8/B7/4K3 g - d3 0 3",
            "side to move is not 'w' or 'b'",
        ),
        ("w KQkq - 2 2", "missing the ranks section entirely"),
        (
            "r3k2rp1pp1pb1/8/bn2Qnp1/2qPN3/1p2P3/2N5/PPPBBPPP/R3K2R b KQkq - 3 2",
            "one rank is too long",
        ),
        (
            "2kr3r//bn2Qnp1/3PN3/1p2P3/2N5/PPPBBPPP/R3K2R b KQ - 3 2",
            "rank is empty",
        ),
        (
            "5k2/8/8/8/8/8/8/4K2R w  - 0 1",
            "castling rights are omitted",
        ),
        (
            "4k3/8/8/8/8/8/8/4K3 w - - x 1",
            "halfmove clock is not a number",
        ),
    ];

    for (fen, why) in tests {
        assert!(
            Position::from_fen(fen).is_err(),
            "wanted an error, invalid because: {}",
            why
        );
    }
}

#[test]
fn error_kinds() {
    assert!(matches!(
        Position::from_fen("8/8/8/8 w - - 0 1"),
        Err(FenError::WrongRankCount(4))
    ));
    assert!(matches!(
        Position::from_fen("8/8/8/8/8/8/8/8 w - -"),
        Err(FenError::WrongSectionCount(5))
    ));
    assert!(matches!(
        Position::from_fen("8/8/8/8/8/8/8/8 x - - 0 1"),
        Err(FenError::InvalidSideToMove(_))
    ));
    assert!(matches!(
        Position::from_fen("8/8/8/8/8/8/8/8 w KX - 0 1"),
        Err(FenError::InvalidCastling(_))
    ));
    assert!(matches!(
        Position::from_fen("8/8/8/8/8/8/8/8 w - e9 0 1"),
        Err(FenError::InvalidEnPassant(_))
    ));
    assert!(matches!(
        Position::from_fen("8/8/8/8/8/8/8/8 w - - 0 y"),
        Err(FenError::InvalidFullmove(_))
    ));
    assert!(matches!(
        Position::from_fen("8/8/8/x7/8/8/8/8 w - - 0 1"),
        Err(FenError::UnknownPiece('x'))
    ));
}

#[test]
fn en_passant_target_is_parsed() {
    let pos = Position::from_fen("8/8/8/2k5/2pP4/8/B7/4K3 b - d3 0 3").unwrap();
    assert!(pos.has_en_passant());
    assert_eq!("d3", minerva_engine::square::name(pos.en_passant));
}
