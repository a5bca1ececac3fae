// Copyright 2022 The Minerva Authors.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Move generation.
//!
//! Knight and king moves come straight out of the precomputed tables, and
//! slider moves out of the magic tables. Pawn moves are generated for each
//! color separately, as bit-parallel shifts of the whole pawn set: a single
//! shift of the pawn bitboard produces the destination set for one kind of
//! pawn move, and the source of each destination is a fixed offset away.
//!
//! Everything here is pseudo-legal: a generated move may still leave the
//! mover's own king in check. [`Position::moves_legal`] filters those out
//! destructively, by making each move and undoing it again.

use crate::bitboard::Bitboard;
use crate::movelist::MoveList;
use crate::moves::Move;
use crate::position::Position;
use crate::square::{
    self, Square, MASK_FILE_A, MASK_FILE_H, MASK_RANK_1, MASK_RANK_2, MASK_RANK_7, MASK_RANK_8,
};
use crate::magics;
use crate::types::{CastleStatus, Color, ColoredPiece, Piece};

impl Position {
    /// Generates every move the side to move can make under the piece
    /// movement rules, without regard for whether the mover's king is left
    /// in check.
    pub fn moves_pseudolegal(&self) -> MoveList {
        let mut moves = MoveList::with_capacity(48);

        match self.side_to_move {
            Color::White => self.moves_white_pawns(&mut moves),
            Color::Black => self.moves_black_pawns(&mut moves),
        }

        self.moves_knights(&mut moves);
        self.moves_sliders(&mut moves);
        self.moves_king(&mut moves);
        moves
    }

    /// Generates the legal moves of the side to move: the pseudo-legal
    /// moves minus those that expose the mover's own king. A move is tested
    /// by applying it, checking the king, and unwinding.
    pub fn moves_legal(&mut self) -> MoveList {
        let mut moves = self.moves_pseudolegal();
        moves.filter(|m| {
            if self.make_move(m) {
                self.undo_move(m);
                true
            } else {
                false
            }
        });

        moves
    }

    fn moves_white_pawns(&self, moves: &mut MoveList) {
        use ColoredPiece::{BlackPawn, WhitePawn};

        let pawns = self.pieces[Piece::Pawn as usize] & self.occupied[Color::White as usize];
        let enemy = self.occupied[Color::Black as usize];
        let empty = !(self.occupied[0] | self.occupied[1]);

        let mut one_step = (pawns << 8) & empty;
        let two_steps = (((pawns & MASK_RANK_2) << 8) & empty) << 8 & empty;
        let mut captures_left = ((pawns & !MASK_FILE_A) << 7) & enemy;
        let mut captures_right = ((pawns & !MASK_FILE_H) << 9) & enemy;

        // Any move that reaches the back rank promotes, and produces four
        // moves instead of one. Promotions are removed from the plain
        // destination sets below so they are not generated twice.
        let promotions = (one_step | captures_left | captures_right) & MASK_RANK_8;
        for to in promotions.iter() {
            if captures_left.is_on(to) {
                self.push_promotions(moves, to - 7, to, WhitePawn);
            }

            if captures_right.is_on(to) {
                self.push_promotions(moves, to - 9, to, WhitePawn);
            }

            if one_step.is_on(to) {
                self.push_promotions(moves, to - 8, to, WhitePawn);
            }
        }

        one_step &= !MASK_RANK_8;
        captures_left &= !MASK_RANK_8;
        captures_right &= !MASK_RANK_8;

        if self.has_en_passant() {
            let target = Bitboard::from_square(self.en_passant);

            if (((pawns & !MASK_FILE_A) << 7) & target).any() {
                moves.push(self.pawn_move(self.en_passant - 7, self.en_passant, WhitePawn, BlackPawn));
            }

            if (((pawns & !MASK_FILE_H) << 9) & target).any() {
                moves.push(self.pawn_move(self.en_passant - 9, self.en_passant, WhitePawn, BlackPawn));
            }
        }

        self.append_pawn_set(moves, WhitePawn, one_step, 8);
        self.append_pawn_set(moves, WhitePawn, two_steps, 16);
        self.append_pawn_set(moves, WhitePawn, captures_left, 7);
        self.append_pawn_set(moves, WhitePawn, captures_right, 9);
    }

    fn moves_black_pawns(&self, moves: &mut MoveList) {
        use ColoredPiece::{BlackPawn, WhitePawn};

        let pawns = self.pieces[Piece::Pawn as usize] & self.occupied[Color::Black as usize];
        let enemy = self.occupied[Color::White as usize];
        let empty = !(self.occupied[0] | self.occupied[1]);

        let mut one_step = (pawns >> 8) & empty;
        let two_steps = (((pawns & MASK_RANK_7) >> 8) & empty) >> 8 & empty;
        let mut captures_left = ((pawns & !MASK_FILE_A) >> 9) & enemy;
        let mut captures_right = ((pawns & !MASK_FILE_H) >> 7) & enemy;

        let promotions = (one_step | captures_left | captures_right) & MASK_RANK_1;
        for to in promotions.iter() {
            if captures_left.is_on(to) {
                self.push_promotions(moves, to + 9, to, BlackPawn);
            }

            if captures_right.is_on(to) {
                self.push_promotions(moves, to + 7, to, BlackPawn);
            }

            if one_step.is_on(to) {
                self.push_promotions(moves, to + 8, to, BlackPawn);
            }
        }

        one_step &= !MASK_RANK_1;
        captures_left &= !MASK_RANK_1;
        captures_right &= !MASK_RANK_1;

        if self.has_en_passant() {
            let target = Bitboard::from_square(self.en_passant);

            if (((pawns & !MASK_FILE_A) >> 9) & target).any() {
                moves.push(self.pawn_move(self.en_passant + 9, self.en_passant, BlackPawn, WhitePawn));
            }

            if (((pawns & !MASK_FILE_H) >> 7) & target).any() {
                moves.push(self.pawn_move(self.en_passant + 7, self.en_passant, BlackPawn, WhitePawn));
            }
        }

        self.append_pawn_set(moves, BlackPawn, one_step, -8);
        self.append_pawn_set(moves, BlackPawn, two_steps, -16);
        self.append_pawn_set(moves, BlackPawn, captures_left, -9);
        self.append_pawn_set(moves, BlackPawn, captures_right, -7);
    }

    /// Emits one move per destination in `targets`, where every source
    /// square sits at a fixed `offset` from its destination.
    fn append_pawn_set(
        &self,
        moves: &mut MoveList,
        pawn: ColoredPiece,
        targets: Bitboard,
        offset: i8,
    ) {
        moves.append_from_bitboard(
            pawn,
            |to| (to as i8 - offset) as Square,
            targets,
            &self.squares,
            self.castling,
            self.en_passant,
            self.halfmove_clock,
        );
    }

    fn pawn_move(
        &self,
        from: Square,
        to: Square,
        pawn: ColoredPiece,
        captured: ColoredPiece,
    ) -> Move {
        Move::encode(
            from,
            to,
            pawn,
            captured,
            Piece::None,
            self.castling,
            self.en_passant,
            self.halfmove_clock,
        )
    }

    fn push_promotions(&self, moves: &mut MoveList, from: Square, to: Square, pawn: ColoredPiece) {
        for promotion in [Piece::Queen, Piece::Rook, Piece::Bishop, Piece::Knight] {
            moves.push(Move::encode(
                from,
                to,
                pawn,
                self.squares[to as usize],
                promotion,
                self.castling,
                self.en_passant,
                self.halfmove_clock,
            ));
        }
    }

    fn moves_knights(&self, moves: &mut MoveList) {
        let us = self.side_to_move;
        let knights = self.pieces[Piece::Knight as usize] & self.occupied[us as usize];
        let knight = Piece::Knight.of_color(us);

        for from in knights.iter() {
            let targets = magics::knight_attacks(from) & !self.occupied[us as usize];
            moves.append_from_bitboard(
                knight,
                |_| from,
                targets,
                &self.squares,
                self.castling,
                self.en_passant,
                self.halfmove_clock,
            );
        }
    }

    fn moves_sliders(&self, moves: &mut MoveList) {
        let us = self.side_to_move;
        let own = self.occupied[us as usize];
        let occupancy = self.occupied[0] | self.occupied[1];

        for (kind, attacks) in [
            (Piece::Bishop, magics::bishop_attacks as fn(Square, Bitboard) -> Bitboard),
            (Piece::Rook, magics::rook_attacks),
            (Piece::Queen, magics::queen_attacks),
        ] {
            let piece = kind.of_color(us);
            for from in (self.pieces[kind as usize] & own).iter() {
                let targets = attacks(from, occupancy) & !own;
                moves.append_from_bitboard(
                    piece,
                    |_| from,
                    targets,
                    &self.squares,
                    self.castling,
                    self.en_passant,
                    self.halfmove_clock,
                );
            }
        }
    }

    fn moves_king(&self, moves: &mut MoveList) {
        let us = self.side_to_move;
        let from = self.king_location[us as usize];
        let king = Piece::King.of_color(us);

        let targets = magics::king_attacks(from) & !self.occupied[us as usize];
        moves.append_from_bitboard(
            king,
            |_| from,
            targets,
            &self.squares,
            self.castling,
            self.en_passant,
            self.halfmove_clock,
        );

        self.moves_castling(moves);
    }

    /// Castling, encoded as the two-square king move; make_move relocates
    /// the rook. The king may not castle out of, through, or into check,
    /// and every square between the king and the rook must be empty. On
    /// the queenside the b-file square only needs to be empty, since the
    /// king never crosses it.
    fn moves_castling(&self, moves: &mut MoveList) {
        let us = self.side_to_move;
        let them = us.invert();
        let king = Piece::King.of_color(us);

        let (kingside, queenside, home, b, c, d, f, g) = match us {
            Color::White => (
                CastleStatus::WHITE_KINGSIDE,
                CastleStatus::WHITE_QUEENSIDE,
                square::E1,
                square::B1,
                square::C1,
                square::D1,
                square::F1,
                square::G1,
            ),
            Color::Black => (
                CastleStatus::BLACK_KINGSIDE,
                CastleStatus::BLACK_QUEENSIDE,
                square::E8,
                square::B8,
                square::C8,
                square::D8,
                square::F8,
                square::G8,
            ),
        };

        if !self.castling.intersects(kingside | queenside) {
            return;
        }

        if self.king_in_check(us) {
            return;
        }

        if self.castling.contains(kingside)
            && self.is_empty(f)
            && self.is_empty(g)
            && !self.is_attacked(f, them)
            && !self.is_attacked(g, them)
        {
            moves.push(Move::encode(
                home,
                g,
                king,
                ColoredPiece::Empty,
                Piece::None,
                self.castling,
                self.en_passant,
                self.halfmove_clock,
            ));
        }

        if self.castling.contains(queenside)
            && self.is_empty(b)
            && self.is_empty(c)
            && self.is_empty(d)
            && !self.is_attacked(c, them)
            && !self.is_attacked(d, them)
        {
            moves.push(Move::encode(
                home,
                c,
                king,
                ColoredPiece::Empty,
                Piece::None,
                self.castling,
                self.en_passant,
                self.halfmove_clock,
            ));
        }
    }
}
