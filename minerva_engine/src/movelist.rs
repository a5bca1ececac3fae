// Copyright 2022 The Minerva Authors.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A list of moves that can be filtered and sorted by the eval scores
//! embedded in the moves themselves.

use std::cmp::Reverse;

use crate::bitboard::Bitboard;
use crate::moves::Move;
use crate::square::Square;
use crate::types::{CastleStatus, ColoredPiece, Piece};

/// An ordered list of moves.
#[derive(Clone, Debug, Default)]
pub struct MoveList {
    moves: Vec<Move>,
}

impl MoveList {
    pub fn new() -> MoveList {
        MoveList { moves: Vec::new() }
    }

    /// Returns a new list with space reserved for `size` moves.
    pub fn with_capacity(size: usize) -> MoveList {
        MoveList {
            moves: Vec::with_capacity(size),
        }
    }

    /// Adds a move to the end of the list.
    pub fn push(&mut self, m: Move) {
        self.moves.push(m);
    }

    /// Adds every move of `other` to the end of the list.
    pub fn append(&mut self, other: &MoveList) {
        self.moves.extend_from_slice(&other.moves);
    }

    /// Emits one move per set square of `targets`, computing the source
    /// square of each through `from_of`. This is the workhorse of the move
    /// generator: pawn moves produce a destination bitboard whose source is
    /// a fixed offset away, while the other pieces generate an attack set
    /// from a fixed source square.
    #[allow(clippy::too_many_arguments)]
    pub fn append_from_bitboard<F>(
        &mut self,
        piece: ColoredPiece,
        from_of: F,
        targets: Bitboard,
        squares: &[ColoredPiece; 64],
        castling: CastleStatus,
        en_passant: Square,
        halfmove_clock: u32,
    ) where
        F: Fn(Square) -> Square,
    {
        for to in targets.iter() {
            self.push(Move::encode(
                from_of(to),
                to,
                piece,
                squares[to as usize],
                Piece::None,
                castling,
                en_passant,
                halfmove_clock,
            ));
        }
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Iterates over the moves in list order.
    pub fn iter(&self) -> impl Iterator<Item = Move> + '_ {
        self.moves.iter().copied()
    }

    pub fn as_slice(&self) -> &[Move] {
        &self.moves
    }

    pub fn as_mut_slice(&mut self) -> &mut [Move] {
        &mut self.moves
    }

    /// Sorts the list in place so that moves with the highest embedded eval
    /// come first.
    pub fn sort(&mut self) {
        self.moves.sort_by_key(|m| Reverse(m.eval()));
    }

    /// Retains only the moves for which `allowed` returns true.
    pub fn filter<F>(&mut self, mut allowed: F)
    where
        F: FnMut(Move) -> bool,
    {
        self.moves.retain(|&m| allowed(m));
    }

    /// Retains only the moves for which `allowed` returns a move, replacing
    /// each kept move with the (potentially modified) move it returned.
    pub fn filter_map<F>(&mut self, mut allowed: F)
    where
        F: FnMut(Move) -> Option<Move>,
    {
        let mut out = Vec::with_capacity(self.moves.len());
        for &m in &self.moves {
            if let Some(kept) = allowed(m) {
                out.push(kept);
            }
        }

        self.moves = out;
    }
}

impl FromIterator<Move> for MoveList {
    fn from_iter<I: IntoIterator<Item = Move>>(iter: I) -> MoveList {
        MoveList {
            moves: iter.into_iter().collect(),
        }
    }
}
