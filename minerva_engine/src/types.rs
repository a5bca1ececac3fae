// Copyright 2022 The Minerva Authors.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Core piece and color types shared by the whole engine.
//!
//! `ColoredPiece` uses the low bit for the color and the remaining bits for
//! the colorless piece, so that `code & 1` is the color and `code >> 1` maps
//! onto [`Piece`]. Both encodings fit comfortably in the four-bit fields of
//! a packed move.

use std::fmt;

use num_traits::FromPrimitive;

/// The player colors. White is zero and black is one, matching the parity
/// of the `ColoredPiece` codes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    /// Returns the opposite color.
    pub const fn invert(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

/// A piece of either color, including `None` for "not a piece".
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Piece {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
    None = 6,
}

impl Piece {
    /// Returns the colored version of this piece, e.g. `Pawn` of `White`
    /// is `WhitePawn`. The color of `Piece::None` is `Empty`.
    pub fn of_color(self, color: Color) -> ColoredPiece {
        if self == Piece::None {
            return ColoredPiece::Empty;
        }

        ColoredPiece::from_u8((self as u8) << 1 | color as u8).unwrap()
    }

    /// The single-character FEN-alphabet name of the piece, uppercased.
    pub fn as_char(self) -> char {
        match self {
            Piece::Pawn => 'P',
            Piece::Knight => 'N',
            Piece::Bishop => 'B',
            Piece::Rook => 'R',
            Piece::Queen => 'Q',
            Piece::King => 'K',
            Piece::None => '?',
        }
    }
}

impl FromPrimitive for Piece {
    fn from_i64(n: i64) -> Option<Piece> {
        <Piece as FromPrimitive>::from_u64(n as u64)
    }

    fn from_u64(n: u64) -> Option<Piece> {
        let piece = match n {
            0 => Piece::Pawn,
            1 => Piece::Knight,
            2 => Piece::Bishop,
            3 => Piece::Rook,
            4 => Piece::Queen,
            5 => Piece::King,
            6 => Piece::None,
            _ => return None,
        };

        Some(piece)
    }
}

/// A piece with an associated color, plus `Empty` for vacant squares.
/// White pieces are even and black pieces are odd.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum ColoredPiece {
    WhitePawn = 0,
    BlackPawn = 1,
    WhiteKnight = 2,
    BlackKnight = 3,
    WhiteBishop = 4,
    BlackBishop = 5,
    WhiteRook = 6,
    BlackRook = 7,
    WhiteQueen = 8,
    BlackQueen = 9,
    WhiteKing = 10,
    BlackKing = 11,
    Empty = 12,
}

const FEN_ALPHABET: &[u8; 13] = b"PpNnBbRrQqKk?";

impl ColoredPiece {
    /// The color of this piece. The color of `Empty` is meaningless and
    /// callers are expected to check for it first.
    pub const fn color(self) -> Color {
        match self as u8 & 1 {
            0 => Color::White,
            _ => Color::Black,
        }
    }

    /// Strips the color from this piece. `Empty` maps to `Piece::None`.
    pub fn colorless(self) -> Piece {
        Piece::from_u8(self as u8 >> 1).unwrap()
    }

    /// The piece's character in the FEN alphabet; white pieces are
    /// uppercase, black pieces lowercase, and `Empty` is `'?'`.
    pub fn as_char(self) -> char {
        FEN_ALPHABET[self as usize] as char
    }

    /// Parses a character of the FEN alphabet. The inverse of `as_char`.
    pub fn from_fen_char(c: char) -> Option<ColoredPiece> {
        let index = FEN_ALPHABET.iter().position(|&b| b == c as u8)?;
        ColoredPiece::from_u64(index as u64)
    }
}

impl FromPrimitive for ColoredPiece {
    fn from_i64(n: i64) -> Option<ColoredPiece> {
        <ColoredPiece as FromPrimitive>::from_u64(n as u64)
    }

    fn from_u64(n: u64) -> Option<ColoredPiece> {
        use ColoredPiece::*;

        let piece = match n {
            0 => WhitePawn,
            1 => BlackPawn,
            2 => WhiteKnight,
            3 => BlackKnight,
            4 => WhiteBishop,
            5 => BlackBishop,
            6 => WhiteRook,
            7 => BlackRook,
            8 => WhiteQueen,
            9 => BlackQueen,
            10 => WhiteKing,
            11 => BlackKing,
            12 => Empty,
            _ => return None,
        };

        Some(piece)
    }
}

impl fmt::Display for ColoredPiece {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

bitflags! {
    /// Castling availability for both sides, in a four-bit mask.
    pub struct CastleStatus: u8 {
        const WHITE_KINGSIDE = 0x1;
        const WHITE_QUEENSIDE = 0x2;
        const BLACK_KINGSIDE = 0x4;
        const BLACK_QUEENSIDE = 0x8;
        const WHITE_BOTH = 0x3;
        const BLACK_BOTH = 0xC;
    }
}

impl CastleStatus {
    /// Renders the availability in FEN form, e.g. `KQkq` when everything
    /// is still available or `-` when nothing is.
    pub fn as_fen(self) -> String {
        let mut out = String::new();

        if self.contains(CastleStatus::WHITE_KINGSIDE) {
            out.push('K');
        }

        if self.contains(CastleStatus::WHITE_QUEENSIDE) {
            out.push('Q');
        }

        if self.contains(CastleStatus::BLACK_KINGSIDE) {
            out.push('k');
        }

        if self.contains(CastleStatus::BLACK_QUEENSIDE) {
            out.push('q');
        }

        if out.is_empty() {
            out.push('-');
        }

        out
    }

    /// Parses a FEN castling field. Returns `None` for anything that is not
    /// `-` or a subset of `KQkq`.
    pub fn from_fen(s: &str) -> Option<CastleStatus> {
        if s == "-" {
            return Some(CastleStatus::empty());
        }

        if s.is_empty() {
            return None;
        }

        let mut out = CastleStatus::empty();
        for c in s.chars() {
            match c {
                'K' => out |= CastleStatus::WHITE_KINGSIDE,
                'Q' => out |= CastleStatus::WHITE_QUEENSIDE,
                'k' => out |= CastleStatus::BLACK_KINGSIDE,
                'q' => out |= CastleStatus::BLACK_QUEENSIDE,
                _ => return None,
            }
        }

        Some(out)
    }
}

impl fmt::Display for CastleStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_fen())
    }
}
