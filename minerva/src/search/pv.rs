// Copyright 2022 The Minerva Authors.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt;

use minerva_engine::Move;

/// A principal variation: the sequence of best-play moves found by the
/// search from some position. Each recursive call writes its line into its
/// own buffer; a parent that improves on its best score prepends its move
/// with [`PvList::catenate`].
#[derive(Clone, Debug, Default)]
pub struct PvList {
    moves: Vec<Move>,
}

impl PvList {
    pub fn new() -> PvList {
        PvList {
            moves: Vec::with_capacity(crate::search::MAX_DEPTH as usize),
        }
    }

    pub fn clear(&mut self) {
        self.moves.clear();
    }

    pub fn add(&mut self, m: Move) {
        self.moves.push(m);
    }

    /// Appends every move of `other`.
    pub fn concat(&mut self, other: &PvList) {
        self.moves.extend_from_slice(&other.moves);
    }

    /// Replaces this variation with `m` followed by `other`.
    pub fn catenate(&mut self, m: Move, other: &PvList) {
        self.clear();
        self.add(m);
        self.concat(other);
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn first(&self) -> Option<Move> {
        self.moves.first().copied()
    }
}

impl fmt::Display for PvList {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for m in &self.moves {
            if !first {
                write!(f, " ")?;
            }

            write!(f, "{}", m)?;
            first = false;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minerva_engine::{parse_move, Position};

    fn complete(pos: &Position, s: &str) -> Move {
        pos.complete_move(parse_move(s).unwrap())
    }

    #[test]
    fn catenate_prepends() {
        let pos = Position::startpos();
        let e4 = complete(&pos, "e2e4");
        let d4 = complete(&pos, "d2d4");

        let mut child = PvList::new();
        child.add(d4);

        let mut pv = PvList::new();
        pv.add(e4); // stale contents are discarded
        pv.catenate(e4, &child);

        assert_eq!("e2e4 d2d4", pv.to_string());
        assert_eq!(Some(e4), pv.first());
    }

    #[test]
    fn empty_pv_renders_empty() {
        assert_eq!("", PvList::new().to_string());
        assert!(PvList::new().is_empty());
    }
}
