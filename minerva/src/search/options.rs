// Copyright 2022 The Minerva Authors.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt::Write;
use std::time::Duration;

use minerva_engine::UciMove;

/// Options passed to an engine starting a search, mirroring the arguments
/// of the UCI `go` command. Options narrow the search independently: if
/// both a depth and a node budget are given, whichever runs out first
/// terminates the search.
#[derive(Clone, Debug)]
pub struct SearchOptions {
    /// Don't stop searching until told to do so.
    pub infinite: bool,
    /// Only explore these root moves.
    pub search_moves: Vec<UciMove>,
    /// Explore the search tree to this many plies only.
    pub depth: u32,
    /// Only search this many nodes.
    pub nodes: u64,
    /// Search for a mate in this many moves. Zero means "not asked".
    pub mate: u32,
    /// Only search for the specified duration. Zero means "unset"; the
    /// time manager decides instead.
    pub move_time: Duration,

    pub white_time_remaining: Duration,
    pub black_time_remaining: Duration,
    pub white_increment: Duration,
    pub black_increment: Duration,
    /// Number of moves until the next time control.
    pub moves_to_go: u32,
}

impl Default for SearchOptions {
    fn default() -> SearchOptions {
        SearchOptions {
            infinite: false,
            search_moves: Vec::new(),
            depth: u32::MAX,
            nodes: u64::MAX,
            mate: 0,
            move_time: Duration::ZERO,
            white_time_remaining: Duration::from_secs(3600),
            black_time_remaining: Duration::from_secs(3600),
            white_increment: Duration::ZERO,
            black_increment: Duration::ZERO,
            moves_to_go: u32::MAX,
        }
    }
}

impl SearchOptions {
    /// Renders the options back in the `go` command's argument format,
    /// leaving out anything still at its default. Handy for logging.
    pub fn as_uci(&self) -> String {
        let defaults = SearchOptions::default();
        let mut out = String::new();

        if !self.search_moves.is_empty() {
            out.push_str("searchmoves");
            for m in &self.search_moves {
                let _ = write!(out, " {}", m);
            }

            out.push(' ');
        }

        if self.white_time_remaining != defaults.white_time_remaining {
            let _ = write!(out, "wtime {} ", self.white_time_remaining.as_millis());
        }

        if self.black_time_remaining != defaults.black_time_remaining {
            let _ = write!(out, "btime {} ", self.black_time_remaining.as_millis());
        }

        if !self.white_increment.is_zero() {
            let _ = write!(out, "winc {} ", self.white_increment.as_millis());
        }

        if !self.black_increment.is_zero() {
            let _ = write!(out, "binc {} ", self.black_increment.as_millis());
        }

        if self.moves_to_go != defaults.moves_to_go {
            let _ = write!(out, "movestogo {} ", self.moves_to_go);
        }

        if self.depth != defaults.depth {
            let _ = write!(out, "depth {} ", self.depth);
        }

        if self.nodes != defaults.nodes {
            let _ = write!(out, "nodes {} ", self.nodes);
        }

        if self.mate != 0 {
            let _ = write!(out, "mate {} ", self.mate);
        }

        if !self.move_time.is_zero() {
            let _ = write!(out, "movetime {} ", self.move_time.as_millis());
        }

        if self.infinite {
            out.push_str("infinite ");
        }

        out.trim_end().to_string()
    }
}
