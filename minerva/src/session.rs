// Copyright 2022 The Minerva Authors.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The UCI session: one line of input in, zero or more lines of output.
//!
//! Besides the standard protocol commands, the session understands a
//! family of underscore-prefixed debugging commands (`_fen`, `_pft`, and
//! friends) that poke directly at the current position. They are not part
//! of UCI and no GUI will send them; they exist for driving the engine by
//! hand.

use std::time::Duration;

use log::warn;
use thiserror::Error;

use minerva_engine::{
    parse_move, Color, FenError, Move, MoveParseError, Piece, Position, STARTING_POSITION,
};

use crate::engines::Engine;
use crate::logger;
use crate::search::SearchOptions;

/// Errors a command handler can report. They are printed as
/// `info string error:` lines and never end the session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid position command: {0}")]
    InvalidPosition(String),
    #[error("can't parse FEN: {0}")]
    Fen(#[from] FenError),
    #[error("can't understand move: {0}")]
    Move(#[from] MoveParseError),
    #[error("expecting a number after {0:?} in go command")]
    MissingGoValue(&'static str),
    #[error("bad number {1:?} after {0:?} in go command")]
    BadGoValue(&'static str, String),
    #[error("the ponder commands are not supported")]
    PonderUnsupported,
    #[error("no position to analyse; send a position command first")]
    NoPosition,
    #[error("no moves to undo")]
    NoMoves,
    #[error("{0}")]
    BadArguments(String),
    #[error("engine failed to start: {0}")]
    Engine(#[from] std::io::Error),
}

/// A UCI session: an engine plus the positions the GUI has sent so far.
pub struct Session {
    engine: Box<dyn Engine>,
    positions: Vec<Position>,
    moves: Vec<Move>,
}

impl Session {
    pub fn new(engine: Box<dyn Engine>) -> Session {
        Session {
            engine,
            positions: Vec::new(),
            moves: Vec::new(),
        }
    }

    /// Dispatches one line of input.
    pub fn handle(&mut self, line: &str) -> Result<(), SessionError> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, arguments)) = fields.split_first() else {
            return Ok(());
        };

        match command {
            "uci" => self.handle_uci(),
            "debug" => self.handle_debug(arguments),
            "isready" => self.handle_isready(),
            "setoption" => Ok(()), // no options yet
            "ucinewgame" => {
                self.engine.new_game();
                Ok(())
            }
            "position" => self.handle_position(arguments),
            "go" => self.handle_go(arguments),
            "stop" => {
                self.engine.stop();
                Ok(())
            }

            // Debugging commands outside the UCI protocol.
            "_pp" | "_prettyprint" => self.handle_pretty_print(),
            "_bb" | "_bitboards" => self.handle_bitboards(),
            "_pmv" | "_pseudolegalmoves" => self.handle_moves(false),
            "_lmv" | "_legalmoves" => self.handle_moves(true),
            "_isa" | "_isattacked" => self.handle_is_attacked(arguments),
            "_mm" | "_makemove" => self.handle_make_move(arguments),
            "_um" | "_undomove" => self.handle_undo_move(),
            "_pft" | "_perft" => self.handle_perft(arguments),
            "_div" | "_divide" => self.handle_divide(arguments),
            "_fen" | "_printfen" => self.handle_fen(),

            _ => {
                println!("info string don't understand {}", command);
                Ok(())
            }
        }
    }

    fn handle_uci(&mut self) -> Result<(), SessionError> {
        println!("id name {} {}", self.engine.name(), env!("CARGO_PKG_VERSION"));
        println!("id author {}", self.engine.author());
        println!("uciok");
        Ok(())
    }

    fn handle_debug(&mut self, arguments: &[&str]) -> Result<(), SessionError> {
        match arguments.first() {
            Some(&"on") => logger::debug_enable(),
            Some(&"off") => logger::debug_disable(),
            _ => {}
        }

        Ok(())
    }

    fn handle_isready(&mut self) -> Result<(), SessionError> {
        self.engine.prepare()?;
        println!("readyok");
        Ok(())
    }

    /// `position startpos|fen <fen> [moves <move>...]`. The moves are in
    /// long algebraic notation: `e2e4`, `e1g1` (castling as a king move),
    /// `e7e8q` (promotion).
    fn handle_position(&mut self, arguments: &[&str]) -> Result<(), SessionError> {
        if arguments.is_empty() {
            return Err(SessionError::InvalidPosition(
                "expected startpos or fen".to_string(),
            ));
        }

        let moves_index = arguments.iter().position(|&t| t == "moves");
        let (fen, moves): (String, &[&str]) = if arguments[0] == "startpos" {
            let moves = match moves_index {
                Some(i) => &arguments[i + 1..],
                None => &[],
            };

            (STARTING_POSITION.to_string(), moves)
        } else if arguments[0] == "fen" {
            match moves_index {
                Some(i) => (arguments[1..i].join(" "), &arguments[i + 1..]),
                None => (arguments[1..].join(" "), &[]),
            }
        } else {
            return Err(SessionError::InvalidPosition(format!(
                "unexpected token {:?}",
                arguments[0]
            )));
        };

        let mut pos = Position::from_fen(&fen)?;
        for raw in moves {
            let completed = pos.complete_move(parse_move(raw)?);
            if !pos.make_move(completed) {
                warn!("ignoring illegal move {} in position command", raw);
            }
        }

        self.positions.push(pos);
        Ok(())
    }

    fn handle_go(&mut self, arguments: &[&str]) -> Result<(), SessionError> {
        let pos = self
            .positions
            .last()
            .ok_or(SessionError::NoPosition)?
            .clone();
        let options = parse_go_options(arguments)?;
        self.engine.go(&pos, options)?;
        Ok(())
    }

    fn current(&mut self) -> Result<&mut Position, SessionError> {
        self.positions.last_mut().ok_or(SessionError::NoPosition)
    }

    fn handle_pretty_print(&mut self) -> Result<(), SessionError> {
        let pos = self.current()?;
        println!("\n{}", pos);
        Ok(())
    }

    fn handle_bitboards(&mut self) -> Result<(), SessionError> {
        let pos = self.current()?;

        for (label, board) in [
            ("WHITE occupation", pos.occupied[Color::White as usize]),
            ("BLACK occupation", pos.occupied[Color::Black as usize]),
            ("PAWNS", pos.pieces[Piece::Pawn as usize]),
            ("KNIGHTS", pos.pieces[Piece::Knight as usize]),
            ("BISHOPS", pos.pieces[Piece::Bishop as usize]),
            ("ROOKS", pos.pieces[Piece::Rook as usize]),
            ("QUEENS", pos.pieces[Piece::Queen as usize]),
            ("KINGS", pos.pieces[Piece::King as usize]),
        ] {
            println!("{}:\n{}", label, board);
        }

        Ok(())
    }

    fn handle_moves(&mut self, legal_only: bool) -> Result<(), SessionError> {
        let pos = self.current()?;
        let moves = if legal_only {
            pos.moves_legal()
        } else {
            pos.moves_pseudolegal()
        };

        for (i, m) in moves.iter().enumerate() {
            println!("({}) {}", i + 1, m);
        }

        Ok(())
    }

    fn handle_is_attacked(&mut self, arguments: &[&str]) -> Result<(), SessionError> {
        let [raw_square, raw_color] = arguments else {
            return Err(SessionError::BadArguments(
                "need a square and a color, e.g. _isa e4 w".to_string(),
            ));
        };

        let square = minerva_engine::square::parse(raw_square).ok_or_else(|| {
            SessionError::BadArguments(format!("bad square {:?}", raw_square))
        })?;

        let by = match *raw_color {
            "w" | "white" => Color::White,
            "b" | "black" => Color::Black,
            other => {
                return Err(SessionError::BadArguments(format!("bad color {:?}", other)));
            }
        };

        let pos = self.current()?;
        println!("{}", pos.is_attacked(square, by));
        Ok(())
    }

    fn handle_make_move(&mut self, arguments: &[&str]) -> Result<(), SessionError> {
        for raw in arguments {
            let parsed = parse_move(raw)?;
            let pos = self.current()?;
            let completed = pos.complete_move(parsed);
            if pos.make_move(completed) {
                self.moves.push(completed);
            } else {
                println!("info string move {} is illegal here", raw);
            }
        }

        Ok(())
    }

    fn handle_undo_move(&mut self) -> Result<(), SessionError> {
        let m = self.moves.pop().ok_or(SessionError::NoMoves)?;
        self.current()?.undo_move(m);
        Ok(())
    }

    fn handle_perft(&mut self, arguments: &[&str]) -> Result<(), SessionError> {
        let depth = parse_depth(arguments)?;
        let pos = self.current()?;
        println!("{}", pos.perft(depth));
        Ok(())
    }

    fn handle_divide(&mut self, arguments: &[&str]) -> Result<(), SessionError> {
        let depth = parse_depth(arguments)?;
        let pos = self.current()?;

        let mut total = 0u64;
        for (m, nodes) in pos.divide(depth) {
            println!("{}: {}", m, nodes);
            total += nodes;
        }

        println!("total: {}", total);
        Ok(())
    }

    fn handle_fen(&mut self) -> Result<(), SessionError> {
        let pos = self.current()?;
        println!("{}", pos.as_fen());
        Ok(())
    }
}

fn parse_depth(arguments: &[&str]) -> Result<u32, SessionError> {
    let [raw] = arguments else {
        return Err(SessionError::BadArguments(
            "need a depth as an integer".to_string(),
        ));
    };

    raw.parse()
        .map_err(|_| SessionError::BadArguments(format!("bad depth {:?}", raw)))
}

/// Parses the arguments of a `go` command into search options.
pub fn parse_go_options(arguments: &[&str]) -> Result<SearchOptions, SessionError> {
    let mut options = SearchOptions::default();
    let mut i = 0;

    fn number(
        arguments: &[&str],
        i: &mut usize,
        key: &'static str,
    ) -> Result<u64, SessionError> {
        let Some(raw) = arguments.get(*i + 1) else {
            return Err(SessionError::MissingGoValue(key));
        };

        *i += 1;
        raw.parse()
            .map_err(|_| SessionError::BadGoValue(key, raw.to_string()))
    }

    while i < arguments.len() {
        match arguments[i] {
            "infinite" => options.infinite = true,
            "wtime" => {
                options.white_time_remaining =
                    Duration::from_millis(number(arguments, &mut i, "wtime")?);
            }
            "btime" => {
                options.black_time_remaining =
                    Duration::from_millis(number(arguments, &mut i, "btime")?);
            }
            "winc" => {
                options.white_increment =
                    Duration::from_millis(number(arguments, &mut i, "winc")?);
            }
            "binc" => {
                options.black_increment =
                    Duration::from_millis(number(arguments, &mut i, "binc")?);
            }
            "movestogo" => {
                options.moves_to_go = number(arguments, &mut i, "movestogo")? as u32;
            }
            "depth" => {
                options.depth = number(arguments, &mut i, "depth")? as u32;
            }
            "nodes" => {
                options.nodes = number(arguments, &mut i, "nodes")?;
            }
            "mate" => {
                options.mate = number(arguments, &mut i, "mate")? as u32;
            }
            "movetime" => {
                options.move_time = Duration::from_millis(number(arguments, &mut i, "movetime")?);
            }
            "searchmoves" => {
                while let Some(raw) = arguments.get(i + 1) {
                    let Ok(parsed) = parse_move(raw) else {
                        break;
                    };

                    options.search_moves.push(parsed);
                    i += 1;
                }
            }
            "ponder" | "ponderhit" => return Err(SessionError::PonderUnsupported),
            other => {
                warn!("ignoring unknown go argument {:?}", other);
            }
        }

        i += 1;
    }

    Ok(options)
}
