// Copyright 2022 The Minerva Authors.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The engines that can sit behind a UCI session.
//!
//! An engine receives positions and search options and eventually prints a
//! `bestmove` line. The serious one is [`AlphaBetaEngine`], which owns a
//! search worker thread and talks to it over channels; [`SimpleEngine`]
//! wraps a plain move-selection function for the toy engines.

use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use cancellation::CancellationTokenSource;
use log::info;
use rand::Rng;

use minerva_engine::{eval_pawn_star_us, eval_simple, Evaluator, Move, Position};

use crate::search::{default_time_manager, AlphaBetaSearcher, Request, SearchOptions};

/// The interface a UCI session drives.
pub trait Engine {
    fn name(&self) -> &str;
    fn author(&self) -> &str;

    /// Makes the engine ready to search. Called on `isready`; must be
    /// harmless to call more than once.
    fn prepare(&mut self) -> io::Result<()>;

    /// Resets any accumulated state for a new game.
    fn new_game(&mut self);

    /// Starts searching the given position. Returns immediately; the
    /// `bestmove` line is printed asynchronously.
    fn go(&mut self, pos: &Position, options: SearchOptions) -> io::Result<()>;

    /// Cancels the running search, if any. The search still emits its
    /// `bestmove`.
    fn stop(&mut self);
}

/// Looks up an engine by its registry name. `tryhard` is the default.
pub fn by_name(name: &str) -> Option<Box<dyn Engine>> {
    match name {
        "tryhard" => Some(Box::new(AlphaBetaEngine::new("try-hard", eval_simple))),
        "pawnstar" => Some(Box::new(AlphaBetaEngine::new(
            "pawn-star",
            eval_pawn_star_us,
        ))),
        "random" => Some(Box::new(SimpleEngine::new("random", choose_random))),
        _ => None,
    }
}

/// The names accepted by [`by_name`].
pub const ENGINE_NAMES: &[&str] = &["tryhard", "pawnstar", "random"];

const AUTHOR: &str = "The Minerva Authors";

// Held until the worker threads are spawned on the first prepare().
struct PendingWorker {
    searcher: AlphaBetaSearcher,
    responses: Receiver<String>,
}

/// An engine backed by the iterative-deepening alpha-beta searcher. The
/// searcher runs on its own thread, consuming one request at a time from
/// the request queue; a second thread forwards its response lines to
/// standard output.
pub struct AlphaBetaEngine {
    name: &'static str,
    requests: Sender<Request>,
    pending: Option<PendingWorker>,
    cancel: CancellationTokenSource,
}

impl AlphaBetaEngine {
    pub fn new(name: &'static str, evaluator: Evaluator) -> AlphaBetaEngine {
        let (request_tx, request_rx) = mpsc::channel();
        let (response_tx, response_rx) = mpsc::channel();
        let searcher =
            AlphaBetaSearcher::new(request_rx, response_tx, evaluator, default_time_manager);

        AlphaBetaEngine {
            name,
            requests: request_tx,
            pending: Some(PendingWorker {
                searcher,
                responses: response_rx,
            }),
            cancel: CancellationTokenSource::new(),
        }
    }
}

impl Engine for AlphaBetaEngine {
    fn name(&self) -> &str {
        self.name
    }

    fn author(&self) -> &str {
        AUTHOR
    }

    fn prepare(&mut self) -> io::Result<()> {
        let Some(worker) = self.pending.take() else {
            return Ok(());
        };

        let mut searcher = worker.searcher;
        thread::Builder::new()
            .name("search-main".to_string())
            .spawn(move || {
                info!("search worker starting");
                searcher.listen();
                info!("search worker exiting");
            })?;

        let responses = worker.responses;
        thread::Builder::new()
            .name("search-output".to_string())
            .spawn(move || {
                for line in responses {
                    println!("{}", line);
                }
            })?;

        Ok(())
    }

    fn new_game(&mut self) {
        // The searcher keeps no state between games.
        info!("clearing state for new game");
    }

    fn go(&mut self, pos: &Position, options: SearchOptions) -> io::Result<()> {
        self.prepare()?;

        // Token sources cannot be reset, so every search gets a new one.
        self.cancel = CancellationTokenSource::new();
        let token = self.cancel.token().clone();

        let _ = self
            .requests
            .send(Request::new(pos.clone(), options, token));
        Ok(())
    }

    fn stop(&mut self) {
        self.cancel.cancel();
    }
}

/// An engine with no search at all: a plain selection function picks one
/// of the legal moves. The `random` engine draws one uniformly.
pub struct SimpleEngine {
    name: &'static str,
    choose: fn(&mut Position, &SearchOptions) -> Option<Move>,
}

impl SimpleEngine {
    pub fn new(
        name: &'static str,
        choose: fn(&mut Position, &SearchOptions) -> Option<Move>,
    ) -> SimpleEngine {
        SimpleEngine { name, choose }
    }
}

impl Engine for SimpleEngine {
    fn name(&self) -> &str {
        self.name
    }

    fn author(&self) -> &str {
        AUTHOR
    }

    fn prepare(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn new_game(&mut self) {}

    fn go(&mut self, pos: &Position, options: SearchOptions) -> io::Result<()> {
        let mut scratch = pos.clone();
        match (self.choose)(&mut scratch, &options) {
            Some(m) => println!("bestmove {}", m),
            None => println!("bestmove 0000"),
        }

        Ok(())
    }

    fn stop(&mut self) {}
}

fn choose_random(pos: &mut Position, _options: &SearchOptions) -> Option<Move> {
    let legal = pos.moves_legal();
    if legal.is_empty() {
        return None;
    }

    let index = rand::thread_rng().gen_range(0..legal.len());
    Some(legal.as_slice()[index])
}
