// Copyright 2022 The Minerva Authors.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Iterative-deepening negamax search with alpha-beta pruning.
//!
//! A searcher is a worker: it blocks on a channel of [`Request`]s, runs
//! one search at a time, and emits `info` and `bestmove` lines on a
//! channel of strings. The search itself is a direct, stack-based
//! recursion; cancellation is a polled token, checked between root moves
//! and after every child inside the tree, so a `stop` command or an
//! expired move budget turns around within roughly one evaluation.
//!
//! Move ordering rides on the eval score packed inside every move: before
//! a node's children are searched they are annotated with the static eval
//! of the position each produces and sorted best-first, and at the root
//! the scores coming back from one depth seed the ordering of the next.

mod options;
mod pv;
mod request;
mod time;

pub use options::SearchOptions;
pub use pv::PvList;
pub use request::Request;
pub use time::{default_time_manager, TimeManager};

use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use cancellation::{CancellationToken, CancellationTokenSource};
use log::info;
use minerva_engine::{
    score_from_perspective, Evaluator, MoveList, Position, MAX_EVAL, MIN_EVAL, NO_EVAL, NO_MOVE,
};

/// The deepest the iterative deepening loop will ever go. Searches that
/// are bounded by time or nodes never get anywhere near it.
pub const MAX_DEPTH: u32 = 64;

const INFO_INTERVAL: Duration = Duration::from_secs(1);

/// A search worker. Owns the receiving half of the request queue and the
/// sending half of the response queue; everything else is per-search
/// scratch state.
pub struct AlphaBetaSearcher {
    requests: Receiver<Request>,
    responses: Sender<String>,
    evaluator: Evaluator,
    time_manager: TimeManager,

    options: SearchOptions,
    token: Arc<CancellationToken>,
    start_time: Instant,
    next_info_time: Instant,
    budget: Option<Duration>,
    node_count: u64,
    stop: bool,
}

impl AlphaBetaSearcher {
    pub fn new(
        requests: Receiver<Request>,
        responses: Sender<String>,
        evaluator: Evaluator,
        time_manager: TimeManager,
    ) -> AlphaBetaSearcher {
        let placeholder = CancellationTokenSource::new();

        AlphaBetaSearcher {
            requests,
            responses,
            evaluator,
            time_manager,
            options: SearchOptions::default(),
            token: placeholder.token().clone(),
            start_time: Instant::now(),
            next_info_time: Instant::now(),
            budget: None,
            node_count: 0,
            stop: false,
        }
    }

    /// Consumes requests until the sending side hangs up. Each request is
    /// searched to completion (or cancellation) before the next is taken;
    /// output lines of two searches are never interleaved.
    pub fn listen(&mut self) {
        while let Ok(request) = self.requests.recv() {
            self.run(request);
        }
    }

    fn run(&mut self, request: Request) {
        let mut pos = request.position;
        self.options = request.options;
        self.token = request.token;
        self.start_time = Instant::now();
        self.next_info_time = self.start_time + INFO_INTERVAL;
        self.node_count = 0;
        self.stop = false;
        self.budget = self.move_budget(&pos);

        info!("searching with options: {:?}", self.options.as_uci());

        let mut root_moves = self.annotated_moves(&mut pos);
        if !self.options.search_moves.is_empty() {
            let allowed = self.options.search_moves.clone();
            root_moves.filter(|m| {
                allowed
                    .iter()
                    .any(|a| a.from == m.from() && a.to == m.to() && a.promotion == m.promotion())
            });
        }

        if root_moves.is_empty() {
            // Mate or stalemate; it is the session's business to tell the
            // user which.
            self.respond(format!("bestmove {}", NO_MOVE));
            return;
        }

        root_moves.sort();

        let mut best_move = root_moves.as_slice()[0];
        let mut best_score = NO_EVAL;
        let mut pv = PvList::new();
        let mut child_pv = PvList::new();

        let max_depth = self.options.depth.min(MAX_DEPTH);
        for depth in 1..=max_depth {
            if self.should_stop() {
                break;
            }

            let mut alpha = MIN_EVAL;
            let beta = MAX_EVAL;
            let mut depth_best_score = NO_EVAL;
            let mut depth_best_move = NO_MOVE;
            let mut depth_pv = PvList::new();
            let mut aborted = false;

            for i in 0..root_moves.len() {
                let mut m = root_moves.as_slice()[i];
                child_pv.clear();

                pos.make_move(m);
                let score = -self.search(-beta, -alpha, depth - 1, 1, &mut child_pv, &mut pos);
                pos.undo_move(m);

                if self.stop && depth > 1 {
                    // The score that came back is a partial one; keep the
                    // results of the last completed depth instead.
                    aborted = true;
                    break;
                }

                self.respond(format!("info currmove {} score cp {}", m, score));

                m.set_eval(score);
                root_moves.as_mut_slice()[i] = m;

                if score > depth_best_score {
                    depth_best_score = score;
                    depth_best_move = m;
                    depth_pv.catenate(m, &child_pv);
                }

                if score > alpha {
                    alpha = score;
                }
            }

            if depth_best_score != NO_EVAL && (!aborted || best_score == NO_EVAL) {
                best_move = depth_best_move;
                best_score = depth_best_score;
                pv = depth_pv.clone();

                let elapsed = self.start_time.elapsed();
                self.respond(format!(
                    "info depth {} score cp {} nodes {} nps {} pv {}",
                    depth,
                    best_score,
                    self.node_count,
                    nps(self.node_count, elapsed),
                    pv
                ));
            }

            // Scores from this depth order the next one best-first.
            root_moves.sort();

            if aborted || self.should_stop() {
                break;
            }
        }

        self.respond(format!("bestmove {}", best_move));
    }

    /// The recursive negamax. `alpha` and `beta` bound the score from the
    /// perspective of the side to move; children are searched with the
    /// window swapped and negated.
    fn search(
        &mut self,
        mut alpha: i16,
        beta: i16,
        depth: u32,
        ply: u32,
        pv: &mut PvList,
        pos: &mut Position,
    ) -> i16 {
        self.node_count += 1;

        if depth == 0 {
            return score_from_perspective((self.evaluator)(pos), pos.side_to_move);
        }

        if self.token.is_canceled() {
            self.stop = true;
        }

        if self.stop {
            return alpha;
        }

        pv.clear();

        let mut moves = self.annotated_moves(pos);
        moves.sort();

        let mut best_score = NO_EVAL;
        let mut child_pv = PvList::new();

        for m in moves.iter() {
            child_pv.clear();

            pos.make_move(m);
            let score = -self.search(-beta, -alpha, depth - 1, ply + 1, &mut child_pv, pos);
            pos.undo_move(m);

            if score > best_score {
                best_score = score;
                pv.catenate(m, &child_pv);
            }

            if score > alpha {
                alpha = score;
            }

            if alpha >= beta {
                break;
            }

            self.maybe_info(best_score, pv);

            if self.over_budget() || self.node_count >= self.options.nodes {
                self.stop = true;
            }

            if self.stop {
                return alpha;
            }
        }

        if moves.is_empty() {
            if pos.king_in_check(pos.side_to_move) {
                // Checkmate. Deeper mates score slightly better than
                // shallow ones, so the search prefers the shortest.
                return MIN_EVAL + ply as i16 + 1;
            }

            // Stalemate.
            return 0;
        }

        best_score
    }

    /// The legal moves of the position, each annotated with the static
    /// eval of the position it leads to, from the mover's perspective.
    /// Legality testing and annotation share the same make/undo pass.
    fn annotated_moves(&mut self, pos: &mut Position) -> MoveList {
        let us = pos.side_to_move;
        let evaluator = self.evaluator;

        let mut moves = pos.moves_pseudolegal();
        moves.filter_map(|mut m| {
            if !pos.make_move(m) {
                return None;
            }

            m.set_eval(score_from_perspective(evaluator(pos), us));
            pos.undo_move(m);
            Some(m)
        });

        moves
    }

    fn move_budget(&self, pos: &Position) -> Option<Duration> {
        use minerva_engine::Color;

        if self.options.infinite {
            return None;
        }

        if !self.options.move_time.is_zero() {
            return Some(self.options.move_time);
        }

        let (remaining, increment) = match pos.side_to_move {
            Color::White => (
                self.options.white_time_remaining,
                self.options.white_increment,
            ),
            Color::Black => (
                self.options.black_time_remaining,
                self.options.black_increment,
            ),
        };

        Some((self.time_manager)(remaining, increment))
    }

    fn over_budget(&self) -> bool {
        match self.budget {
            Some(budget) => self.start_time.elapsed() > budget,
            None => false,
        }
    }

    fn should_stop(&mut self) -> bool {
        if self.token.is_canceled()
            || self.over_budget()
            || self.node_count >= self.options.nodes
        {
            self.stop = true;
        }

        self.stop
    }

    fn maybe_info(&mut self, best_score: i16, pv: &PvList) {
        let now = Instant::now();
        if now < self.next_info_time {
            return;
        }

        self.next_info_time = now + INFO_INTERVAL;
        let elapsed = self.start_time.elapsed();
        self.respond(format!(
            "info time {} nodes {} nps {} score cp {} pv {}",
            elapsed.as_millis(),
            self.node_count,
            nps(self.node_count, elapsed),
            best_score,
            pv
        ));
    }

    fn respond(&self, line: String) {
        // The receiving side disappears when the engine is shutting down;
        // there is nobody left to care about the lines we drop.
        let _ = self.responses.send(line);
    }
}

fn nps(nodes: u64, elapsed: Duration) -> u64 {
    let millis = elapsed.as_millis().max(1) as u64;
    nodes * 1000 / millis
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::thread;

    use minerva_engine::eval_simple;

    struct Harness {
        requests: Sender<Request>,
        responses: Receiver<String>,
        cancel: CancellationTokenSource,
    }

    fn spawn_searcher() -> Harness {
        minerva_engine::initialize();

        let (req_tx, req_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();
        let mut searcher =
            AlphaBetaSearcher::new(req_rx, resp_tx, eval_simple, default_time_manager);
        thread::spawn(move || searcher.listen());

        Harness {
            requests: req_tx,
            responses: resp_rx,
            cancel: CancellationTokenSource::new(),
        }
    }

    impl Harness {
        fn go(&self, fen: &str, options: SearchOptions) {
            let pos = Position::from_fen(fen).unwrap();
            self.requests
                .send(Request::new(pos, options, self.cancel.token().clone()))
                .unwrap();
        }

        /// Reads lines until the bestmove arrives, returning the move.
        fn wait_for_bestmove(&self) -> String {
            loop {
                let line = self
                    .responses
                    .recv_timeout(Duration::from_secs(30))
                    .expect("search should produce a bestmove");
                if let Some(m) = line.strip_prefix("bestmove ") {
                    return m.to_string();
                }
            }
        }
    }

    #[test]
    fn startpos_depth_one_gives_a_legal_move() {
        let harness = spawn_searcher();
        harness.go(
            minerva_engine::STARTING_POSITION,
            SearchOptions {
                depth: 1,
                ..Default::default()
            },
        );

        let best = harness.wait_for_bestmove();
        let mut pos = Position::startpos();
        let legal: Vec<String> = pos.moves_legal().iter().map(|m| m.as_uci()).collect();
        assert_eq!(20, legal.len());
        assert!(legal.contains(&best), "{} is not a legal opening move", best);

        // The bestmove is the last line of the search; nothing may follow.
        assert!(harness
            .responses
            .recv_timeout(Duration::from_millis(200))
            .is_err());
    }

    #[test]
    fn forced_move_is_found() {
        // The queen has the white king cornered: a2 and b1 are both
        // covered, so capturing her is the only legal move.
        let harness = spawn_searcher();
        harness.go(
            "k7/8/8/8/8/8/1q6/K7 w - - 0 1",
            SearchOptions {
                depth: 3,
                ..Default::default()
            },
        );

        assert_eq!("a1b2", harness.wait_for_bestmove());
    }

    #[test]
    fn mate_in_one_is_found_at_depth_two() {
        // A bare back-rank mate: the rook swings to a8 and the king's own
        // pawns seal the escape squares.
        let harness = spawn_searcher();
        harness.go(
            "6k1/5ppp/8/8/8/8/8/R3K3 w - - 0 1",
            SearchOptions {
                depth: 2,
                ..Default::default()
            },
        );

        assert_eq!("a1a8", harness.wait_for_bestmove());
    }

    #[test]
    fn mated_position_yields_null_move() {
        let harness = spawn_searcher();
        harness.go(
            "R5k1/5ppp/8/8/8/8/8/4K3 b - - 0 1",
            SearchOptions {
                depth: 2,
                ..Default::default()
            },
        );

        assert_eq!("0000", harness.wait_for_bestmove());
    }

    #[test]
    fn movetime_is_honored() {
        let harness = spawn_searcher();
        let start = Instant::now();
        harness.go(
            minerva_engine::STARTING_POSITION,
            SearchOptions {
                move_time: Duration::from_millis(200),
                ..Default::default()
            },
        );

        harness.wait_for_bestmove();
        assert!(
            start.elapsed() < Duration::from_secs(5),
            "movetime did not bound the search"
        );
    }

    #[test]
    fn stop_cancels_an_infinite_search() {
        let harness = spawn_searcher();
        harness.go(
            minerva_engine::STARTING_POSITION,
            SearchOptions {
                infinite: true,
                ..Default::default()
            },
        );

        thread::sleep(Duration::from_millis(100));
        harness.cancel.cancel();

        let start = Instant::now();
        harness.wait_for_bestmove();
        assert!(
            start.elapsed() < Duration::from_secs(5),
            "stop did not end the infinite search promptly"
        );
    }

    #[test]
    fn node_limit_stops_the_search() {
        let harness = spawn_searcher();
        harness.go(
            minerva_engine::STARTING_POSITION,
            SearchOptions {
                nodes: 5_000,
                ..Default::default()
            },
        );

        harness.wait_for_bestmove();
    }

    #[test]
    fn winning_capture_is_preferred() {
        // White can simply take the undefended queen.
        let harness = spawn_searcher();
        harness.go(
            "4k3/8/8/3q4/8/8/3R4/4K3 w - - 0 1",
            SearchOptions {
                depth: 3,
                ..Default::default()
            },
        );

        assert_eq!("d2d5", harness.wait_for_bestmove());
    }

    #[test]
    fn searchmoves_restricts_the_root() {
        let harness = spawn_searcher();
        harness.go(
            minerva_engine::STARTING_POSITION,
            SearchOptions {
                depth: 2,
                search_moves: vec![minerva_engine::parse_move("a2a3").unwrap()],
                ..Default::default()
            },
        );

        assert_eq!("a2a3", harness.wait_for_bestmove());
    }
}
