// Copyright 2022 The Minerva Authors.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::sync::Arc;

use cancellation::CancellationToken;
use minerva_engine::Position;

use crate::search::SearchOptions;

/// A request for a searcher to begin searching from a given position. The
/// token is the cancellation side-channel: the UCI reader cancels it when
/// a `stop` command arrives, and the searcher polls it.
pub struct Request {
    pub(crate) position: Position,
    pub(crate) options: SearchOptions,
    pub(crate) token: Arc<CancellationToken>,
}

impl Request {
    pub fn new(position: Position, options: SearchOptions, token: Arc<CancellationToken>) -> Request {
        Request {
            position,
            options,
            token,
        }
    }
}
