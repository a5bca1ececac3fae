// Copyright 2022 The Minerva Authors.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::time::Duration;

/// A time manager decides, from the clock time remaining and the increment
/// per move, how long to spend on the current move.
pub type TimeManager = fn(time_remaining: Duration, increment: Duration) -> Duration;

/// The default manager: a fortieth of the remaining time, but never less
/// than most of the increment.
pub fn default_time_manager(time_remaining: Duration, increment: Duration) -> Duration {
    (time_remaining / 40).max(increment * 4 / 5)
}
