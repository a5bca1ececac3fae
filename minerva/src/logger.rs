// Copyright 2022 The Minerva Authors.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A logger that cooperates with the UCI protocol. Anything we print has
//! to be a legal UCI line, so every log record is rendered as an
//! `info string` line that a GUI will display (or at worst ignore).

use std::sync::atomic::{AtomicBool, Ordering};

use log::{Level, LevelFilter, Metadata, Record};

static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

struct UciLogger;

static LOGGER: UciLogger = UciLogger;

impl log::Log for UciLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        // The thinking behind this is:
        //   debug      - extremely verbose, "debug on" only
        //   info       - verbose, "debug on" only
        //   warn/error - indicate something is wrong and always on
        if DEBUG_ENABLED.load(Ordering::Relaxed) {
            true
        } else {
            metadata.level() <= Level::Warn
        }
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            println!("info string {}: {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

pub fn initialize() {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Info);
    }
}

pub fn debug_enable() {
    DEBUG_ENABLED.store(true, Ordering::Release);
    log::set_max_level(LevelFilter::Debug);
}

pub fn debug_disable() {
    DEBUG_ENABLED.store(false, Ordering::Release);
    log::set_max_level(LevelFilter::Info);
}
