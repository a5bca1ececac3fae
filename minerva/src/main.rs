// Copyright 2022 The Minerva Authors.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::io::{self, BufRead};
use std::process;

use clap::{Arg, Command};

mod engines;
mod logger;
mod search;
mod session;

use session::Session;

fn main() {
    logger::initialize();
    if cfg!(debug_assertions) {
        logger::debug_enable();
    }

    let matches = Command::new("minerva")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A UCI chess engine")
        .arg(
            Arg::new("engine")
                .long("engine")
                .value_name("NAME")
                .help("Which engine to play with (tryhard, pawnstar, random)")
                .default_value("tryhard"),
        )
        .get_matches();

    let engine_name = matches
        .get_one::<String>("engine")
        .map(String::as_str)
        .unwrap_or("tryhard");

    let Some(engine) = engines::by_name(engine_name) else {
        eprintln!(
            "unknown engine {:?}; the choices are {}",
            engine_name,
            engines::ENGINE_NAMES.join(", ")
        );
        process::exit(2);
    };

    minerva_engine::initialize();
    println!("Minerva chess engine {}", env!("CARGO_PKG_VERSION"));
    main_loop(engine);
}

fn main_loop(engine: Box<dyn engines::Engine>) -> ! {
    let mut session = Session::new(engine);
    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        let mut buf = String::new();
        match input.read_line(&mut buf) {
            Ok(0) => quit(),
            Ok(_) => {}
            Err(e) => {
                println!("info string fatal i/o error: {}", e);
                process::exit(1);
            }
        }

        if buf.trim() == "quit" {
            quit();
        }

        if let Err(e) = session.handle(&buf) {
            println!("info string error: {}", e);
        }
    }
}

fn quit() -> ! {
    process::exit(0);
}
