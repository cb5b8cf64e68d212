// wavinspect
// Copyright (c) 2024 The wavinspect Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

#![warn(rust_2018_idioms)]
#![forbid(unsafe_code)]

mod render;

use std::fs::File;
use std::io::{self, Write};

use wavinspect_core::errors::Result;
use wavinspect_core::io::SourceStream;
use wavinspect_riff::{read_riff, ChunkWalker, RiffReport, WalkOptions};

use clap::{Arg, ArgAction, ArgMatches};
use log::info;
use serde::Serialize;

/// Exit status when the input could not be inspected to the end.
const EXIT_FATAL: i32 = 1;
/// Exit status when the input could not be opened.
const EXIT_OPEN_FAILED: i32 = 2;

#[derive(Serialize)]
struct JsonReport<'a> {
    path: &'a str,
    #[serde(flatten)]
    report: &'a RiffReport,
}

fn main() {
    pretty_env_logger::init();

    let matches = clap::Command::new("wavinspect")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Print the chunk structure and metadata of RIFF/WAVE files")
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Print the inspection result as JSON"),
        )
        .arg(
            Arg::new("no-corruption-guard")
                .long("no-corruption-guard")
                .action(ArgAction::SetTrue)
                .help("Keep walking when a chunk identifier repeats the previous one"),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .action(ArgAction::SetTrue)
                .help("Only print chunk identifiers and sizes"),
        )
        .arg(Arg::new("INPUT").help("The input file path").required(true).index(1))
        .get_matches();

    std::process::exit(run(&matches))
}

fn run(args: &ArgMatches) -> i32 {
    // INPUT is required, clap guarantees it is present.
    let path = args.get_one::<String>("INPUT").unwrap();

    let options = WalkOptions { corruption_guard: !args.get_flag("no-corruption-guard") };

    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("failed to open {}: {}", path, err);
            return EXIT_OPEN_FAILED;
        }
    };

    let result = if args.get_flag("json") {
        print_json(path, file, options)
    }
    else {
        print_text(path, file, options, args.get_flag("quiet"))
    };

    match result {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("inspection interrupted by error: {}", err);
            EXIT_FATAL
        }
    }
}

fn print_text(path: &str, file: File, options: WalkOptions, is_quiet: bool) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(out, "Path provided: {}", path)?;

    let reader = SourceStream::new(file, Default::default())?;
    let mut walker = ChunkWalker::try_new(reader, options)?;

    render::write_container(&mut out, walker.container())?;

    // Render as the walk goes so everything read before a fatal error is still printed.
    let mut n_chunks = 0;

    while let Some(chunk) = walker.next_chunk()? {
        render::write_header(&mut out, &chunk.header)?;

        if !is_quiet {
            render::write_body(&mut out, &chunk.body)?;
        }

        n_chunks += 1;
    }

    if let Some(termination) = walker.termination() {
        render::write_termination(&mut out, termination)?;
    }

    info!("walked {} chunks", n_chunks);

    Ok(())
}

fn print_json(path: &str, file: File, options: WalkOptions) -> Result<()> {
    let report = read_riff(file, options)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    serde_json::to_writer_pretty(&mut out, &JsonReport { path, report: &report })
        .map_err(io::Error::from)?;

    writeln!(out)?;

    Ok(())
}
