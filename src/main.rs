// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI entry point: parses a 65-character position string and a time
//! budget, runs iterative-deepening search under that budget, and prints
//! the chosen move. See `fendahl::board` / `fendahl::search` for the core.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use fendahl::board::Board;
use fendahl::search::Search;

/// A time-budgeted alpha-beta Othello engine.
#[derive(Debug, Parser)]
#[command(name = "fendahl", version, about)]
struct Cli {
    /// 65-character position string: side to move ('W'/'B') followed by
    /// 64 squares in row-major order ('O' white, 'X' black, 'E' empty).
    position: String,

    /// Time budget in seconds for the search.
    seconds: f64,

    /// Raise log verbosity by one level per occurrence (overridden by RUST_LOG).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if err.chain().any(|cause| cause.is::<fendahl::error::ParseError>()) {
                eprintln!("error: {err:#}");
                ExitCode::from(2)
            } else {
                eprintln!("fatal: {err:#}");
                ExitCode::FAILURE
            }
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    if !(cli.seconds.is_finite() && cli.seconds > 0.0) {
        return Err(fendahl::error::ParseError::InvalidTimeBudget(cli.seconds).into());
    }

    let board = Board::from_position_string(&cli.position)
        .context("failed to parse position string")?;

    let budget = Duration::from_secs_f64(cli.seconds);
    let mut search = Search::new();
    let chosen = search
        .iterative_deepen(&board, budget)
        .context("search applied a move Board::legal_actions would not have produced")?;

    println!("{chosen}");
    Ok(())
}

/// Initializes `env_logger` at `info` by default, raised by repeated
/// `-v` flags; `RUST_LOG` always takes precedence when set.
fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .init();
}
