// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Showdown CLI, computes players equities and deals random hands.
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use log::error;

use showdown_eval::{EquityConfig, Method};

mod session;

#[derive(Debug, Parser)]
#[clap(name = "showdown", version, about)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Computes the equity of the given hands.
    Equity {
        /// A player hole cards, e.g. "AS KD", repeat for each player.
        #[clap(long = "hand", required = true)]
        hands: Vec<String>,
        /// The board cards, e.g. "2C 7D 9S".
        #[clap(long, short, default_value = "")]
        board: String,
        #[clap(flatten)]
        equity: EquityArgs,
    },
    /// Deals a random hand and shows the equities on each street.
    Deal {
        /// Number of players.
        #[clap(long, short, default_value_t = 4, value_parser = clap::value_parser!(u8).range(2..=10))]
        players: u8,
        #[clap(flatten)]
        equity: EquityArgs,
    },
}

#[derive(Debug, Args)]
struct EquityArgs {
    /// Number of simulated boards.
    #[clap(long, default_value_t = EquityConfig::DEFAULT_TRIALS)]
    trials: usize,
    /// Number of parallel tasks.
    #[clap(long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..=64))]
    tasks: u16,
    /// Random seed for reproducible results.
    #[clap(long)]
    seed: Option<u64>,
    /// Enumerate all boards instead of sampling.
    #[clap(long)]
    exact: bool,
}

impl From<&EquityArgs> for EquityConfig {
    fn from(args: &EquityArgs) -> Self {
        EquityConfig {
            trials: args.trials,
            tasks: args.tasks as usize,
            seed: args.seed,
            method: if args.exact {
                Method::Enumerate
            } else {
                Method::Simulate
            },
        }
    }
}

fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .format_timestamp_millis()
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    let res = match &cli.command {
        Command::Equity {
            hands,
            board,
            equity,
        } => session::equity(hands, board, equity.into()),
        Command::Deal { players, equity } => session::deal(*players as usize, equity.into()),
    };

    if let Err(e) = &res {
        error!("{e}");
    }

    res
}
