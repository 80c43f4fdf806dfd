// Entry point for the `monsoon_report` binary.
//
// - `rainfall` builds the monthly index series from the daily CSV export,
//   falling back to the precomputed figures, and prints a preview table.
// - `figure` fetches a precomputed forecast figure by key.
// - `months` prints the month-name table used by the charts.
mod cli;
mod commands;
mod logging;

use std::process;

use anyhow::Result;
use clap::Parser;

use monsoon_report::config::Config;

use crate::cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    match cli.command {
        Command::Rainfall(args) => commands::rainfall(args, &config),
        Command::Figure(args) => commands::figure(args, &config),
        Command::Months(args) => commands::months(args),
    }
}
