use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Monsoon rainfall index reports.
#[derive(Parser)]
#[command(
    name = "monsoon_report",
    version,
    about = "Monthly rainfall index series and forecast figures"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to TOML configuration file [default: monsoon.toml if present].
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build the monthly rainfall index series.
    Rainfall(RainfallArgs),
    /// Fetch a precomputed forecast figure.
    Figure(FigureArgs),
    /// Print month numbers and names.
    Months(MonthsArgs),
}

#[derive(clap::Args)]
pub struct RainfallArgs {
    /// Keep only the monsoon months (June to September).
    #[arg(long)]
    pub monsoon: bool,

    /// Override the daily CSV export path from config.
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Override the Plotly results directory from config.
    #[arg(long)]
    pub results_dir: Option<PathBuf>,

    /// Write the JSON response to this path.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write the deduplicated daily series as CSV.
    #[arg(long)]
    pub daily_csv: Option<PathBuf>,

    /// Write the selected monthly averages as CSV.
    #[arg(long)]
    pub monthly_csv: Option<PathBuf>,

    /// Rows shown in the console preview.
    #[arg(long)]
    pub rows: Option<usize>,
}

#[derive(clap::Args)]
pub struct FigureArgs {
    /// Figure key, e.g. fig1 or fig55.
    #[arg(required_unless_present = "list")]
    pub key: Option<String>,

    /// List the known figure keys.
    #[arg(long)]
    pub list: bool,

    /// Write the figure JSON to this path instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct MonthsArgs {
    /// Use three-letter names.
    #[arg(long)]
    pub short: bool,
}
