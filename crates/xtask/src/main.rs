//! Development tasks for the navigation workspace
//!
//! This binary provides development utilities using the cargo-xtask pattern.
//! Run with: `cargo xtask <command>`

mod commands;
mod utils;

use anyhow::Result;
use clap::Parser;
use commands::{CheckMap, FindPath, Simulate};
use nav_runtime::LogConfig;

/// Development tasks for the navigation workspace
#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Development tools for actor navigation", long_about = None)]
#[command(version)]
struct Cli {
    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Validate a tilemap (and optionally a movement config) and print a summary
    CheckMap(CheckMap),

    /// Run the grid A* search between two tiles
    FindPath(FindPath),

    /// Drive a scripted scenario through the navigation runtime
    Simulate(Simulate),
}

fn main() -> Result<()> {
    // Load .env file if it exists (for RUST_LOG and NAV_* overrides)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _guard = nav_runtime::logging::init(LogConfig {
        default_filter: cli.log,
        ..LogConfig::default()
    });

    match cli.command {
        Command::CheckMap(cmd) => cmd.execute(),
        Command::FindPath(cmd) => cmd.execute(),
        Command::Simulate(cmd) => cmd.execute(),
    }
}
