mod cleaner;
mod cli;
mod dedup;
mod error;
mod fmt;
mod importer;
mod ledger;
mod models;
mod normalizer;
mod payees;
mod settings;

use clap::Parser;
use colored::Colorize;

use cli::Cli;

/// Accept `warning` and `critical` as aliases for `log` filter names.
fn log_filter(level: &str) -> String {
    match level.to_lowercase().as_str() {
        "warning" => "warn".to_string(),
        "critical" | "fatal" => "error".to_string(),
        other => other.to_string(),
    }
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(log_filter(&cli.log_level)),
    )
    .init();

    if let Err(e) = cli::import::run(&cli) {
        eprintln!("{} {e:#}", "Error:".red());
        std::process::exit(1);
    }
}
