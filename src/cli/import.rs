use anyhow::{Context, Result};
use colored::Colorize;

use crate::cli::prompt::TerminalResolver;
use crate::cli::Cli;
use crate::importer::import_file;

pub fn run(cli: &Cli) -> Result<()> {
    let config = cli.import_config()?;
    let paths = cli.artifact_paths()?;
    anyhow::ensure!(
        cli.file.exists(),
        "Input file {} does not exist",
        cli.file.display()
    );

    let summary = import_file(&config, &paths, &cli.file, &mut TerminalResolver)
        .with_context(|| format!("Failed to import {}", cli.file.display()))?;

    if summary.stopped {
        println!("{}", "Stopped early, remaining rows were not read.".yellow());
    }
    println!(
        "{} imported, {} skipped (duplicates), {} rows skipped, {} new payees",
        summary.imported, summary.duplicates, summary.skipped_rows, summary.learned_payees
    );
    Ok(())
}
