// strata/src/main.rs

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // 1. Setup Logging (Tracing)
    // RUST_LOG=debug strata show ... for the details.
    // Logs go to stderr: stdout carries the command output (e.g. the MERGE statement).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Show {
            config_dir,
            job,
            settings,
            format,
        } => commands::show::execute(config_dir, job, settings, format),

        Commands::Check {
            config_dir,
            root_config,
            settings,
        } => commands::check::execute(config_dir, root_config, settings),

        Commands::Merge {
            config_dir,
            job,
            step,
            url,
            columns,
            settings,
        } => commands::merge::execute(config_dir, job, step, url, columns, settings),
    }
}
