//! Distort CLI - apply randomized distortions to every image in a folder.
//!
//! Each regular file in the input folder is rotated, blurred, noised,
//! brightened and contrast-scaled, every step gated by its own coin flip,
//! and written under the same name into the output folder.
//!
//! # Usage
//!
//! ```bash
//! # Distort a folder
//! distort run ./photos ./distorted
//!
//! # Reproducible run on four workers with a JSON report
//! distort run ./photos ./distorted --seed 42 -p 4 --report run.json
//!
//! # View configuration
//! distort config show
//!
//! # Guided mode (pick both folders interactively)
//! distort
//! ```

use clap::{CommandFactory, Parser, Subcommand};
use std::io::IsTerminal;

mod cli;
mod logging;

/// Distort - apply randomized distortions to every image in a folder.
#[derive(Parser, Debug)]
#[command(name = "distort")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Distort every image in a folder into another folder
    Run(cli::run::RunArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let config = match distort_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `distort config path`."
            );
            distort_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Distort v{}", distort_core::VERSION);

    match cli.command {
        Some(Commands::Run(args)) => cli::run::execute(args, &config).map(|_| ()),
        Some(Commands::Config(args)) => cli::config::execute(args),
        None if std::io::stdin().is_terminal() && std::io::stderr().is_terminal() => {
            cli::interactive::run(&config)
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}
