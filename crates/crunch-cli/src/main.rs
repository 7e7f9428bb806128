//! Crunch CLI - offline host for the crunch distortion.

mod commands;
mod wav;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "crunch")]
#[command(author, version, about = "Crunch distortion CLI", long_about = None)]
struct Cli {
    /// Raise the default log level to debug (RUST_LOG still wins)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a WAV file through the distortion
    Process(commands::process::ProcessArgs),

    /// List, show, save and delete presets
    Presets(commands::presets::PresetsArgs),

    /// List parameters and distortion types
    Params,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose > 0 { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Process(args) => commands::process::run(args),
        Commands::Presets(args) => commands::presets::run(args),
        Commands::Params => commands::params::run(),
    }
}
