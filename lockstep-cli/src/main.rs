//! Lockstep — collaborative file-edit awareness over a shared clipboard.
//!
//! # Usage
//!
//! ```text
//! lockstep run [--config <path>] [--interval <secs>] [--once]
//! lockstep status [--config <path>]
//! lockstep init [--config <path>]
//! ```
//!
//! Each participant runs `lockstep run` in their working tree. The agents
//! share one remote clipboard record, merge their views of tracked-file
//! modification times with per-file last-write-wins, and report who touched
//! what, how long ago — plus which files are advisorily "locked" by someone
//! else.

mod commands;
mod remote;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{init::InitArgs, run::RunArgs, status::StatusArgs};

#[derive(Parser, Debug)]
#[command(
    name = "lockstep",
    version,
    about = "Share tracked-file edit awareness with your collaborators",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the polling agent: observe, reconcile, republish, report.
    Run(RunArgs),

    /// Fetch the shared snapshot once and print the report without publishing.
    Status(StatusArgs),

    /// Publish the current local scan as the initial shared snapshot.
    Init(InitArgs),
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => args.run(),
        Commands::Status(args) => args.run(),
        Commands::Init(args) => args.run(),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}
