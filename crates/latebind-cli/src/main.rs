//! latebind command-line driver
//!
//! Runs the control-rendering walkthrough and inspects flattened interface
//! surfaces of the demo registry.

mod commands;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "latebind")]
#[command(about = "Late-bound interface adaptation toolkit", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Color output: auto, always, never
    #[arg(long, global = true)]
    color: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Wrap an automation control and drive its render lifecycle
    Demo {
        /// Engine configuration file (latebind.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the flattened member surface of a demo interface
    Inspect {
        /// Interface name (e.g. IControl)
        interface: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG overrides the default level
    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let color = output::resolve_color_choice(cli.color.as_deref());

    match cli.command {
        Commands::Demo { config } => commands::demo::execute(config.as_deref(), color),
        Commands::Inspect { interface } => commands::inspect::execute(&interface, color),
    }
}
