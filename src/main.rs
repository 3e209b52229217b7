mod commands;
mod config;
mod models;
mod seed;
mod store;
mod web;

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Mergington High School API — view and sign up for extracurricular activities.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Path to config file
    #[arg(short = 'c', long, global = true, default_value = "config.toml")]
    config: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Seed the store if empty and serve the HTTP API
    Serve {
        /// Listen address (e.g. "0.0.0.0:8000"), overrides config
        #[arg(short = 'a', long)]
        addr: Option<SocketAddr>,

        /// Directory served under /static, overrides config
        #[arg(long)]
        static_dir: Option<PathBuf>,

        /// Keep activities in memory only; nothing is written to disk
        #[arg(long)]
        in_memory: bool,
    },

    /// Populate an empty store with the initial activities
    Seed,

    /// Print stored activities and their participants
    List {
        /// Only show this activity (exact, case-sensitive name)
        #[arg(value_name = "ACTIVITY")]
        name: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Command::Serve {
            addr,
            static_dir,
            in_memory,
        } => {
            commands::run_serve(cfg, addr, static_dir, in_memory).await?;
        }
        Command::Seed => commands::run_seed(&cfg).await?,
        Command::List { name } => commands::run_list(&cfg, name.as_deref()).await?,
    }

    Ok(())
}
