//! phrasevote CLI - A/B phrase voting backend
//!
//! Two subcommands:
//! - `serve`: run the HTTP API (quiz listing, vote recording, health)
//! - `seed`: load sample data from CSV files (idempotent)

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod seed;
mod serve;

#[derive(Parser, Debug)]
#[command(
    name = "phrasevote",
    author,
    version,
    about = "Backend for the A/B phrase voting quiz"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(serve::ServeArgs),
    /// Load seed data from CSV files (no-op when already loaded)
    Seed(seed::SeedArgs),
}

fn init_tracing() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => serve::run_serve(args).await?,
        Commands::Seed(args) => seed::run_seed(args).await?,
    }

    Ok(())
}
