use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use phrasevote_server::{db, seed};
use tracing::info;

#[derive(Parser, Debug)]
pub struct SeedArgs {
    /// Directory containing phrases.csv, phrase_pairs.csv, and votes.csv
    #[arg(long, default_value = "seeds")]
    pub dir: PathBuf,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,
}

pub async fn run_seed(args: SeedArgs) -> Result<()> {
    let pool = db::create_pool(&args.database_url)
        .await
        .context("failed to connect to database")?;
    db::migrations::run(&pool)
        .await
        .context("failed to run migrations")?;

    let summary = seed::load_dir(&pool, &args.dir)
        .await
        .with_context(|| format!("failed to load seeds from {}", args.dir.display()))?;

    info!(
        "Seed complete: {} phrases, {} phrase pairs, {} votes",
        summary.phrases, summary.phrase_pairs, summary.votes
    );
    Ok(())
}
