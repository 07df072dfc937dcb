use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use phrasevote_server::{db, ServerConfig};

#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind the HTTP server to
    #[arg(long, default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,
}

pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let pool = db::create_pool(&args.database_url)
        .await
        .context("failed to connect to database")?;
    db::migrations::run(&pool)
        .await
        .context("failed to run migrations")?;

    let config = ServerConfig {
        bind_addr: args.bind,
        ..ServerConfig::default()
    };

    phrasevote_server::run_server(pool, config).await?;
    Ok(())
}
