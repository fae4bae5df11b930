use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use chronauth::config::Config;
use chronauth::session::{MIN_SECRET_BYTES, SessionCodec};
use chronauth::store::SqliteStore;
use chronauth::{AppState, handlers};

#[derive(Parser)]
#[command(name = "chronauth", about = "Multi-tenant authorization server")]
struct Opts {
    /// Bind address (overrides HOST)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides PORT)
    #[arg(long)]
    port: Option<u16>,

    /// SQLite database path (overrides DATABASE_PATH)
    #[arg(long)]
    database_path: Option<String>,

    /// Session token signing secret (overrides TOKEN_SECRET)
    #[arg(long)]
    token_secret: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let opts = Opts::parse();
    let mut config = Config::from_env();
    if let Some(host) = opts.host {
        config.host = host;
    }
    if let Some(port) = opts.port {
        config.port = port;
    }
    if let Some(path) = opts.database_path {
        config.database_path = path;
    }

    // A missing or weak signing secret is fatal at startup, never a
    // per-request failure.
    let token_secret = opts
        .token_secret
        .or(config.token_secret.take())
        .context("TOKEN_SECRET must be set")?;
    anyhow::ensure!(
        token_secret.len() >= MIN_SECRET_BYTES,
        "TOKEN_SECRET must be at least {MIN_SECRET_BYTES} bytes"
    );

    let store = Arc::new(SqliteStore::open(&config.database_path)?);
    let state = AppState::new(store, SessionCodec::new(&token_secret));
    let app = handlers::router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
