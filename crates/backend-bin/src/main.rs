use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use backend_lib::{config::Settings, router, storage::MemoryStorage, AppState};
use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// Employee management API server
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Config file; `config.toml` in the working directory when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    }
    .context("loading configuration")?;

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_level.to_lowercase()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let storage = MemoryStorage::new();
    if let Some(seed) = &settings.seed_file {
        storage
            .load_seed_file(seed)
            .with_context(|| format!("loading seed file {}", seed.display()))?;
    }

    let state = Arc::new(AppState::new(storage, &settings)?);
    if let Some(ttl) = settings.session_cache_ttl() {
        state.sessions.spawn_cleanup(ttl.max(Duration::from_secs(1)));
    }

    let app = router::create_router(state);

    let listener = TcpListener::bind(settings.bind_addr)
        .await
        .with_context(|| format!("binding {}", settings.bind_addr))?;
    tracing::info!(addr = %settings.bind_addr, "listening");

    axum::serve(listener, app).await?;

    Ok(())
}
