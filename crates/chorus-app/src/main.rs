//! Chorus application binary - composition root.
//!
//! Ties the Chorus crates into a single executable:
//! 1. Parse CLI flags and load configuration from TOML
//! 2. Open the SQLite database and seed the bot catalog
//! 3. Build one session per bot and load each corpus
//! 4. Start the axum REST API server

mod cli;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use chorus_api::routes;
use chorus_api::state::AppState;
use chorus_chat::ChatOrchestrator;
use chorus_core::config::ChorusConfig;
use chorus_storage::{BotRegistry, ConversationStore, Database};

use crate::cli::CliArgs;

/// Expand ~ to home directory in a path string.
fn resolve_data_dir(data_dir: &str) -> PathBuf {
    if data_dir.starts_with("~/") || data_dir.starts_with("~\\") {
        #[cfg(target_os = "windows")]
        let home = std::env::var("USERPROFILE").unwrap_or_else(|_| ".".to_string());
        #[cfg(not(target_os = "windows"))]
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(&data_dir[2..])
    } else {
        PathBuf::from(data_dir)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config, with CLI/env overrides applied.
    let config_file = args.config_path();
    let mut config = ChorusConfig::load_or_default(&config_file);
    args.apply_overrides(&mut config);

    // Tracing. RUST_LOG wins over the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.general.log_level)),
        )
        .init();

    tracing::info!("Starting Chorus v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    // Storage.
    let data_dir = resolve_data_dir(&config.general.data_dir);
    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        tracing::error!(path = %data_dir.display(), error = %e, "Failed to create data directory");
        return Err(e.into());
    }

    let db_path = data_dir.join("chorus.db");
    let db = Arc::new(Database::new(&db_path)?);
    tracing::info!(path = %db_path.display(), "SQLite database opened");

    if let Err(e) = BotRegistry::new(Arc::clone(&db)).ensure_seeded() {
        tracing::warn!(error = %e, "Failed to seed bot catalog");
    }

    // Bot sessions.
    let orchestrator = ChatOrchestrator::with_default_bots(
        &config.chat,
        ConversationStore::new(Arc::clone(&db)),
        config.store.corpus_limit,
    )
    .await?;
    tracing::info!(selected = ?orchestrator.selected(), "Chat orchestrator ready");

    // === API server ===

    let port = config.general.port;
    let addr = format!("127.0.0.1:{}", port);
    let state = AppState::new(config, db, orchestrator);
    let router = routes::create_router(state);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(addr = %addr, error = %e, "Failed to bind - is another instance running?");
            tracing::error!("Try: CHORUS_PORT={} cargo run -p chorus-app", port.saturating_add(1));
            return Err(e.into());
        }
    };

    tracing::info!(addr = %addr, "API server listening");

    axum::serve(listener, router).await?;

    Ok(())
}
