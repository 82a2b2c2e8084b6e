//! Application state shared across all route handlers.
//!
//! AppState holds references to all services and shared resources.
//! It is passed to handlers via axum's State extractor.

use std::sync::Arc;
use std::time::Instant;

use chorus_chat::ChatOrchestrator;
use chorus_core::config::ChorusConfig;
use chorus_storage::{BotRegistry, ConversationStore, Database};

/// Shared application state.
///
/// All fields use `Arc` for cheap cloning across handler tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration, read-only after startup.
    pub config: Arc<ChorusConfig>,
    /// SQLite database backing the store and the registry.
    pub database: Arc<Database>,
    /// Shared conversation log.
    pub conversations: ConversationStore,
    /// Seeded bot catalog.
    pub bots: BotRegistry,
    /// Bot sessions and the current selection.
    pub orchestrator: Arc<ChatOrchestrator>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    /// Create a new AppState. The orchestrator should already hold its
    /// sessions, built on the same database.
    pub fn new(config: ChorusConfig, database: Arc<Database>, orchestrator: ChatOrchestrator) -> Self {
        Self {
            config: Arc::new(config),
            conversations: ConversationStore::new(Arc::clone(&database)),
            bots: BotRegistry::new(Arc::clone(&database)),
            database,
            orchestrator: Arc::new(orchestrator),
            start_time: Instant::now(),
        }
    }
}
