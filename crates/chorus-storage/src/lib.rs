//! Chorus Storage crate - SQLite persistence for conversations and bots.
//!
//! Provides a WAL-mode SQLite database with migrations, the append-only
//! conversation log every bot learns from, and the seeded bot catalog.

pub mod db;
pub mod migrations;
pub mod repository;

pub use db::Database;
pub use repository::{BotRegistry, ConversationStore, DEFAULT_CORPUS_LIMIT};
