//! Multi-bot chat for Chorus.
//!
//! Provides the response strategies, per-bot sessions with their cached
//! conversation corpus, and the orchestrator that fans a user message out to
//! the selected bots.

pub mod error;
pub mod orchestrator;
pub mod random;
pub mod session;
pub mod strategy;

pub use error::ChatError;
pub use orchestrator::{ChatOrchestrator, ERROR_REPLY};
pub use random::{RandomSource, StdRandom};
pub use session::{BotSession, Responder};
pub use strategy::Strategy;
