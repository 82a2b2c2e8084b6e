//! Chat orchestrator: fans one user message out to every selected bot.
//!
//! Holds the registered responders and the ordered selection. Each selected
//! bot runs as its own task, bounded by the configured timeout; a bot that
//! errors, panics or times out gets a fixed error reply without affecting
//! the others.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, info, warn};

use chorus_core::config::ChatConfig;
use chorus_core::types::{default_bots, BotDescriptor, BotReply};
use chorus_storage::ConversationStore;

use crate::error::ChatError;
use crate::session::{BotSession, Responder};

/// Reply substituted for a bot that failed to answer.
pub const ERROR_REPLY: &str = "Sorry, I encountered an error.";

/// Central coordinator for multi-bot chat.
pub struct ChatOrchestrator {
    /// Registered bots in registration order.
    bots: Vec<Arc<dyn Responder>>,
    /// Selected bot ids in insertion order, no duplicates.
    selection: Mutex<Vec<String>>,
    respond_timeout: Duration,
    max_message_length: usize,
}

impl ChatOrchestrator {
    /// Create an orchestrator with no bots and the configured initial selection.
    pub fn new(config: &ChatConfig) -> Self {
        let mut selection: Vec<String> = Vec::new();
        for id in &config.default_selection {
            if !selection.contains(id) {
                selection.push(id.clone());
            }
        }
        Self {
            bots: Vec::new(),
            selection: Mutex::new(selection),
            respond_timeout: Duration::from_millis(config.respond_timeout_ms),
            max_message_length: config.max_message_length,
        }
    }

    /// Build an orchestrator with a session for each built-in bot, each
    /// with its corpus already loaded.
    pub async fn with_default_bots(
        config: &ChatConfig,
        store: ConversationStore,
        corpus_limit: u32,
    ) -> Result<Self, ChatError> {
        let mut orchestrator = Self::new(config);
        for descriptor in default_bots() {
            let session = BotSession::new(descriptor, store.clone(), corpus_limit);
            session.initialize().await?;
            orchestrator.register(Arc::new(session));
        }
        info!(bots = orchestrator.bots.len(), "Bot sessions initialized");
        Ok(orchestrator)
    }

    /// Register a bot. A bot with the same id replaces the earlier one in place.
    pub fn register(&mut self, bot: Arc<dyn Responder>) {
        let id = bot.descriptor().id.clone();
        match self.bots.iter().position(|b| b.descriptor().id == id) {
            Some(idx) => self.bots[idx] = bot,
            None => self.bots.push(bot),
        }
    }

    /// Descriptors of all registered bots, in registration order.
    pub fn bots(&self) -> Vec<BotDescriptor> {
        self.bots.iter().map(|b| b.descriptor().clone()).collect()
    }

    pub fn is_registered(&self, bot_id: &str) -> bool {
        self.find(bot_id).is_some()
    }

    fn find(&self, bot_id: &str) -> Option<&Arc<dyn Responder>> {
        self.bots.iter().find(|b| b.descriptor().id == bot_id)
    }

    // -- Selection --

    /// Currently selected ids, in selection order.
    pub fn selected(&self) -> Vec<String> {
        self.selection.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Add `bot_id` to the selection. Returns true if it was not selected before.
    pub fn select(&self, bot_id: &str) -> Result<bool, ChatError> {
        let mut selection = self.lock_selection()?;
        if selection.iter().any(|id| id == bot_id) {
            return Ok(false);
        }
        selection.push(bot_id.to_string());
        Ok(true)
    }

    /// Remove `bot_id` from the selection. Returns true if it was selected.
    pub fn deselect(&self, bot_id: &str) -> Result<bool, ChatError> {
        let mut selection = self.lock_selection()?;
        let before = selection.len();
        selection.retain(|id| id != bot_id);
        Ok(selection.len() != before)
    }

    /// Flip `bot_id`'s selection. Returns whether it is selected afterwards.
    pub fn toggle(&self, bot_id: &str) -> Result<bool, ChatError> {
        if self.deselect(bot_id)? {
            Ok(false)
        } else {
            self.select(bot_id)
        }
    }

    /// Select every registered bot. Already-selected ids keep their position.
    pub fn select_all(&self) -> Result<(), ChatError> {
        let mut selection = self.lock_selection()?;
        for bot in &self.bots {
            let id = &bot.descriptor().id;
            if !selection.contains(id) {
                selection.push(id.clone());
            }
        }
        Ok(())
    }

    pub fn deselect_all(&self) -> Result<(), ChatError> {
        self.lock_selection()?.clear();
        Ok(())
    }

    fn lock_selection(&self) -> Result<std::sync::MutexGuard<'_, Vec<String>>, ChatError> {
        self.selection
            .lock()
            .map_err(|e| ChatError::TaskFailed(format!("selection lock poisoned: {}", e)))
    }

    // -- Dispatch --

    /// Send `message` to every selected bot and collect one reply per bot,
    /// in selection order. Selected ids with no registered bot are skipped.
    ///
    /// Bots run concurrently and never see each other's replies to the same
    /// message.
    pub async fn dispatch(&self, message: &str) -> Result<Vec<BotReply>, ChatError> {
        let input = message.trim();
        if input.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if input.chars().count() > self.max_message_length {
            return Err(ChatError::MessageTooLong(self.max_message_length));
        }

        let mut pending = Vec::new();
        for bot_id in self.selected() {
            let Some(bot) = self.find(&bot_id) else {
                debug!(bot_id = %bot_id, "Selected bot is not registered; skipping");
                continue;
            };
            let bot = Arc::clone(bot);
            let text = input.to_string();
            let timeout = self.respond_timeout;
            let handle = tokio::spawn(async move {
                tokio::time::timeout(timeout, bot.respond(&text)).await
            });
            pending.push((bot_id, handle));
        }

        let mut replies = Vec::with_capacity(pending.len());
        for (bot_id, handle) in pending {
            let outcome = match handle.await {
                Ok(Ok(result)) => result,
                Ok(Err(_elapsed)) => Err(ChatError::Timeout(self.respond_timeout.as_millis() as u64)),
                Err(join_err) => Err(ChatError::TaskFailed(join_err.to_string())),
            };

            let reply = match outcome {
                Ok(reply) => reply,
                Err(e) => {
                    warn!(bot_id = %bot_id, error = %e, "Bot failed to respond");
                    ERROR_REPLY.to_string()
                }
            };

            let bot_name = self
                .find(&bot_id)
                .map(|b| b.descriptor().name.clone())
                .unwrap_or_default();
            replies.push(BotReply {
                bot_id,
                bot_name,
                reply,
            });
        }

        debug!(replies = replies.len(), "Message dispatched");
        Ok(replies)
    }
}

// =============================================================================
// Tests
// =============================================================================
