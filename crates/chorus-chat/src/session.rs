//! Bot sessions: a strategy bound to its own cached view of the conversation log.
//!
//! A session answers from whatever corpus it last loaded. It only refreshes
//! after its own writes, so two sessions can briefly disagree about history.

use std::sync::Mutex;

use async_trait::async_trait;
use tracing::{debug, warn};

use chorus_core::types::{BotDescriptor, ConversationRecord};
use chorus_storage::ConversationStore;

use crate::error::ChatError;
use crate::random::{RandomSource, StdRandom};
use crate::strategy::Strategy;

/// Anything the orchestrator can fan a message out to.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Identity shown next to the reply.
    fn descriptor(&self) -> &BotDescriptor;

    /// Produce a reply to `input`, including any persistence side effects.
    async fn respond(&self, input: &str) -> Result<String, ChatError>;
}

struct SessionState {
    strategy: Strategy,
    corpus: Vec<ConversationRecord>,
    rng: Box<dyn RandomSource>,
}

/// One bot's strategy plus its private corpus cache.
pub struct BotSession {
    descriptor: BotDescriptor,
    store: ConversationStore,
    corpus_limit: u32,
    state: Mutex<SessionState>,
}

impl BotSession {
    /// Create a session with an OS-seeded random source. The corpus starts
    /// empty until [`initialize`](Self::initialize) runs.
    pub fn new(descriptor: BotDescriptor, store: ConversationStore, corpus_limit: u32) -> Self {
        Self::with_random(descriptor, store, corpus_limit, Box::new(StdRandom::new()))
    }

    pub fn with_random(
        descriptor: BotDescriptor,
        store: ConversationStore,
        corpus_limit: u32,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        let strategy = Strategy::for_learning_type(descriptor.learning_type);
        Self {
            descriptor,
            store,
            corpus_limit,
            state: Mutex::new(SessionState {
                strategy,
                corpus: Vec::new(),
                rng,
            }),
        }
    }

    /// First corpus load.
    pub async fn initialize(&self) -> Result<usize, ChatError> {
        self.reload().await
    }

    /// Replace the cached corpus with the newest records and rebuild derived
    /// strategy state. A failed read leaves the session with an empty corpus.
    pub async fn reload(&self) -> Result<usize, ChatError> {
        let store = self.store.clone();
        let limit = self.corpus_limit;
        let corpus = match tokio::task::spawn_blocking(move || store.recent(limit)).await {
            Ok(Ok(records)) => records,
            Ok(Err(e)) => {
                warn!(bot_id = %self.descriptor.id, error = %e, "Failed to load training data");
                Vec::new()
            }
            Err(e) => {
                warn!(bot_id = %self.descriptor.id, error = %e, "Training data load task failed");
                Vec::new()
            }
        };

        let loaded = corpus.len();
        let mut state = self.lock_state()?;
        state.strategy.reload(&corpus);
        state.corpus = corpus;
        debug!(bot_id = %self.descriptor.id, records = loaded, "Corpus reloaded");
        Ok(loaded)
    }

    /// Snapshot of the cached corpus, newest first.
    pub fn corpus(&self) -> Result<Vec<ConversationRecord>, ChatError> {
        Ok(self.lock_state()?.corpus.clone())
    }

    /// Run the strategy against the cached corpus. No side effects on the store.
    pub fn generate(&self, input: &str) -> Result<String, ChatError> {
        let mut guard = self.lock_state()?;
        let state = &mut *guard;
        Ok(state
            .strategy
            .generate(input, &state.corpus, state.rng.as_mut()))
    }

    /// Log the exchange, then reload the corpus whether or not the append
    /// succeeded. Returns whether the append was committed.
    pub async fn persist_and_reload(&self, input: &str, reply: &str) -> Result<bool, ChatError> {
        let store = self.store.clone();
        let (input, reply, bot_id) = (
            input.to_string(),
            reply.to_string(),
            self.descriptor.id.clone(),
        );
        let appended =
            match tokio::task::spawn_blocking(move || store.append(&input, &reply, &bot_id)).await {
                Ok(Ok(_)) => true,
                Ok(Err(e)) => {
                    warn!(bot_id = %self.descriptor.id, error = %e, "Failed to save conversation");
                    false
                }
                Err(e) => {
                    warn!(bot_id = %self.descriptor.id, error = %e, "Save task failed");
                    false
                }
            };

        self.reload().await?;
        Ok(appended)
    }

    fn lock_state(&self) -> Result<std::sync::MutexGuard<'_, SessionState>, ChatError> {
        self.state
            .lock()
            .map_err(|e| ChatError::TaskFailed(format!("session state lock poisoned: {}", e)))
    }
}

#[async_trait]
impl Responder for BotSession {
    fn descriptor(&self) -> &BotDescriptor {
        &self.descriptor
    }

    async fn respond(&self, input: &str) -> Result<String, ChatError> {
        let reply = self.generate(input)?;
        self.persist_and_reload(input, &reply).await?;
        Ok(reply)
    }
}
