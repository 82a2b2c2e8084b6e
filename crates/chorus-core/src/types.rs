use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ChorusError;

// =============================================================================
// Bots
// =============================================================================

/// The response strategy family a bot belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LearningType {
    /// Regex rules with canned replies.
    Pattern,
    /// Markov chain over logged responses.
    Markov,
    /// Jaccard lookup over logged inputs (threshold 0.2).
    Similarity,
    /// Placeholder network, fixed reply.
    Neural,
    /// Jaccard lookup over logged inputs (threshold 0.3).
    Simple,
}

impl LearningType {
    /// The value stored in the `bots.learning_type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            LearningType::Pattern => "pattern",
            LearningType::Markov => "markov",
            LearningType::Similarity => "similarity",
            LearningType::Neural => "neural",
            LearningType::Simple => "simple",
        }
    }
}

impl fmt::Display for LearningType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LearningType {
    type Err = ChorusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pattern" => Ok(LearningType::Pattern),
            "markov" => Ok(LearningType::Markov),
            "similarity" => Ok(LearningType::Similarity),
            "neural" => Ok(LearningType::Neural),
            "simple" => Ok(LearningType::Simple),
            other => Err(ChorusError::Serialization(format!(
                "unknown learning type: {}",
                other
            ))),
        }
    }
}

/// Static identity of a bot. Seeded once, never mutated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotDescriptor {
    pub id: String,
    pub name: String,
    pub description: String,
    pub learning_type: LearningType,
}

impl BotDescriptor {
    pub fn new(id: &str, name: &str, description: &str, learning_type: LearningType) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            learning_type,
        }
    }
}

pub const PATTERN_MATCHER_ID: &str = "pattern_matcher";
pub const MARKOV_CHAIN_ID: &str = "markov_chain";
pub const SIMILARITY_LEARNER_ID: &str = "similarity_learner";
pub const NEURAL_NET_ID: &str = "neural_net";
pub const SIMPLE_AI_ID: &str = "simple_ai";

/// The five built-in bots, in registration order.
pub fn default_bots() -> Vec<BotDescriptor> {
    vec![
        BotDescriptor::new(
            PATTERN_MATCHER_ID,
            "Pattern Bot",
            "Uses pattern matching and templates",
            LearningType::Pattern,
        ),
        BotDescriptor::new(
            MARKOV_CHAIN_ID,
            "Markov Bot",
            "Uses Markov chains for response generation",
            LearningType::Markov,
        ),
        BotDescriptor::new(
            SIMILARITY_LEARNER_ID,
            "Similarity Bot",
            "Uses word similarity and context",
            LearningType::Similarity,
        ),
        BotDescriptor::new(
            NEURAL_NET_ID,
            "Neural Bot",
            "Uses simple neural network",
            LearningType::Neural,
        ),
        BotDescriptor::new(
            SIMPLE_AI_ID,
            "Simple AI",
            "Uses the original SimpleAI implementation",
            LearningType::Simple,
        ),
    ]
}

// =============================================================================
// Conversations
// =============================================================================

/// One logged exchange. Append-only: never updated or deleted once written.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationRecord {
    /// Store-assigned row id.
    pub id: i64,
    pub input: String,
    pub response: String,
    /// Id of the bot that produced `response`. Not enforced as a foreign key.
    pub bot_id: String,
    /// Store-assigned, non-decreasing across inserts.
    pub created_at: DateTime<Utc>,
}

/// A bot's reply to one dispatched message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotReply {
    pub bot_id: String,
    pub bot_name: String,
    pub reply: String,
}
