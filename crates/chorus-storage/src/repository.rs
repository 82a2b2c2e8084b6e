//! SQLite-backed stores for the conversation log and the bot catalog.
//!
//! Both operate on the shared Database using raw SQL. Each call is its own
//! implicit transaction.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use tracing::{debug, info};

use chorus_core::error::ChorusError;
use chorus_core::types::{default_bots, BotDescriptor, ConversationRecord, LearningType};

use crate::db::Database;

/// Window size bots load as their corpus unless configured otherwise.
pub const DEFAULT_CORPUS_LIMIT: u32 = 1000;

/// Append-only log of every bot exchange.
#[derive(Clone)]
pub struct ConversationStore {
    db: Arc<Database>,
}

impl ConversationStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Append one exchange and return the stored record.
    ///
    /// `created_at` never goes backwards relative to the newest existing row,
    /// even if the wall clock does.
    pub fn append(
        &self,
        input: &str,
        response: &str,
        bot_id: &str,
    ) -> Result<ConversationRecord, ChorusError> {
        let now_ms = Utc::now().timestamp_millis();
        let record = self.db.with_conn(|conn| {
            conn.query_row(
                "INSERT INTO conversations (input, response, bot_id, created_at)
                 VALUES (?1, ?2, ?3,
                         MAX(?4, COALESCE((SELECT MAX(created_at) FROM conversations), 0)))
                 RETURNING id, created_at",
                rusqlite::params![input, response, bot_id, now_ms],
                |row| {
                    let id: i64 = row.get(0)?;
                    let created_at: i64 = row.get(1)?;
                    Ok((id, created_at))
                },
            )
            .map_err(|e| ChorusError::Storage(format!("Failed to append conversation: {}", e)))
        })?;

        let (id, created_at) = record;
        debug!(id, bot_id, "Conversation appended");
        Ok(ConversationRecord {
            id,
            input: input.to_string(),
            response: response.to_string(),
            bot_id: bot_id.to_string(),
            created_at: millis_to_datetime(created_at),
        })
    }

    /// The newest `limit` records, newest first. No filtering by bot.
    pub fn recent(&self, limit: u32) -> Result<Vec<ConversationRecord>, ChorusError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT id, input, response, bot_id, created_at
                     FROM conversations
                     ORDER BY created_at DESC, id DESC
                     LIMIT ?1",
                )
                .map_err(|e| ChorusError::Storage(e.to_string()))?;

            let rows = stmt
                .query_map(rusqlite::params![limit], |row| {
                    Ok(row_to_conversation(row))
                })
                .map_err(|e| ChorusError::Storage(e.to_string()))?;

            let mut records = Vec::new();
            for row in rows {
                let record = row.map_err(|e| ChorusError::Storage(e.to_string()))??;
                records.push(record);
            }
            Ok(records)
        })
    }

    /// Total number of logged exchanges.
    pub fn count(&self) -> Result<u64, ChorusError> {
        self.db.with_conn(|conn| {
            let count: i64 = conn
                .query_row("SELECT COUNT(*) FROM conversations", [], |row| row.get(0))
                .map_err(|e| ChorusError::Storage(e.to_string()))?;
            Ok(count as u64)
        })
    }
}

/// The persisted bot catalog.
#[derive(Clone)]
pub struct BotRegistry {
    db: Arc<Database>,
}

impl BotRegistry {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Insert the built-in bots if absent. Returns how many rows were new.
    pub fn ensure_seeded(&self) -> Result<usize, ChorusError> {
        self.seed(&default_bots())
    }

    /// Insert each descriptor unless its id already exists.
    ///
    /// Re-inserting an existing id is a no-op; the stored row is kept as is.
    pub fn seed(&self, bots: &[BotDescriptor]) -> Result<usize, ChorusError> {
        let inserted = self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare(
                    "INSERT OR IGNORE INTO bots (id, name, description, learning_type)
                     VALUES (?1, ?2, ?3, ?4)",
                )
                .map_err(|e| ChorusError::Storage(e.to_string()))?;

            let mut inserted = 0;
            for bot in bots {
                inserted += stmt
                    .execute(rusqlite::params![
                        bot.id,
                        bot.name,
                        bot.description,
                        bot.learning_type.as_str(),
                    ])
                    .map_err(|e| ChorusError::Storage(format!("Failed to seed bot: {}", e)))?;
            }
            Ok(inserted)
        })?;

        if inserted > 0 {
            info!(inserted, "Bot catalog seeded");
        }
        Ok(inserted)
    }

    /// All bots, ordered by name ascending.
    pub fn list(&self) -> Result<Vec<BotDescriptor>, ChorusError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT id, name, description, learning_type
                     FROM bots
                     ORDER BY name ASC",
                )
                .map_err(|e| ChorusError::Storage(e.to_string()))?;

            let rows = stmt
                .query_map([], |row| Ok(row_to_bot(row)))
                .map_err(|e| ChorusError::Storage(e.to_string()))?;

            let mut bots = Vec::new();
            for row in rows {
                let bot = row.map_err(|e| ChorusError::Storage(e.to_string()))??;
                bots.push(bot);
            }
            Ok(bots)
        })
    }
}

// ============================================================================
// Row conversion
// ============================================================================

fn millis_to_datetime(ms: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ms).single().unwrap_or_default()
}

fn row_to_conversation(row: &rusqlite::Row<'_>) -> Result<ConversationRecord, ChorusError> {
    let created_at: i64 = row
        .get(4)
        .map_err(|e| ChorusError::Storage(e.to_string()))?;
    Ok(ConversationRecord {
        id: row.get(0).map_err(|e| ChorusError::Storage(e.to_string()))?,
        input: row.get(1).map_err(|e| ChorusError::Storage(e.to_string()))?,
        response: row.get(2).map_err(|e| ChorusError::Storage(e.to_string()))?,
        bot_id: row.get(3).map_err(|e| ChorusError::Storage(e.to_string()))?,
        created_at: millis_to_datetime(created_at),
    })
}

fn row_to_bot(row: &rusqlite::Row<'_>) -> Result<BotDescriptor, ChorusError> {
    let learning_type: String = row
        .get(3)
        .map_err(|e| ChorusError::Storage(e.to_string()))?;
    Ok(BotDescriptor {
        id: row.get(0).map_err(|e| ChorusError::Storage(e.to_string()))?,
        name: row.get(1).map_err(|e| ChorusError::Storage(e.to_string()))?,
        description: row.get(2).map_err(|e| ChorusError::Storage(e.to_string()))?,
        learning_type: learning_type.parse::<LearningType>()?,
    })
}
