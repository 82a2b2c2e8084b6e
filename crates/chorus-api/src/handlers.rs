//! Route handler functions for all API endpoints.
//!
//! Each handler extracts path/query/body parameters via axum extractors,
//! calls into AppState services, and returns JSON responses.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Form, Json};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use chorus_chat::ChatError;
use chorus_core::types::{BotDescriptor, BotReply, ConversationRecord};

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Request types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct TrainingDataParams {
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SaveConversationRequest {
    pub input: String,
    pub response: String,
    pub bot_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Form fields of the legacy single endpoint. Missing fields read as empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LegacyForm {
    pub action: String,
    pub input: String,
    pub response: String,
    pub bot_id: String,
}

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct TrainingDataResponse {
    pub data: Vec<ConversationRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BotsResponse {
    pub bots: Vec<BotDescriptor>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub replies: Vec<BotReply>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SelectionResponse {
    pub selected: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub total_conversations: u64,
}

/// Training row as the legacy endpoint returns it.
#[derive(Debug, Serialize, Deserialize)]
pub struct LegacyTrainingRow {
    pub input: String,
    pub response: String,
    pub bot_id: String,
}

/// Bodies of the legacy endpoint; each action has its own top-level key.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LegacyResponse {
    Saved { success: bool },
    Data { data: Vec<LegacyTrainingRow> },
    Bots { bots: Vec<BotDescriptor> },
    Error { error: String },
}

// =============================================================================
// Conversations and bots
// =============================================================================

/// POST /conversations - append one exchange to the log.
pub async fn save_conversation(
    State(state): State<AppState>,
    Json(body): Json<SaveConversationRequest>,
) -> Result<(StatusCode, Json<ConversationRecord>), ApiError> {
    let record = state
        .conversations
        .append(&body.input, &body.response, &body.bot_id)?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /training-data - newest records first, capped at the corpus limit.
pub async fn training_data(
    State(state): State<AppState>,
    Query(params): Query<TrainingDataParams>,
) -> Result<Json<TrainingDataResponse>, ApiError> {
    let max = state.config.store.corpus_limit;
    let limit = params.limit.unwrap_or(max).min(max);
    let data = state.conversations.recent(limit)?;
    Ok(Json(TrainingDataResponse { data }))
}

/// GET /bots - the seeded catalog, ordered by name.
pub async fn list_bots(State(state): State<AppState>) -> Result<Json<BotsResponse>, ApiError> {
    let bots = state.bots.list()?;
    Ok(Json(BotsResponse { bots }))
}

// =============================================================================
// Chat
// =============================================================================

/// POST /chat - fan the message out to every selected bot.
pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let replies = state.orchestrator.dispatch(&body.message).await?;
    debug!(replies = replies.len(), "Chat message answered");
    Ok(Json(ChatResponse { replies }))
}

// =============================================================================
// Selection
// =============================================================================

fn selection(state: &AppState) -> Json<SelectionResponse> {
    Json(SelectionResponse {
        selected: state.orchestrator.selected(),
    })
}

fn require_registered(state: &AppState, bot_id: &str) -> Result<(), ApiError> {
    if state.orchestrator.is_registered(bot_id) {
        Ok(())
    } else {
        Err(ChatError::BotNotFound(bot_id.to_string()).into())
    }
}

/// GET /selection
pub async fn get_selection(State(state): State<AppState>) -> Json<SelectionResponse> {
    selection(&state)
}

/// POST /selection/{id}
pub async fn select_bot(
    State(state): State<AppState>,
    Path(bot_id): Path<String>,
) -> Result<Json<SelectionResponse>, ApiError> {
    require_registered(&state, &bot_id)?;
    state.orchestrator.select(&bot_id)?;
    Ok(selection(&state))
}

/// DELETE /selection/{id}
pub async fn deselect_bot(
    State(state): State<AppState>,
    Path(bot_id): Path<String>,
) -> Result<Json<SelectionResponse>, ApiError> {
    state.orchestrator.deselect(&bot_id)?;
    Ok(selection(&state))
}

/// POST /selection/toggle/{id}
pub async fn toggle_bot(
    State(state): State<AppState>,
    Path(bot_id): Path<String>,
) -> Result<Json<SelectionResponse>, ApiError> {
    require_registered(&state, &bot_id)?;
    state.orchestrator.toggle(&bot_id)?;
    Ok(selection(&state))
}

/// POST /selection/all
pub async fn select_all(
    State(state): State<AppState>,
) -> Result<Json<SelectionResponse>, ApiError> {
    state.orchestrator.select_all()?;
    Ok(selection(&state))
}

/// DELETE /selection
pub async fn deselect_all(
    State(state): State<AppState>,
) -> Result<Json<SelectionResponse>, ApiError> {
    state.orchestrator.deselect_all()?;
    Ok(selection(&state))
}

// =============================================================================
// Health
// =============================================================================

/// GET /health
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    let uptime = state.start_time.elapsed().as_secs();
    let total_conversations = state.conversations.count().unwrap_or(0);

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: uptime,
        total_conversations,
    }))
}

// =============================================================================
// Legacy form endpoint
// =============================================================================

/// POST / - form-encoded `action` dispatch. Failures are reported in the
/// body, never as an HTTP error status: a failed save answers
/// `{success: false}`, a failed read answers `{data: []}`.
pub async fn legacy_action(
    State(state): State<AppState>,
    Form(form): Form<LegacyForm>,
) -> Json<LegacyResponse> {
    let resp = match form.action.as_str() {
        "save_conversation" => {
            let saved = state
                .conversations
                .append(&form.input, &form.response, &form.bot_id);
            if let Err(e) = &saved {
                warn!(error = %e, "Legacy save_conversation failed");
            }
            LegacyResponse::Saved {
                success: saved.is_ok(),
            }
        }
        "get_training_data" => {
            let records = state
                .conversations
                .recent(state.config.store.corpus_limit)
                .unwrap_or_else(|e| {
                    warn!(error = %e, "Legacy get_training_data failed");
                    Vec::new()
                });
            LegacyResponse::Data {
                data: records
                    .into_iter()
                    .map(|r| LegacyTrainingRow {
                        input: r.input,
                        response: r.response,
                        bot_id: r.bot_id,
                    })
                    .collect(),
            }
        }
        "get_bots" => match state.bots.list() {
            Ok(bots) => LegacyResponse::Bots { bots },
            Err(e) => {
                warn!(error = %e, "Legacy get_bots failed");
                LegacyResponse::Error {
                    error: e.to_string(),
                }
            }
        },
        other => LegacyResponse::Error {
            error: format!("Unknown action '{}'", other),
        },
    };
    Json(resp)
}
