//! Integration tests for the Chorus API.
//!
//! Covers the JSON endpoints, selection management, chat fan-out and the
//! legacy form endpoint. Each test is independent with its own in-memory
//! state.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use chorus_api::create_router;
use chorus_api::handlers::{
    BotsResponse, ChatResponse, HealthResponse, SelectionResponse, TrainingDataResponse,
};
use chorus_api::state::AppState;
use chorus_chat::ChatOrchestrator;
use chorus_core::config::ChorusConfig;
use chorus_core::error::ChorusError;
use chorus_core::types::ConversationRecord;
use chorus_storage::{BotRegistry, ConversationStore, Database};

// =============================================================================
// Helpers
// =============================================================================

/// Create a fresh AppState with an in-memory DB, seeded bots and all five
/// sessions registered.
async fn make_state() -> AppState {
    let config = ChorusConfig::default();
    let db = Arc::new(Database::in_memory().unwrap());
    BotRegistry::new(Arc::clone(&db)).ensure_seeded().unwrap();
    let orchestrator = ChatOrchestrator::with_default_bots(
        &config.chat,
        ConversationStore::new(Arc::clone(&db)),
        config.store.corpus_limit,
    )
    .await
    .unwrap();
    AppState::new(config, db, orchestrator)
}

async fn make_app() -> axum::Router {
    create_router(make_state().await)
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn post_empty(uri: &str) -> Request<Body> {
    Request::post(uri).body(Body::empty()).unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::delete(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, json: &str) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}

fn post_form(body: &str) -> Request<Body> {
    Request::post("/")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Read full response body bytes.
async fn body_bytes(resp: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .unwrap()
        .to_vec()
}

async fn body_json(resp: axum::response::Response) -> Value {
    serde_json::from_slice(&body_bytes(resp).await).unwrap()
}

fn drop_conversations(state: &AppState) {
    state
        .database
        .with_conn(|conn| {
            conn.execute_batch("DROP TABLE conversations;")
                .map_err(|e| ChorusError::Storage(e.to_string()))
        })
        .unwrap();
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_happy_path() {
    let app = make_app().await;
    let resp = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let health: HealthResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.total_conversations, 0);
}

#[tokio::test]
async fn test_health_counts_conversations() {
    let state = make_state().await;
    state.conversations.append("hi", "hello", "simple_ai").unwrap();
    let resp = create_router(state).oneshot(get("/health")).await.unwrap();
    let health: HealthResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(health.total_conversations, 1);
}

// =============================================================================
// Conversations and bots
// =============================================================================

#[tokio::test]
async fn test_save_conversation_returns_record() {
    let app = make_app().await;
    let resp = app
        .oneshot(post_json(
            "/conversations",
            r#"{"input":"hi","response":"hello","bot_id":"pattern_matcher"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let record: ConversationRecord = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(record.input, "hi");
    assert_eq!(record.response, "hello");
    assert_eq!(record.bot_id, "pattern_matcher");
}

#[tokio::test]
async fn test_save_conversation_missing_field_rejected() {
    let app = make_app().await;
    let resp = app
        .oneshot(post_json("/conversations", r#"{"input":"hi"}"#))
        .await
        .unwrap();
    assert!(resp.status().is_client_error());
}

#[tokio::test]
async fn test_training_data_newest_first_with_limit() {
    let state = make_state().await;
    for i in 0..3 {
        state
            .conversations
            .append(&format!("q{}", i), "r", "simple_ai")
            .unwrap();
    }
    let app = create_router(state);

    let resp = app.clone().oneshot(get("/training-data")).await.unwrap();
    let all: TrainingDataResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    let inputs: Vec<&str> = all.data.iter().map(|r| r.input.as_str()).collect();
    assert_eq!(inputs, vec!["q2", "q1", "q0"]);

    let resp = app.oneshot(get("/training-data?limit=2")).await.unwrap();
    let limited: TrainingDataResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(limited.data.len(), 2);
    assert_eq!(limited.data[0].input, "q2");
}

#[tokio::test]
async fn test_training_data_storage_failure_is_500() {
    let state = make_state().await;
    drop_conversations(&state);
    let resp = create_router(state)
        .oneshot(get("/training-data"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(resp).await["error"], "internal_error");
}

#[tokio::test]
async fn test_bots_ordered_by_name() {
    let app = make_app().await;
    let resp = app.oneshot(get("/bots")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let bots: BotsResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    let names: Vec<&str> = bots.bots.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Markov Bot", "Neural Bot", "Pattern Bot", "Similarity Bot", "Simple AI"]
    );
}

// =============================================================================
// Chat
// =============================================================================

#[tokio::test]
async fn test_chat_uses_default_selection() {
    let state = make_state().await;
    let app = create_router(state.clone());

    let resp = app
        .oneshot(post_json("/chat", r#"{"message":"hello there"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let chat: ChatResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(chat.replies.len(), 1);
    assert_eq!(chat.replies[0].bot_id, "simple_ai");
    assert_eq!(chat.replies[0].bot_name, "Simple AI");
    assert_eq!(chat.replies[0].reply, "I'm learning to respond better. ");

    // The exchange was logged under the replying bot.
    let logged = state.conversations.recent(10).unwrap();
    assert_eq!(logged.len(), 1);
    assert_eq!(logged[0].input, "hello there");
    assert_eq!(logged[0].bot_id, "simple_ai");
}

#[tokio::test]
async fn test_chat_all_bots_reply_in_selection_order() {
    let app = make_app().await;
    let resp = app
        .clone()
        .oneshot(post_empty("/selection/all"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .oneshot(post_json("/chat", r#"{"message":"how are you"}"#))
        .await
        .unwrap();
    let chat: ChatResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    let ids: Vec<&str> = chat.replies.iter().map(|r| r.bot_id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "simple_ai",
            "pattern_matcher",
            "markov_chain",
            "similarity_learner",
            "neural_net"
        ]
    );
    assert!(["I'm doing well!", "Great, thanks for asking!"]
        .contains(&chat.replies[1].reply.as_str()));
}

#[tokio::test]
async fn test_chat_empty_message_is_400() {
    let app = make_app().await;
    let resp = app
        .oneshot(post_json("/chat", r#"{"message":"   "}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["error"], "bad_request");
}

#[tokio::test]
async fn test_chat_with_nothing_selected_is_empty() {
    let app = make_app().await;
    app.clone().oneshot(delete("/selection")).await.unwrap();
    let resp = app
        .oneshot(post_json("/chat", r#"{"message":"anyone?"}"#))
        .await
        .unwrap();
    let chat: ChatResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert!(chat.replies.is_empty());
}

// =============================================================================
// Selection
// =============================================================================

async fn selection_of(resp: axum::response::Response) -> Vec<String> {
    let sel: SelectionResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    sel.selected
}

#[tokio::test]
async fn test_selection_starts_with_simple_ai() {
    let app = make_app().await;
    let resp = app.oneshot(get("/selection")).await.unwrap();
    assert_eq!(selection_of(resp).await, vec!["simple_ai"]);
}

#[tokio::test]
async fn test_select_and_deselect() {
    let app = make_app().await;

    let resp = app
        .clone()
        .oneshot(post_empty("/selection/markov_chain"))
        .await
        .unwrap();
    assert_eq!(selection_of(resp).await, vec!["simple_ai", "markov_chain"]);

    // Selecting twice is a no-op.
    let resp = app
        .clone()
        .oneshot(post_empty("/selection/markov_chain"))
        .await
        .unwrap();
    assert_eq!(selection_of(resp).await, vec!["simple_ai", "markov_chain"]);

    let resp = app
        .oneshot(delete("/selection/simple_ai"))
        .await
        .unwrap();
    assert_eq!(selection_of(resp).await, vec!["markov_chain"]);
}

#[tokio::test]
async fn test_toggle_flips_selection() {
    let app = make_app().await;
    let resp = app
        .clone()
        .oneshot(post_empty("/selection/toggle/simple_ai"))
        .await
        .unwrap();
    assert!(selection_of(resp).await.is_empty());

    let resp = app
        .oneshot(post_empty("/selection/toggle/simple_ai"))
        .await
        .unwrap();
    assert_eq!(selection_of(resp).await, vec!["simple_ai"]);
}

#[tokio::test]
async fn test_select_unknown_bot_is_404() {
    let app = make_app().await;
    let resp = app
        .clone()
        .oneshot(post_empty("/selection/ghost"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = app
        .oneshot(post_empty("/selection/toggle/ghost"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Legacy form endpoint
// =============================================================================

#[tokio::test]
async fn test_legacy_save_then_read() {
    let app = make_app().await;
    let resp = app
        .clone()
        .oneshot(post_form(
            "action=save_conversation&input=hi+there&response=Hello%21&bot_id=pattern_matcher",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, serde_json::json!({ "success": true }));

    let resp = app
        .oneshot(post_form("action=get_training_data"))
        .await
        .unwrap();
    assert_eq!(
        body_json(resp).await,
        serde_json::json!({
            "data": [{ "input": "hi there", "response": "Hello!", "bot_id": "pattern_matcher" }]
        })
    );
}

#[tokio::test]
async fn test_legacy_get_bots() {
    let app = make_app().await;
    let resp = app.oneshot(post_form("action=get_bots")).await.unwrap();
    let body = body_json(resp).await;
    let bots = body["bots"].as_array().unwrap();
    assert_eq!(bots.len(), 5);
    assert_eq!(bots[0]["id"], "markov_chain");
    assert_eq!(bots[0]["learning_type"], "markov");
}

#[tokio::test]
async fn test_legacy_unknown_action_reports_error() {
    let app = make_app().await;
    let resp = app.oneshot(post_form("action=explode")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_json(resp).await["error"].is_string());
}

#[tokio::test]
async fn test_legacy_storage_failures_degrade() {
    let state = make_state().await;
    drop_conversations(&state);
    let app = create_router(state);

    let resp = app
        .clone()
        .oneshot(post_form("action=save_conversation&input=a&response=b&bot_id=c"))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await, serde_json::json!({ "success": false }));

    let resp = app
        .oneshot(post_form("action=get_training_data"))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await, serde_json::json!({ "data": [] }));
}
