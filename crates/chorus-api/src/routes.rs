//! Router setup with all API routes and middleware.
//!
//! Configures the axum Router with CORS, tracing, compression,
//! and all endpoint handlers.

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Create the axum Router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // Allow the page served on the configured port and its dev server on port+1.
    let port = state.config.general.port;
    let dev_port = port.saturating_add(1);
    let origins: Vec<HeaderValue> = [port, dev_port]
        .iter()
        .flat_map(|p| [format!("http://127.0.0.1:{}", p), format!("http://localhost:{}", p)])
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .route("/", post(handlers::legacy_action))
        .route("/health", get(handlers::health))
        .route("/conversations", post(handlers::save_conversation))
        .route("/training-data", get(handlers::training_data))
        .route("/bots", get(handlers::list_bots))
        .route("/chat", post(handlers::chat))
        .route(
            "/selection",
            get(handlers::get_selection).delete(handlers::deselect_all),
        )
        .route("/selection/all", post(handlers::select_all))
        .route("/selection/toggle/{id}", post(handlers::toggle_bot))
        .route(
            "/selection/{id}",
            post(handlers::select_bot).delete(handlers::deselect_bot),
        )
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
