//! Chorus API crate - axum HTTP server and route handlers.
//!
//! Exposes the conversation log, the bot catalog, bot selection and the
//! multi-bot chat fan-out over HTTP, plus the legacy form endpoint.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
