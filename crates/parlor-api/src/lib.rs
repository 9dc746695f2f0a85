pub mod chat;
pub mod error;
pub mod extract;
pub mod history;
pub mod state;
pub mod users;

use axum::{
    Json, Router,
    routing::{get, post},
};
use serde_json::{Value, json};

pub use error::ApiError;
pub use state::{AppState, AppStateInner};

/// All public routes. Middleware (CORS, tracing) is layered on by the server.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/register-user", post(users::register_user))
        .route("/chat", post(chat::chat))
        .route("/get-messages", post(history::get_messages))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
