//! HTTP request handlers

use super::types::{Update, WebhookResponse};
use super::AppState;
use axum::{extract::State, routing::get, Json, Router};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Liveness probe for the hosting platform; webhook deliveries POST
        // to the same path
        .route("/", get(liveness).post(webhook))
        .route("/version", get(get_version))
        .with_state(state)
}

async fn liveness() -> &'static str {
    "problembot is alive"
}

async fn get_version() -> &'static str {
    concat!("problembot ", env!("CARGO_PKG_VERSION"))
}

/// Webhook consumer. Always answers 200 so the platform does not redeliver
/// the update; dispatch failures are logged operational faults.
async fn webhook(State(state): State<AppState>, Json(update): Json<Update>) -> Json<WebhookResponse> {
    let update_id = update.update_id;
    match update.into_event() {
        Some((chat_id, event)) => {
            if let Err(err) = state.dispatcher.handle_event(chat_id, event).await {
                tracing::error!(update_id, chat_id, error = %err, "failed to process update");
            }
        }
        None => tracing::debug!(update_id, "update carries no dialogue event, ignoring"),
    }
    Json(WebhookResponse { ok: true })
}
