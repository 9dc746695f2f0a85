use axum::{Json, extract::State};
use tracing::warn;

use parlor_types::api::{ChatMessage, HistoryRequest, HistoryResponse};

use crate::error::ApiError;
use crate::extract::{Payload, present};
use crate::state::{AppState, with_db};

/// POST /get-messages
///
/// Reads only from the database. Oldest first, unpaginated.
pub async fn get_messages(
    State(state): State<AppState>,
    Payload(req): Payload<HistoryRequest>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let Some(user_id) = present(req.user_id) else {
        return Err(ApiError::Validation("User ID is required".into()));
    };

    let id = user_id.clone();
    let rows = with_db(&state, move |db| {
        if db.get_user(&id)?.is_none() {
            return Ok(None);
        }
        Ok(Some(db.get_chats(&id)?))
    })
    .await?
    .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    let messages = rows
        .into_iter()
        .map(|row| {
            let created_at = row.created_at_utc().unwrap_or_else(|| {
                warn!("Corrupt created_at '{}' on chat '{}'", row.created_at, row.id);
                chrono::DateTime::default()
            });
            ChatMessage {
                id: row.id,
                user_id: row.user_id,
                message: row.message,
                reply: row.reply,
                created_at,
            }
        })
        .collect();

    Ok(Json(HistoryResponse { messages }))
}
