use axum::{Json, extract::State};
use tracing::{error, info, warn};
use uuid::Uuid;

use parlor_types::api::{ChatRequest, ChatResponse};
use parlor_types::mirror_channel_id;
use parlor_types::models::{BOT_USER_ID, MIRROR_CHANNEL_TYPE};

use crate::error::ApiError;
use crate::extract::{Payload, present};
use crate::state::{AppState, with_db};

const UNKNOWN_USER: &str = "User not found, please register first";

/// POST /chat
///
/// Steps run strictly in order and the first failure aborts the request.
/// Nothing is rolled back: if mirroring fails after the chat row is saved,
/// the row stays and the caller gets a 500.
pub async fn chat(
    State(state): State<AppState>,
    Payload(req): Payload<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let (Some(user_id), Some(message)) = (present(req.user_id), present(req.message)) else {
        return Err(ApiError::Validation("User ID and message are required".into()));
    };

    let id = user_id.clone();
    if with_db(&state, move |db| db.get_user(&id)).await?.is_none() {
        warn!("Chat from unknown user {}", user_id);
        return Err(ApiError::NotFound(UNKNOWN_USER.into()));
    }

    if state.directory.find_user(&user_id).await?.is_none() {
        warn!("User {} missing from the chat directory", user_id);
        return Err(ApiError::NotFound(UNKNOWN_USER.into()));
    }

    let reply = state.ai.reply(&message).await?;

    let chat_id = Uuid::new_v4().to_string();
    let (cid, uid, msg, rep) = (chat_id.clone(), user_id.clone(), message, reply.clone());
    let total = with_db(&state, move |db| {
        db.insert_chat(&cid, &uid, &msg, &rep)?;
        db.count_chats(&uid)
    })
    .await?;

    let channel_id = mirror_channel_id(&user_id);
    state
        .directory
        .ensure_channel(
            MIRROR_CHANNEL_TYPE,
            &channel_id,
            BOT_USER_ID,
            &[user_id.as_str(), BOT_USER_ID],
        )
        .await
        .inspect_err(|e| error!("Chat {} saved but channel {} unavailable: {}", chat_id, channel_id, e))?;

    state
        .directory
        .send_message(MIRROR_CHANNEL_TYPE, &channel_id, BOT_USER_ID, &reply)
        .await
        .inspect_err(|e| error!("Chat {} saved but not mirrored to {}: {}", chat_id, channel_id, e))?;

    info!(
        "Chat {} for {} answered by {} ({} chats stored)",
        chat_id,
        user_id,
        state.ai.provider(),
        total
    );

    Ok(Json(ChatResponse { reply }))
}
