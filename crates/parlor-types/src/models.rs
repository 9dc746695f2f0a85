/// Identity the AI replies are posted under in the chat directory.
pub const BOT_USER_ID: &str = "ai_bot";
pub const BOT_DISPLAY_NAME: &str = "AI Bot";

/// Channel type used for every mirrored conversation.
pub const MIRROR_CHANNEL_TYPE: &str = "messaging";

/// Derive the stable user id from an email address.
///
/// Every character outside `[A-Za-z0-9_-]` becomes `_`, one for one. The
/// result is both the database primary key and the chat-directory user id,
/// so it must stay a pure function of the email.
pub fn derive_user_id(email: &str) -> String {
    email
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Id of the directory channel that mirrors a user's conversation.
pub fn mirror_channel_id(user_id: &str) -> String {
    format!("chat-{}", user_id)
}
