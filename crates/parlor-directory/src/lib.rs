//! Chat-directory client.
//!
//! The directory owns user identities, channels and message delivery for
//! display. Parlor only writes into it: users are mirrored on registration
//! and AI replies are posted into a per-user channel. Nothing is read back
//! except the existence check on users.

pub mod stream;
pub mod token;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use stream::StreamDirectory;

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to sign server token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Failed to parse response: {0}")]
    Parse(String),
}

/// A user record as the directory stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryUser {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl DirectoryUser {
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
            email: Some(email.into()),
        }
    }
}

/// Operations Parlor needs from the chat directory.
#[async_trait]
pub trait ChatDirectory: Send + Sync {
    /// Look a user up by exact id.
    async fn find_user(&self, id: &str) -> Result<Option<DirectoryUser>, DirectoryError>;

    /// Create or overwrite a user record.
    async fn upsert_user(&self, user: &DirectoryUser) -> Result<(), DirectoryError>;

    /// Create the channel if it does not exist yet. An existing channel is not an error.
    async fn ensure_channel(
        &self,
        channel_type: &str,
        channel_id: &str,
        created_by: &str,
        members: &[&str],
    ) -> Result<(), DirectoryError>;

    /// Post a text message into a channel on behalf of `author_id`.
    async fn send_message(
        &self,
        channel_type: &str,
        channel_id: &str,
        author_id: &str,
        text: &str,
    ) -> Result<(), DirectoryError>;
}
