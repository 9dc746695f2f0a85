//! Database row types. These map directly to SQLite rows and stay
//! independent of the parlor-types wire models.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRow {
    pub id: String,
    pub user_id: String,
    pub message: String,
    pub reply: String,
    pub created_at: String,
}

impl ChatRow {
    /// Parse the stored RFC 3339 timestamp; `None` if the column was
    /// written in any other format.
    pub fn created_at_utc(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.created_at.parse().ok()
    }
}
