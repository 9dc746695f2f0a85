use crate::Database;
use crate::models::{ChatRow, UserRow};
use anyhow::Result;
use rusqlite::Connection;

impl Database {
    // -- Users --

    /// Insert the user unless the id is already taken.
    /// Returns `true` when a new row was written.
    pub fn insert_user(&self, id: &str, name: &str, email: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "INSERT INTO users (id, name, email) VALUES (?1, ?2, ?3)
                 ON CONFLICT(id) DO NOTHING",
                (id, name, email),
            )?;
            Ok(changed == 1)
        })
    }

    pub fn get_user(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, id))
    }

    // -- Chats --

    pub fn insert_chat(&self, id: &str, user_id: &str, message: &str, reply: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO chats (id, user_id, message, reply) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![id, user_id, message, reply],
            )?;
            Ok(())
        })
    }

    /// Full history for one user, oldest first.
    pub fn get_chats(&self, user_id: &str) -> Result<Vec<ChatRow>> {
        self.with_conn(|conn| query_chats(conn, user_id))
    }

    pub fn count_chats(&self, user_id: &str) -> Result<u64> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM chats WHERE user_id = ?1",
                [user_id],
                |row| row.get(0),
            )?;
            Ok(count as u64)
        })
    }
}

fn query_user(conn: &Connection, id: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare("SELECT id, name, email, created_at FROM users WHERE id = ?1")?;

    let row = stmt
        .query_row([id], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                name: row.get(1)?,
                email: row.get(2)?,
                created_at: row.get(3)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_chats(conn: &Connection, user_id: &str) -> Result<Vec<ChatRow>> {
    // rowid breaks ties between chats created within the same millisecond
    let mut stmt = conn.prepare(
        "SELECT id, user_id, message, reply, created_at
         FROM chats
         WHERE user_id = ?1
         ORDER BY created_at ASC, rowid ASC",
    )?;

    let rows = stmt
        .query_map([user_id], |row| {
            Ok(ChatRow {
                id: row.get(0)?,
                user_id: row.get(1)?,
                message: row.get(2)?,
                reply: row.get(3)?,
                created_at: row.get(4)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
