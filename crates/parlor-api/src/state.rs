use std::sync::Arc;

use parlor_ai::AiReplier;
use parlor_db::Database;
use parlor_directory::ChatDirectory;

use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

/// Process-wide client handles, built once at startup.
pub struct AppStateInner {
    pub db: Database,
    pub directory: Arc<dyn ChatDirectory>,
    pub ai: Arc<dyn AiReplier>,
}

impl AppStateInner {
    pub fn new(db: Database, directory: Arc<dyn ChatDirectory>, ai: Arc<dyn AiReplier>) -> AppState {
        Arc::new(Self { db, directory, ai })
    }
}

/// Run a blocking database call off the async runtime.
pub async fn with_db<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Database) -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    let result = tokio::task::spawn_blocking(move || f(&state.db)).await?;
    Ok(result?)
}
