pub mod auth;
pub mod board;
pub mod directory;
pub mod error;
pub mod forms;
pub mod home;
pub mod messages;
pub mod routes;
pub mod session;
pub mod social;
pub mod users;

use std::sync::Arc;

use chirp_db::Database;
use tracing::error;

use crate::error::{AppError, AppResult};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
}

/// Run blocking SQLite work off the async runtime.
pub(crate) async fn run_blocking<T, F>(f: F) -> AppResult<T>
where
    F: FnOnce() -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        error!("spawn_blocking join error: {e}");
        AppError::Internal(anyhow::anyhow!("blocking task failed: {e}"))
    })?
}
