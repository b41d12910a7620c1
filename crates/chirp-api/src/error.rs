use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;
use tracing::error;

use chirp_db::DbError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Malformed input; re-surfaced to the caller verbatim.
    #[error("{0}")]
    Validation(String),

    /// Unique-constraint violation from the persistence layer.
    #[error("Username/Email already taken")]
    Taken,

    /// Login with credentials that do not verify. Authentication failure is
    /// a normal outcome internally; only the login handler turns it into
    /// this error.
    #[error("Invalid credentials.")]
    InvalidCredentials,

    /// Missing session identity or missing ownership.
    #[error("Access unauthorized.")]
    Unauthorized,

    #[error("Not found")]
    NotFound,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<DbError> for AppError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::Constraint => AppError::Taken,
            other => AppError::Internal(other.into()),
        }
    }
}

impl From<tower_sessions::session::Error> for AppError {
    fn from(e: tower_sessions::session::Error) -> Self {
        AppError::Internal(e.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()),
            AppError::Taken => (StatusCode::CONFLICT, self.to_string()),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, self.to_string()),
            // Handlers flash and redirect before this is ever reached; kept
            // as a plain redirect so a stray Unauthorized still leaks nothing.
            AppError::Unauthorized => return Redirect::to("/").into_response(),
            AppError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::Internal(err) => {
                error!("internal error: {err:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
