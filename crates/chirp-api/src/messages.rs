use axum::{
    Extension, Json,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::{DateTime, NaiveDateTime, Utc};
use tower_sessions::Session;
use tracing::warn;

use chirp_db::models::MessageRow;
use chirp_types::api::{MessageResponse, NewMessageRequest};

use crate::board::MessageBoard;
use crate::error::{AppError, AppResult};
use crate::session::{self, CurrentUser};
use crate::{AppState, forms, run_blocking};

pub async fn new_message(
    State(state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Json(req): Json<NewMessageRequest>,
) -> AppResult<Redirect> {
    forms::validate_message(&req.text)?;

    let message = run_blocking(move || {
        MessageBoard::new(&state.db).create_message(user_id, &req.text)
    })
    .await?;

    Ok(Redirect::to(&format!("/messages/{}", message.id)))
}

pub async fn show_message(
    State(state): State<AppState>,
    Path(message_id): Path<i64>,
) -> AppResult<Json<MessageResponse>> {
    let row = run_blocking(move || MessageBoard::new(&state.db).get_message(message_id))
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(message_response(&row)))
}

pub async fn delete_message(
    State(state): State<AppState>,
    session: Session,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path(message_id): Path<i64>,
) -> AppResult<Response> {
    let result =
        run_blocking(move || MessageBoard::new(&state.db).delete_message(user_id, message_id))
            .await;

    match result {
        Ok(()) => Ok(Redirect::to("/").into_response()),
        Err(AppError::Unauthorized) => session::deny(&session).await,
        Err(e) => Err(e),
    }
}

pub async fn like_message(
    State(state): State<AppState>,
    session: Session,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path(message_id): Path<i64>,
) -> AppResult<Response> {
    let result =
        run_blocking(move || MessageBoard::new(&state.db).like(user_id, message_id)).await;

    match result {
        Ok(()) => Ok(Redirect::to("/").into_response()),
        Err(AppError::Unauthorized) => session::deny(&session).await,
        Err(e) => Err(e),
    }
}

pub async fn unlike_message(
    State(state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path(message_id): Path<i64>,
) -> AppResult<Redirect> {
    run_blocking(move || MessageBoard::new(&state.db).unlike(user_id, message_id)).await?;
    Ok(Redirect::to("/"))
}

pub(crate) fn message_response(row: &MessageRow) -> MessageResponse {
    MessageResponse {
        id: row.id,
        user_id: row.user_id,
        author_username: row.author_username.clone(),
        text: row.text.clone(),
        created_at: parse_db_timestamp(&row.created_at, row.id),
        like_count: row.like_count,
    }
}

pub(crate) fn parse_db_timestamp(raw: &str, row_id: i64) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            // SQLite stores timestamps as "YYYY-MM-DD HH:MM:SS" without timezone.
            // Parse as naive UTC and convert.
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt created_at '{raw}' on row {row_id}: {e}");
            DateTime::default()
        })
}
