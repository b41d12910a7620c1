use axum::{
    Extension, Json,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use chirp_db::models::UserRow;
use chirp_types::api::{ProfileResponse, ProfileUpdateRequest};
use chirp_types::models::User;

use crate::directory::UserDirectory;
use crate::error::{AppError, AppResult};
use crate::session::{self, CurrentUser};
use crate::social::SocialGraph;
use crate::{AppState, forms, messages, run_blocking};

pub async fn show_profile(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<ProfileResponse>> {
    let profile = run_blocking(move || {
        let Some(user) = UserDirectory::new(&state.db).get(user_id)? else {
            return Ok(None);
        };
        let message_ids = state.db.message_ids_for_user(user_id)?;
        let following_count = state.db.following_count(user_id)?;
        let follower_count = state.db.follower_count(user_id)?;
        Ok(Some(ProfileResponse {
            user: user_response(&user),
            message_ids,
            following_count,
            follower_count,
        }))
    })
    .await?
    .ok_or(AppError::NotFound)?;

    Ok(Json(profile))
}

pub async fn following(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<i64>>> {
    let ids = run_blocking(move || {
        ensure_user(&state, user_id)?;
        SocialGraph::new(&state.db).following_ids(user_id)
    })
    .await?;
    Ok(Json(ids))
}

pub async fn followers(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<i64>>> {
    let ids = run_blocking(move || {
        ensure_user(&state, user_id)?;
        SocialGraph::new(&state.db).follower_ids(user_id)
    })
    .await?;
    Ok(Json(ids))
}

pub async fn likes(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<i64>>> {
    let ids = run_blocking(move || {
        ensure_user(&state, user_id)?;
        Ok(state.db.liked_message_ids(user_id)?)
    })
    .await?;
    Ok(Json(ids))
}

pub async fn follow(
    State(state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path(followed_id): Path<i64>,
) -> AppResult<Redirect> {
    run_blocking(move || SocialGraph::new(&state.db).follow(user_id, followed_id)).await?;
    Ok(Redirect::to("/"))
}

pub async fn stop_following(
    State(state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path(followed_id): Path<i64>,
) -> AppResult<Redirect> {
    run_blocking(move || SocialGraph::new(&state.db).unfollow(user_id, followed_id)).await?;
    Ok(Redirect::to("/"))
}

pub async fn update_profile(
    State(state): State<AppState>,
    session: Session,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Json(req): Json<ProfileUpdateRequest>,
) -> AppResult<Response> {
    forms::validate_profile_update(&req)?;

    let result =
        run_blocking(move || UserDirectory::new(&state.db).update_profile(user_id, &req)).await;

    match result {
        Ok(user) => Ok(Redirect::to(&format!("/users/{}", user.id)).into_response()),
        Err(AppError::Unauthorized) => session::deny(&session).await,
        Err(e) => Err(e),
    }
}

/// Deletes the current account and everything it owns, then ends the session.
pub async fn delete_user(
    State(state): State<AppState>,
    session: Session,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
) -> AppResult<Redirect> {
    run_blocking(move || UserDirectory::new(&state.db).delete_user(user_id)).await?;
    session::log_out(&session).await?;
    Ok(Redirect::to("/"))
}

fn ensure_user(state: &AppState, user_id: i64) -> AppResult<()> {
    if state.db.get_user_by_id(user_id)?.is_none() {
        return Err(AppError::NotFound);
    }
    Ok(())
}

pub(crate) fn user_response(row: &UserRow) -> User {
    User {
        id: row.id,
        username: row.username.clone(),
        email: row.email.clone(),
        image_url: row.image_url.clone(),
        header_image_url: row.header_image_url.clone(),
        bio: row.bio.clone(),
        location: row.location.clone(),
        created_at: messages::parse_db_timestamp(&row.created_at, row.id),
    }
}
