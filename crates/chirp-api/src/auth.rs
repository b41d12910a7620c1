use axum::{
    Json,
    extract::State,
    response::Redirect,
};
use tower_sessions::Session;

use chirp_types::api::{LoginRequest, SignupRequest};

use crate::AppState;
use crate::directory::UserDirectory;
use crate::error::{AppError, AppResult};
use crate::forms;
use crate::session::{self, LOGGED_OUT};

pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<SignupRequest>,
) -> AppResult<Redirect> {
    forms::validate_signup(&req)?;

    let user = UserDirectory::new(&state.db).signup(
        &req.username,
        &req.email,
        &req.password,
        req.image_url.as_deref(),
    )?;

    session::log_in(&session, user.id).await?;
    Ok(Redirect::to("/"))
}

pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<LoginRequest>,
) -> AppResult<Redirect> {
    forms::validate_login(&req)?;

    match UserDirectory::new(&state.db).authenticate(&req.username, &req.password)? {
        Some(user) => {
            session::log_in(&session, user.id).await?;
            Ok(Redirect::to("/"))
        }
        None => Err(AppError::InvalidCredentials),
    }
}

pub async fn logout(session: Session) -> AppResult<Redirect> {
    session::log_out(&session).await?;
    session::flash(&session, LOGGED_OUT).await?;
    Ok(Redirect::to("/"))
}
