use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::error;

use crate::error::AppResult;

/// The one key the session persists across requests.
pub const CURR_USER_KEY: &str = "curr_user";

const FLASH_KEY: &str = "flash";

pub const ACCESS_UNAUTHORIZED: &str = "Access unauthorized.";
pub const LOGGED_OUT: &str = "You have successfully logged out";

/// Authenticated identity for the current request, inserted by
/// [`require_auth`] and read by the protected handlers.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub i64);

pub async fn log_in(session: &Session, user_id: i64) -> AppResult<()> {
    session.insert(CURR_USER_KEY, user_id).await?;
    Ok(())
}

pub async fn log_out(session: &Session) -> AppResult<()> {
    session.remove::<i64>(CURR_USER_KEY).await?;
    Ok(())
}

pub async fn current_user_id(session: &Session) -> AppResult<Option<i64>> {
    Ok(session.get::<i64>(CURR_USER_KEY).await?)
}

/// Queue a one-time status message for the next landing view.
pub async fn flash(session: &Session, message: &str) -> AppResult<()> {
    session.insert(FLASH_KEY, message).await?;
    Ok(())
}

/// Take the pending flash message, clearing it.
pub async fn take_flash(session: &Session) -> AppResult<Option<String>> {
    Ok(session.remove::<String>(FLASH_KEY).await?)
}

/// Flash "Access unauthorized." and send the caller back to the landing view.
pub async fn deny(session: &Session) -> AppResult<Response> {
    flash(session, ACCESS_UNAUTHORIZED).await?;
    Ok(Redirect::to("/").into_response())
}

/// Session gate for protected routes: anonymous requests are redirected to
/// the public landing view without touching any data.
pub async fn require_auth(session: Session, mut req: Request, next: Next) -> Response {
    match session.get::<i64>(CURR_USER_KEY).await {
        Ok(Some(user_id)) => {
            req.extensions_mut().insert(CurrentUser(user_id));
            next.run(req).await
        }
        Ok(None) => match deny(&session).await {
            Ok(resp) => resp,
            Err(e) => e.into_response(),
        },
        Err(e) => {
            error!("session load failed: {e}");
            axum::http::StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
