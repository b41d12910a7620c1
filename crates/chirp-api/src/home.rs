use axum::{Json, extract::State};
use tower_sessions::Session;

use chirp_types::api::{HomeResponse, HomeUser};

use crate::board::MessageBoard;
use crate::directory::UserDirectory;
use crate::error::AppResult;
use crate::messages::message_response;
use crate::{AppState, run_blocking, session};

const HOME_TIMELINE_LIMIT: u32 = 100;

/// Public landing view. Serves (and clears) any pending flash message;
/// when a session identity is present it also carries the home timeline.
pub async fn home(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<HomeResponse>> {
    let flash = session::take_flash(&session).await?;

    let Some(user_id) = session::current_user_id(&session).await? else {
        return Ok(Json(anonymous(flash)));
    };

    let fetched = run_blocking(move || {
        let Some(user) = UserDirectory::new(&state.db).get(user_id)? else {
            return Ok(None);
        };
        let timeline = MessageBoard::new(&state.db).timeline(user_id, HOME_TIMELINE_LIMIT)?;
        Ok(Some((user, timeline)))
    })
    .await?;

    let Some((user, timeline)) = fetched else {
        // Stale identity (account deleted since login) — drop it.
        session::log_out(&session).await?;
        return Ok(Json(anonymous(flash)));
    };

    Ok(Json(HomeResponse {
        flash,
        user: Some(HomeUser {
            id: user.id,
            handle: format!("@{}", user.username),
            username: user.username,
        }),
        timeline: timeline.iter().map(message_response).collect(),
    }))
}

fn anonymous(flash: Option<String>) -> HomeResponse {
    HomeResponse {
        flash,
        user: None,
        timeline: Vec::new(),
    }
}
