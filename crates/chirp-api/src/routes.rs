use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tower_sessions::{MemoryStore, SessionManagerLayer, cookie::SameSite};

use crate::{AppState, auth, home, messages, session, users};

/// Build the application router. View tests drive this directly; the server
/// binary serves it as-is.
pub fn app(state: AppState) -> Router {
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_name("chirp-session")
        .with_http_only(true);

    let public = Router::new()
        .route("/", get(home::home))
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/messages/{message_id}", get(messages::show_message))
        .route("/users/{user_id}", get(users::show_profile))
        .route("/users/{user_id}/following", get(users::following))
        .route("/users/{user_id}/followers", get(users::followers))
        .route("/users/{user_id}/likes", get(users::likes))
        .with_state(state.clone());

    let protected = Router::new()
        .route("/logout", post(auth::logout))
        .route("/messages/new", post(messages::new_message))
        .route("/messages/{message_id}/delete", post(messages::delete_message))
        .route("/messages/{message_id}/like", post(messages::like_message))
        .route("/messages/{message_id}/unlike", post(messages::unlike_message))
        .route("/users/follow/{user_id}", post(users::follow))
        .route("/users/stop-following/{user_id}", post(users::stop_following))
        .route("/users/profile", post(users::update_profile))
        .route("/users/delete", post(users::delete_user))
        .layer(middleware::from_fn(session::require_auth))
        .with_state(state);

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(session_layer)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
