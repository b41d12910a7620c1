use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use chirp_api::directory::UserDirectory;
use chirp_api::{AppState, AppStateInner, routes};

pub const USER_IMG_URL: &str = "https://example.com/files/350865/original/file.jpg";

pub fn test_app() -> (Router, AppState) {
    let db = chirp_db::Database::open_in_memory().unwrap();
    let state: AppState = Arc::new(AppStateInner { db });
    (routes::app(state.clone()), state)
}

/// Sample accounts used by most view tests, matching ids in return order.
pub fn seed_users(state: &AppState) -> (i64, i64) {
    let dir = UserDirectory::new(&state.db);
    let user1 = dir
        .signup("user1", "user1@user1.com", "password", None)
        .unwrap();
    let user2 = dir
        .signup("user2", "user2@user2.com", "password", Some(USER_IMG_URL))
        .unwrap();
    (user1.id, user2.id)
}

pub async fn get(app: &Router, uri: &str, cookie: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let req = builder.body(Body::empty()).unwrap();
    app.clone().oneshot(req).await.unwrap()
}

pub async fn post_json(
    app: &Router,
    uri: &str,
    cookie: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let req = builder.body(Body::from(body.to_string())).unwrap();
    app.clone().oneshot(req).await.unwrap()
}

pub async fn post(app: &Router, uri: &str, cookie: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let req = builder.body(Body::empty()).unwrap();
    app.clone().oneshot(req).await.unwrap()
}

/// The session cookie issued by the response, in `name=value` form ready to
/// send back, or None when the response did not touch the session.
pub fn session_cookie(resp: &Response<Body>) -> Option<String> {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("chirp-session="))
        .map(|v| v.split(';').next().unwrap().to_string())
}

pub async fn body_json(resp: Response<Body>) -> serde_json::Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn assert_redirect(resp: &Response<Body>, location: &str) {
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok()),
        Some(location)
    );
}

/// Log an existing seeded account in and hand back its session cookie.
pub async fn login(app: &Router, username: &str, password: &str) -> String {
    let resp = post_json(
        app,
        "/login",
        None,
        serde_json::json!({ "username": username, "password": password }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    session_cookie(&resp).expect("login should establish a session")
}
