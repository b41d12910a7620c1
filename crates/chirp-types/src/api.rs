use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

// -- Users --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileUpdateRequest {
    pub username: String,
    pub email: String,
    /// Current account password, re-checked before any change is applied.
    pub password: String,
    pub image_url: Option<String>,
    pub header_image_url: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: crate::models::User,
    /// Newest-first, ids only — callers fetch bodies as needed.
    pub message_ids: Vec<i64>,
    pub following_count: i64,
    pub follower_count: i64,
}

// -- Messages --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewMessageRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub id: i64,
    pub user_id: i64,
    pub author_username: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub like_count: i64,
}

// -- Landing / home --

#[derive(Debug, Serialize)]
pub struct HomeUser {
    pub id: i64,
    pub username: String,
    /// "@username", the form the timeline renders.
    pub handle: String,
}

#[derive(Debug, Serialize)]
pub struct HomeResponse {
    /// One-time status message, cleared once served.
    pub flash: Option<String>,
    /// None for the anonymous landing view.
    pub user: Option<HomeUser>,
    pub timeline: Vec<MessageResponse>,
}
