use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Profile image shown when a user never set one.
pub const DEFAULT_IMAGE_URL: &str = "/static/images/default-pic.png";

/// Header image shown when a user never set one.
pub const DEFAULT_HEADER_IMAGE_URL: &str = "/static/images/default-header.jpg";

/// Public view of an account. The password hash never leaves the database
/// layer, so there is no credential field anywhere in this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub image_url: String,
    pub header_image_url: String,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}
