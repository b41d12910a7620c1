/// Database row types — these map directly to SQLite rows.
/// Distinct from the chirp-types API models so the password hash and the
/// raw timestamp strings never leak past the query layer by accident.

#[derive(Debug)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password: String,
    pub image_url: String,
    pub header_image_url: String,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub created_at: String,
}

#[derive(Debug)]
pub struct MessageRow {
    pub id: i64,
    pub user_id: i64,
    pub author_username: String,
    pub text: String,
    pub created_at: String,
    pub like_count: i64,
}
