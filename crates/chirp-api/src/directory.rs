use anyhow::anyhow;
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};

use chirp_db::Database;
use chirp_db::models::UserRow;
use chirp_types::api::ProfileUpdateRequest;
use chirp_types::models::{DEFAULT_HEADER_IMAGE_URL, DEFAULT_IMAGE_URL};

use crate::error::{AppError, AppResult};

/// Signup and credential checks over the persistence store. Stateless — the
/// store handle is the only dependency, passed in by the caller.
pub struct UserDirectory<'a> {
    db: &'a Database,
}

impl<'a> UserDirectory<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn get(&self, user_id: i64) -> AppResult<Option<UserRow>> {
        Ok(self.db.get_user_by_id(user_id)?)
    }

    /// Hash the password with Argon2id and store the new user. Empty
    /// passwords never reach the hasher; duplicate username or email
    /// surfaces as [`AppError::Taken`].
    pub fn signup(
        &self,
        username: &str,
        email: &str,
        password: &str,
        image_url: Option<&str>,
    ) -> AppResult<UserRow> {
        if password.is_empty() {
            return Err(AppError::Validation("Password is required".into()));
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow!("password hash failed: {e}"))?
            .to_string();

        let image_url = match image_url {
            Some(url) if !url.is_empty() => url,
            _ => DEFAULT_IMAGE_URL,
        };

        let id = self.db.create_user(
            username,
            email,
            &password_hash,
            image_url,
            DEFAULT_HEADER_IMAGE_URL,
        )?;

        self.db
            .get_user_by_id(id)?
            .ok_or_else(|| AppError::Internal(anyhow!("user {id} missing after insert")))
    }

    /// Exact-username lookup plus hash verification. Wrong username and
    /// wrong password are both just `None` — not errors.
    pub fn authenticate(&self, username: &str, password: &str) -> AppResult<Option<UserRow>> {
        let Some(user) = self.db.get_user_by_username(username)? else {
            return Ok(None);
        };

        let parsed_hash = PasswordHash::new(&user.password)
            .map_err(|e| anyhow!("stored hash unparseable for user {}: {e}", user.id))?;

        let verified = Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok();

        Ok(verified.then_some(user))
    }

    /// Profile edit. The account password is re-checked first; a wrong
    /// password means the edit is unauthorized, not a login failure.
    pub fn update_profile(&self, user_id: i64, req: &ProfileUpdateRequest) -> AppResult<UserRow> {
        let current = self.db.get_user_by_id(user_id)?.ok_or(AppError::NotFound)?;

        if self.authenticate(&current.username, &req.password)?.is_none() {
            return Err(AppError::Unauthorized);
        }

        let image_url = non_empty(req.image_url.as_deref()).unwrap_or(DEFAULT_IMAGE_URL);
        let header_image_url =
            non_empty(req.header_image_url.as_deref()).unwrap_or(DEFAULT_HEADER_IMAGE_URL);

        self.db.update_user(
            user_id,
            &req.username,
            &req.email,
            image_url,
            header_image_url,
            non_empty(req.bio.as_deref()),
            non_empty(req.location.as_deref()),
        )?;

        self.db
            .get_user_by_id(user_id)?
            .ok_or_else(|| AppError::Internal(anyhow!("user {user_id} missing after update")))
    }

    /// Removes the user; messages, likes and follow edges cascade with it.
    pub fn delete_user(&self, user_id: i64) -> AppResult<()> {
        if !self.db.delete_user(user_id)? {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER_IMG_URL: &str = "https://example.com/avatar.jpg";

    fn setup() -> Database {
        let db = Database::open_in_memory().unwrap();
        let dir = UserDirectory::new(&db);
        dir.signup("user1", "user1@user1.com", "password", None)
            .unwrap();
        dir.signup("user2", "user2@user2.com", "password", Some(USER_IMG_URL))
            .unwrap();
        db
    }

    #[test]
    fn signup_hashes_password_and_applies_defaults() {
        let db = setup();
        let dir = UserDirectory::new(&db);

        let user1 = db.get_user_by_username("user1").unwrap().unwrap();
        let user2 = db.get_user_by_username("user2").unwrap().unwrap();

        // never the plaintext, and the hash verifies
        assert_ne!(user1.password, "password");
        assert!(user1.password.starts_with("$argon2"));
        assert!(dir.authenticate("user1", "password").unwrap().is_some());

        assert_eq!(user1.image_url, DEFAULT_IMAGE_URL);
        assert_eq!(user2.image_url, USER_IMG_URL);
        assert_eq!(user1.header_image_url, DEFAULT_HEADER_IMAGE_URL);
        assert_eq!(user2.header_image_url, DEFAULT_HEADER_IMAGE_URL);

        assert_eq!(user1.bio, None);
        assert_eq!(user1.location, None);
    }

    #[test]
    fn signup_rejects_empty_password() {
        let db = setup();
        let dir = UserDirectory::new(&db);

        let err = dir
            .signup("user3", "user3@user3.com", "", None)
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(db.user_count().unwrap(), 2);
    }

    #[test]
    fn signup_rejects_duplicate_username() {
        let db = setup();
        let dir = UserDirectory::new(&db);

        let err = dir
            .signup("user1", "fresh@fresh.com", "password", None)
            .unwrap_err();
        assert!(matches!(err, AppError::Taken));
        assert_eq!(db.user_count().unwrap(), 2);
    }

    #[test]
    fn signup_rejects_duplicate_email() {
        let db = setup();
        let dir = UserDirectory::new(&db);

        let err = dir
            .signup("user3", "user1@user1.com", "password", None)
            .unwrap_err();
        assert!(matches!(err, AppError::Taken));
        assert_eq!(db.user_count().unwrap(), 2);
    }

    #[test]
    fn authenticate_success() {
        let db = setup();
        let dir = UserDirectory::new(&db);

        let user = dir.authenticate("user1", "password").unwrap().unwrap();
        assert_eq!(user.username, "user1");
    }

    #[test]
    fn authenticate_fails_on_bad_username() {
        let db = setup();
        let dir = UserDirectory::new(&db);

        assert!(dir.authenticate("user!", "password").unwrap().is_none());
    }

    #[test]
    fn authenticate_fails_on_bad_password() {
        let db = setup();
        let dir = UserDirectory::new(&db);

        assert!(dir.authenticate("user1", "passw0rd").unwrap().is_none());
    }

    #[test]
    fn update_profile_requires_correct_password() {
        let db = setup();
        let dir = UserDirectory::new(&db);
        let user1 = db.get_user_by_username("user1").unwrap().unwrap();

        let req = ProfileUpdateRequest {
            username: "renamed".into(),
            email: "renamed@user1.com".into(),
            password: "wrong-password".into(),
            image_url: None,
            header_image_url: None,
            bio: Some("hello".into()),
            location: None,
        };
        let err = dir.update_profile(user1.id, &req).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));

        let unchanged = db.get_user_by_id(user1.id).unwrap().unwrap();
        assert_eq!(unchanged.username, "user1");
    }

    #[test]
    fn update_profile_applies_changes() {
        let db = setup();
        let dir = UserDirectory::new(&db);
        let user1 = db.get_user_by_username("user1").unwrap().unwrap();

        let req = ProfileUpdateRequest {
            username: "user1".into(),
            email: "user1@user1.com".into(),
            password: "password".into(),
            image_url: Some(USER_IMG_URL.into()),
            header_image_url: None,
            bio: Some("warbling".into()),
            location: Some("the tree".into()),
        };
        let updated = dir.update_profile(user1.id, &req).unwrap();

        assert_eq!(updated.image_url, USER_IMG_URL);
        assert_eq!(updated.header_image_url, DEFAULT_HEADER_IMAGE_URL);
        assert_eq!(updated.bio.as_deref(), Some("warbling"));
        assert_eq!(updated.location.as_deref(), Some("the tree"));
    }

    #[test]
    fn delete_user_removes_all_owned_data() {
        let db = setup();
        let dir = UserDirectory::new(&db);
        let user1 = db.get_user_by_username("user1").unwrap().unwrap();
        let user2 = db.get_user_by_username("user2").unwrap().unwrap();

        let m1 = db.insert_message(user1.id, "mine").unwrap();
        let m2 = db.insert_message(user2.id, "theirs").unwrap();
        db.insert_follow(user1.id, user2.id).unwrap();
        db.insert_follow(user2.id, user1.id).unwrap();
        db.insert_like(user1.id, m2).unwrap();
        db.insert_like(user2.id, m1).unwrap();

        dir.delete_user(user1.id).unwrap();

        assert!(db.get_user_by_id(user1.id).unwrap().is_none());
        assert!(db.get_message(m1).unwrap().is_none());
        assert!(db.get_message(m2).unwrap().is_some());
        // both directions of the follow edge are gone
        assert!(!db.is_following(user2.id, user1.id).unwrap());
        assert_eq!(db.follower_ids(user2.id).unwrap(), Vec::<i64>::new());
        assert_eq!(db.following_ids(user2.id).unwrap(), Vec::<i64>::new());
        // the like on user1's message went with the message
        assert_eq!(db.liked_message_ids(user2.id).unwrap(), Vec::<i64>::new());
        // user1's own like is gone too
        assert!(!db.has_liked(user1.id, m2).unwrap());
    }
}
