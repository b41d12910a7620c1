use chirp_db::Database;

use crate::error::{AppError, AppResult};

/// Follow edges between users. Duplicate follows are idempotent no-ops;
/// self-follows are rejected here rather than in the schema.
pub struct SocialGraph<'a> {
    db: &'a Database,
}

impl<'a> SocialGraph<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn follow(&self, follower_id: i64, followed_id: i64) -> AppResult<()> {
        if follower_id == followed_id {
            return Err(AppError::Validation("You cannot follow yourself".into()));
        }
        if self.db.get_user_by_id(followed_id)?.is_none() {
            return Err(AppError::NotFound);
        }
        self.db.insert_follow(follower_id, followed_id)?;
        Ok(())
    }

    pub fn unfollow(&self, follower_id: i64, followed_id: i64) -> AppResult<()> {
        self.db.delete_follow(follower_id, followed_id)?;
        Ok(())
    }

    pub fn is_following(&self, user_id: i64, other_id: i64) -> AppResult<bool> {
        Ok(self.db.is_following(user_id, other_id)?)
    }

    pub fn is_followed_by(&self, user_id: i64, other_id: i64) -> AppResult<bool> {
        Ok(self.db.is_following(other_id, user_id)?)
    }

    pub fn following_ids(&self, user_id: i64) -> AppResult<Vec<i64>> {
        Ok(self.db.following_ids(user_id)?)
    }

    pub fn follower_ids(&self, user_id: i64) -> AppResult<Vec<i64>> {
        Ok(self.db.follower_ids(user_id)?)
    }
}
