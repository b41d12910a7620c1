use chirp_db::Database;
use chirp_db::models::MessageRow;

use crate::error::{AppError, AppResult};

pub const MESSAGE_MAX_LEN: usize = 140;

/// Create/delete posts and like edges. Ownership checks live here; the
/// session gate has already established who the caller is.
pub struct MessageBoard<'a> {
    db: &'a Database,
}

impl<'a> MessageBoard<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn create_message(&self, user_id: i64, text: &str) -> AppResult<MessageRow> {
        if text.is_empty() {
            return Err(AppError::Validation("Text is required".into()));
        }
        if text.chars().count() > MESSAGE_MAX_LEN {
            return Err(AppError::Validation(format!(
                "Text must be at most {MESSAGE_MAX_LEN} characters"
            )));
        }

        let id = self.db.insert_message(user_id, text)?;
        self.db
            .get_message(id)?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("message {id} missing after insert")))
    }

    pub fn get_message(&self, message_id: i64) -> AppResult<Option<MessageRow>> {
        Ok(self.db.get_message(message_id)?)
    }

    /// Only the owner may delete a message.
    pub fn delete_message(&self, user_id: i64, message_id: i64) -> AppResult<()> {
        let message = self.db.get_message(message_id)?.ok_or(AppError::NotFound)?;
        if message.user_id != user_id {
            return Err(AppError::Unauthorized);
        }
        self.db.delete_message(message_id)?;
        Ok(())
    }

    /// Idempotent; liking your own message is not allowed.
    pub fn like(&self, user_id: i64, message_id: i64) -> AppResult<()> {
        let message = self.db.get_message(message_id)?.ok_or(AppError::NotFound)?;
        if message.user_id == user_id {
            return Err(AppError::Unauthorized);
        }
        self.db.insert_like(user_id, message_id)?;
        Ok(())
    }

    pub fn unlike(&self, user_id: i64, message_id: i64) -> AppResult<()> {
        if self.db.get_message(message_id)?.is_none() {
            return Err(AppError::NotFound);
        }
        self.db.delete_like(user_id, message_id)?;
        Ok(())
    }

    pub fn liked_message_ids(&self, user_id: i64) -> AppResult<Vec<i64>> {
        Ok(self.db.liked_message_ids(user_id)?)
    }

    pub fn messages_of(&self, user_id: i64) -> AppResult<Vec<MessageRow>> {
        Ok(self.db.messages_for_user(user_id)?)
    }

    /// Home feed: the user's own messages plus everyone they follow.
    pub fn timeline(&self, user_id: i64, limit: u32) -> AppResult<Vec<MessageRow>> {
        Ok(self.db.timeline(user_id, limit)?)
    }
}
