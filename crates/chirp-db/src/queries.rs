use rusqlite::Connection;

use crate::models::{MessageRow, UserRow};
use crate::{Database, DbResult};

const MESSAGE_COLUMNS: &str = "m.id, m.user_id, u.username, m.text, m.created_at,
     (SELECT COUNT(*) FROM likes l WHERE l.message_id = m.id)";

impl Database {
    // -- Users --

    pub fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        image_url: &str,
        header_image_url: &str,
    ) -> DbResult<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (username, email, password, image_url, header_image_url)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                (username, email, password_hash, image_url, header_image_url),
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_user_by_id(&self, id: i64) -> DbResult<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "id = ?1", &[&id]))
    }

    pub fn get_user_by_username(&self, username: &str) -> DbResult<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "username = ?1", &[&username]))
    }

    pub fn update_user(
        &self,
        id: i64,
        username: &str,
        email: &str,
        image_url: &str,
        header_image_url: &str,
        bio: Option<&str>,
        location: Option<&str>,
    ) -> DbResult<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE users
                 SET username = ?2, email = ?3, image_url = ?4,
                     header_image_url = ?5, bio = ?6, location = ?7
                 WHERE id = ?1",
                rusqlite::params![id, username, email, image_url, header_image_url, bio, location],
            )?;
            Ok(changed > 0)
        })
    }

    /// Owned messages, likes and follow edges go with the user (ON DELETE CASCADE).
    pub fn delete_user(&self, id: i64) -> DbResult<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM users WHERE id = ?1", [id])?;
            Ok(changed > 0)
        })
    }

    pub fn user_count(&self) -> DbResult<i64> {
        self.with_conn(|conn| count(conn, "SELECT COUNT(*) FROM users"))
    }

    // -- Messages --

    pub fn insert_message(&self, user_id: i64, text: &str) -> DbResult<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO messages (user_id, text) VALUES (?1, ?2)",
                (user_id, text),
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_message(&self, id: i64) -> DbResult<Option<MessageRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {MESSAGE_COLUMNS}
                 FROM messages m JOIN users u ON m.user_id = u.id
                 WHERE m.id = ?1"
            );
            conn.query_row(&sql, [id], map_message).optional()
        })
    }

    pub fn delete_message(&self, id: i64) -> DbResult<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM messages WHERE id = ?1", [id])?;
            Ok(changed > 0)
        })
    }

    pub fn messages_for_user(&self, user_id: i64) -> DbResult<Vec<MessageRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {MESSAGE_COLUMNS}
                 FROM messages m JOIN users u ON m.user_id = u.id
                 WHERE m.user_id = ?1
                 ORDER BY m.created_at DESC, m.id DESC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([user_id], map_message)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn message_ids_for_user(&self, user_id: i64) -> DbResult<Vec<i64>> {
        self.with_conn(|conn| {
            id_list(
                conn,
                "SELECT id FROM messages WHERE user_id = ?1
                 ORDER BY created_at DESC, id DESC",
                user_id,
            )
        })
    }

    /// Messages authored by the user or anyone they follow, newest first.
    pub fn timeline(&self, user_id: i64, limit: u32) -> DbResult<Vec<MessageRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {MESSAGE_COLUMNS}
                 FROM messages m JOIN users u ON m.user_id = u.id
                 WHERE m.user_id = ?1
                    OR m.user_id IN (SELECT followed_id FROM follows WHERE follower_id = ?1)
                 ORDER BY m.created_at DESC, m.id DESC
                 LIMIT ?2"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(rusqlite::params![user_id, limit], map_message)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn message_count(&self) -> DbResult<i64> {
        self.with_conn(|conn| count(conn, "SELECT COUNT(*) FROM messages"))
    }

    // -- Follows --

    /// Returns false when the edge already existed.
    pub fn insert_follow(&self, follower_id: i64, followed_id: i64) -> DbResult<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "INSERT OR IGNORE INTO follows (follower_id, followed_id) VALUES (?1, ?2)",
                (follower_id, followed_id),
            )?;
            Ok(changed > 0)
        })
    }

    pub fn delete_follow(&self, follower_id: i64, followed_id: i64) -> DbResult<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "DELETE FROM follows WHERE follower_id = ?1 AND followed_id = ?2",
                (follower_id, followed_id),
            )?;
            Ok(changed > 0)
        })
    }

    pub fn is_following(&self, follower_id: i64, followed_id: i64) -> DbResult<bool> {
        self.with_conn(|conn| {
            let exists: i64 = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM follows WHERE follower_id = ?1 AND followed_id = ?2)",
                (follower_id, followed_id),
                |row| row.get(0),
            )?;
            Ok(exists != 0)
        })
    }

    /// Ids the user follows, oldest edge first.
    pub fn following_ids(&self, user_id: i64) -> DbResult<Vec<i64>> {
        self.with_conn(|conn| {
            id_list(
                conn,
                "SELECT followed_id FROM follows WHERE follower_id = ?1 ORDER BY rowid",
                user_id,
            )
        })
    }

    pub fn follower_ids(&self, user_id: i64) -> DbResult<Vec<i64>> {
        self.with_conn(|conn| {
            id_list(
                conn,
                "SELECT follower_id FROM follows WHERE followed_id = ?1 ORDER BY rowid",
                user_id,
            )
        })
    }

    pub fn following_count(&self, user_id: i64) -> DbResult<i64> {
        self.with_conn(|conn| {
            let n: i64 = conn.query_row(
                "SELECT COUNT(*) FROM follows WHERE follower_id = ?1",
                [user_id],
                |row| row.get(0),
            )?;
            Ok(n)
        })
    }

    pub fn follower_count(&self, user_id: i64) -> DbResult<i64> {
        self.with_conn(|conn| {
            let n: i64 = conn.query_row(
                "SELECT COUNT(*) FROM follows WHERE followed_id = ?1",
                [user_id],
                |row| row.get(0),
            )?;
            Ok(n)
        })
    }

    // -- Likes --

    /// Returns false when the user already liked the message.
    pub fn insert_like(&self, user_id: i64, message_id: i64) -> DbResult<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "INSERT OR IGNORE INTO likes (user_id, message_id) VALUES (?1, ?2)",
                (user_id, message_id),
            )?;
            Ok(changed > 0)
        })
    }

    pub fn delete_like(&self, user_id: i64, message_id: i64) -> DbResult<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "DELETE FROM likes WHERE user_id = ?1 AND message_id = ?2",
                (user_id, message_id),
            )?;
            Ok(changed > 0)
        })
    }

    pub fn has_liked(&self, user_id: i64, message_id: i64) -> DbResult<bool> {
        self.with_conn(|conn| {
            let exists: i64 = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM likes WHERE user_id = ?1 AND message_id = ?2)",
                (user_id, message_id),
                |row| row.get(0),
            )?;
            Ok(exists != 0)
        })
    }

    pub fn liked_message_ids(&self, user_id: i64) -> DbResult<Vec<i64>> {
        self.with_conn(|conn| {
            id_list(
                conn,
                "SELECT message_id FROM likes WHERE user_id = ?1 ORDER BY rowid",
                user_id,
            )
        })
    }
}

fn query_user(
    conn: &Connection,
    predicate: &str,
    params: &[&dyn rusqlite::types::ToSql],
) -> DbResult<Option<UserRow>> {
    let sql = format!(
        "SELECT id, username, email, password, image_url, header_image_url,
                bio, location, created_at
         FROM users WHERE {predicate}"
    );
    conn.query_row(&sql, params, |row| {
        Ok(UserRow {
            id: row.get(0)?,
            username: row.get(1)?,
            email: row.get(2)?,
            password: row.get(3)?,
            image_url: row.get(4)?,
            header_image_url: row.get(5)?,
            bio: row.get(6)?,
            location: row.get(7)?,
            created_at: row.get(8)?,
        })
    })
    .optional()
}

fn map_message(row: &rusqlite::Row<'_>) -> Result<MessageRow, rusqlite::Error> {
    Ok(MessageRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        author_username: row.get(2)?,
        text: row.get(3)?,
        created_at: row.get(4)?,
        like_count: row.get(5)?,
    })
}

fn count(conn: &Connection, sql: &str) -> DbResult<i64> {
    let n: i64 = conn.query_row(sql, [], |row| row.get(0))?;
    Ok(n)
}

fn id_list(conn: &Connection, sql: &str, param: i64) -> DbResult<Vec<i64>> {
    let mut stmt = conn.prepare(sql)?;
    let ids = stmt
        .query_map([param], |row| row.get(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ids)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> DbResult<Option<T>>;
}

impl<T> OptionalExt<T> for Result<T, rusqlite::Error> {
    fn optional(self) -> DbResult<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
