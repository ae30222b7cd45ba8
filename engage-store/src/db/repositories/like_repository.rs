use rusqlite::{Row, Transaction, TransactionBehavior};

use engage_types::{format_timestamp, Like, NewLike};

use super::timestamp_column;
use crate::db::DbPool;
use crate::error::{StoreError, StoreResult};

pub struct LikeRepository {
    pool: DbPool,
}

/// Insert a like and bump its post's `likes_count` by one.
///
/// Both statements run inside the caller's transaction, so the counter moves
/// exactly when the like row commits. This is the only writer of `likes_count`.
pub fn insert_like(tx: &Transaction<'_>, like: &NewLike) -> StoreResult<i64> {
    tx.execute(
        "INSERT INTO likes (post_id, user_id, liked_at) VALUES (?, ?, ?)",
        (like.post_id, like.user_id, format_timestamp(&like.liked_at)),
    )?;
    let like_id = tx.last_insert_rowid();

    let updated = tx.execute(
        "UPDATE posts SET likes_count = likes_count + 1 WHERE id = ?",
        [like.post_id],
    )?;
    if updated != 1 {
        return Err(StoreError::NotFound(format!("post {}", like.post_id)));
    }

    Ok(like_id)
}

impl LikeRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<Like> {
        Ok(Like {
            id: row.get(0)?,
            post_id: row.get(1)?,
            user_id: row.get(2)?,
            liked_at: timestamp_column(row, 3)?,
        })
    }

    /// Record a single like and maintain the post's counter in one transaction.
    ///
    /// An unknown post or user fails with a referential integrity error and
    /// leaves every counter untouched.
    pub fn record_like(&self, like: &NewLike) -> StoreResult<Like> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let id = insert_like(&tx, like)?;
        tx.commit()?;

        tracing::debug!(
            post_id = like.post_id,
            user_id = like.user_id,
            like_id = id,
            "Like recorded"
        );
        Ok(Like {
            id,
            post_id: like.post_id,
            user_id: like.user_id,
            liked_at: like.liked_at,
        })
    }

    /// Live number of like rows for a post
    pub fn count_for_post(&self, post_id: i64) -> StoreResult<i64> {
        let conn = self.pool.get()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM likes WHERE post_id = ?",
            [post_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Likes for a post in the order they happened
    pub fn get_by_post(&self, post_id: i64) -> StoreResult<Vec<Like>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, post_id, user_id, liked_at
             FROM likes
             WHERE post_id = ?
             ORDER BY liked_at, id",
        )?;
        let likes = stmt
            .query_map([post_id], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(likes)
    }
}
