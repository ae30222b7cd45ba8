use rusqlite::{Connection, Row};

use engage_types::{format_timestamp, Comment, NewComment};

use super::timestamp_column;
use crate::db::DbPool;
use crate::error::StoreResult;

pub struct CommentRepository {
    pool: DbPool,
}

/// Insert a comment row and return its id
pub fn insert_comment(conn: &Connection, comment: &NewComment) -> StoreResult<i64> {
    conn.execute(
        "INSERT INTO comments (post_id, user_id, content, commented_at) VALUES (?, ?, ?, ?)",
        (
            comment.post_id,
            comment.user_id,
            &comment.content,
            format_timestamp(&comment.commented_at),
        ),
    )?;
    Ok(conn.last_insert_rowid())
}

impl CommentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<Comment> {
        Ok(Comment {
            id: row.get(0)?,
            post_id: row.get(1)?,
            user_id: row.get(2)?,
            content: row.get(3)?,
            commented_at: timestamp_column(row, 4)?,
        })
    }

    /// Create a comment. Empty text is rejected by the schema.
    pub fn create(&self, comment: &NewComment) -> StoreResult<Comment> {
        let conn = self.pool.get()?;
        let id = insert_comment(&conn, comment)?;
        Ok(Comment {
            id,
            post_id: comment.post_id,
            user_id: comment.user_id,
            content: comment.content.clone(),
            commented_at: comment.commented_at,
        })
    }

    pub fn count_for_post(&self, post_id: i64) -> StoreResult<i64> {
        let conn = self.pool.get()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM comments WHERE post_id = ?",
            [post_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Comments for a post in the order they were made
    pub fn get_by_post(&self, post_id: i64) -> StoreResult<Vec<Comment>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, post_id, user_id, content, commented_at
             FROM comments
             WHERE post_id = ?
             ORDER BY commented_at, id",
        )?;
        let comments = stmt
            .query_map([post_id], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(comments)
    }
}
