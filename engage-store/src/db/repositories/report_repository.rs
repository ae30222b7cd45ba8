use engage_types::{engagement_score, PostEngagement, RankedPost, UserPostReport};

use super::{optional_timestamp_column, timestamp_column};
use crate::db::DbPool;
use crate::error::StoreResult;

/// Read-only engagement reports over the normalized tables
pub struct ReportRepository {
    pool: DbPool,
}

impl ReportRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Posts ordered by likes, then comments, both descending. Posts without
    /// any activity are included with zero counts.
    pub fn top_engagement(&self, limit: usize) -> StoreResult<Vec<PostEngagement>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT post_id, username, content, created_at, total_likes, total_comments
             FROM post_engagement
             ORDER BY total_likes DESC, total_comments DESC, post_id
             LIMIT ?",
        )?;

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt
            .query_map([limit], |row| {
                Ok(PostEngagement {
                    post_id: row.get(0)?,
                    username: row.get(1)?,
                    content: row.get(2)?,
                    created_at: timestamp_column(row, 3)?,
                    total_likes: row.get(4)?,
                    total_comments: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// Every post ranked by engagement score (0.7 per like, 0.3 per comment).
    ///
    /// Uses standard rank semantics: tied scores share a rank and the next
    /// score's rank skips by the size of the tie. Ranking compares the score
    /// in integer tenths so equal scores always tie.
    pub fn ranked_engagement(&self) -> StoreResult<Vec<RankedPost>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT post_id, username, total_likes, total_comments,
                    RANK() OVER (ORDER BY 7 * total_likes + 3 * total_comments DESC) AS engagement_rank
             FROM post_engagement
             ORDER BY engagement_rank, post_id",
        )?;

        let rows = stmt
            .query_map([], |row| {
                let total_likes: i64 = row.get(2)?;
                let total_comments: i64 = row.get(3)?;
                Ok(RankedPost {
                    post_id: row.get(0)?,
                    username: row.get(1)?,
                    total_likes,
                    total_comments,
                    score: engagement_score(total_likes, total_comments),
                    rank: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// Every user with each of their posts, ordered by username then newest post
    pub fn user_report(&self) -> StoreResult<Vec<UserPostReport>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT user_id, username, post_id, content, created_at, total_likes, total_comments
             FROM user_engagement
             ORDER BY username, created_at DESC, post_id",
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok(UserPostReport {
                    user_id: row.get(0)?,
                    username: row.get(1)?,
                    post_id: row.get(2)?,
                    content: row.get(3)?,
                    created_at: optional_timestamp_column(row, 4)?,
                    total_likes: row.get(5)?,
                    total_comments: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }
}
