use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::timestamp::{serde_format, serde_format_opt};

/// One row of the top-engagement listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostEngagement {
    pub post_id: i64,
    pub username: String,
    pub content: String,
    #[serde(with = "serde_format")]
    pub created_at: NaiveDateTime,
    pub total_likes: i64,
    pub total_comments: i64,
}

/// One row of the ranked engagement report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedPost {
    pub post_id: i64,
    pub username: String,
    pub total_likes: i64,
    pub total_comments: i64,
    /// Weighted score: 0.7 per like plus 0.3 per comment
    pub score: f64,
    pub rank: i64,
}

impl RankedPost {
    /// Score in exact tenths, the value ranks are computed from
    pub fn score_tenths(&self) -> i64 {
        engagement_score_tenths(self.total_likes, self.total_comments)
    }
}

/// Engagement score scaled by ten so equal scores compare equal
pub fn engagement_score_tenths(likes: i64, comments: i64) -> i64 {
    7 * likes + 3 * comments
}

/// Engagement score: `0.7 * likes + 0.3 * comments`
pub fn engagement_score(likes: i64, comments: i64) -> f64 {
    engagement_score_tenths(likes, comments) as f64 / 10.0
}

/// One row of the per-user report. Users without posts carry no post columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPostReport {
    pub user_id: i64,
    pub username: String,
    pub post_id: Option<i64>,
    pub content: Option<String>,
    #[serde(with = "serde_format_opt")]
    pub created_at: Option<NaiveDateTime>,
    pub total_likes: i64,
    pub total_comments: i64,
}

/// A post whose cached like counter disagrees with its like rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeCountDrift {
    pub post_id: i64,
    pub cached: i64,
    pub actual: i64,
}

/// Outcome of loading a batch of activity records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadSummary {
    /// Number of source records staged
    pub records: usize,
    pub users_inserted: usize,
    /// Rows whose user identifier was already present
    pub users_skipped: usize,
    pub posts_inserted: usize,
    /// Rows whose post identifier was already present
    pub posts_skipped: usize,
    pub likes_created: usize,
    pub comments_created: usize,
}

/// Row counts of every normalized table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCounts {
    pub users: i64,
    pub posts: i64,
    pub likes: i64,
    pub comments: i64,
    pub staged: i64,
}
