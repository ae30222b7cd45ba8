use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::timestamp::serde_format;

/// One flat row of the source dataset: a post with aggregate engagement counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub post_id: i64,
    #[serde(alias = "content")]
    pub post_content: String,
    #[serde(with = "serde_format")]
    pub post_date: NaiveDateTime,
    #[serde(alias = "like_count")]
    pub likes: u32,
    #[serde(alias = "comment_count")]
    pub comments: u32,
}

impl ActivityRecord {
    /// The user identity carried by this row
    pub fn user(&self) -> User {
        User {
            id: self.user_id,
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }

    /// The post carried by this row, before any likes are recorded
    pub fn post(&self) -> Post {
        Post {
            id: self.post_id,
            user_id: self.user_id,
            content: self.post_content.clone(),
            created_at: self.post_date,
            likes_count: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub user_id: i64,
    pub content: String,
    #[serde(with = "serde_format")]
    pub created_at: NaiveDateTime,
    /// Cached number of likes, maintained on every like insert
    #[serde(default)]
    pub likes_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    pub id: i64,
    pub post_id: i64,
    pub user_id: i64,
    #[serde(with = "serde_format")]
    pub liked_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub user_id: i64,
    pub content: String,
    #[serde(with = "serde_format")]
    pub commented_at: NaiveDateTime,
}

/// A like about to be inserted; the id is assigned by the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLike {
    pub post_id: i64,
    pub user_id: i64,
    pub liked_at: NaiveDateTime,
}

/// A comment about to be inserted; the id is assigned by the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub post_id: i64,
    pub user_id: i64,
    pub content: String,
    pub commented_at: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_record_from_seed_json() {
        let json = r#"{
            "user_id": 1,
            "username": "johndoe",
            "email": "john@example.com",
            "post_id": 101,
            "post_content": "Hello world",
            "post_date": "2023-01-15 10:30:00",
            "likes": 5,
            "comments": 3
        }"#;

        let record: ActivityRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.user_id, 1);
        assert_eq!(record.post_id, 101);
        assert_eq!(record.likes, 5);
        assert_eq!(record.comments, 3);
        assert_eq!(record.post().likes_count, 0);
        assert_eq!(record.user().username, "johndoe");
    }

    #[test]
    fn test_activity_record_accepts_count_aliases() {
        let json = r#"{
            "user_id": 2,
            "username": "janedoe",
            "email": "jane@example.com",
            "post_id": 102,
            "content": "Another post",
            "post_date": "2023-01-16T08:00:00",
            "like_count": 0,
            "comment_count": 7
        }"#;

        let record: ActivityRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.post_content, "Another post");
        assert_eq!(record.likes, 0);
        assert_eq!(record.comments, 7);
    }

    #[test]
    fn test_negative_counts_are_rejected() {
        let json = r#"{
            "user_id": 2, "username": "a", "email": "a@b.c", "post_id": 1,
            "post_content": "x", "post_date": "2023-01-16 08:00:00",
            "likes": -1, "comments": 0
        }"#;

        assert!(serde_json::from_str::<ActivityRecord>(json).is_err());
    }

    #[test]
    fn test_post_serializes_storage_timestamp() {
        let record: ActivityRecord = serde_json::from_str(
            r#"{"user_id": 1, "username": "u", "email": "e", "post_id": 9,
                "post_content": "c", "post_date": "2023-01-15T10:30:00",
                "likes": 1, "comments": 1}"#,
        )
        .unwrap();

        let value = serde_json::to_value(record.post()).unwrap();
        assert_eq!(value["created_at"], "2023-01-15 10:30:00");
    }
}
