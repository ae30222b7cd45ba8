use rusqlite::{Connection, OptionalExtension, Row};

use engage_types::{format_timestamp, LikeCountDrift, Post};

use super::timestamp_column;
use crate::db::DbPool;
use crate::error::StoreResult;

const POST_COLUMNS: &str = "id, user_id, content, created_at, likes_count";

pub struct PostRepository {
    pool: DbPool,
}

impl PostRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<Post> {
        Ok(Post {
            id: row.get(0)?,
            user_id: row.get(1)?,
            content: row.get(2)?,
            created_at: timestamp_column(row, 3)?,
            likes_count: row.get(4)?,
        })
    }

    /// Create a new post with a zero like counter.
    ///
    /// The counter only moves through like inserts, so `post.likes_count` is ignored.
    pub fn create(&self, post: &Post) -> StoreResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO posts (id, user_id, content, created_at) VALUES (?, ?, ?, ?)",
            (post.id, post.user_id, &post.content, format_timestamp(&post.created_at)),
        )?;
        Ok(())
    }

    /// Insert a post unless its id already exists. Returns `false` when skipped.
    pub fn insert_if_absent(conn: &Connection, post: &Post) -> StoreResult<bool> {
        let inserted = conn.execute(
            "INSERT INTO posts (id, user_id, content, created_at) VALUES (?, ?, ?, ?)
             ON CONFLICT(id) DO NOTHING",
            (post.id, post.user_id, &post.content, format_timestamp(&post.created_at)),
        )?;
        Ok(inserted == 1)
    }

    /// Get a single post by ID
    pub fn get_by_id(&self, post_id: i64) -> StoreResult<Option<Post>> {
        let conn = self.pool.get()?;
        let post = conn
            .query_row(
                &format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?"),
                [post_id],
                Self::map_row,
            )
            .optional()?;
        Ok(post)
    }

    /// Get posts by a specific user, newest first
    pub fn get_by_user(&self, user_id: i64) -> StoreResult<Vec<Post>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE user_id = ? ORDER BY created_at DESC, id"
        ))?;
        let posts = stmt
            .query_map([user_id], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(posts)
    }

    /// Posts whose cached like counter differs from their like rows.
    ///
    /// Empty whenever the counter has been maintained correctly.
    pub fn like_count_drift(&self) -> StoreResult<Vec<LikeCountDrift>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT p.id, p.likes_count, COUNT(l.id) AS actual
             FROM posts p
             LEFT JOIN likes l ON l.post_id = p.id
             GROUP BY p.id
             HAVING p.likes_count <> actual
             ORDER BY p.id",
        )?;
        let drift = stmt
            .query_map([], |row| {
                Ok(LikeCountDrift {
                    post_id: row.get(0)?,
                    cached: row.get(1)?,
                    actual: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(drift)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::UserRepository;
    use crate::db::Database;
    use engage_types::{parse_timestamp, User};

    fn setup() -> (Database, PostRepository) {
        let db = Database::in_memory().expect("Failed to create database");
        db.initialize().expect("Failed to initialize schema");
        UserRepository::new(db.pool.clone())
            .create(&User {
                id: 1,
                username: "johndoe".to_string(),
                email: "john@example.com".to_string(),
            })
            .expect("Failed to create user");
        let repo = PostRepository::new(db.pool.clone());
        (db, repo)
    }

    fn post(id: i64, user_id: i64, at: &str) -> Post {
        Post {
            id,
            user_id,
            content: format!("post {id}"),
            created_at: parse_timestamp(at).unwrap(),
            likes_count: 0,
        }
    }

    #[test]
    fn test_create_and_get() {
        let (_db, repo) = setup();
        let p = post(101, 1, "2023-01-15 10:30:00");
        repo.create(&p).expect("Failed to create post");

        assert_eq!(repo.get_by_id(101).unwrap(), Some(p));
        assert_eq!(repo.get_by_id(102).unwrap(), None);
    }

    #[test]
    fn test_create_ignores_supplied_counter() {
        let (_db, repo) = setup();
        let mut p = post(101, 1, "2023-01-15 10:30:00");
        p.likes_count = 42;
        repo.create(&p).unwrap();

        assert_eq!(repo.get_by_id(101).unwrap().unwrap().likes_count, 0);
    }

    #[test]
    fn test_unknown_owner_is_referential_error() {
        let (_db, repo) = setup();
        let err = repo.create(&post(101, 99, "2023-01-15 10:30:00")).unwrap_err();
        assert!(err.is_referential_integrity(), "got {err:?}");
    }

    #[test]
    fn test_duplicate_id_is_conflict_but_insert_if_absent_skips() {
        let (db, repo) = setup();
        repo.create(&post(101, 1, "2023-01-15 10:30:00")).unwrap();
        let err = repo.create(&post(101, 1, "2023-02-01 00:00:00")).unwrap_err();
        assert!(err.is_conflict(), "got {err:?}");

        let conn = db.connection().unwrap();
        let inserted =
            PostRepository::insert_if_absent(&conn, &post(101, 1, "2023-02-01 00:00:00")).unwrap();
        assert!(!inserted);
    }

    #[test]
    fn test_get_by_user_newest_first() {
        let (_db, repo) = setup();
        repo.create(&post(1, 1, "2023-01-01 00:00:00")).unwrap();
        repo.create(&post(2, 1, "2023-03-01 00:00:00")).unwrap();
        repo.create(&post(3, 1, "2023-02-01 00:00:00")).unwrap();

        let ids: Vec<i64> = repo.get_by_user(1).unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
        assert!(repo.get_by_user(7).unwrap().is_empty());
    }

    #[test]
    fn test_like_count_drift_detects_tampering() {
        let (db, repo) = setup();
        repo.create(&post(101, 1, "2023-01-15 10:30:00")).unwrap();
        assert!(repo.like_count_drift().unwrap().is_empty());

        {
            let conn = db.connection().unwrap();
            conn.execute("UPDATE posts SET likes_count = 3 WHERE id = 101", [])
                .unwrap();
        }

        assert_eq!(
            repo.like_count_drift().unwrap(),
            vec![LikeCountDrift {
                post_id: 101,
                cached: 3,
                actual: 0
            }]
        );
    }
}
