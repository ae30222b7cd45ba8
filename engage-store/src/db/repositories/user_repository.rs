use rusqlite::{Connection, OptionalExtension, Row};

use engage_types::User;

use crate::db::DbPool;
use crate::error::StoreResult;

const USER_COLUMNS: &str = "id, username, email";

pub struct UserRepository {
    pool: DbPool,
}

impl UserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<User> {
        Ok(User {
            id: row.get(0)?,
            username: row.get(1)?,
            email: row.get(2)?,
        })
    }

    /// Create a new user. A taken id, username or email is a conflict.
    pub fn create(&self, user: &User) -> StoreResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO users (id, username, email) VALUES (?, ?, ?)",
            (user.id, &user.username, &user.email),
        )?;
        Ok(())
    }

    /// Insert a user unless its id already exists.
    ///
    /// Returns `false` when the id was present (the stored row is left as is).
    /// A username or email owned by a different id is still a conflict.
    pub fn insert_if_absent(conn: &Connection, user: &User) -> StoreResult<bool> {
        let inserted = conn.execute(
            "INSERT INTO users (id, username, email) VALUES (?, ?, ?)
             ON CONFLICT(id) DO NOTHING",
            (user.id, &user.username, &user.email),
        )?;
        Ok(inserted == 1)
    }

    /// Get user by ID
    pub fn get_by_id(&self, user_id: i64) -> StoreResult<Option<User>> {
        let conn = self.pool.get()?;
        let user = conn
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"),
                [user_id],
                Self::map_row,
            )
            .optional()?;
        Ok(user)
    }

    /// Get user by username
    pub fn get_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let conn = self.pool.get()?;
        let user = conn
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?"),
                [username],
                Self::map_row,
            )
            .optional()?;
        Ok(user)
    }

    /// Get all users ordered by username
    pub fn list_all(&self) -> StoreResult<Vec<User>> {
        let conn = self.pool.get()?;
        let mut stmt =
            conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY username"))?;
        let users = stmt
            .query_map([], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }
}
