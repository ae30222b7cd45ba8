use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use std::path::Path;
use std::time::Duration;

use engage_types::TableCounts;

use super::schema::SCHEMA;
use crate::error::StoreResult;

/// SQLite in-memory database identifier
const MEMORY_DB_PATH: &str = ":memory:";

/// How long a connection waits on a locked database before failing
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConnection = PooledConnection<SqliteConnectionManager>;

/// Database wrapper with connection pooling support
#[derive(Clone)]
pub struct Database {
    pub pool: DbPool,
}

impl Database {
    /// Create a new database connection pool
    ///
    /// Every pooled connection enforces foreign keys. An in-memory database is
    /// private to its connection, so its pool holds exactly one.
    pub fn new<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let in_memory = Self::is_memory_path(path.as_ref());
        let manager = Self::create_connection_manager(path, in_memory);

        let mut builder = Pool::builder();
        if in_memory {
            builder = builder.max_size(1);
        }
        let pool = builder.build(manager)?;

        tracing::debug!(in_memory, "Database pool created");
        Ok(Self { pool })
    }

    fn is_memory_path(path: &Path) -> bool {
        path.to_string_lossy()
            .trim()
            .eq_ignore_ascii_case(MEMORY_DB_PATH)
    }

    /// Create appropriate connection manager based on path
    ///
    /// # Arguments
    /// * `path` - Database file path or ":memory:" for in-memory database
    /// * `in_memory` - Whether `path` names the in-memory database
    fn create_connection_manager<P: AsRef<Path>>(
        path: P,
        in_memory: bool,
    ) -> SqliteConnectionManager {
        let manager = if in_memory {
            SqliteConnectionManager::memory()
        } else {
            SqliteConnectionManager::file(path)
        };
        manager.with_init(|conn| {
            conn.pragma_update(None, "foreign_keys", true)?;
            conn.busy_timeout(BUSY_TIMEOUT)
        })
    }

    /// Create an in-memory database pool (useful for testing)
    pub fn in_memory() -> StoreResult<Self> {
        Self::new(MEMORY_DB_PATH)
    }

    /// Initialize the database schema. Safe to run on an existing database.
    pub fn initialize(&self) -> StoreResult<()> {
        let conn = self.connection()?;
        conn.execute_batch(SCHEMA)?;
        tracing::debug!("Database schema initialized");
        Ok(())
    }

    /// Get a connection from the pool
    pub fn connection(&self) -> StoreResult<DbConnection> {
        Ok(self.pool.get()?)
    }

    /// Count the rows of every table
    pub fn table_counts(&self) -> StoreResult<TableCounts> {
        let conn = self.connection()?;
        let counts = conn.query_row(
            "SELECT (SELECT COUNT(*) FROM users),
                    (SELECT COUNT(*) FROM posts),
                    (SELECT COUNT(*) FROM likes),
                    (SELECT COUNT(*) FROM comments),
                    (SELECT COUNT(*) FROM activity_staging)",
            [],
            |row| {
                Ok(TableCounts {
                    users: row.get(0)?,
                    posts: row.get(1)?,
                    likes: row.get(2)?,
                    comments: row.get(3)?,
                    staged: row.get(4)?,
                })
            },
        )?;
        Ok(counts)
    }
}
