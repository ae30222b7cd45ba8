use rusqlite::ffi;
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    /// Unique or primary key violation
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Foreign key violation: the referenced user or post does not exist
    #[error("Referential integrity violation: {0}")]
    ReferentialIntegrity(String),

    /// Not-null or check constraint violation
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Seed record rejected before reaching the database
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Database error: {0}")]
    Database(rusqlite::Error),

    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict(_))
    }

    pub fn is_referential_integrity(&self) -> bool {
        matches!(self, StoreError::ReferentialIntegrity(_))
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        let extended_code = match &err {
            rusqlite::Error::SqliteFailure(failure, _)
                if failure.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                failure.extended_code
            }
            _ => return StoreError::Database(err),
        };

        let message = err.to_string();
        match extended_code {
            ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                StoreError::Conflict(message)
            }
            ffi::SQLITE_CONSTRAINT_FOREIGNKEY => StoreError::ReferentialIntegrity(message),
            ffi::SQLITE_CONSTRAINT_NOTNULL | ffi::SQLITE_CONSTRAINT_CHECK => {
                StoreError::InvalidValue(message)
            }
            _ => StoreError::Database(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn violation(sql: &str) -> StoreError {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             CREATE TABLE parent (id INTEGER PRIMARY KEY, name TEXT UNIQUE NOT NULL);
             CREATE TABLE child (
                 id INTEGER PRIMARY KEY,
                 parent_id INTEGER NOT NULL REFERENCES parent(id),
                 body TEXT NOT NULL CHECK(length(body) > 0)
             );
             INSERT INTO parent (id, name) VALUES (1, 'a');",
        )
        .unwrap();
        conn.execute_batch(sql).unwrap_err().into()
    }

    #[test]
    fn test_unique_violation_is_conflict() {
        let err = violation("INSERT INTO parent (id, name) VALUES (2, 'a')");
        assert!(err.is_conflict(), "got {err:?}");
    }

    #[test]
    fn test_primary_key_violation_is_conflict() {
        let err = violation("INSERT INTO parent (id, name) VALUES (1, 'b')");
        assert!(err.is_conflict(), "got {err:?}");
    }

    #[test]
    fn test_foreign_key_violation_is_referential() {
        let err = violation("INSERT INTO child (parent_id, body) VALUES (99, 'x')");
        assert!(err.is_referential_integrity(), "got {err:?}");
    }

    #[test]
    fn test_not_null_and_check_are_invalid_value() {
        let err = violation("INSERT INTO child (parent_id, body) VALUES (1, NULL)");
        assert!(matches!(err, StoreError::InvalidValue(_)), "got {err:?}");

        let err = violation("INSERT INTO child (parent_id, body) VALUES (1, '')");
        assert!(matches!(err, StoreError::InvalidValue(_)), "got {err:?}");
    }

    #[test]
    fn test_other_errors_pass_through() {
        let err = violation("SELECT * FROM missing_table");
        assert!(matches!(err, StoreError::Database(_)), "got {err:?}");
    }
}
