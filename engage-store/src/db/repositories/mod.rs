mod user_repository;
mod post_repository;
mod like_repository;
mod comment_repository;
mod report_repository;

pub use user_repository::UserRepository;
pub use post_repository::PostRepository;
pub use like_repository::{insert_like, LikeRepository};
pub use comment_repository::{insert_comment, CommentRepository};
pub use report_repository::ReportRepository;

use chrono::NaiveDateTime;
use rusqlite::{types::Type, Row};

/// Read a stored timestamp column, surfacing malformed text as a conversion error
pub(crate) fn timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDateTime> {
    let text: String = row.get(idx)?;
    engage_types::parse_timestamp(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn optional_timestamp_column(
    row: &Row<'_>,
    idx: usize,
) -> rusqlite::Result<Option<NaiveDateTime>> {
    let text: Option<String> = row.get(idx)?;
    text.map(|text| {
        engage_types::parse_timestamp(&text)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}
