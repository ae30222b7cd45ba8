//! Flat activity loader: stages source rows, normalizes them into users and
//! posts, and expands aggregate counts into individual likes and comments.

use chrono::Datelike;
use rusqlite::{Transaction, TransactionBehavior};
use std::path::Path;

use engage_types::{format_timestamp, ActivityRecord, LoadSummary, NewComment, NewLike};

use crate::db::repositories::{
    insert_comment, insert_like, timestamp_column, PostRepository, UserRepository,
};
use crate::db::DbPool;
use crate::error::{StoreError, StoreResult};
use crate::expand::{comment_text, expand, last_event_at, Expansion};

/// Bundled demonstration dataset
const SAMPLE_ACTIVITY: &str = include_str!("../data/sample_activity.json");

/// Parse a JSON array of activity records from a file
pub fn read_records<P: AsRef<Path>>(path: P) -> StoreResult<Vec<ActivityRecord>> {
    let text = std::fs::read_to_string(path.as_ref())?;
    let records = serde_json::from_str(&text)?;
    Ok(records)
}

/// The bundled sample dataset
pub fn sample_records() -> StoreResult<Vec<ActivityRecord>> {
    Ok(serde_json::from_str(SAMPLE_ACTIVITY)?)
}

/// Years whose stored text sorts in chronological order
const STORABLE_YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

/// Reject records the schema would accept but that carry no usable identity
/// or whose expanded events would fall outside the storable date range
fn validate(record: &ActivityRecord) -> StoreResult<()> {
    if record.username.trim().is_empty() {
        return Err(StoreError::InvalidRecord(format!(
            "post {} has an empty username",
            record.post_id
        )));
    }
    if record.email.trim().is_empty() {
        return Err(StoreError::InvalidRecord(format!(
            "user {} has an empty email",
            record.user_id
        )));
    }

    let span = record.likes.max(record.comments);
    let in_range = STORABLE_YEARS.contains(&record.post_date.year())
        && last_event_at(record.post_date, span)
            .is_some_and(|last| STORABLE_YEARS.contains(&last.year()));
    if !in_range {
        return Err(out_of_range(record));
    }
    Ok(())
}

fn out_of_range(record: &ActivityRecord) -> StoreError {
    StoreError::InvalidRecord(format!(
        "post {} dated {} cannot hold {} likes and {} comments",
        record.post_id, record.post_date, record.likes, record.comments
    ))
}

/// Synthetic events for one aggregate count of a record
fn events(record: &ActivityRecord, count: u32) -> StoreResult<Expansion> {
    expand(record.post_id, record.user_id, count, record.post_date)
        .ok_or_else(|| out_of_range(record))
}

pub struct ActivityLoader {
    pool: DbPool,
}

impl ActivityLoader {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Load a batch of flat records in a single transaction.
    ///
    /// Users and posts are deduplicated by identifier (first occurrence wins,
    /// later duplicates are skipped). Each newly inserted post gets exactly
    /// `likes` likes and `comments` comments, timestamped one second apart
    /// after the post date. Any error rolls the whole batch back.
    pub fn load(&self, records: &[ActivityRecord]) -> StoreResult<LoadSummary> {
        for record in records {
            validate(record)?;
        }

        let mut conn = self.pool.get()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let first_id = Self::stage(&tx, records)?;
        let staged = Self::read_staged(&tx, first_id)?;
        let summary = Self::normalize(&tx, &staged)?;

        tx.commit()?;

        tracing::info!(
            records = summary.records,
            users = summary.users_inserted,
            posts = summary.posts_inserted,
            likes = summary.likes_created,
            comments = summary.comments_created,
            "Activity batch loaded"
        );
        Ok(summary)
    }

    /// Copy records into the staging table. Returns the staging id of the
    /// first row of this batch, or `None` for an empty batch.
    fn stage(tx: &Transaction<'_>, records: &[ActivityRecord]) -> StoreResult<Option<i64>> {
        let mut stmt = tx.prepare(
            "INSERT INTO activity_staging
                 (user_id, username, email, post_id, post_content, post_date, likes, comments)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )?;

        let mut first_id = None;
        for record in records {
            stmt.execute((
                record.user_id,
                &record.username,
                &record.email,
                record.post_id,
                &record.post_content,
                format_timestamp(&record.post_date),
                record.likes,
                record.comments,
            ))?;
            first_id.get_or_insert(tx.last_insert_rowid());
        }

        tracing::debug!(count = records.len(), "Records staged");
        Ok(first_id)
    }

    /// Read back the rows of this batch in arrival order
    fn read_staged(
        tx: &Transaction<'_>,
        first_id: Option<i64>,
    ) -> StoreResult<Vec<ActivityRecord>> {
        let Some(first_id) = first_id else {
            return Ok(Vec::new());
        };

        let mut stmt = tx.prepare(
            "SELECT user_id, username, email, post_id, post_content, post_date, likes, comments
             FROM activity_staging
             WHERE id >= ?
             ORDER BY id",
        )?;
        let staged = stmt
            .query_map([first_id], |row| {
                Ok(ActivityRecord {
                    user_id: row.get(0)?,
                    username: row.get(1)?,
                    email: row.get(2)?,
                    post_id: row.get(3)?,
                    post_content: row.get(4)?,
                    post_date: timestamp_column(row, 5)?,
                    likes: row.get(6)?,
                    comments: row.get(7)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(staged)
    }

    fn normalize(tx: &Transaction<'_>, staged: &[ActivityRecord]) -> StoreResult<LoadSummary> {
        let mut summary = LoadSummary {
            records: staged.len(),
            ..LoadSummary::default()
        };

        for record in staged {
            if UserRepository::insert_if_absent(tx, &record.user())? {
                summary.users_inserted += 1;
            } else {
                tracing::debug!(user_id = record.user_id, "User already present, skipping");
                summary.users_skipped += 1;
            }

            if !PostRepository::insert_if_absent(tx, &record.post())? {
                tracing::warn!(
                    post_id = record.post_id,
                    "Duplicate post identifier, skipping row"
                );
                summary.posts_skipped += 1;
                continue;
            }
            summary.posts_inserted += 1;

            for event in events(record, record.likes)? {
                insert_like(
                    tx,
                    &NewLike {
                        post_id: event.post_id,
                        user_id: event.user_id,
                        liked_at: event.at,
                    },
                )?;
                summary.likes_created += 1;
            }

            for event in events(record, record.comments)? {
                insert_comment(
                    tx,
                    &NewComment {
                        post_id: event.post_id,
                        user_id: event.user_id,
                        content: comment_text(event.ordinal),
                        commented_at: event.at,
                    },
                )?;
                summary.comments_created += 1;
            }

            tracing::debug!(
                post_id = record.post_id,
                likes = record.likes,
                comments = record.comments,
                "Post expanded"
            );
        }

        Ok(summary)
    }
}
