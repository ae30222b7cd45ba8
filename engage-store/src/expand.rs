//! Synthetic event expansion: turn an aggregate count into that many
//! individually timestamped events.

use chrono::{Duration, NaiveDateTime};

/// One synthetic like or comment derived from an aggregate count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntheticEvent {
    pub post_id: i64,
    pub user_id: i64,
    /// 1-based position within the expansion
    pub ordinal: u32,
    /// `base + ordinal` seconds
    pub at: NaiveDateTime,
}

/// Lazy, finite sequence of synthetic events. Cloning restarts from the
/// clone's current position, so `expand(..).clone()` replays the whole run.
#[derive(Debug, Clone)]
pub struct Expansion {
    post_id: i64,
    user_id: i64,
    base: NaiveDateTime,
    emitted: u32,
    count: u32,
}

/// Expand `count` events for a post, timestamped one second apart after `base`.
///
/// Returns `None` when the last event's timestamp is not representable.
pub fn expand(post_id: i64, user_id: i64, count: u32, base: NaiveDateTime) -> Option<Expansion> {
    last_event_at(base, count)?;
    Some(Expansion {
        post_id,
        user_id,
        base,
        emitted: 0,
        count,
    })
}

/// Timestamp of the final event of a `count`-long expansion from `base`
pub fn last_event_at(base: NaiveDateTime, count: u32) -> Option<NaiveDateTime> {
    base.checked_add_signed(Duration::seconds(i64::from(count)))
}

/// Placeholder text for the comment at `ordinal`
pub fn comment_text(ordinal: u32) -> String {
    format!("This is comment {ordinal}")
}

impl Iterator for Expansion {
    type Item = SyntheticEvent;

    fn next(&mut self) -> Option<Self::Item> {
        if self.emitted >= self.count {
            return None;
        }
        let ordinal = self.emitted + 1;
        let at = last_event_at(self.base, ordinal)?;
        self.emitted = ordinal;

        Some(SyntheticEvent {
            post_id: self.post_id,
            user_id: self.user_id,
            ordinal,
            at,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.count - self.emitted) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Expansion {}
