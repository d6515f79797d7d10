//! Work entries and their derived fields.

use chrono::{DateTime, Local, NaiveDate, Utc};

/// A recorded work interval as stored.
///
/// An entry without `end` is still running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: i64,
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
    pub comment: String,
}

impl Entry {
    /// Returns true while the entry has no end time.
    pub const fn is_open(&self) -> bool {
        self.end.is_none()
    }

    /// Computes the derived fields as of `now`.
    ///
    /// Open entries are measured up to `now`, so their duration grows
    /// between calls. The date is the local calendar date of `start`.
    pub fn measure(self, now: DateTime<Utc>) -> TimedEntry {
        let unfinished = self.is_open();
        let until = self.end.unwrap_or(now);
        let duration = until.signed_duration_since(self.start).num_seconds();
        let date = self.start.with_timezone(&Local).date_naive();
        TimedEntry {
            unfinished,
            entry: self,
            duration,
            date,
        }
    }
}

/// An entry together with the values derived from it at query time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedEntry {
    pub entry: Entry,
    /// Elapsed seconds, up to the query time for open entries.
    pub duration: i64,
    pub unfinished: bool,
    pub date: NaiveDate,
}

impl TimedEntry {
    pub const fn id(&self) -> i64 {
        self.entry.id
    }

    pub fn comment(&self) -> &str {
        &self.entry.comment
    }
}
