//! Core domain logic for the work log.
//!
//! This crate contains the fundamental types and logic for:
//! - Entries: open and closed work intervals with derived durations
//! - Time expressions: resolving user input like "monday" or "3 days ago"
//! - Filtering, per-day aggregation and text rendering of entries

pub mod duration;
mod entry;
pub mod query;
pub mod render;
mod subject;
pub mod summary;
pub mod when;

pub use duration::format_hhmm;
pub use entry::{Entry, TimedEntry};
pub use query::Query;
pub use render::{render_listing, render_sums};
pub use subject::SubjectFilter;
pub use summary::sum_by_day;
pub use when::{TimeError, TimeParser, TimeStrategy};
