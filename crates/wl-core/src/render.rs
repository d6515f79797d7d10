//! Plain-text rendering of entry listings and daily sums.

use std::collections::BTreeMap;
use std::fmt::Write;

use chrono::NaiveDate;

use crate::{TimedEntry, format_hhmm};

/// Renders one line per entry followed by a `Total:` line.
///
/// Running entries are marked `(still running)`, finished ones show their id.
/// With `show_date`, each line starts with the entry's date.
pub fn render_listing(entries: &[TimedEntry], show_date: bool) -> String {
    let mut output = String::new();
    for entry in entries {
        if show_date {
            write!(output, "{}: ", entry.date).unwrap();
        }
        let duration = format_hhmm(Some(entry.duration));
        if entry.unfinished {
            write!(output, "{duration} (still running)").unwrap();
        } else {
            // Padded to the width of "(still running)".
            write!(output, "{duration} (id: {:<9})", entry.id()).unwrap();
        }
        writeln!(output, " - {}", entry.comment()).unwrap();
    }
    let total: i64 = entries.iter().map(|e| e.duration).sum();
    write!(output, "Total: {}", format_hhmm(Some(total))).unwrap();
    output
}

/// Renders `<date>: HH:MM` lines in date order.
pub fn render_sums(day_sums: &BTreeMap<NaiveDate, i64>) -> String {
    day_sums
        .iter()
        .map(|(date, seconds)| format!("{date}: {}", format_hhmm(Some(*seconds))))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{TimeZone, Utc};
    use insta::assert_snapshot;

    use crate::Entry;

    fn timed(id: i64, day: u32, duration: i64, unfinished: bool, comment: &str) -> TimedEntry {
        TimedEntry {
            entry: Entry {
                id,
                start: Utc.with_ymd_and_hms(2025, 3, day, 12, 0, 0).unwrap(),
                end: None,
                comment: comment.to_string(),
            },
            duration,
            unfinished,
            date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
        }
    }

    #[test]
    fn listing_without_dates() {
        let entries = vec![
            timed(7, 3, 90, false, "write spec"),
            timed(12, 3, 3600, false, "review"),
            timed(13, 3, 1200, true, "fix bug in parser"),
        ];

        assert_snapshot!(render_listing(&entries, false), @r"
        00:02 (id: 7        ) - write spec
        01:00 (id: 12       ) - review
        00:20 (still running) - fix bug in parser
        Total: 01:22
        ");
    }

    #[test]
    fn listing_with_dates() {
        let entries = vec![
            timed(1, 3, 1800, false, "standup"),
            timed(2, 4, 45, false, "email"),
        ];

        assert_snapshot!(render_listing(&entries, true), @r"
        2025-03-03: 00:30 (id: 1        ) - standup
        2025-03-04: 00:01 (id: 2        ) - email
        Total: 00:31
        ");
    }

    #[test]
    fn empty_listing_has_only_total() {
        assert_eq!(render_listing(&[], true), "Total: 00:00");
    }

    #[test]
    fn sums_one_line_per_day() {
        let mut sums = BTreeMap::new();
        sums.insert(NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(), 7200);
        sums.insert(NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(), 90);

        assert_snapshot!(render_sums(&sums), @r"
        2025-03-03: 00:02
        2025-03-04: 02:00
        ");
    }

    #[test]
    fn no_sums_render_empty() {
        assert_eq!(render_sums(&BTreeMap::new()), "");
    }
}
