//! Per-day aggregation of entry durations.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::TimedEntry;

/// Sums durations by the local date each entry started on.
///
/// The map iterates in chronological order.
pub fn sum_by_day<I>(entries: I) -> BTreeMap<NaiveDate, i64>
where
    I: IntoIterator<Item = TimedEntry>,
{
    let mut sums = BTreeMap::new();
    for entry in entries {
        *sums.entry(entry.date).or_insert(0) += entry.duration;
    }
    sums
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{TimeZone, Utc};

    use crate::Entry;

    fn timed(id: i64, date: NaiveDate, duration: i64) -> TimedEntry {
        TimedEntry {
            entry: Entry {
                id,
                start: Utc.timestamp_opt(0, 0).unwrap(),
                end: None,
                comment: String::new(),
            },
            duration,
            unfinished: false,
            date,
        }
    }

    #[test]
    fn empty_input_gives_empty_map() {
        assert!(sum_by_day(Vec::new()).is_empty());
    }

    #[test]
    fn sums_per_date_in_date_order() {
        let mar_2 = NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();
        let mar_1 = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let sums = sum_by_day(vec![
            timed(1, mar_2, 60),
            timed(2, mar_1, 30),
            timed(3, mar_2, 120),
        ]);

        let collected: Vec<_> = sums.into_iter().collect();
        assert_eq!(collected, vec![(mar_1, 30), (mar_2, 180)]);
    }
}
