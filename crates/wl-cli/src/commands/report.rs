//! Reporting commands: `today`, `sum`, `since` and `done`.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use wl_core::{Query, SubjectFilter, TimeParser, render_listing, render_sums, sum_by_day};
use wl_db::Database;

const NO_NATURAL_LANGUAGE_HINT: &str =
    "hint: relative dates like '3 days ago' need the `english` feature, which this build lacks";

/// Resolves a since-expression to an instant.
///
/// When resolution fails and `parser` has no natural-language strategy, a
/// hint is written to `hints` before the error is returned.
pub fn resolve_since<E: Write>(
    hints: &mut E,
    parser: &TimeParser,
    expr: &str,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>> {
    match parser.parse_at(expr, now.with_timezone(&Local)) {
        Ok(resolved) => Ok(resolved.with_timezone(&Utc)),
        Err(err) => {
            if !parser.has_natural_language() {
                writeln!(hints, "{NO_NATURAL_LANGUAGE_HINT}")?;
            }
            Err(err.into())
        }
    }
}

/// Lists entries started today, without dates.
pub fn today<W: Write>(
    writer: &mut W,
    db: &Database,
    parser: &TimeParser,
    now: DateTime<Utc>,
) -> Result<()> {
    let since = parser
        .parse_at("now", now.with_timezone(&Local))?
        .with_timezone(&Utc);
    let entries: Vec<_> = db
        .entries_since_at(since, &SubjectFilter::default(), now)?
        .collect();
    writeln!(writer, "{}", render_listing(&entries, false))?;
    Ok(())
}

/// Shows time per day over all entries.
pub fn sum<W: Write>(writer: &mut W, db: &Database, now: DateTime<Utc>) -> Result<()> {
    write_sums(writer, db, DateTime::<Utc>::UNIX_EPOCH, now)
}

/// Shows time per day since a time expression.
pub fn since<W: Write, E: Write>(
    writer: &mut W,
    hints: &mut E,
    db: &Database,
    parser: &TimeParser,
    expr: &str,
    now: DateTime<Utc>,
) -> Result<()> {
    let since = resolve_since(hints, parser, expr, now)?;
    write_sums(writer, db, since, now)
}

/// Lists entries matching a `done` query, with dates.
pub fn done<W: Write, E: Write>(
    writer: &mut W,
    hints: &mut E,
    db: &Database,
    parser: &TimeParser,
    query: &Query,
    now: DateTime<Utc>,
) -> Result<()> {
    let since = match query.since.as_deref() {
        Some(expr) => resolve_since(hints, parser, expr, now)?,
        None => DateTime::<Utc>::UNIX_EPOCH,
    };
    let entries: Vec<_> = db
        .entries_since_at(since, &query.subject_filter(), now)?
        .collect();
    writeln!(writer, "{}", render_listing(&entries, true))?;
    Ok(())
}

fn write_sums<W: Write>(
    writer: &mut W,
    db: &Database,
    since: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<()> {
    let sums = sum_by_day(db.entries_since_at(since, &SubjectFilter::default(), now)?);
    if sums.is_empty() {
        writeln!(writer, "No entries recorded.")?;
    } else {
        writeln!(writer, "{}", render_sums(&sums))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{Duration, TimeZone};
    use insta::assert_snapshot;
    use wl_core::{TimeError, TimeStrategy};
    use wl_core::when::{Calendar, Today};

    // Noon local time on a Wednesday.
    fn noon() -> DateTime<Utc> {
        Local
            .with_ymd_and_hms(2025, 3, 12, 12, 0, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn seeded() -> Database {
        let mut db = Database::open_in_memory().unwrap();
        let monday = noon() - Duration::days(2);
        db.create_at("fix bug in parser", monday).unwrap();
        db.close_existing_at(monday + Duration::minutes(45)).unwrap();
        db.create_at("write docs", monday + Duration::hours(1))
            .unwrap();
        db.close_existing_at(monday + Duration::hours(2)).unwrap();

        let start = noon() - Duration::hours(2);
        db.create_at("write spec", start).unwrap();
        db.close_existing_at(start + Duration::seconds(90)).unwrap();
        db.create_at("review parser bug", noon() - Duration::minutes(30))
            .unwrap();
        db
    }

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> Result<()>,
    {
        let mut output = Vec::new();
        f(&mut output).unwrap();
        let monday = (noon() - Duration::days(2)).with_timezone(&Local).date_naive();
        let today = noon().with_timezone(&Local).date_naive();
        String::from_utf8(output)
            .unwrap()
            .replace(&monday.to_string(), "[MONDAY]")
            .replace(&today.to_string(), "[TODAY]")
    }

    #[test]
    fn today_lists_only_todays_entries() {
        let db = seeded();
        let parser = TimeParser::new();
        let output = render(|w| today(w, &db, &parser, noon()));
        assert_snapshot!(output, @r"
        00:02 (id: 3        ) - write spec
        00:30 (still running) - review parser bug
        Total: 00:32
        ");
    }

    #[test]
    fn sum_covers_every_day() {
        let db = seeded();
        let output = render(|w| sum(w, &db, noon()));
        assert_snapshot!(output, @r"
        [MONDAY]: 01:45
        [TODAY]: 00:32
        ");
    }

    #[test]
    fn sum_on_empty_store() {
        let db = Database::open_in_memory().unwrap();
        let output = render(|w| sum(w, &db, noon()));
        assert_eq!(output, "No entries recorded.\n");
    }

    #[test]
    fn since_weekday_limits_days() {
        let db = seeded();
        let parser = TimeParser::new();
        let output = render(|w| since(w, &mut Vec::new(), &db, &parser, "tuesday", noon()));
        assert_snapshot!(output, @"[TODAY]: 00:32");
    }

    #[test]
    fn done_filters_by_subject() {
        let db = seeded();
        let parser = TimeParser::new();
        let query = Query::parse(&["on", "parser"]);
        let output = render(|w| done(w, &mut Vec::new(), &db, &parser, &query, noon()));
        assert_snapshot!(output, @r"
        [MONDAY]: 00:45 (id: 1        ) - fix bug in parser
        [TODAY]: 00:30 (still running) - review parser bug
        Total: 01:15
        ");
    }

    #[test]
    fn done_with_since_and_subject() {
        let db = seeded();
        let parser = TimeParser::new();
        let query = Query::parse(&["since", "now", "on", "write"]);
        let output = render(|w| done(w, &mut Vec::new(), &db, &parser, &query, noon()));
        assert_snapshot!(output, @r"
        [TODAY]: 00:02 (id: 3        ) - write spec
        Total: 00:02
        ");
    }

    /// Stands in for a natural-language strategy that understands nothing.
    struct Mute;

    impl TimeStrategy for Mute {
        fn name(&self) -> &'static str {
            "mute"
        }

        fn try_parse(&self, _input: &str, _now: DateTime<Local>) -> Option<DateTime<Local>> {
            None
        }

        fn is_natural_language(&self) -> bool {
            true
        }
    }

    #[test]
    fn unparseable_since_is_an_error() {
        let db = seeded();
        let parser = TimeParser::with_strategies(vec![Box::new(Today), Box::new(Calendar)]);
        let mut hints = Vec::new();
        let err = since(&mut Vec::new(), &mut hints, &db, &parser, "3 days ago", noon())
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<TimeError>(),
            Some(&TimeError::Unparseable("3 days ago".to_string()))
        );
        assert_eq!(
            String::from_utf8(hints).unwrap(),
            format!("{NO_NATURAL_LANGUAGE_HINT}\n")
        );
    }

    #[test]
    fn no_hint_when_natural_language_is_available() {
        let db = seeded();
        let parser =
            TimeParser::with_strategies(vec![Box::new(Today), Box::new(Calendar), Box::new(Mute)]);
        let mut hints = Vec::new();
        let query = Query::parse(&["since", "the", "day", "after", "never"]);
        let err = done(&mut Vec::new(), &mut hints, &db, &parser, &query, noon()).unwrap_err();
        assert!(err.downcast_ref::<TimeError>().is_some());
        assert!(hints.is_empty());
    }

    #[test]
    fn no_hint_when_the_expression_parses() {
        let db = seeded();
        let parser = TimeParser::with_strategies(vec![Box::new(Today), Box::new(Calendar)]);
        let mut hints = Vec::new();
        since(&mut Vec::new(), &mut hints, &db, &parser, "monday", noon()).unwrap();
        assert!(hints.is_empty());
    }
}
