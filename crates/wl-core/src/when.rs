//! Resolution of user-supplied time expressions.
//!
//! A [`TimeParser`] tries an ordered list of [`TimeStrategy`] implementations
//! and takes the first that understands the input:
//!
//! 1. [`Today`]: the literal `now`, meaning the start of the current day
//! 2. [`Calendar`]: ISO dates, `DD.MM.YYYY`, clock times, weekday names
//! 3. `English`: relative phrases like "3 days ago" (cargo feature `english`)
//!
//! Whatever strategy matched, a result in the future is moved back by whole
//! weeks until it is not, so "monday" means the most recent Monday.

use chrono::{
    DateTime, Datelike, Duration, Local, LocalResult, NaiveDate, NaiveDateTime, NaiveTime,
    TimeZone, Weekday,
};
use thiserror::Error;

/// Failure to resolve a time expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeError {
    #[error("could not understand time expression '{0}'")]
    Unparseable(String),
}

/// One way of turning text into a point in time.
pub trait TimeStrategy {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Resolves `input` relative to `now`, or returns `None` if the input is
    /// not in this strategy's grammar.
    fn try_parse(&self, input: &str, now: DateTime<Local>) -> Option<DateTime<Local>>;

    /// Whether this strategy understands free-form relative phrases.
    fn is_natural_language(&self) -> bool {
        false
    }
}

/// Resolves `now` to midnight of the current day.
#[derive(Debug, Clone, Copy, Default)]
pub struct Today;

impl TimeStrategy for Today {
    fn name(&self) -> &'static str {
        "today"
    }

    fn try_parse(&self, input: &str, now: DateTime<Local>) -> Option<DateTime<Local>> {
        if input.trim().eq_ignore_ascii_case("now") {
            local_midnight(now.date_naive())
        } else {
            None
        }
    }
}

/// Absolute dates, clock times and weekday names.
///
/// Inputs without a time of day resolve to midnight. Weekday names resolve to
/// the next such day, today included.
#[derive(Debug, Clone, Copy, Default)]
pub struct Calendar;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%d.%m.%Y %H:%M",
    "%d/%m/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y"];

const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M"];

impl TimeStrategy for Calendar {
    fn name(&self) -> &'static str {
        "calendar"
    }

    fn try_parse(&self, input: &str, now: DateTime<Local>) -> Option<DateTime<Local>> {
        let input = input.trim();
        let today = now.date_naive();

        match input.to_ascii_lowercase().as_str() {
            "today" => return local_midnight(today),
            "yesterday" => return local_midnight(today - Duration::days(1)),
            _ => {}
        }

        if let Ok(weekday) = input.parse::<Weekday>() {
            let ahead = (7 + weekday.num_days_from_monday() - today.weekday().num_days_from_monday())
                % 7;
            return local_midnight(today + Duration::days(i64::from(ahead)));
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
            return Some(dt.with_timezone(&Local));
        }

        for format in DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
                return localize(naive);
            }
        }

        for format in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(input, format) {
                return local_midnight(date);
            }
        }

        for format in TIME_FORMATS {
            if let Ok(time) = NaiveTime::parse_from_str(input, format) {
                return localize(today.and_time(time));
            }
        }

        None
    }
}

/// Natural-language expressions via `chrono-english`.
///
/// Expressions without an explicit time of day are truncated to midnight.
#[cfg(feature = "english")]
#[derive(Clone, Copy)]
pub struct English {
    dialect: chrono_english::Dialect,
}

#[cfg(feature = "english")]
impl Default for English {
    fn default() -> Self {
        Self {
            dialect: chrono_english::Dialect::Uk,
        }
    }
}

#[cfg(feature = "english")]
impl TimeStrategy for English {
    fn name(&self) -> &'static str {
        "english"
    }

    fn try_parse(&self, input: &str, now: DateTime<Local>) -> Option<DateTime<Local>> {
        let parsed = chrono_english::parse_date_string(input.trim(), now, self.dialect).ok()?;
        if mentions_time_of_day(input) {
            Some(parsed)
        } else {
            local_midnight(parsed.date_naive())
        }
    }

    fn is_natural_language(&self) -> bool {
        true
    }
}

#[cfg_attr(not(feature = "english"), allow(dead_code))]
const TIME_UNITS: &[&str] = &[
    "h", "hr", "hrs", "hour", "hours", "m", "min", "mins", "minute", "minutes", "s", "sec", "secs",
    "second", "seconds", "noon",
];

/// Heuristic for whether a phrase pins a time of day ("8pm", "10:30",
/// "2 hours ago") rather than just a date.
#[cfg_attr(not(feature = "english"), allow(dead_code))]
fn mentions_time_of_day(input: &str) -> bool {
    input
        .split_whitespace()
        .map(str::to_ascii_lowercase)
        .any(|word| {
            if word.contains(':') || TIME_UNITS.contains(&word.as_str()) {
                return true;
            }
            let digits = word
                .strip_suffix("am")
                .or_else(|| word.strip_suffix("pm"));
            digits.is_some_and(|d| !d.is_empty() && d.chars().all(|c| c.is_ascii_digit()))
                || word == "am"
                || word == "pm"
        })
}

/// Ordered list of time strategies; the first match wins.
pub struct TimeParser {
    strategies: Vec<Box<dyn TimeStrategy>>,
}

impl Default for TimeParser {
    fn default() -> Self {
        let mut strategies: Vec<Box<dyn TimeStrategy>> = vec![Box::new(Today), Box::new(Calendar)];
        #[cfg(feature = "english")]
        strategies.push(Box::new(English::default()));
        Self { strategies }
    }
}

impl TimeParser {
    /// Creates a parser with every strategy this build supports.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser from an explicit strategy list, tried in order.
    pub fn with_strategies(strategies: Vec<Box<dyn TimeStrategy>>) -> Self {
        Self { strategies }
    }

    /// Whether a natural-language strategy is registered.
    pub fn has_natural_language(&self) -> bool {
        self.strategies.iter().any(|s| s.is_natural_language())
    }

    /// Resolves `input` relative to the current time.
    pub fn parse(&self, input: &str) -> Result<DateTime<Local>, TimeError> {
        self.parse_at(input, Local::now())
    }

    /// Resolves `input` relative to `now`.
    pub fn parse_at(&self, input: &str, now: DateTime<Local>) -> Result<DateTime<Local>, TimeError> {
        for strategy in &self.strategies {
            if let Some(resolved) = strategy.try_parse(input, now) {
                tracing::debug!(input, strategy = strategy.name(), %resolved, "parsed time expression");
                return Ok(not_after(resolved, now));
            }
        }
        Err(TimeError::Unparseable(input.to_string()))
    }
}

/// Moves `resolved` back by whole weeks until it is not later than `now`.
fn not_after(resolved: DateTime<Local>, now: DateTime<Local>) -> DateTime<Local> {
    if resolved <= now {
        return resolved;
    }
    let week = Duration::weeks(1).num_seconds();
    let ahead = resolved.signed_duration_since(now).num_seconds();
    let weeks = (ahead + week - 1) / week;
    let shifted = resolved.naive_local() - Duration::weeks(weeks);
    match localize(shifted) {
        Some(dt) if dt <= now => dt,
        Some(dt) => dt - Duration::weeks(1),
        None => resolved - Duration::weeks(weeks),
    }
}

/// Converts a local wall-clock time to an instant.
/// Ambiguous times (DST fall-back) use the earlier instant; times inside a
/// spring-forward gap move one hour later.
fn localize(naive: NaiveDateTime) -> Option<DateTime<Local>> {
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Some(dt),
        LocalResult::None => Local
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest(),
    }
}

fn local_midnight(date: NaiveDate) -> Option<DateTime<Local>> {
    localize(date.and_time(NaiveTime::MIN))
}
