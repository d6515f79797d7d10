//! Duration formatting.

/// Formats elapsed seconds as `HH:MM`, rounded to the nearest minute.
///
/// Half a minute rounds up. Missing and negative values are shown as `00:00`.
/// Hours are zero-padded to two digits but never truncated.
pub fn format_hhmm(seconds: Option<i64>) -> String {
    let seconds = seconds.unwrap_or(0).max(0);
    let total_minutes = seconds.saturating_add(30) / 60;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    format!("{hours:02}:{minutes:02}")
}
