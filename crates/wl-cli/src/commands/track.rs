//! Commands that start and stop work: `on`, `over` and `resume`.

use std::io::Write;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use wl_db::Database;

use crate::prompt::Prompt;

/// Question asked by `on --ask`.
pub const ASK_QUESTION: &str = "What are you working on?";

/// Obtains the description for `on --ask`.
pub fn ask_comment<P: Prompt>(prompt: &mut P) -> Result<String> {
    let answer = prompt
        .ask(ASK_QUESTION)
        .context("failed to read task description")?;
    if answer.is_empty() {
        bail!("no task description given");
    }
    Ok(answer)
}

/// Ends running entries and starts a new one.
pub fn on<W: Write>(
    writer: &mut W,
    db: &mut Database,
    comment: &str,
    now: DateTime<Utc>,
) -> Result<()> {
    db.close_existing_at(now)?;
    db.create_at(comment, now)?;
    writeln!(writer, "Working on: {comment}")?;
    Ok(())
}

/// Ends running entries.
pub fn over<W: Write>(writer: &mut W, db: &mut Database, now: DateTime<Utc>) -> Result<()> {
    match db.close_existing_at(now)? {
        0 => writeln!(writer, "Nothing was running.")?,
        1 => writeln!(writer, "Stopped 1 running entry.")?,
        n => writeln!(writer, "Stopped {n} running entries.")?,
    }
    Ok(())
}

/// Ends running entries and starts again on entry `id`, or the latest one.
pub fn resume<W: Write>(
    writer: &mut W,
    db: &mut Database,
    id: Option<i64>,
    now: DateTime<Utc>,
) -> Result<()> {
    db.close_existing_at(now)?;
    let comment = db.resume_at(id, now)?;
    writeln!(writer, "Resumed: {comment}")?;
    Ok(())
}
