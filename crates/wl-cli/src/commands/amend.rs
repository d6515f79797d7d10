//! Commands that change the most recent entry: `reset` and `edit`.

use std::io::Write;

use anyhow::Result;
use wl_db::{Database, ResetOutcome, UpdateOutcome};

/// Deletes the most recent entry.
pub fn reset<W: Write>(writer: &mut W, db: &mut Database) -> Result<()> {
    match db.reset_last()? {
        ResetOutcome::Reset(id) => writeln!(writer, "Removed entry {id}.")?,
        ResetOutcome::Empty => writeln!(writer, "Nothing to reset.")?,
    }
    Ok(())
}

/// Replaces the description of the most recent entry.
pub fn edit<W: Write>(writer: &mut W, db: &mut Database, comment: &str) -> Result<()> {
    match db.update_last(comment)? {
        UpdateOutcome::Updated(id) => writeln!(writer, "Entry {id} is now: {comment}")?,
        UpdateOutcome::Empty => writeln!(writer, "No entry to edit.")?,
    }
    Ok(())
}
