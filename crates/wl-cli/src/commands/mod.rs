//! CLI subcommand implementations.

pub mod amend;
pub mod report;
pub mod track;
