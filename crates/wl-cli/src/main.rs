use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use wl_cli::commands::{amend, report, track};
use wl_cli::prompt::StdinPrompt;
use wl_cli::{Cli, Commands, Config};
use wl_core::{Query, TimeParser};

/// Load config and open database, ensuring the parent directory exists.
fn open_database(config_path: Option<&Path>) -> Result<(wl_db::Database, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let db = wl_db::Database::open(&config.database_path).context("failed to open database")?;
    Ok((db, config))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let (mut db, _config) = open_database(cli.config.as_deref())?;
    let parser = TimeParser::new();
    let now = Utc::now();
    let mut stdout = io::stdout().lock();

    match &cli.command {
        Some(Commands::On { ask, text }) => {
            let comment = if *ask {
                track::ask_comment(&mut StdinPrompt)?
            } else {
                text.join(" ")
            };
            track::on(&mut stdout, &mut db, &comment, now)?;
        }
        Some(Commands::Over) => track::over(&mut stdout, &mut db, now)?,
        Some(Commands::Resume { id }) => track::resume(&mut stdout, &mut db, *id, now)?,
        Some(Commands::Reset) => amend::reset(&mut stdout, &mut db)?,
        Some(Commands::Edit { text }) => amend::edit(&mut stdout, &mut db, &text.join(" "))?,
        Some(Commands::Today) => report::today(&mut stdout, &db, &parser, now)?,
        Some(Commands::Sum) => report::sum(&mut stdout, &db, now)?,
        Some(Commands::Since { when }) => {
            report::since(&mut stdout, &mut io::stderr(), &db, &parser, &when.join(" "), now)?;
        }
        Some(Commands::Done { query }) => {
            let query = Query::parse(query.as_slice());
            report::done(&mut stdout, &mut io::stderr(), &db, &parser, &query, now)?;
        }
        Some(Commands::Unknown(words)) => {
            tracing::debug!(?words, "unknown command");
            show_overview(&mut stdout, &db, &parser, now)?;
        }
        None => show_overview(&mut stdout, &db, &parser, now)?,
    }

    Ok(())
}

/// Shows help, then today's entries.
fn show_overview<W: Write>(
    stdout: &mut W,
    db: &wl_db::Database,
    parser: &TimeParser,
    now: DateTime<Utc>,
) -> Result<()> {
    Cli::command().write_help(stdout)?;
    writeln!(stdout)?;
    report::today(stdout, db, parser, now)
}
