//! `zenakku` command-line entry point.
//!
//! # Responsibility
//! - Drive the core item service against a local SQLite file.
//! - Keep output line-oriented: one item per line as `<id> <rfc3339>`.

mod config;

use chrono::{DateTime, SecondsFormat, Utc};
use clap::{Parser, Subcommand};
use config::CliConfig;
use log::error;
use std::error::Error;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use uuid::Uuid;
use zenakku_core::db::open_db;
use zenakku_core::{
    core_version, init_logging, Item, ItemListQuery, ItemService, SqliteItemRepository,
    TimestampOrder,
};

#[derive(Debug, Parser)]
#[command(name = "zenakku", version, about = "Record and manage timestamped items")]
struct Cli {
    /// SQLite database file.
    #[arg(long, global = true, env = "ZENAKKU_DB_PATH")]
    db: Option<PathBuf>,
    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long, global = true, env = "ZENAKKU_LOG_DIR")]
    log_dir: Option<PathBuf>,
    /// trace|debug|info|warn|error
    #[arg(long, global = true, env = "ZENAKKU_LOG_LEVEL")]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(flatten)]
    Item(ItemCommand),
    /// Print the core version.
    Version,
}

#[derive(Debug, Subcommand)]
enum ItemCommand {
    /// Add an item stamped now, or at the given time.
    Add {
        #[arg(long, value_parser = parse_timestamp)]
        at: Option<DateTime<Utc>>,
    },
    /// List items ordered by timestamp.
    List {
        #[arg(long)]
        desc: bool,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long, default_value_t = 0)]
        offset: u32,
        /// Inclusive lower bound.
        #[arg(long, value_parser = parse_timestamp)]
        since: Option<DateTime<Utc>>,
        /// Exclusive upper bound.
        #[arg(long, value_parser = parse_timestamp)]
        until: Option<DateTime<Utc>>,
    },
    /// Show one item.
    Get { id: Uuid },
    /// Reassign an item's timestamp.
    Set {
        id: Uuid,
        #[arg(value_parser = parse_timestamp)]
        timestamp: DateTime<Utc>,
    },
    /// Permanently delete items.
    Delete {
        #[arg(required = true)]
        ids: Vec<Uuid>,
    },
    /// Print the number of stored items.
    Count,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = CliConfig::resolve(cli.db, cli.log_dir, cli.log_level);

    if let Some(log_dir) = &config.log_dir {
        if let Err(err) = init_logging(&config.log_level, log_dir) {
            eprintln!("zenakku: {err}");
            return ExitCode::FAILURE;
        }
    }

    let mut stdout = std::io::stdout().lock();
    match run(&config, cli.command, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_command module=cli status=error error={err}");
            eprintln!("zenakku: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(
    config: &CliConfig,
    command: Command,
    out: &mut impl Write,
) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Version => {
            writeln!(out, "zenakku_core {}", core_version())?;
            Ok(())
        }
        Command::Item(command) => run_item_command(config, command, out),
    }
}

fn run_item_command(
    config: &CliConfig,
    command: ItemCommand,
    out: &mut impl Write,
) -> Result<(), Box<dyn Error>> {
    let conn = open_db(&config.db_path)?;
    let service = ItemService::new(SqliteItemRepository::try_new(&conn)?);

    match command {
        ItemCommand::Add { at } => {
            let item = match at {
                Some(timestamp) => service.add_item(timestamp)?,
                None => service.add_item_now()?,
            };
            writeln!(out, "{}", format_item(&item))?;
        }
        ItemCommand::List {
            desc,
            limit,
            offset,
            since,
            until,
        } => {
            let query = ItemListQuery {
                since,
                until,
                order: if desc {
                    TimestampOrder::Descending
                } else {
                    TimestampOrder::Ascending
                },
                limit,
                offset,
            };
            for item in service.list_items(&query)? {
                writeln!(out, "{}", format_item(&item))?;
            }
        }
        ItemCommand::Get { id } => match service.get_item(id)? {
            Some(item) => writeln!(out, "{}", format_item(&item))?,
            None => return Err(format!("item not found: {id}").into()),
        },
        ItemCommand::Set { id, timestamp } => {
            let item = service.set_timestamp(id, timestamp)?;
            writeln!(out, "{}", format_item(&item))?;
        }
        ItemCommand::Delete { ids } => {
            let deleted = service.delete_items(&ids)?;
            writeln!(out, "deleted {deleted}")?;
        }
        ItemCommand::Count => writeln!(out, "{}", service.count_items()?)?,
    }

    Ok(())
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|err| format!("expected RFC 3339 timestamp like 2025-05-31T00:00:00Z: {err}"))
}

fn format_item(item: &Item) -> String {
    format!(
        "{} {}",
        item.id,
        item.timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    )
}
