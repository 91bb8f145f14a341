//! `availability` CLI: validate, query and diff schedule configurations from
//! the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Check a schedule config for malformed or overlapping slots (stdin → stdout)
//! cat schedule.json | availability validate
//!
//! # Suggest the next slot for Monday
//! availability suggest -i schedule.json --day monday
//!
//! # Effective hours for a week
//! availability resolve -i schedule.json --date 2025-12-22 --to 2025-12-28
//!
//! # Is a start far enough ahead of now?
//! availability bookable --start 2025-01-02T00:01:00Z --now 2025-01-01T00:00:00Z --buffer 24
//!
//! # Link/unlink operations for event categories
//! availability delta --current intake,review --desired review,follow-up
//!
//! # Unsaved changes between two snapshots
//! availability diff --original saved.json --current edited.json
//!
//! # Canonical spelling of a time
//! availability normalize "9:05pm"
//! ```

use std::collections::BTreeSet;
use std::io::{self, Read};
use std::process;

use anyhow::{Context, Result};
use availability_engine::diff::{self, CategoryId};
use availability_engine::validate;
use availability_engine::{
    interval, is_bookable, resolve_range, time_code, Day, EngineConfig, ScheduleConfig,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "availability",
    version,
    about = "Counselor availability and schedule configuration tools"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Engine config file (JSON); built-in defaults are used when absent
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log engine activity to stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Report malformed, zero-length and overlapping slots
    Validate {
        /// Schedule config file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Suggest the next slot to add on a weekday
    Suggest {
        /// Schedule config file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Weekday name, e.g. "monday" or "mon"
        #[arg(long)]
        day: String,
    },
    /// Print the effective slots for a date or an inclusive date range
    Resolve {
        /// Schedule config file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// First date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Last date (YYYY-MM-DD); defaults to --date
        #[arg(long)]
        to: Option<String>,
    },
    /// Check a candidate start against the minimum-notice buffer
    Bookable {
        /// Candidate start (RFC 3339, or YYYY-MM-DDTHH:MM:SS read as UTC)
        #[arg(long)]
        start: String,
        /// Current time, same formats as --start
        #[arg(long)]
        now: String,
        /// Buffer in hours; defaults to the engine config value
        #[arg(long)]
        buffer: Option<u32>,
    },
    /// Compute link/unlink operations between two category sets
    Delta {
        /// Comma-separated ids currently linked
        #[arg(long, default_value = "")]
        current: String,
        /// Comma-separated ids that should be linked
        #[arg(long, default_value = "")]
        desired: String,
    },
    /// Report whether a working copy differs from its saved snapshot
    Diff {
        /// Saved schedule config file
        #[arg(long)]
        original: String,
        /// Edited schedule config file
        #[arg(long)]
        current: String,
    },
    /// Print the canonical form of a 12-hour time
    Normalize {
        /// Time such as "9:30 am"
        time: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let engine = match cli.config.as_deref() {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load engine config: {}", path))?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Commands::Validate { input } => {
            let config = read_schedule(input.as_deref())?;
            let report = validate::validate_config(&config);
            if report.is_empty() {
                println!("No issues");
            } else {
                for issue in &report.issues {
                    println!("{}", issue);
                }
                process::exit(1);
            }
        }
        Commands::Suggest { input, day } => {
            let config = read_schedule(input.as_deref())?;
            let Ok(day) = day.parse::<Day>() else {
                anyhow::bail!("Unknown day: '{}'. Use a weekday name such as monday or mon", day);
            };
            let entry = config.weekly.day(day);
            let slot = interval::suggest_next(entry.effective_slots(), &engine.slots);
            println!("{} - {}", slot.start, slot.end);
        }
        Commands::Resolve { input, date, to } => {
            let config = read_schedule(input.as_deref())?;
            let from = parse_date(&date)?;
            let to = match to.as_deref() {
                Some(raw) => parse_date(raw)?,
                None => from,
            };
            for resolved in resolve_range(&config.weekly, &config.overrides, from, to) {
                let hours = if resolved.is_available() {
                    resolved
                        .slots
                        .iter()
                        .map(|s| format!("{} - {}", s.start, s.end))
                        .collect::<Vec<_>>()
                        .join(", ")
                } else {
                    "unavailable".to_string()
                };
                println!("{} {}: {}", resolved.date, resolved.day, hours);
            }
        }
        Commands::Bookable { start, now, buffer } => {
            let start = parse_timestamp(&start)?;
            let now = parse_timestamp(&now)?;
            let hours = buffer.unwrap_or(engine.default_booking_buffer_hours);
            debug!(%start, %now, hours, "checking booking buffer");
            if is_bookable(start, now, hours) {
                println!("bookable");
            } else {
                println!("not bookable");
            }
        }
        Commands::Delta { current, desired } => {
            let delta = diff::membership_delta(&parse_ids(&current), &parse_ids(&desired));
            println!("{}", serde_json::to_string(&delta)?);
        }
        Commands::Diff { original, current } => {
            let original = read_schedule(Some(&original))?;
            let current = read_schedule(Some(&current))?;
            if diff::is_dirty(&current, &original) {
                println!("dirty");
            } else {
                println!("clean");
            }
        }
        Commands::Normalize { time } => {
            let canonical = time_code::normalize(&time).context("Failed to normalize time")?;
            println!("{}", canonical);
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_schedule(path: Option<&str>) -> Result<ScheduleConfig> {
    let json = read_input(path)?;
    serde_json::from_str(&json).context("Failed to parse schedule config")
}

/// Comma-separated ids; blanks are dropped.
fn parse_ids(raw: &str) -> BTreeSet<CategoryId> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(CategoryId::from)
        .collect()
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date: '{}' (expected YYYY-MM-DD)", raw))
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .map(|naive| naive.and_utc())
        .with_context(|| format!("Invalid timestamp: '{}'", raw))
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}
