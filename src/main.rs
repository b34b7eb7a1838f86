mod commands;
mod input;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use datemap_core::Datemap;
use datemap_core::export::ExportFormat;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "datemap")]
#[command(about = "Keep a per-day map of events that never overlap")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a month grid (defaults to the current month)
    Month {
        #[arg(short, long)]
        year: Option<i32>,

        #[arg(short, long)]
        month: Option<u32>,
    },
    /// List the events of one day
    Day {
        /// YYYY-MM-DD, or a phrase like "today" or "next friday"
        date: String,
    },
    /// Add an event, prompting for anything not given
    Add {
        /// YYYY-MM-DD, or a phrase like "today" or "next friday"
        date: String,

        #[arg(short, long)]
        name: Option<String>,

        /// Start time (e.g. "09:30")
        #[arg(short, long)]
        start: Option<String>,

        /// End time (e.g. "10:15")
        #[arg(short, long, conflicts_with = "duration")]
        end: Option<String>,

        /// Duration instead of an end time (e.g. "45m", "1h 30m")
        #[arg(short, long)]
        duration: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },
    /// Change fields of an existing event
    Edit {
        id: String,

        /// Day the event is filed under (looked up when omitted)
        #[arg(long)]
        date: Option<String>,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        start: Option<String>,

        #[arg(short, long)]
        end: Option<String>,

        /// New description; pass "" to clear it
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete an event
    Delete {
        id: String,

        /// Day the event is filed under (looked up when omitted)
        #[arg(long)]
        date: Option<String>,
    },
    /// Fuzzy search by name, description or date
    Search { query: Option<String> },
    /// Write a month's events to MM-YYYY-events.<format>
    Export {
        #[arg(short, long, default_value_t = ExportFormat::Json)]
        format: ExportFormat,

        #[arg(short, long)]
        year: Option<i32>,

        #[arg(short, long)]
        month: Option<u32>,

        /// Directory to write into (defaults to export_dir from the config)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show configuration and data paths, or change a setting
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write one setting to the config file
    Set {
        /// data_dir, search_threshold, revalidate_on_update or export_dir
        key: String,

        /// New value; pass "" to clear export_dir
        value: String,
    },
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let datemap = Datemap::load()?;
    debug!(data = %datemap.data_path().display(), "using data directory");

    match cli.command {
        Commands::Month { year, month } => commands::month::run(&datemap, year, month),
        Commands::Day { date } => commands::day::run(&datemap, input::parse_date(&date)?),
        Commands::Add {
            date,
            name,
            start,
            end,
            duration,
            description,
        } => commands::add::run(
            &datemap,
            input::parse_date(&date)?,
            commands::add::AddArgs {
                name,
                start,
                end,
                duration,
                description,
            },
        ),
        Commands::Edit {
            id,
            date,
            name,
            start,
            end,
            description,
        } => commands::edit::run(
            &datemap,
            &id,
            date.as_deref().map(input::parse_date).transpose()?,
            commands::edit::EditArgs {
                name,
                start,
                end,
                description,
            },
        ),
        Commands::Delete { id, date } => commands::delete::run(
            &datemap,
            &id,
            date.as_deref().map(input::parse_date).transpose()?,
        ),
        Commands::Search { query } => {
            commands::search::run(&datemap, query.as_deref().unwrap_or_default())
        }
        Commands::Export {
            format,
            year,
            month,
            output,
        } => commands::export::run(&datemap, format, year, month, output),
        Commands::Config { action: None } => commands::config::run(&datemap),
        Commands::Config {
            action: Some(ConfigAction::Set { key, value }),
        } => commands::config::set(&key, &value),
    }
}

/// Log to stderr so command output stays clean. `RUST_LOG` overrides the
/// default `warn` level.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}
