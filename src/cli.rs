// File: ./src/cli.rs
//! Command-line front-end: argument definitions and command dispatch.
use crate::config::Config;
use crate::context::AppContext;
use crate::export::{self, ExportFormat};
use crate::model::{EventParser, EventRecord, RecurrenceEngine};
use anyhow::{Context, Result, anyhow};
use chrono::{Local, NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "eventify", version)]
#[command(about = "Turn a sentence like 'Dentist at 3 PM next Wednesday' into a calendar record")]
pub struct Cli {
    /// Use a different directory for config and data
    #[arg(short, long, global = true)]
    pub root: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse one event description and print the record
    Parse {
        /// Event description (multiple words are joined with spaces)
        #[arg(required = true)]
        text: Vec<String>,

        /// Reference instant for relative dates ("2025-01-06" or "2025-01-06T09:30")
        #[arg(long)]
        now: Option<String>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Also list upcoming occurrences (defaults to `occurrence_limit` from the config)
        #[arg(long)]
        occurrences: Option<Option<usize>>,
    },
    /// Parse one description per line and export them all
    Export {
        /// File with one event description per line (stdin when omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Destination file (defaults to `export_file_name` in the data directory)
        #[arg(short, long, conflicts_with = "stdout")]
        output: Option<PathBuf>,

        /// Print the export instead of writing a file
        #[arg(long)]
        stdout: bool,

        /// "text" (events.txt layout) or "ics"
        #[arg(short, long, default_value = "text")]
        format: ExportFormat,

        #[arg(long)]
        now: Option<String>,
    },
    /// Show the config file location and effective settings
    Config {
        /// Write the current settings to the config file
        #[arg(long)]
        init: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Ics,
}

/// Accepts `YYYY-MM-DDTHH:MM`, `YYYY-MM-DD HH:MM` or a bare date (midnight).
pub fn parse_reference_instant(value: &str) -> Result<NaiveDateTime> {
    let value = value.trim();
    for fmt in ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Ok(dt);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| anyhow!("Invalid --now value '{}', expected YYYY-MM-DD[THH:MM]", value))
}

fn reference_instant(now: Option<&str>) -> Result<NaiveDateTime> {
    match now {
        Some(v) => parse_reference_instant(v),
        None => Ok(Local::now().naive_local()),
    }
}

pub fn run(cli: Cli, ctx: &dyn AppContext, config: &Config, out: &mut dyn Write) -> Result<()> {
    let parser = EventParser::new(config.parse_options());

    match cli.command {
        Command::Parse {
            text,
            now,
            format,
            occurrences,
        } => {
            let now = reference_instant(now.as_deref())?;
            let record = parser.parse(&text.join(" "), now);
            print_record(&record, format, now.date(), out)?;

            if let Some(limit) = occurrences {
                let limit = limit.unwrap_or(config.occurrence_limit);
                for dt in RecurrenceEngine::occurrences(&record, now.date(), limit)? {
                    writeln!(out, "{}", dt.format("%Y-%m-%d %H:%M"))?;
                }
            }
        }
        Command::Export {
            input,
            output,
            stdout,
            format,
            now,
        } => {
            let now = reference_instant(now.as_deref())?;
            let raw = match input {
                Some(path) => fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read prompts from {:?}", path))?,
                None => {
                    let mut buf = String::new();
                    io::stdin()
                        .read_to_string(&mut buf)
                        .context("Failed to read prompts from stdin")?;
                    buf
                }
            };

            let entries = export::entries_from_lines(&parser, &raw, now);
            log::debug!("Parsed {} prompt(s) for export", entries.len());
            let rendered = export::render(&entries, format, now.date())?;

            if stdout {
                writeln!(out, "{}", rendered)?;
            } else {
                let path = match output {
                    Some(p) => p,
                    None => default_export_path(ctx, config, format)?,
                };
                export::write_export(&path, &rendered)?;
                writeln!(out, "Exported {} event(s) to {}", entries.len(), path.display())?;
            }
        }
        Command::Config { init } => {
            if init {
                config.save(ctx)?;
            }
            writeln!(out, "# {}", Config::get_path_string(ctx)?)?;
            let body = toml::to_string_pretty(config).context("Failed to serialize config")?;
            write!(out, "{}", body)?;
        }
    }
    Ok(())
}

fn print_record(
    record: &EventRecord,
    format: OutputFormat,
    fallback_date: NaiveDate,
    out: &mut dyn Write,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(record).context("Failed to serialize event")?;
            writeln!(out, "{}", json)?;
        }
        OutputFormat::Ics => writeln!(out, "{}", record.to_ics(fallback_date))?,
    }
    Ok(())
}

fn default_export_path(ctx: &dyn AppContext, config: &Config, format: ExportFormat) -> Result<PathBuf> {
    let path = ctx.get_export_path(&config.export_file_name)?;
    Ok(match format {
        ExportFormat::Text => path,
        ExportFormat::Ics => path.with_extension("ics"),
    })
}
