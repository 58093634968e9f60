// File: ./src/export.rs
//! Batch export of parsed events.
//!
//! Two layouts are supported: the plain `events.txt` format (prompt line, the
//! record as 2-space indented JSON, blank line) and a single iCalendar document.
use crate::model::{EventParser, EventRecord};
use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Text,
    Ics,
}

/// A prompt and the record parsed from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportEntry {
    pub prompt: String,
    pub data: EventRecord,
}

impl ExportEntry {
    pub fn parse(parser: &EventParser, prompt: &str, now: NaiveDateTime) -> Self {
        let prompt = prompt.trim().to_string();
        let data = parser.parse(&prompt, now);
        Self { prompt, data }
    }
}

/// Parses every non-blank line of `input` as its own event.
pub fn entries_from_lines(parser: &EventParser, input: &str, now: NaiveDateTime) -> Vec<ExportEntry> {
    input
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| ExportEntry::parse(parser, line, now))
        .collect()
}

fn ensure_not_empty(entries: &[ExportEntry]) -> Result<()> {
    if entries.is_empty() {
        return Err(anyhow::anyhow!("No events to export"));
    }
    Ok(())
}

pub fn to_events_text(entries: &[ExportEntry]) -> Result<String> {
    ensure_not_empty(entries)?;
    let mut output = String::new();
    for entry in entries {
        let json = serde_json::to_string_pretty(&entry.data)
            .with_context(|| format!("Failed to serialize event for '{}'", entry.prompt))?;
        output.push_str(&entry.prompt);
        output.push('\n');
        output.push_str(&json);
        output.push_str("\n\n");
    }
    Ok(output)
}

pub fn to_ics_string(entries: &[ExportEntry], fallback_date: NaiveDate) -> Result<String> {
    ensure_not_empty(entries)?;
    let mut output =
        String::from("BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//Eventify//Export//EN\r\n");

    for entry in entries {
        let full_ics = entry.data.to_ics(fallback_date);
        // Keep only the VEVENT block of the single-event calendar
        if let Some(start) = full_ics.find("BEGIN:VEVENT")
            && let Some(end_idx) = full_ics.rfind("END:VEVENT")
        {
            output.push_str(&full_ics[start..end_idx + "END:VEVENT".len()]);
            output.push_str("\r\n");
        }
    }

    output.push_str("END:VCALENDAR");
    Ok(output)
}

pub fn render(entries: &[ExportEntry], format: ExportFormat, fallback_date: NaiveDate) -> Result<String> {
    match format {
        ExportFormat::Text => to_events_text(entries),
        ExportFormat::Ics => to_ics_string(entries, fallback_date),
    }
}

/// `events.txt` -> `events.txt.tmp`.
fn temp_path_for(path: &Path) -> Result<PathBuf> {
    let name = path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Export path {:?} has no file name", path))?;
    let mut tmp_name = name.to_os_string();
    tmp_name.push(".tmp");
    Ok(path.with_file_name(tmp_name))
}

/// Writes through a sibling temp file and renames it into place.
pub fn write_export(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }
    let tmp_path = temp_path_for(path)?;
    let written = fs::write(&tmp_path, contents)
        .with_context(|| format!("Failed to write temporary export file {:?}", tmp_path))
        .and_then(|_| {
            fs::rename(&tmp_path, path)
                .with_context(|| format!("Failed to move export into place at {:?}", path))
        });
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }
    log::info!("Exported events to {:?}", path);
    Ok(())
}
