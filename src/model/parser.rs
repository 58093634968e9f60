// File: ./src/model/parser.rs
//! Free-text event extraction.
//!
//! Each pass scans the raw input on its own and returns an `Option`; nothing a
//! pass finds is removed from the text before the next one runs. The passes are:
//! time range, date, recurrence, location, title.
use crate::model::item::{EventRecord, Recurrence, RecurrenceRule, WeekdayCode};
use crate::model::recurrence::DailySpan;
use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::ops::Range;

const CLOCK: &str = r"(?:1[0-2]|0?[1-9])(?::[0-9]{2})?\s?[ap]m";
const WEEKDAYS: &str = "monday|tuesday|wednesday|thursday|friday|saturday|sunday";
const MONTHS: &str = "jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?";

static TIME_RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b({clock})\b(?:\s?-\s?({clock})\b)?",
        clock = CLOCK
    ))
    .expect("valid time range regex")
});

static CLOCK_PARTS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*([0-9]{1,2})(?::([0-9]{2}))?\s?([ap]m)\s*$").expect("valid clock regex")
});

static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:(?:next|this)\s+)?(?:{weekdays})s?\b|\b(?:tomorrow|today)\b|\b(?:{months})\s+[0-9]{{1,2}}(?:st|nd|rd|th)?\b",
        weekdays = WEEKDAYS,
        months = MONTHS
    ))
    .expect("valid date regex")
});

static MONTH_DAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^({months})\s+([0-9]{{1,2}})(?:st|nd|rd|th)?$",
        months = MONTHS
    ))
    .expect("valid month-day regex")
});

static RECURRENCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\bevery\s+(day|week|{weekdays})s?\b",
        weekdays = WEEKDAYS
    ))
    .expect("valid recurrence regex")
});

static LOCATION_ANCHOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:in|at|on)\s").expect("valid location anchor regex"));

static LOCATION_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9\s.,-]+").expect("valid location run regex"));

static DANGLING_CONNECTOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:\s+(?:in|at|on|next|this))+$").expect("valid connector regex")
});

static TITLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)^(.+?)(?:\s{clock}\b|\s(?:next|in|at)\b)",
        clock = CLOCK
    ))
    .expect("valid title regex")
});

// --- OPTIONS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Which weekdays `every day` expands to.
    #[serde(default)]
    pub daily_span: DailySpan,
    /// When set, the location pass ignores text already claimed by the time
    /// and date passes instead of swallowing it.
    #[serde(default)]
    pub exclude_claimed_spans: bool,
}

// --- PASS RESULTS ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeMatch {
    pub start: String,
    pub end: Option<String>,
    pub span: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateMatch {
    pub phrase: String,
    pub span: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceMatch {
    pub word: String,
    pub span: Range<usize>,
}

// --- PARSER ---

#[derive(Debug, Clone, Default)]
pub struct EventParser {
    pub options: ParseOptions,
}

impl EventParser {
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    /// Extracts an event from `text`, resolving relative dates against `now`.
    ///
    /// Total over every input: fields that no pass resolves keep their defaults.
    pub fn parse(&self, text: &str, now: NaiveDateTime) -> EventRecord {
        let mut event = EventRecord::default();
        let today = now.date();
        let mut claimed: Vec<Range<usize>> = Vec::new();

        // 1. Time range
        if let Some(m) = extract_time_range(text) {
            event.time = m.start;
            if let Some(end) = m.end {
                event.end_time = end;
            }
            claimed.push(m.span);
        }

        // 2. Date
        let mut event_date = None;
        if let Some(m) = extract_date(text) {
            event_date = resolve_date(&m.phrase, today);
            match event_date {
                Some(d) => event.date = d.format("%Y-%m-%d").to_string(),
                None => log::debug!("Could not resolve date phrase '{}'", m.phrase),
            }
            claimed.push(m.span);
        }

        // 3. Recurrence
        if let Some(m) = extract_recurrence(text) {
            let anchor = event_date.unwrap_or(today).weekday();
            match RecurrenceRule::from_phrase(&m.word, anchor, self.options.daily_span) {
                Some(rule) => event.recurrence = Recurrence::single(rule),
                None => log::debug!("Ignoring recurrence phrase 'every {}'", m.word),
            }
        }

        // 4. Location
        let claimed_spans: &[Range<usize>] = if self.options.exclude_claimed_spans {
            &claimed
        } else {
            &[]
        };
        if let Some(location) = extract_location(text, claimed_spans) {
            event.location = location;
        }

        // 5. Title
        if let Some(title) = extract_title(text) {
            event.title = title;
        }

        log::trace!("Parsed '{}' into {:?}", text, event);
        event
    }
}

/// Parses with default options.
pub fn parse_event(text: &str, now: NaiveDateTime) -> EventRecord {
    EventParser::default().parse(text, now)
}

/// Parses against the local wall clock.
pub fn parse_event_now(text: &str) -> EventRecord {
    parse_event(text, Local::now().naive_local())
}

// --- TIME ---

pub fn extract_time_range(text: &str) -> Option<TimeMatch> {
    let caps = TIME_RANGE_RE.captures(text)?;
    let whole = caps.get(0)?;
    let start = to_24_hour(caps.get(1)?.as_str())?;
    let end = caps.get(2).and_then(|m| to_24_hour(m.as_str()));
    Some(TimeMatch {
        start,
        end,
        span: whole.range(),
    })
}

/// Converts `H[:MM]` plus an am/pm marker to `HH:MM`.
///
/// The minute text is carried over as written; only the hour is checked.
pub fn to_24_hour(mention: &str) -> Option<String> {
    let caps = CLOCK_PARTS_RE.captures(mention)?;
    let mut hours: u32 = caps[1].parse().ok()?;
    if !(1..=12).contains(&hours) {
        return None;
    }
    let minutes = caps.get(2).map_or("00", |m| m.as_str());
    let is_pm = caps[3].eq_ignore_ascii_case("pm");

    if is_pm && hours != 12 {
        hours += 12;
    }
    if !is_pm && hours == 12 {
        hours = 0;
    }
    Some(format!("{:02}:{}", hours, minutes))
}

// --- DATE ---

pub fn extract_date(text: &str) -> Option<DateMatch> {
    let m = DATE_RE.find(text)?;
    Some(DateMatch {
        phrase: m.as_str().trim().to_string(),
        span: m.range(),
    })
}

/// Resolves a date phrase ("tomorrow", "next Friday", "March 5") against `today`.
///
/// Returns `None` when the phrase can't be interpreted; callers leave the date empty.
pub fn resolve_date(phrase: &str, today: NaiveDate) -> Option<NaiveDate> {
    let lower = phrase.trim().to_lowercase();
    if lower == "tomorrow" {
        return today.checked_add_signed(Duration::days(1));
    }

    let bare = lower
        .strip_prefix("next")
        .or_else(|| lower.strip_prefix("this"))
        .map(str::trim_start)
        .unwrap_or(lower.as_str());
    // "Mondays" resolves like "Monday".
    let singular = bare.strip_suffix('s').unwrap_or(bare);
    if let Some(code) = WeekdayCode::from_name(bare).or_else(|| WeekdayCode::from_name(singular)) {
        return next_weekday(today, code.to_chrono());
    }

    parse_calendar_phrase(&lower, today)
}

/// Next occurrence of `target` strictly after `from`. A match on the same
/// weekday lands a full week out.
pub fn next_weekday(from: NaiveDate, target: Weekday) -> Option<NaiveDate> {
    let current = from.weekday().num_days_from_sunday() as i64;
    let wanted = target.num_days_from_sunday() as i64;
    let diff = match (wanted + 7 - current) % 7 {
        0 => 7,
        d => d,
    };
    from.checked_add_signed(Duration::days(diff))
}

fn parse_calendar_phrase(lower: &str, today: NaiveDate) -> Option<NaiveDate> {
    if lower == "today" {
        return Some(today);
    }
    if let Ok(date) = NaiveDate::parse_from_str(lower, "%Y-%m-%d") {
        return Some(date);
    }

    let caps = MONTH_DAY_RE.captures(lower)?;
    let month = month_number(&caps[1])?;
    let day: u32 = caps[2].parse().ok()?;

    // A month-day that already passed this year refers to next year.
    match NaiveDate::from_ymd_opt(today.year(), month, day) {
        Some(d) if d >= today => Some(d),
        _ => NaiveDate::from_ymd_opt(today.year() + 1, month, day),
    }
}

fn month_number(name: &str) -> Option<u32> {
    let prefix: String = name.chars().take(3).collect();
    match prefix.as_str() {
        "jan" => Some(1),
        "feb" => Some(2),
        "mar" => Some(3),
        "apr" => Some(4),
        "may" => Some(5),
        "jun" => Some(6),
        "jul" => Some(7),
        "aug" => Some(8),
        "sep" => Some(9),
        "oct" => Some(10),
        "nov" => Some(11),
        "dec" => Some(12),
        _ => None,
    }
}

// --- RECURRENCE ---

pub fn extract_recurrence(text: &str) -> Option<RecurrenceMatch> {
    let caps = RECURRENCE_RE.captures(text)?;
    let whole = caps.get(0)?;
    Some(RecurrenceMatch {
        word: caps.get(1)?.as_str().to_lowercase(),
        span: whole.range(),
    })
}

// --- LOCATION ---

/// Takes the run of text after the first `in`/`at`/`on`.
///
/// With no claimed spans this is deliberately greedy: "at 3 PM next Wednesday"
/// comes back as a location. Spans claimed by other passes make the scan skip
/// anchors that point into them and cut the run where a claimed span begins.
pub fn extract_location(text: &str, claimed: &[Range<usize>]) -> Option<String> {
    for anchor in LOCATION_ANCHOR_RE.find_iter(text) {
        let Some(run) = LOCATION_RUN_RE.find(&text[anchor.end()..]) else {
            continue;
        };
        let run_start = anchor.end() + run.start();
        let mut run_end = anchor.end() + run.end();

        if claimed.is_empty() {
            return Some(text[run_start..run_end].trim().to_string());
        }

        let leading = text[run_start..run_end].len() - text[run_start..run_end].trim_start().len();
        let content_start = run_start + leading;
        if claimed.iter().any(|c| c.contains(&content_start)) {
            continue;
        }
        for span in claimed {
            if span.start > content_start && span.start < run_end {
                run_end = span.start;
            }
        }

        let candidate = DANGLING_CONNECTOR_RE
            .replace(text[content_start..run_end].trim(), "")
            .trim()
            .trim_end_matches(',')
            .trim()
            .to_string();
        if !candidate.is_empty() {
            return Some(candidate);
        }
    }
    None
}

// --- TITLE ---

/// Text before the earliest clock time or `next`/`in`/`at`. Without one of those
/// boundaries there is no title.
pub fn extract_title(text: &str) -> Option<String> {
    let caps = TITLE_RE.captures(text)?;
    Some(caps.get(1)?.as_str().trim().to_string())
}
