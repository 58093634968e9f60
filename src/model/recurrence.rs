// File: ./src/model/recurrence.rs
use crate::model::item::{EventRecord, Frequency, Recurrence, RecurrenceRule, WeekdayCode};
use anyhow::{Result, anyhow};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use rrule::RRuleSet;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumIter};

/// Weekdays that `every day` covers.
///
/// `Weekdays` is Monday to Friday. `AllDays` is the RFC 5545 reading of a
/// daily rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DailySpan {
    #[default]
    Weekdays,
    AllDays,
}

impl DailySpan {
    pub fn days(&self) -> Vec<WeekdayCode> {
        match self {
            DailySpan::Weekdays => WeekdayCode::WORKWEEK.to_vec(),
            DailySpan::AllDays => WeekdayCode::all(),
        }
    }
}

impl RecurrenceRule {
    /// Maps the word following `every` to a rule.
    ///
    /// `week` has no weekday of its own, so it repeats on `anchor`.
    pub fn from_phrase(word: &str, anchor: Weekday, daily: DailySpan) -> Option<Self> {
        match word.trim().to_lowercase().as_str() {
            "day" => Some(Self {
                frequency: Frequency::Daily,
                interval: 1,
                day: daily.days(),
            }),
            "week" => Some(Self::weekly_on(anchor.into())),
            other => WeekdayCode::from_name(other).map(Self::weekly_on),
        }
    }

    pub fn weekly_on(code: WeekdayCode) -> Self {
        Self {
            frequency: Frequency::Weekly,
            interval: 1,
            day: vec![code],
        }
    }

    /// RFC 5545 RRULE value, e.g. `FREQ=WEEKLY;INTERVAL=1;BYDAY=SA`.
    pub fn to_rrule(&self) -> String {
        let mut rule = format!(
            "FREQ={};INTERVAL={}",
            self.frequency.as_rrule_freq(),
            self.interval.max(1)
        );
        if !self.day.is_empty() {
            let codes: Vec<String> = self.day.iter().map(|d| d.to_string()).collect();
            rule.push_str(&format!(";BYDAY={}", codes.join(",")));
        }
        rule
    }
}

impl Recurrence {
    /// Only the first rule is rendered; the parser never produces more.
    pub fn to_rrule(&self) -> Option<String> {
        self.rules().first().map(RecurrenceRule::to_rrule)
    }
}

pub struct RecurrenceEngine;

impl RecurrenceEngine {
    /// Lists up to `limit` start instants of `record`.
    ///
    /// The seed is the record's date (or `today`) at its start time (or midnight).
    /// A record without recurrence yields just the seed.
    pub fn occurrences(
        record: &EventRecord,
        today: NaiveDate,
        limit: usize,
    ) -> Result<Vec<NaiveDateTime>> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let seed = record
            .date_naive()
            .unwrap_or(today)
            .and_time(record.start_naive().unwrap_or(NaiveTime::MIN));

        let Some(rule) = record.recurrence.to_rrule() else {
            return Ok(vec![seed]);
        };

        // Wall-clock times are carried as UTC so the expansion never shifts them.
        let rrule_string = format!("DTSTART:{}\nRRULE:{}", seed.format("%Y%m%dT%H%M%SZ"), rule);
        let rrule_set = RRuleSet::from_str(&rrule_string)
            .map_err(|e| anyhow!("Invalid recurrence rule '{}': {}", rule, e))?;

        let dates: Vec<NaiveDateTime> = rrule_set
            .into_iter()
            .take(limit)
            .map(|d| d.naive_utc())
            .collect();
        log::debug!("Expanded '{}' into {} occurrence(s)", rule, dates.len());
        Ok(dates)
    }
}
