// File: ./src/model/item.rs
use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

// --- WEEKDAY CODES (RFC 5545 BYDAY) ---

#[derive(
    Debug,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
pub enum WeekdayCode {
    MO,
    TU,
    WE,
    TH,
    FR,
    SA,
    SU,
}

impl WeekdayCode {
    /// Monday to Friday, the span `every day` expands to by default.
    pub const WORKWEEK: [WeekdayCode; 5] = [
        WeekdayCode::MO,
        WeekdayCode::TU,
        WeekdayCode::WE,
        WeekdayCode::TH,
        WeekdayCode::FR,
    ];

    pub fn all() -> Vec<WeekdayCode> {
        WeekdayCode::iter().collect()
    }

    /// Accepts full English weekday names in any case ("saturday", "Saturday").
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "monday" => Some(WeekdayCode::MO),
            "tuesday" => Some(WeekdayCode::TU),
            "wednesday" => Some(WeekdayCode::WE),
            "thursday" => Some(WeekdayCode::TH),
            "friday" => Some(WeekdayCode::FR),
            "saturday" => Some(WeekdayCode::SA),
            "sunday" => Some(WeekdayCode::SU),
            _ => None,
        }
    }

    pub fn to_chrono(self) -> Weekday {
        match self {
            WeekdayCode::MO => Weekday::Mon,
            WeekdayCode::TU => Weekday::Tue,
            WeekdayCode::WE => Weekday::Wed,
            WeekdayCode::TH => Weekday::Thu,
            WeekdayCode::FR => Weekday::Fri,
            WeekdayCode::SA => Weekday::Sat,
            WeekdayCode::SU => Weekday::Sun,
        }
    }
}

impl From<Weekday> for WeekdayCode {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Mon => WeekdayCode::MO,
            Weekday::Tue => WeekdayCode::TU,
            Weekday::Wed => WeekdayCode::WE,
            Weekday::Thu => WeekdayCode::TH,
            Weekday::Fri => WeekdayCode::FR,
            Weekday::Sat => WeekdayCode::SA,
            Weekday::Sun => WeekdayCode::SU,
        }
    }
}

// --- RECURRENCE ---

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
}

impl Frequency {
    pub fn as_rrule_freq(&self) -> &'static str {
        match self {
            Frequency::Daily => "DAILY",
            Frequency::Weekly => "WEEKLY",
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub frequency: Frequency,
    pub interval: u32,
    pub day: Vec<WeekdayCode>,
}

/// Either no recurrence or the rules extracted from the input.
///
/// On the wire this is the string `"none"` or an array of rule objects, which is
/// the shape the form and export collaborators read.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub enum Recurrence {
    #[default]
    None,
    Rules(Vec<RecurrenceRule>),
}

impl Recurrence {
    pub fn single(rule: RecurrenceRule) -> Self {
        Recurrence::Rules(vec![rule])
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Recurrence::None)
    }

    pub fn rules(&self) -> &[RecurrenceRule] {
        match self {
            Recurrence::None => &[],
            Recurrence::Rules(rules) => rules,
        }
    }
}

impl Serialize for Recurrence {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Recurrence::None => serializer.serialize_str("none"),
            Recurrence::Rules(rules) => rules.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Recurrence {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Marker(String),
            Rules(Vec<RecurrenceRule>),
        }

        match Wire::deserialize(deserializer)? {
            Wire::Marker(s) if s.eq_ignore_ascii_case("none") => Ok(Recurrence::None),
            Wire::Marker(s) => Err(de::Error::custom(format!(
                "unknown recurrence marker '{}', expected \"none\" or a list of rules",
                s
            ))),
            // The form collaborator submits [] for "no recurrence".
            Wire::Rules(rules) if rules.is_empty() => Ok(Recurrence::None),
            Wire::Rules(rules) => Ok(Recurrence::Rules(rules)),
        }
    }
}

// --- EVENT RECORD ---

#[derive(Debug, Clone, Eq, PartialEq, Default, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(rename = "event_title")]
    pub title: String,
    pub date: String,
    pub time: String,
    pub end_time: String,
    pub location: String,
    pub description: String,
    #[serde(default)]
    pub recurrence: Recurrence,
}

impl EventRecord {
    pub fn date_naive(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }

    /// `None` when empty, and also when the minute text was passed through
    /// unchecked (e.g. "15:75").
    pub fn start_naive(&self) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(&self.time, "%H:%M").ok()
    }

    pub fn end_naive(&self) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(&self.end_time, "%H:%M").ok()
    }

    pub fn is_recurring(&self) -> bool {
        !self.recurrence.is_none()
    }
}
