// File: ./src/model/mod.rs
pub mod adapter;
pub mod item;
pub mod parser;
pub mod recurrence;

pub use item::{EventRecord, Frequency, Recurrence, RecurrenceRule, WeekdayCode};
pub use parser::{EventParser, ParseOptions, parse_event, parse_event_now};
pub use recurrence::{DailySpan, RecurrenceEngine};
