// Integration tests for rule rendering and occurrence expansion
use chrono::{NaiveDate, NaiveDateTime};
use eventify::model::{EventRecord, RecurrenceEngine, parse_event};

fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

fn monday() -> NaiveDateTime {
    dt(2025, 1, 6, 10, 0)
}

#[test]
fn test_weekly_saturday_occurrences() {
    let event = parse_event("Yoga every Saturday at 9am", monday());
    assert_eq!(
        event.recurrence.to_rrule().as_deref(),
        Some("FREQ=WEEKLY;INTERVAL=1;BYDAY=SA")
    );

    let dates = RecurrenceEngine::occurrences(&event, monday().date(), 3).unwrap();
    assert_eq!(
        dates,
        vec![
            dt(2025, 1, 11, 9, 0),
            dt(2025, 1, 18, 9, 0),
            dt(2025, 1, 25, 9, 0),
        ]
    );
}

#[test]
fn test_every_day_skips_weekend_by_default() {
    let event = parse_event("Standup every day at 9:30am", monday());
    assert_eq!(event.date, "");

    let dates = RecurrenceEngine::occurrences(&event, monday().date(), 6).unwrap();
    assert_eq!(dates.len(), 6);
    assert_eq!(dates[0], dt(2025, 1, 6, 9, 30));
    assert_eq!(dates[4], dt(2025, 1, 10, 9, 30));
    // Saturday and Sunday are skipped.
    assert_eq!(dates[5], dt(2025, 1, 13, 9, 30));
}

#[test]
fn test_untimed_event_starts_at_midnight() {
    let event = EventRecord {
        title: "Trash day".to_string(),
        date: "2025-01-07".to_string(),
        ..parse_event("Trash every Tuesday", monday())
    };
    let dates = RecurrenceEngine::occurrences(&event, monday().date(), 2).unwrap();
    assert_eq!(dates, vec![dt(2025, 1, 7, 0, 0), dt(2025, 1, 14, 0, 0)]);
}

#[test]
fn test_one_off_event_has_single_occurrence() {
    let event = parse_event("Dentist appointment at 3 PM next Wednesday", monday());
    let dates = RecurrenceEngine::occurrences(&event, monday().date(), 10).unwrap();
    assert_eq!(dates, vec![dt(2025, 1, 8, 15, 0)]);
}
