// Integration tests for free-text event extraction
use eventify::model::{
    DailySpan, EventParser, EventRecord, Frequency, ParseOptions, Recurrence, RecurrenceRule,
    WeekdayCode, parse_event,
};
use chrono::{Duration, NaiveDate, NaiveDateTime};

fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap()
}

// 2025-01-06 is a Monday, 2025-01-08 a Wednesday.
fn monday() -> NaiveDateTime {
    at(2025, 1, 6)
}

fn wednesday() -> NaiveDateTime {
    at(2025, 1, 8)
}

#[test]
fn test_dentist_end_to_end() {
    let event = parse_event("Dentist appointment at 3 PM next Wednesday", monday());

    assert_eq!(event.title, "Dentist appointment");
    assert_eq!(event.time, "15:00");
    assert_eq!(event.end_time, "");
    assert_eq!(event.date, "2025-01-08");
    // Greedy location swallows the time and date phrases.
    assert_eq!(event.location, "3 PM next Wednesday");
    assert_eq!(event.description, "");
    assert!(event.recurrence.is_none());
}

#[test]
fn test_no_time_mention_leaves_time_fields_empty() {
    for text in [
        "Lunch with Sam tomorrow",
        "Dinner in Paris",
        "Room 12 at 3",
        "Meeting at 13pm",
        "",
    ] {
        let event = parse_event(text, monday());
        assert_eq!(event.time, "", "input: {text:?}");
        assert_eq!(event.end_time, "", "input: {text:?}");
    }
}

#[test]
fn test_single_time_never_sets_end() {
    let event = parse_event("Call at 9am", monday());
    assert_eq!(event.time, "09:00");
    assert_eq!(event.end_time, "");

    let event = parse_event("Workshop 9am-11:30am next Friday", monday());
    assert_eq!(event.time, "09:00");
    assert_eq!(event.end_time, "11:30");
    assert_eq!(event.date, "2025-01-10");
}

#[test]
fn test_time_normalization_through_parse() {
    let cases = [
        ("Launch at 12am", "00:00"),
        ("Lunch at 12pm", "12:00"),
        ("Standup at 9am", "09:00"),
        ("Review at 3:30pm", "15:30"),
    ];
    for (text, expected) in cases {
        assert_eq!(parse_event(text, monday()).time, expected, "input: {text:?}");
    }
}

#[test]
fn test_relative_dates_from_wednesday() {
    let now = wednesday();
    let tomorrow = (now.date() + Duration::days(1)).format("%Y-%m-%d").to_string();
    assert_eq!(parse_event("Pay rent tomorrow", now).date, tomorrow);

    // Same weekday as now lands a week out, never today.
    let next_week = (now.date() + Duration::days(7)).format("%Y-%m-%d").to_string();
    assert_eq!(parse_event("Book club Wednesday", now).date, next_week);
    assert_ne!(parse_event("Book club Wednesday", now).date, "2025-01-08");
}

#[test]
fn test_unresolvable_date_stays_empty() {
    let event = parse_event("Party on February 30 at 8pm", monday());
    assert_eq!(event.date, "");
    assert_eq!(event.time, "20:00");
}

#[test]
fn test_every_day_and_every_saturday() {
    let event = parse_event("Gym every day at 6am", monday());
    assert_eq!(
        event.recurrence,
        Recurrence::single(RecurrenceRule {
            frequency: Frequency::Daily,
            interval: 1,
            day: vec![
                WeekdayCode::MO,
                WeekdayCode::TU,
                WeekdayCode::WE,
                WeekdayCode::TH,
                WeekdayCode::FR,
            ],
        })
    );
    assert_eq!(event.title, "Gym every day");

    let event = parse_event("Yoga every Saturday at 9am", monday());
    assert_eq!(
        event.recurrence,
        Recurrence::single(RecurrenceRule {
            frequency: Frequency::Weekly,
            interval: 1,
            day: vec![WeekdayCode::SA],
        })
    );
    assert_eq!(event.date, "2025-01-11");
}

#[test]
fn test_every_week_follows_event_date() {
    let event = parse_event("Team sync every week on Thursday at 10am", monday());
    assert_eq!(event.date, "2025-01-09");
    assert_eq!(event.recurrence.rules()[0].day, vec![WeekdayCode::TH]);

    // No date phrase: anchor on the reference day.
    let event = parse_event("Review every week", monday());
    assert_eq!(event.date, "");
    assert_eq!(event.recurrence.rules()[0].day, vec![WeekdayCode::MO]);
}

#[test]
fn test_daily_span_option() {
    let parser = EventParser::new(ParseOptions {
        daily_span: DailySpan::AllDays,
        ..ParseOptions::default()
    });
    let event = parser.parse("Meds every day at 8am", monday());
    assert_eq!(event.recurrence.rules()[0].day, WeekdayCode::all());
}

#[test]
fn test_exclude_claimed_spans_option() {
    let parser = EventParser::new(ParseOptions {
        exclude_claimed_spans: true,
        ..ParseOptions::default()
    });

    let event = parser.parse("Dentist appointment at 3 PM next Wednesday", monday());
    assert_eq!(event.location, "");
    assert_eq!(event.time, "15:00");
    assert_eq!(event.date, "2025-01-08");

    let event = parser.parse("Lunch at Cafe Rio at 1pm", monday());
    assert_eq!(event.location, "Cafe Rio");
    assert_eq!(event.title, "Lunch");
}

#[test]
fn test_parse_is_pure() {
    let text = "Standup 9:30am-9:45am every day at Room 4";
    let first = parse_event(text, monday());
    let second = parse_event(text, monday());
    assert_eq!(first, second);
}

#[test]
fn test_empty_input_is_default_record() {
    let event = parse_event("", monday());
    assert_eq!(event, EventRecord::default());

    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["event_title"], "");
    assert_eq!(json["recurrence"], "none");
}

#[test]
fn test_odd_inputs_do_not_panic() {
    for text in [
        "   ",
        "at",
        "at ",
        "every",
        "12:99pm - 12:99am",
        "next next next",
        "in in in in",
        "🎉 party at 🏠 tomorrow 7pm",
        "Meeting at 3pm–4pm",
    ] {
        let _ = parse_event(text, monday());
    }
}

#[test]
fn test_record_json_shape() {
    let event = parse_event("Yoga every Saturday at 9am", monday());
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["event_title"], "Yoga every Saturday");
    assert_eq!(json["recurrence"][0]["frequency"], "weekly");
    assert_eq!(json["recurrence"][0]["interval"], 1);
    assert_eq!(json["recurrence"][0]["day"][0], "SA");

    let back: EventRecord = serde_json::from_value(json).unwrap();
    assert_eq!(back, event);
}

#[test]
fn test_plural_weekdays_keep_date_and_recurrence() {
    let event = parse_event("Yoga on Mondays at 9am", monday());
    assert_eq!(event.date, "2025-01-13");
    assert_eq!(event.time, "09:00");

    let event = parse_event("Class every Mondays at 9am", monday());
    assert_eq!(
        event.recurrence,
        Recurrence::single(RecurrenceRule {
            frequency: Frequency::Weekly,
            interval: 1,
            day: vec![WeekdayCode::MO],
        })
    );
    assert_eq!(event.date, "2025-01-13");
}

#[test]
fn test_non_ascii_digits_are_not_clock_times() {
    let event = parse_event("Call at 3:\u{0663}\u{0663}pm", monday());
    assert_eq!(event.time, "");
    assert_eq!(event.end_time, "");

    let event = parse_event("Call at \u{0663}pm tomorrow", monday());
    assert_eq!(event.time, "");
    assert_eq!(event.date, "2025-01-07");
}
