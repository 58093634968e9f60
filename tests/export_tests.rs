// Integration tests for batch export
use chrono::{NaiveDate, NaiveDateTime};
use eventify::context::{AppContext, TestContext};
use eventify::export::{self, ExportEntry, ExportFormat};
use eventify::model::EventParser;
use std::fs;

fn wednesday() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 8)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap()
}

#[test]
fn test_events_text_layout() {
    let parser = EventParser::default();
    let entries = vec![ExportEntry::parse(&parser, "Call mom tomorrow at 7pm", wednesday())];
    let text = export::to_events_text(&entries).unwrap();

    let expected = "Call mom tomorrow at 7pm\n\
{\n  \"event_title\": \"Call mom tomorrow\",\n  \"date\": \"2025-01-09\",\n  \"time\": \"19:00\",\n  \"end_time\": \"\",\n  \"location\": \"7pm\",\n  \"description\": \"\",\n  \"recurrence\": \"none\"\n}\n\n";
    assert_eq!(text, expected);
}

#[test]
fn test_lines_are_parsed_independently() {
    let parser = EventParser::default();
    let input = "  Yoga every Saturday at 9am  \n\n\t\nDentist appointment at 3 PM next Wednesday\n";
    let entries = export::entries_from_lines(&parser, input, wednesday());

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].prompt, "Yoga every Saturday at 9am");
    assert!(!entries[0].data.recurrence.is_none());
    assert_eq!(entries[1].data.date, "2025-01-15");
    assert!(entries[1].data.recurrence.is_none());
}

#[test]
fn test_empty_batch_is_an_error() {
    let err = export::render(&[], ExportFormat::Text, wednesday().date()).unwrap_err();
    assert!(err.to_string().contains("No events to export"));
    assert!(export::render(&[], ExportFormat::Ics, wednesday().date()).is_err());
}

#[test]
fn test_ics_export_wraps_every_event() {
    let parser = EventParser::default();
    let entries = export::entries_from_lines(
        &parser,
        "Yoga every Saturday at 9am\nOffsite planning",
        wednesday(),
    );
    let ics = export::render(&entries, ExportFormat::Ics, wednesday().date()).unwrap();

    assert!(ics.starts_with("BEGIN:VCALENDAR\r\n"));
    assert!(ics.ends_with("END:VCALENDAR"));
    assert_eq!(ics.matches("BEGIN:VEVENT").count(), 2);
    assert_eq!(ics.matches("BEGIN:VCALENDAR").count(), 1);
    assert!(ics.contains("SUMMARY:Yoga every Saturday"));
    assert!(ics.contains("DTSTART:20250111T090000"));
    assert!(ics.contains("RRULE:FREQ=WEEKLY;INTERVAL=1;BYDAY=SA"));
    // No title boundary in the second prompt, and no date: an all-day event on the fallback.
    assert!(ics.contains("DTSTART;VALUE=DATE:20250108"));
}

#[test]
fn test_write_export_creates_file() {
    let ctx = TestContext::new();
    let path = ctx.get_export_path("nested/events.txt").unwrap();
    export::write_export(&path, "hello\n").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "hello\n");
    assert!(!path.with_file_name("events.txt.tmp").exists());
}

#[test]
fn test_text_and_ics_exports_of_one_stem_coexist() {
    let ctx = TestContext::new();
    let text_path = ctx.get_export_path("events.txt").unwrap();
    let ics_path = text_path.with_extension("ics");

    export::write_export(&text_path, "text\n").unwrap();
    export::write_export(&ics_path, "ics\n").unwrap();

    assert_eq!(fs::read_to_string(&text_path).unwrap(), "text\n");
    assert_eq!(fs::read_to_string(&ics_path).unwrap(), "ics\n");
    assert!(!text_path.with_file_name("events.txt.tmp").exists());
    assert!(!text_path.with_file_name("events.ics.tmp").exists());
}

#[test]
fn test_failed_rename_removes_temp_file() {
    let ctx = TestContext::new();
    let path = ctx.get_export_path("events.txt").unwrap();
    // A non-empty directory in the way makes the rename fail.
    fs::create_dir_all(path.join("occupied")).unwrap();

    assert!(export::write_export(&path, "hello\n").is_err());
    assert!(path.is_dir());
    assert!(!path.with_file_name("events.txt.tmp").exists());
}

#[test]
fn test_export_format_names() {
    assert_eq!("ics".parse::<ExportFormat>().unwrap(), ExportFormat::Ics);
    assert_eq!(ExportFormat::Text.to_string(), "text");
    assert!("pdf".parse::<ExportFormat>().is_err());
}
