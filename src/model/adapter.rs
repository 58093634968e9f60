// File: ./src/model/adapter.rs
use crate::model::item::EventRecord;
use chrono::{NaiveDate, Utc};
use icalendar::{Calendar, Component, Event, Property};
use uuid::Uuid;

impl EventRecord {
    /// Builds a VEVENT. Times are floating (no TZID); `fallback_date` is used
    /// when the record has no date of its own.
    pub fn to_vevent(&self, fallback_date: NaiveDate) -> Event {
        let mut event = Event::new();
        event.uid(&Uuid::new_v4().to_string());
        event.summary(&self.title);
        event.timestamp(Utc::now());

        if !self.description.is_empty() {
            event.description(&self.description);
        }
        if !self.location.is_empty() {
            event.add_property("LOCATION", self.location.as_str());
        }

        let date = self.date_naive().unwrap_or(fallback_date);
        match self.start_naive() {
            Some(start) => {
                let formatted = date.and_time(start).format("%Y%m%dT%H%M%S").to_string();
                event.add_property("DTSTART", formatted.as_str());

                if let Some(end) = self.end_naive() {
                    // "11pm-1am" ends on the following day.
                    let end_date = if end <= start {
                        date.succ_opt().unwrap_or(date)
                    } else {
                        date
                    };
                    let formatted = end_date.and_time(end).format("%Y%m%dT%H%M%S").to_string();
                    event.add_property("DTEND", formatted.as_str());
                }
            }
            None => {
                let formatted = date.format("%Y%m%d").to_string();
                let mut prop = Property::new("DTSTART", formatted.as_str());
                prop.add_parameter("VALUE", "DATE");
                event.append_property(prop);
            }
        }

        if let Some(rrule) = self.recurrence.to_rrule() {
            event.add_property("RRULE", rrule.as_str());
        }

        event
    }

    pub fn to_ics(&self, fallback_date: NaiveDate) -> String {
        let mut calendar = Calendar::new();
        calendar.push(self.to_vevent(fallback_date));
        calendar.to_string()
    }
}
