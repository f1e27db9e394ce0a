//! ICS export of expanded instances.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use icalendar::{Calendar, Component, EventLike, Property, ValueType};

use crate::error::{EventideError, EventideResult};
use crate::instance::EventInstance;

/// Generate a VCALENDAR with one VEVENT per instance.
///
/// Times are floating: templates carry wall-clock times without a zone.
pub fn generate_ics(instances: &[EventInstance], dtstamp: DateTime<Utc>) -> EventideResult<String> {
    let mut cal = Calendar::new();
    let dtstamp = dtstamp.format("%Y%m%dT%H%M%SZ").to_string();

    for instance in instances {
        let mut ics_event = icalendar::Event::new();
        ics_event.uid(&format!("{}@eventide", instance.id));
        ics_event.summary(&instance.title);
        ics_event.add_property("DTSTAMP", &dtstamp);

        match instance.time {
            Some(start) => {
                ics_event.add_property("DTSTART", floating(instance.date, start));
                if let Some(end) = instance.end_time.filter(|end| *end > start) {
                    ics_event.add_property("DTEND", floating(instance.date, end));
                }
            }
            None => {
                let next_day = instance.date.checked_add_days(Days::new(1)).ok_or_else(|| {
                    EventideError::IcsGenerate(format!("No day after {} for {}", instance.date, instance.id))
                })?;
                add_date_property(&mut ics_event, "DTSTART", instance.date);
                add_date_property(&mut ics_event, "DTEND", next_day);
            }
        }

        if let Some(ref desc) = instance.description {
            ics_event.description(desc);
        }

        if let Some(ref loc) = instance.location {
            ics_event.location(loc);
        }

        if let Some(ref category) = instance.category {
            ics_event.add_property("CATEGORIES", category);
        }

        let ics_event = ics_event.done();
        cal.push(ics_event);
    }

    let cal = cal.done();

    Ok(strip_ics_bloat(&cal.to_string()))
}

fn floating(date: NaiveDate, time: NaiveTime) -> String {
    date.and_time(time).format("%Y%m%dT%H%M%S").to_string()
}

fn add_date_property(ics_event: &mut icalendar::Event, name: &str, date: NaiveDate) {
    let mut prop = Property::new(name, date.format("%Y%m%d").to_string());
    prop.append_parameter(ValueType::Date);
    ics_event.append_property(prop);
}

/// Replace PRODID and drop CALSCALE:GREGORIAN (it's the default).
fn strip_ics_bloat(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:EVENTIDE\r\n");
            continue;
        }

        if line == "CALSCALE:GREGORIAN" {
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_instance(time: Option<(u32, u32)>, end: Option<(u32, u32)>) -> EventInstance {
        let date = NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();
        EventInstance {
            id: "sunday_2025-03-02".to_string(),
            template_id: "sunday".to_string(),
            title: "Sunday Worship".to_string(),
            date,
            time: time.and_then(|(h, m)| NaiveTime::from_hms_opt(h, m, 0)),
            end_time: end.and_then(|(h, m)| NaiveTime::from_hms_opt(h, m, 0)),
            description: None,
            location: Some("Sanctuary".to_string()),
            address: None,
            category: Some("worship".to_string()),
            organizer: None,
        }
    }

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_generate_ics_timed_instance() {
        let ics = generate_ics(&[make_instance(Some((10, 30)), Some((12, 0)))], stamp()).unwrap();

        assert!(ics.contains("UID:sunday_2025-03-02@eventide"), "ICS:\n{}", ics);
        assert!(ics.contains("DTSTART:20250302T103000"), "ICS:\n{}", ics);
        assert!(ics.contains("DTEND:20250302T120000"), "ICS:\n{}", ics);
        assert!(ics.contains("SUMMARY:Sunday Worship"), "ICS:\n{}", ics);
        assert!(ics.contains("LOCATION:Sanctuary"), "ICS:\n{}", ics);
        assert!(ics.contains("CATEGORIES:worship"), "ICS:\n{}", ics);
        assert!(ics.contains("DTSTAMP:20250101T000000Z"), "ICS:\n{}", ics);
    }

    #[test]
    fn test_generate_ics_untimed_instance_is_all_day() {
        let ics = generate_ics(&[make_instance(None, None)], stamp()).unwrap();

        assert!(
            ics.contains("DTSTART;VALUE=DATE:20250302"),
            "DTSTART should have VALUE=DATE parameter. ICS:\n{}",
            ics
        );
        assert!(
            ics.contains("DTEND;VALUE=DATE:20250303"),
            "DTEND should be the next day. ICS:\n{}",
            ics
        );
    }

    #[test]
    fn test_generate_ics_skips_end_before_start() {
        let ics = generate_ics(&[make_instance(Some((19, 0)), Some((9, 0)))], stamp()).unwrap();

        assert!(ics.contains("DTSTART:20250302T190000"));
        assert!(!ics.contains("DTEND"), "ICS:\n{}", ics);
    }

    #[test]
    fn test_generate_ics_one_vevent_per_instance() {
        let mut second = make_instance(None, None);
        second.id = "sunday_2025-03-09".to_string();
        second.date = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();

        let ics = generate_ics(&[make_instance(None, None), second], stamp()).unwrap();

        let count = ics.lines().filter(|l| *l == "BEGIN:VEVENT").count();
        assert_eq!(count, 2, "ICS:\n{}", ics);
        assert!(ics.contains("PRODID:EVENTIDE"));
        assert!(!ics.contains("CALSCALE"));
    }

    #[test]
    fn test_generate_ics_empty_calendar() {
        let ics = generate_ics(&[], stamp()).unwrap();

        assert!(ics.starts_with("BEGIN:VCALENDAR"));
        assert!(!ics.contains("BEGIN:VEVENT"));
    }
}
