//! Normalized recurring events.

use chrono::{NaiveDate, NaiveTime};

use crate::error::EventideResult;
use crate::rule::RecurrenceRule;
use crate::template::EventTemplate;

/// A template that passed normalization.
///
/// Built once when a template is loaded; expansion only ever sees this form.
#[derive(Debug, Clone, PartialEq)]
pub struct RecurringEvent {
    pub template: EventTemplate,
    pub rule: RecurrenceRule,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}

impl RecurringEvent {
    pub fn from_template(template: EventTemplate) -> EventideResult<Self> {
        let rule = RecurrenceRule::from_template(&template)?;
        let start_time = parse_time(&template, "startTime", template.start_time.as_deref());
        let end_time = parse_time(&template, "endTime", template.end_time.as_deref());

        if template.end_date.is_some_and(|end| end < template.start_date) {
            tracing::warn!(
                template = %template.id,
                "endDate is before startDate, template will never occur"
            );
        }

        Ok(RecurringEvent {
            template,
            rule,
            start_time,
            end_time,
        })
    }

    pub fn id(&self) -> &str {
        &self.template.id
    }

    pub fn start_date(&self) -> NaiveDate {
        self.template.start_date
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.template.end_date
    }

    pub fn is_active(&self) -> bool {
        self.template.is_active
    }

    /// RRULE for the whole series, bounded by the template's end date.
    ///
    /// UNTIL matches the DTSTART value type: a date for all-day series, a
    /// floating date-time at the end of the last day for timed ones.
    pub fn series_rrule(&self) -> String {
        let rule = self.rule.to_rrule();
        match (self.end_date(), self.start_time) {
            (Some(end), Some(_)) => format!("{};UNTIL={}T235959", rule, end.format("%Y%m%d")),
            (Some(end), None) => format!("{};UNTIL={}", rule, end.format("%Y%m%d")),
            (None, _) => rule,
        }
    }
}

impl TryFrom<EventTemplate> for RecurringEvent {
    type Error = crate::error::EventideError;

    fn try_from(template: EventTemplate) -> EventideResult<Self> {
        RecurringEvent::from_template(template)
    }
}

/// Parse "HH:MM". A bad value only costs the time, not the template.
fn parse_time(template: &EventTemplate, field: &str, value: Option<&str>) -> Option<NaiveTime> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }

    match NaiveTime::parse_from_str(value, "%H:%M") {
        Ok(time) => Some(time),
        Err(e) => {
            tracing::warn!(
                template = %template.id,
                field,
                value,
                "ignoring unparseable time: {e}"
            );
            None
        }
    }
}
