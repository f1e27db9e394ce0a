//! Concrete occurrences of recurring events.

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::recurring::RecurringEvent;

/// One dated occurrence of a template. Computed per request, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInstance {
    /// `<templateId>_<YYYY-MM-DD>`
    pub id: String,
    pub template_id: String,
    pub title: String,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub address: Option<String>,
    pub category: Option<String>,
    pub organizer: Option<String>,
}

impl EventInstance {
    pub fn new(event: &RecurringEvent, date: NaiveDate) -> Self {
        let template = &event.template;
        EventInstance {
            id: instance_id(&template.id, date),
            template_id: template.id.clone(),
            title: template.title.clone(),
            date,
            time: event.start_time,
            end_time: event.end_time,
            description: template.description.clone(),
            location: template.location.clone(),
            address: template.address.clone(),
            category: template.category.clone(),
            organizer: template.organizer.clone(),
        }
    }

    pub fn is_timed(&self) -> bool {
        self.time.is_some()
    }
}

pub fn instance_id(template_id: &str, date: NaiveDate) -> String {
    format!("{}_{}", template_id, date.format("%Y-%m-%d"))
}

impl fmt::Display for EventInstance {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.time {
            Some(time) => write!(f, "{} {} {}", self.date, time.format("%H:%M"), self.title),
            None => write!(f, "{} {}", self.date, self.title),
        }
    }
}
