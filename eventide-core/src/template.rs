//! Stored event template documents.
//!
//! These types mirror the shape of a template document as the admin side
//! writes it (camelCase keys, loosely typed config). Nothing here is
//! validated; see [`crate::recurring::RecurringEvent`] for the normalized form.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// A recurring event definition as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTemplate {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer: Option<String>,

    /// Wall-clock start, "HH:MM" (24-hour)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    /// Wall-clock end, "HH:MM" (24-hour)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,

    /// "weekly", "monthly", "yearly" or "custom"
    pub recurring_type: String,
    #[serde(default)]
    pub recurring_config: RecurringConfig,

    pub start_date: NaiveDate,
    /// Last valid date (inclusive)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default = "default_true")]
    pub is_active: bool,

    // Display metadata, passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub registration_required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Recurrence payload. Which fields matter depends on `recurring_type`;
/// the rest are ignored.
///
/// Integers are kept wide and signed so out-of-range values surface as
/// config errors instead of deserialization failures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringConfig {
    /// weekly: 0 = Sunday .. 6 = Saturday
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_of_week: Option<Vec<i64>>,
    /// monthly: "date" or "weekday"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_type: Option<String>,
    /// monthly (date) and yearly
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_month: Option<i64>,
    /// monthly (weekday): 0 = Sunday .. 6 = Saturday
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<i64>,
    /// monthly (weekday): 1..=5
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week_of_month: Option<i64>,
    /// yearly: 0 = January .. 11 = December
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<i64>,
    /// custom
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_days: Option<i64>,
}

impl EventTemplate {
    /// A minimal active template with an empty config.
    pub fn new(id: &str, title: &str, recurring_type: &str, start_date: NaiveDate) -> Self {
        EventTemplate {
            id: id.to_string(),
            title: title.to_string(),
            description: None,
            location: None,
            address: None,
            category: None,
            organizer: None,
            start_time: None,
            end_time: None,
            recurring_type: recurring_type.to_string(),
            recurring_config: RecurringConfig::default(),
            start_date,
            end_date: None,
            is_active: true,
            capacity: None,
            registration_required: false,
            tags: Vec::new(),
            image_url: None,
        }
    }
}
