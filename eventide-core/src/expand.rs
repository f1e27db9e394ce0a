//! Occurrence expansion for recurring events.
//!
//! Expands normalized recurring events into dated instances within a window.
//! Per-template problems are collected, never propagated: one bad template
//! must not blank out the whole calendar.

use std::collections::HashSet;

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

use crate::error::{EventideError, EventideResult};
use crate::instance::EventInstance;
use crate::recurring::RecurringEvent;
use crate::rule::RecurrenceRule;
use crate::template::EventTemplate;
use crate::window::DateWindow;

/// Upper bound on instances returned by a single expansion.
pub const DEFAULT_MAX_INSTANCES: usize = 10_000;

/// Options for expansion.
#[derive(Debug, Clone)]
pub struct ExpansionOptions {
    /// Keep at most this many instances (the earliest ones).
    pub max_instances: usize,
}

impl Default for ExpansionOptions {
    fn default() -> Self {
        Self {
            max_instances: DEFAULT_MAX_INSTANCES,
        }
    }
}

impl ExpansionOptions {
    #[must_use]
    pub fn with_max_instances(mut self, max: usize) -> Self {
        self.max_instances = max;
        self
    }
}

/// Why a template did not take part in an expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SkipKind {
    UnsupportedRecurrenceType,
    MalformedConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedTemplate {
    pub template_id: String,
    pub kind: SkipKind,
    pub reason: String,
}

impl SkippedTemplate {
    fn new(template_id: &str, error: &EventideError) -> Self {
        let kind = match error {
            EventideError::UnsupportedRecurrenceType { .. } => SkipKind::UnsupportedRecurrenceType,
            _ => SkipKind::MalformedConfig,
        };
        SkippedTemplate {
            template_id: template_id.to_string(),
            kind,
            reason: error.to_string(),
        }
    }
}

/// Result of expanding a batch of templates.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Expansion {
    /// Sorted by date; same-date instances keep template order.
    pub instances: Vec<EventInstance>,
    pub skipped: Vec<SkippedTemplate>,
    /// Set when `max_instances` cut the result short.
    pub truncated: bool,
}

/// Normalize raw templates, separating the ones that cannot be expanded.
///
/// Template ids must be unique: the first template with a given id wins and
/// later ones are skipped, otherwise their instance ids would collide.
pub fn normalize_templates<I>(templates: I) -> (Vec<RecurringEvent>, Vec<SkippedTemplate>)
where
    I: IntoIterator<Item = EventTemplate>,
{
    let mut events = Vec::new();
    let mut skipped = Vec::new();
    let mut seen_ids = HashSet::new();

    for template in templates {
        let id = template.id.clone();
        if !seen_ids.insert(id.clone()) {
            let e = EventideError::MalformedConfig {
                template: id.clone(),
                reason: "duplicate template id".to_string(),
            };
            tracing::warn!(template = %id, "skipping template: {e}");
            skipped.push(SkippedTemplate::new(&id, &e));
            continue;
        }

        match RecurringEvent::from_template(template) {
            Ok(event) => events.push(event),
            Err(e) => {
                tracing::warn!(template = %id, "skipping template: {e}");
                skipped.push(SkippedTemplate::new(&id, &e));
            }
        }
    }

    (events, skipped)
}

/// Normalize and expand raw templates over `[window_start, window_end]`.
///
/// Fails only when the window itself is inverted.
pub fn expand_templates(
    templates: &[EventTemplate],
    window_start: NaiveDate,
    window_end: NaiveDate,
    options: &ExpansionOptions,
) -> EventideResult<Expansion> {
    let window = DateWindow::new(window_start, window_end)?;

    let active = templates.iter().filter(|t| t.is_active).cloned();
    let (events, skipped) = normalize_templates(active);

    let mut expansion = expand(&events, &window, options);
    expansion.skipped = skipped;
    Ok(expansion)
}

/// Expand normalized events into instances within `window`.
///
/// Each event contributes at most `max_instances + 1` dates, so the work
/// stays bounded however wide the window is.
pub fn expand(events: &[RecurringEvent], window: &DateWindow, options: &ExpansionOptions) -> Expansion {
    let per_event = options.max_instances.saturating_add(1);
    let mut instances = Vec::new();

    for event in events {
        if !event.is_active() {
            tracing::debug!(template = %event.id(), "skipping inactive template");
            continue;
        }

        let before = instances.len();
        instances.extend(
            occurrence_dates(event, window)
                .take(per_event)
                .map(|date| EventInstance::new(event, date)),
        );
        tracing::debug!(
            template = %event.id(),
            rule = %event.rule,
            count = instances.len() - before,
            "expanded template"
        );
    }

    // Stable, so same-day instances stay in template order
    instances.sort_by_key(|i| i.date);

    let truncated = instances.len() > options.max_instances;
    if truncated {
        tracing::warn!(
            max = options.max_instances,
            "expansion exceeded instance limit, keeping the earliest"
        );
        instances.truncate(options.max_instances);
    }

    Expansion {
        instances,
        skipped: Vec::new(),
        truncated,
    }
}

/// Dates on which `event` occurs inside `window`, ascending.
pub fn occurrences(event: &RecurringEvent, window: &DateWindow) -> Vec<NaiveDate> {
    occurrence_dates(event, window).collect()
}

/// Lazy, ascending occurrence dates of `event` inside `window`.
fn occurrence_dates<'a>(
    event: &'a RecurringEvent,
    window: &DateWindow,
) -> Box<dyn Iterator<Item = NaiveDate> + 'a> {
    let Some((from, to)) = window.clamp_to(event.start_date(), event.end_date()) else {
        return Box::new(std::iter::empty());
    };
    let in_range = move |d: &NaiveDate| *d >= from && *d <= to;

    match &event.rule {
        RecurrenceRule::Weekly { days } => Box::new(
            from.iter_days()
                .take_while(move |d| *d <= to)
                .filter(move |d| days.contains(&d.weekday())),
        ),
        RecurrenceRule::MonthlyByDate { day } => {
            let day = *day;
            Box::new(
                months(from, to)
                    .filter_map(move |(year, month)| NaiveDate::from_ymd_opt(year, month, day))
                    .filter(in_range),
            )
        }
        RecurrenceRule::MonthlyByWeekday { weekday, week } => {
            let (weekday, week) = (*weekday, *week);
            Box::new(
                months(from, to)
                    .filter_map(move |(year, month)| {
                        NaiveDate::from_weekday_of_month_opt(year, month, weekday, week)
                    })
                    .filter(in_range),
            )
        }
        RecurrenceRule::Yearly { month, day } => {
            let (month, day) = (*month, *day);
            Box::new(
                (from.year()..=to.year())
                    .filter_map(move |year| NaiveDate::from_ymd_opt(year, month, day))
                    .filter(in_range),
            )
        }
        RecurrenceRule::Custom { interval_days } => {
            Box::new(every_n_days(event.start_date(), *interval_days, from, to))
        }
    }
}

/// (year, month) pairs from `from`'s month through `to`'s month.
fn months(from: NaiveDate, to: NaiveDate) -> impl Iterator<Item = (i32, u32)> {
    let first = from.year() * 12 + from.month0() as i32;
    let last = to.year() * 12 + to.month0() as i32;
    (first..=last).map(|m| (m.div_euclid(12), m.rem_euclid(12) as u32 + 1))
}

/// `anchor + k * interval` for k >= 0, restricted to `[from, to]`.
fn every_n_days(
    anchor: NaiveDate,
    interval: u32,
    from: NaiveDate,
    to: NaiveDate,
) -> impl Iterator<Item = NaiveDate> {
    let interval_i = i64::from(interval);
    let offset = (from - anchor).num_days().max(0);
    // First step at or after `from`
    let steps = (offset + interval_i - 1) / interval_i;
    let first = anchor.checked_add_days(Days::new((steps * interval_i) as u64));

    std::iter::successors(first, move |d| d.checked_add_days(Days::new(u64::from(interval))))
        .take_while(move |d| *d <= to)
}
