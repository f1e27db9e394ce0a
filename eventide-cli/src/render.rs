//! Terminal rendering for eventide-core types.

use chrono::NaiveDate;
use eventide_core::{EventInstance, SkipKind, SkippedTemplate};
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for EventInstance {
    fn render(&self) -> String {
        let time = match self.time {
            Some(t) => format!("{:>7}", t.format("%H:%M")),
            None => "all-day".to_string(),
        };

        let mut line = format!("{} {}", time, self.title);
        if let Some(ref loc) = self.location {
            line.push_str(&format!(" {}", format!("@ {}", loc).dimmed()));
        }
        if let Some(ref category) = self.category {
            line.push_str(&format!(" {}", format!("[{}]", category).dimmed()));
        }
        line
    }
}

impl Render for SkippedTemplate {
    fn render(&self) -> String {
        let label = match self.kind {
            SkipKind::UnsupportedRecurrenceType => "unsupported",
            SkipKind::MalformedConfig => "malformed",
        };
        format!("{} {} ({})", "skipped".yellow(), self.template_id, label)
    }
}

/// Format a date as a human-readable label (e.g. "Today", "Tomorrow", "Wed Feb 25")
pub fn format_date_label(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        _ => date.format("%a %b %-d").to_string(),
    }
}
