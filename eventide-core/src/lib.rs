//! Core types for eventide.
//!
//! This crate turns stored recurring-event templates into dated occurrences:
//! - `template` for the stored document shape
//! - `rule` / `recurring` for normalized, validated rules
//! - `expand` for occurrence expansion over a `window`
//! - `store`, `config` and `ics` for loading templates and exporting results

pub mod config;
pub mod error;
pub mod expand;
pub mod ics;
pub mod instance;
pub mod recurring;
pub mod rule;
pub mod store;
pub mod template;
pub mod window;

pub use error::{EventideError, EventideResult};
pub use expand::{Expansion, ExpansionOptions, SkipKind, SkippedTemplate, expand, expand_templates};
pub use instance::EventInstance;
pub use recurring::RecurringEvent;
pub use rule::{RecurrenceRule, RecurringType};
pub use template::{EventTemplate, RecurringConfig};
pub use window::DateWindow;
