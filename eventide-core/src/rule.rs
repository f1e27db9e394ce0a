//! Typed recurrence rules.
//!
//! A stored template carries a `recurringType` tag plus a loosely shaped
//! config. [`RecurrenceRule::from_template`] turns that pair into a rule
//! that is valid by construction, filling the documented defaults from the
//! template's start date.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{EventideError, EventideResult};
use crate::template::EventTemplate;

/// The closed set of recurrence kinds a template may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurringType {
    Weekly,
    Monthly,
    Yearly,
    Custom,
}

impl RecurringType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecurringType::Weekly => "weekly",
            RecurringType::Monthly => "monthly",
            RecurringType::Yearly => "yearly",
            RecurringType::Custom => "custom",
        }
    }
}

impl FromStr for RecurringType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weekly" => Ok(RecurringType::Weekly),
            "monthly" => Ok(RecurringType::Monthly),
            "yearly" => Ok(RecurringType::Yearly),
            "custom" => Ok(RecurringType::Custom),
            _ => Err(s.to_string()),
        }
    }
}

impl fmt::Display for RecurringType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated recurrence rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecurrenceRule {
    /// Every week on each of `days` (sorted Sunday first, no duplicates)
    Weekly { days: Vec<Weekday> },
    /// Every month on day `day` (1..=31); shorter months are skipped
    MonthlyByDate { day: u32 },
    /// Every month on the `week`-th (1..=5) `weekday`; months without one are skipped
    MonthlyByWeekday { weekday: Weekday, week: u8 },
    /// Every year on `month` (1..=12) / `day`
    Yearly { month: u32, day: u32 },
    /// Every `interval_days` days counted from the template's start date
    Custom { interval_days: u32 },
}

impl RecurrenceRule {
    /// Build the rule for a template, applying defaults for absent fields.
    pub fn from_template(template: &EventTemplate) -> EventideResult<Self> {
        let kind: RecurringType =
            template
                .recurring_type
                .parse()
                .map_err(|kind| EventideError::UnsupportedRecurrenceType {
                    template: template.id.clone(),
                    kind,
                })?;

        let config = &template.recurring_config;
        let start = template.start_date;
        let malformed = |reason: String| EventideError::MalformedConfig {
            template: template.id.clone(),
            reason,
        };

        match kind {
            RecurringType::Weekly => {
                let mut days = match config.days_of_week.as_deref() {
                    None | Some([]) => vec![start.weekday()],
                    Some(raw) => raw
                        .iter()
                        .map(|&d| {
                            weekday_from_index(d)
                                .ok_or_else(|| malformed(format!("daysOfWeek entry {d} is not in 0..=6")))
                        })
                        .collect::<EventideResult<Vec<_>>>()?,
                };
                days.sort_by_key(|d| d.num_days_from_sunday());
                days.dedup();
                Ok(RecurrenceRule::Weekly { days })
            }
            RecurringType::Monthly => {
                let monthly_type = config
                    .monthly_type
                    .as_deref()
                    .map(|s| s.trim().to_ascii_lowercase())
                    .unwrap_or_else(|| "date".to_string());
                match monthly_type.as_str() {
                    "date" => {
                        let day = match config.day_of_month {
                            Some(d) => day_of_month(d).ok_or_else(|| {
                                malformed(format!("dayOfMonth {d} is not in 1..=31"))
                            })?,
                            None => start.day(),
                        };
                        Ok(RecurrenceRule::MonthlyByDate { day })
                    }
                    "weekday" => {
                        let weekday = match config.day_of_week {
                            Some(d) => weekday_from_index(d)
                                .ok_or_else(|| malformed(format!("dayOfWeek {d} is not in 0..=6")))?,
                            None => start.weekday(),
                        };
                        let week = match config.week_of_month {
                            Some(w @ 1..=5) => w as u8,
                            Some(w) => return Err(malformed(format!("weekOfMonth {w} is not in 1..=5"))),
                            None => (start.day0() / 7) as u8 + 1,
                        };
                        Ok(RecurrenceRule::MonthlyByWeekday { weekday, week })
                    }
                    other => Err(malformed(format!(
                        "monthlyType '{other}' is neither 'date' nor 'weekday'"
                    ))),
                }
            }
            RecurringType::Yearly => {
                let month = match config.month {
                    Some(m @ 0..=11) => m as u32 + 1,
                    Some(m) => return Err(malformed(format!("month {m} is not in 0..=11"))),
                    None => start.month(),
                };
                let day = match config.day_of_month {
                    Some(d) => day_of_month(d)
                        .ok_or_else(|| malformed(format!("dayOfMonth {d} is not in 1..=31")))?,
                    None => start.day(),
                };
                // 2000 is a leap year, so Feb 29 passes and Feb 30 does not
                if NaiveDate::from_ymd_opt(2000, month, day).is_none() {
                    return Err(malformed(format!(
                        "{} {day} never occurs",
                        month_name(month)
                    )));
                }
                Ok(RecurrenceRule::Yearly { month, day })
            }
            RecurringType::Custom => match config.interval_days {
                Some(n) if n >= 1 => {
                    let interval_days = u32::try_from(n)
                        .map_err(|_| malformed(format!("intervalDays {n} is too large")))?;
                    Ok(RecurrenceRule::Custom { interval_days })
                }
                Some(n) => Err(malformed(format!("intervalDays must be at least 1, got {n}"))),
                None => Err(malformed("intervalDays is required".to_string())),
            },
        }
    }

    pub fn recurring_type(&self) -> RecurringType {
        match self {
            RecurrenceRule::Weekly { .. } => RecurringType::Weekly,
            RecurrenceRule::MonthlyByDate { .. } | RecurrenceRule::MonthlyByWeekday { .. } => {
                RecurringType::Monthly
            }
            RecurrenceRule::Yearly { .. } => RecurringType::Yearly,
            RecurrenceRule::Custom { .. } => RecurringType::Custom,
        }
    }

    /// RFC 5545 RRULE value for this rule (without DTSTART or UNTIL).
    pub fn to_rrule(&self) -> String {
        match self {
            RecurrenceRule::Weekly { days } => {
                let byday: Vec<_> = days.iter().map(|d| ics_weekday(*d)).collect();
                format!("FREQ=WEEKLY;BYDAY={}", byday.join(","))
            }
            RecurrenceRule::MonthlyByDate { day } => format!("FREQ=MONTHLY;BYMONTHDAY={day}"),
            RecurrenceRule::MonthlyByWeekday { weekday, week } => {
                format!("FREQ=MONTHLY;BYDAY={}{}", week, ics_weekday(*weekday))
            }
            RecurrenceRule::Yearly { month, day } => {
                format!("FREQ=YEARLY;BYMONTH={month};BYMONTHDAY={day}")
            }
            RecurrenceRule::Custom { interval_days } => {
                format!("FREQ=DAILY;INTERVAL={interval_days}")
            }
        }
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RecurrenceRule::Weekly { days } => {
                let names: Vec<_> = days.iter().map(|d| short_weekday_name(*d)).collect();
                write!(f, "Weekly on {}", names.join(", "))
            }
            RecurrenceRule::MonthlyByDate { day } => write!(f, "Monthly on day {day}"),
            RecurrenceRule::MonthlyByWeekday { weekday, week } => write!(
                f,
                "Monthly on the {} {}",
                ordinal(*week),
                weekday_name(*weekday)
            ),
            RecurrenceRule::Yearly { month, day } => {
                write!(f, "Yearly on {} {day}", month_name(*month))
            }
            RecurrenceRule::Custom { interval_days: 1 } => write!(f, "Every day"),
            RecurrenceRule::Custom { interval_days } => write!(f, "Every {interval_days} days"),
        }
    }
}

/// 0 = Sunday .. 6 = Saturday
pub fn weekday_from_index(index: i64) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

fn day_of_month(day: i64) -> Option<u32> {
    match day {
        1..=31 => Some(day as u32),
        _ => None,
    }
}

fn ics_weekday(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "SU",
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
    }
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "Sunday",
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
    }
}

fn short_weekday_name(day: Weekday) -> &'static str {
    &weekday_name(day)[..3]
}

fn month_name(month: u32) -> &'static str {
    const NAMES: [&str; 12] = [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ];
    NAMES
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("?")
}

fn ordinal(n: u8) -> &'static str {
    match n {
        1 => "1st",
        2 => "2nd",
        3 => "3rd",
        4 => "4th",
        _ => "5th",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::RecurringConfig;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn template(kind: &str, config: RecurringConfig) -> EventTemplate {
        // 2025-01-15 is the 3rd Wednesday of January
        let mut t = EventTemplate::new("t1", "Test", kind, date(2025, 1, 15));
        t.recurring_config = config;
        t
    }

    #[test]
    fn test_weekly_defaults_to_start_weekday() {
        let rule = RecurrenceRule::from_template(&template("weekly", RecurringConfig::default())).unwrap();
        assert_eq!(rule, RecurrenceRule::Weekly { days: vec![Weekday::Wed] });

        let empty = RecurringConfig {
            days_of_week: Some(vec![]),
            ..Default::default()
        };
        let rule = RecurrenceRule::from_template(&template("weekly", empty)).unwrap();
        assert_eq!(rule, RecurrenceRule::Weekly { days: vec![Weekday::Wed] });
    }

    #[test]
    fn test_weekly_days_are_sorted_and_deduplicated() {
        let config = RecurringConfig {
            days_of_week: Some(vec![3, 0, 3, 6]),
            ..Default::default()
        };
        let rule = RecurrenceRule::from_template(&template("weekly", config)).unwrap();
        assert_eq!(
            rule,
            RecurrenceRule::Weekly {
                days: vec![Weekday::Sun, Weekday::Wed, Weekday::Sat]
            }
        );
    }

    #[test]
    fn test_weekly_rejects_out_of_range_day() {
        let config = RecurringConfig {
            days_of_week: Some(vec![0, 7]),
            ..Default::default()
        };
        let err = RecurrenceRule::from_template(&template("weekly", config)).unwrap_err();
        assert!(matches!(err, EventideError::MalformedConfig { .. }), "got {err:?}");
    }

    #[test]
    fn test_monthly_defaults_from_start_date() {
        let rule = RecurrenceRule::from_template(&template("monthly", RecurringConfig::default())).unwrap();
        assert_eq!(rule, RecurrenceRule::MonthlyByDate { day: 15 });

        let config = RecurringConfig {
            monthly_type: Some("weekday".into()),
            ..Default::default()
        };
        let rule = RecurrenceRule::from_template(&template("monthly", config)).unwrap();
        assert_eq!(
            rule,
            RecurrenceRule::MonthlyByWeekday {
                weekday: Weekday::Wed,
                week: 3
            }
        );
    }

    #[test]
    fn test_monthly_rejects_bad_fields() {
        let cases = [
            RecurringConfig {
                monthly_type: Some("fortnight".into()),
                ..Default::default()
            },
            RecurringConfig {
                day_of_month: Some(32),
                ..Default::default()
            },
            RecurringConfig {
                monthly_type: Some("weekday".into()),
                week_of_month: Some(6),
                ..Default::default()
            },
            RecurringConfig {
                monthly_type: Some("weekday".into()),
                day_of_week: Some(-1),
                ..Default::default()
            },
        ];

        for config in cases {
            let result = RecurrenceRule::from_template(&template("monthly", config.clone()));
            assert!(
                matches!(result, Err(EventideError::MalformedConfig { .. })),
                "config {config:?} should be malformed, got {result:?}"
            );
        }
    }

    #[test]
    fn test_yearly_month_is_zero_based() {
        let config = RecurringConfig {
            month: Some(11),
            day_of_month: Some(25),
            ..Default::default()
        };
        let rule = RecurrenceRule::from_template(&template("yearly", config)).unwrap();
        assert_eq!(rule, RecurrenceRule::Yearly { month: 12, day: 25 });
    }

    #[test]
    fn test_yearly_accepts_leap_day_but_not_impossible_dates() {
        let leap = RecurringConfig {
            month: Some(1),
            day_of_month: Some(29),
            ..Default::default()
        };
        assert!(RecurrenceRule::from_template(&template("yearly", leap)).is_ok());

        let impossible = RecurringConfig {
            month: Some(3),
            day_of_month: Some(31),
            ..Default::default()
        };
        let err = RecurrenceRule::from_template(&template("yearly", impossible)).unwrap_err();
        assert!(err.to_string().contains("April 31"), "got {err}");
    }

    #[test]
    fn test_custom_requires_positive_interval() {
        let missing = RecurrenceRule::from_template(&template("custom", RecurringConfig::default()));
        assert!(matches!(missing, Err(EventideError::MalformedConfig { .. })));

        let zero = RecurringConfig {
            interval_days: Some(0),
            ..Default::default()
        };
        assert!(RecurrenceRule::from_template(&template("custom", zero)).is_err());

        let ok = RecurringConfig {
            interval_days: Some(14),
            ..Default::default()
        };
        assert_eq!(
            RecurrenceRule::from_template(&template("custom", ok)).unwrap(),
            RecurrenceRule::Custom { interval_days: 14 }
        );
    }

    #[test]
    fn test_unknown_type_is_unsupported() {
        let err = RecurrenceRule::from_template(&template("biweekly", RecurringConfig::default())).unwrap_err();
        match err {
            EventideError::UnsupportedRecurrenceType { template, kind } => {
                assert_eq!(template, "t1");
                assert_eq!(kind, "biweekly");
            }
            other => panic!("Expected UnsupportedRecurrenceType, got {:?}", other),
        }
    }

    #[test]
    fn test_type_tag_is_case_insensitive() {
        assert_eq!(" Weekly ".parse::<RecurringType>(), Ok(RecurringType::Weekly));
        assert_eq!("MONTHLY".parse::<RecurringType>(), Ok(RecurringType::Monthly));
    }

    #[test]
    fn test_monthly_type_is_case_insensitive() {
        let config = RecurringConfig {
            monthly_type: Some(" Weekday".into()),
            ..Default::default()
        };
        let rule = RecurrenceRule::from_template(&template("monthly", config)).unwrap();
        assert_eq!(
            rule,
            RecurrenceRule::MonthlyByWeekday {
                weekday: Weekday::Wed,
                week: 3
            }
        );

        let config = RecurringConfig {
            monthly_type: Some("DATE".into()),
            day_of_month: Some(1),
            ..Default::default()
        };
        let rule = RecurrenceRule::from_template(&template("monthly", config)).unwrap();
        assert_eq!(rule, RecurrenceRule::MonthlyByDate { day: 1 });
    }

    #[test]
    fn test_to_rrule() {
        assert_eq!(
            RecurrenceRule::Weekly {
                days: vec![Weekday::Sun, Weekday::Wed]
            }
            .to_rrule(),
            "FREQ=WEEKLY;BYDAY=SU,WE"
        );
        assert_eq!(
            RecurrenceRule::MonthlyByWeekday {
                weekday: Weekday::Sun,
                week: 2
            }
            .to_rrule(),
            "FREQ=MONTHLY;BYDAY=2SU"
        );
        assert_eq!(
            RecurrenceRule::Yearly { month: 12, day: 25 }.to_rrule(),
            "FREQ=YEARLY;BYMONTH=12;BYMONTHDAY=25"
        );
        assert_eq!(
            RecurrenceRule::Custom { interval_days: 7 }.to_rrule(),
            "FREQ=DAILY;INTERVAL=7"
        );
    }

    #[test]
    fn test_display_summaries() {
        assert_eq!(
            RecurrenceRule::Weekly {
                days: vec![Weekday::Sun, Weekday::Wed]
            }
            .to_string(),
            "Weekly on Sun, Wed"
        );
        assert_eq!(
            RecurrenceRule::MonthlyByWeekday {
                weekday: Weekday::Fri,
                week: 1
            }
            .to_string(),
            "Monthly on the 1st Friday"
        );
        assert_eq!(
            RecurrenceRule::Yearly { month: 12, day: 24 }.to_string(),
            "Yearly on December 24"
        );
        assert_eq!(RecurrenceRule::Custom { interval_days: 1 }.to_string(), "Every day");
    }
}
