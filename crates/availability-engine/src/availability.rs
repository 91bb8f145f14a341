//! Resolve the weekly template against date overrides.
//!
//! For any calendar date the effective hours come from exactly one place: the
//! override for that date if one exists, otherwise the template's entry for
//! that weekday. Overrides replace; they never add to the weekly hours.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::interval::Slot;
use crate::overrides::DateOverrides;
use crate::weekly::{Day, WeeklyTemplate};

/// Where a resolved day's hours came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Weekly,
    Override,
}

/// The effective availability of one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedDay {
    pub date: NaiveDate,
    pub day: Day,
    pub source: Source,
    /// Empty when the date is unavailable.
    pub slots: Vec<Slot>,
}

impl ResolvedDay {
    pub fn is_available(&self) -> bool {
        !self.slots.is_empty()
    }
}

/// Effective availability for `date`.
pub fn resolve_date(template: &WeeklyTemplate, overrides: &DateOverrides, date: NaiveDate) -> ResolvedDay {
    let day = Day::of_date(date);

    match overrides.get(date) {
        Some(o) => ResolvedDay {
            date,
            day,
            source: Source::Override,
            slots: o.effective_slots().to_vec(),
        },
        None => ResolvedDay {
            date,
            day,
            source: Source::Weekly,
            slots: template.day(day).effective_slots().to_vec(),
        },
    }
}

/// Effective availability for every date in `from..=to`. Empty when
/// `from > to`.
pub fn resolve_range(
    template: &WeeklyTemplate,
    overrides: &DateOverrides,
    from: NaiveDate,
    to: NaiveDate,
) -> Vec<ResolvedDay> {
    from.iter_days()
        .take_while(|d| *d <= to)
        .map(|d| resolve_date(template, overrides, d))
        .collect()
}
