//! The recurring weekly template: one availability flag and slot list per
//! weekday.
//!
//! Every edit returns a new [`WeeklyTemplate`]; the receiver is never touched,
//! so a retained copy can serve as the "last saved" snapshot for dirty checks
//! and resets.
//!
//! Two rules hold for every template this module produces:
//! - a day marked unavailable contributes no slots, even if stale ones are kept
//!   around for when it is switched back on;
//! - a day is never available with an empty slot list (auto-demotion).

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::config::SlotDefaults;
use crate::interval::{self, Slot, SlotField, SlotId};

// ---------------------------------------------------------------------------
// Day
// ---------------------------------------------------------------------------

/// Day of the week, Sunday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Day {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Day {
    pub const ALL: [Day; 7] = [
        Day::Sunday,
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
    ];

    /// Storage numbering: 0 = Sunday … 6 = Saturday.
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> Option<Day> {
        Day::ALL.get(index as usize).copied()
    }

    pub fn of_date(date: NaiveDate) -> Day {
        Day::from(date.weekday())
    }

    pub fn name(self) -> &'static str {
        match self {
            Day::Sunday => "Sunday",
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
        }
    }

    pub fn is_weekend(self) -> bool {
        matches!(self, Day::Saturday | Day::Sunday)
    }
}

impl From<Weekday> for Day {
    fn from(w: Weekday) -> Self {
        // num_days_from_sunday is always 0..=6
        Day::ALL[w.num_days_from_sunday() as usize]
    }
}

impl From<Day> for Weekday {
    fn from(d: Day) -> Self {
        match d {
            Day::Sunday => Weekday::Sun,
            Day::Monday => Weekday::Mon,
            Day::Tuesday => Weekday::Tue,
            Day::Wednesday => Weekday::Wed,
            Day::Thursday => Weekday::Thu,
            Day::Friday => Weekday::Fri,
            Day::Saturday => Weekday::Sat,
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Day {
    type Err = String;

    /// Accepts full names and three-letter abbreviations, any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Day::ALL
            .into_iter()
            .find(|d| {
                let name = d.name().to_ascii_lowercase();
                name == lower || name[..3] == lower
            })
            .ok_or_else(|| format!("unknown day: {:?}", s))
    }
}

// ---------------------------------------------------------------------------
// DayAvailability
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAvailability {
    pub day: Day,
    pub available: bool,
    #[serde(default)]
    pub slots: Vec<Slot>,
}

impl DayAvailability {
    pub fn unavailable(day: Day) -> Self {
        Self {
            day,
            available: false,
            slots: Vec::new(),
        }
    }

    /// Slots that count for availability and overlap purposes.
    pub fn effective_slots(&self) -> &[Slot] {
        if self.available {
            &self.slots
        } else {
            &[]
        }
    }

    fn demoted(mut self) -> Self {
        if self.slots.is_empty() {
            self.available = false;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// WeeklyTemplate
// ---------------------------------------------------------------------------

/// Seven [`DayAvailability`] entries, Sunday through Saturday.
///
/// Serialises as a JSON array. On input, entries may come in any order and
/// missing days are filled in as unavailable; a day listed twice is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<DayAvailability>", into = "Vec<DayAvailability>")]
pub struct WeeklyTemplate {
    days: Vec<DayAvailability>,
}

impl WeeklyTemplate {
    /// Every day unavailable.
    pub fn closed() -> Self {
        Self {
            days: Day::ALL.into_iter().map(DayAvailability::unavailable).collect(),
        }
    }

    /// Seed for a schedule that was never configured: Monday–Friday open for
    /// the default window, weekends closed.
    pub fn default_template(defaults: &SlotDefaults) -> Self {
        Self {
            days: Day::ALL
                .into_iter()
                .map(|day| {
                    if day.is_weekend() {
                        DayAvailability::unavailable(day)
                    } else {
                        DayAvailability {
                            day,
                            available: true,
                            slots: vec![defaults.default_slot()],
                        }
                    }
                })
                .collect(),
        }
    }

    /// Build from arbitrary entries, applying the template rules.
    ///
    /// # Errors
    /// Returns the offending day's name when it appears more than once.
    pub fn from_days(entries: impl IntoIterator<Item = DayAvailability>) -> Result<Self, String> {
        let mut days = Self::closed().days;
        let mut seen = [false; 7];
        for entry in entries {
            let i = entry.day.index() as usize;
            if seen[i] {
                return Err(format!("{} listed more than once", entry.day));
            }
            seen[i] = true;
            days[i] = entry.demoted();
        }
        Ok(Self { days })
    }

    pub fn days(&self) -> &[DayAvailability] {
        &self.days
    }

    pub fn day(&self, day: Day) -> &DayAvailability {
        &self.days[day.index() as usize]
    }

    /// Switch a day on or off.
    ///
    /// Opening a day with no slots seeds the default window. Closing a day
    /// keeps its slots (they are ignored until it reopens or they are removed).
    pub fn toggle_day(&self, day: Day, available: bool, defaults: &SlotDefaults) -> Self {
        self.with_day(day, |entry| {
            let slots = if available && entry.slots.is_empty() {
                vec![defaults.default_slot()]
            } else {
                entry.slots.clone()
            };
            DayAvailability {
                day,
                available,
                slots,
            }
        })
    }

    /// Append the suggested next slot; the day becomes available.
    pub fn add_slot(&self, day: Day, defaults: &SlotDefaults) -> Self {
        self.with_day(day, |entry| {
            // A closed day's stale slots do not anchor the suggestion.
            let mut slots = entry.effective_slots().to_vec();
            slots.push(interval::suggest_next(&slots, defaults));
            DayAvailability {
                day,
                available: true,
                slots,
            }
        })
    }

    /// Edit one field of one slot in place (by identity).
    pub fn update_slot(&self, day: Day, id: &SlotId, field: SlotField, value: &str) -> Self {
        self.with_day(day, |entry| DayAvailability {
            day,
            available: entry.available,
            slots: interval::update_slot_field(&entry.slots, id, field, value),
        })
    }

    /// Remove a slot by identity. Removing the last slot closes the day.
    pub fn remove_slot(&self, day: Day, id: &SlotId) -> Self {
        self.with_day(day, |entry| {
            DayAvailability {
                day,
                available: entry.available,
                slots: entry.slots.iter().filter(|s| &s.id != id).cloned().collect(),
            }
            .demoted()
        })
    }

    /// Replace `target`'s slots with copies (fresh ids) of `source`'s.
    ///
    /// No-op when the days are the same or `source` is closed.
    pub fn copy_slots(&self, source: Day, target: Day) -> Self {
        let from = self.day(source);
        if source == target || !from.available {
            return self.clone();
        }
        let copies: Vec<Slot> = from.slots.iter().map(Slot::duplicate).collect();
        self.with_day(target, move |_| {
            DayAvailability {
                day: target,
                available: true,
                slots: copies,
            }
            .demoted()
        })
    }

    /// Available days whose slots collide, Sunday first.
    pub fn overlaps_by_day(&self) -> Vec<Day> {
        self.days
            .iter()
            .filter(|d| d.available && interval::slots_overlap(&d.slots))
            .map(|d| d.day)
            .collect()
    }

    fn with_day(&self, day: Day, f: impl FnOnce(&DayAvailability) -> DayAvailability) -> Self {
        let mut days = self.days.clone();
        let i = day.index() as usize;
        days[i] = f(&self.days[i]);
        Self { days }
    }
}

impl TryFrom<Vec<DayAvailability>> for WeeklyTemplate {
    type Error = String;

    fn try_from(entries: Vec<DayAvailability>) -> Result<Self, Self::Error> {
        Self::from_days(entries)
    }
}

impl From<WeeklyTemplate> for Vec<DayAvailability> {
    fn from(t: WeeklyTemplate) -> Self {
        t.days
    }
}

impl Default for WeeklyTemplate {
    fn default() -> Self {
        Self::default_template(&SlotDefaults::default())
    }
}
