//! Field-, slot- and list-level validation of time definitions.
//!
//! Problems are collected as data in a [`ValidationReport`] so that a caller
//! can show each one next to the input it concerns. A report with any issue
//! blocks saving; nothing in here raises an error by itself.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::interval::{self, Slot, SlotField, SlotId};
use crate::overrides::DateOverrides;
use crate::schedule::ScheduleConfig;
use crate::weekly::{Day, WeeklyTemplate};

/// The slot list an issue was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "scope", content = "value")]
pub enum Location {
    Day(Day),
    Date(NaiveDate),
    /// A slot list still being edited, not yet attached to a day or date.
    Draft,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Day(d) => write!(f, "{}", d),
            Location::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Location::Draft => f.write_str("draft"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum IssueKind {
    /// A time field does not parse.
    #[serde(rename_all = "camelCase")]
    InvalidTimeFormat {
        slot_id: SlotId,
        field: SlotField,
        value: String,
    },
    /// The end is not after the start even after midnight rollover.
    #[serde(rename_all = "camelCase")]
    RangeInvalid { slot_id: SlotId },
    /// Two or more slots in the list collide.
    OverlapDetected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub location: Location,
    #[serde(flatten)]
    pub kind: IssueKind,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            IssueKind::InvalidTimeFormat { field, value, .. } => write!(
                f,
                "{}: invalid {} time format {:?} (e.g., 09:00 AM)",
                self.location, field, value
            ),
            IssueKind::RangeInvalid { .. } => {
                write!(f, "{}: end time must be after start time", self.location)
            }
            IssueKind::OverlapDetected => {
                write!(f, "{}: time overlap with another set of times", self.location)
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn blocks_save(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Days flagged with an overlap, in report order.
    pub fn overlapping_days(&self) -> Vec<Day> {
        self.issues
            .iter()
            .filter_map(|i| match (i.location, &i.kind) {
                (Location::Day(d), IssueKind::OverlapDetected) => Some(d),
                _ => None,
            })
            .collect()
    }

    pub fn issues_for(&self, location: Location) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(move |i| i.location == location)
    }

    fn extend(&mut self, other: ValidationReport) {
        self.issues.extend(other.issues);
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self.issues.iter().map(ToString::to_string).collect();
        f.write_str(&lines.join("; "))
    }
}

/// Check one slot list: every field parses, no slot is zero-length, no two
/// slots overlap (at most one overlap issue per list).
pub fn validate_slots(location: Location, slots: &[Slot]) -> ValidationReport {
    let mut issues = Vec::new();

    for slot in slots {
        let start = slot.start_code();
        let end = slot.end_code();
        for (field, parsed, value) in [
            (SlotField::Start, &start, &slot.start),
            (SlotField::End, &end, &slot.end),
        ] {
            if parsed.is_err() {
                issues.push(ValidationIssue {
                    location,
                    kind: IssueKind::InvalidTimeFormat {
                        slot_id: slot.id.clone(),
                        field,
                        value: value.clone(),
                    },
                });
            }
        }
        if slot.is_zero_length() {
            issues.push(ValidationIssue {
                location,
                kind: IssueKind::RangeInvalid {
                    slot_id: slot.id.clone(),
                },
            });
        }
    }

    if interval::slots_overlap(slots) {
        issues.push(ValidationIssue {
            location,
            kind: IssueKind::OverlapDetected,
        });
    }

    ValidationReport { issues }
}

/// Available days only; a closed day's leftover slots are not checked.
pub fn validate_template(template: &WeeklyTemplate) -> ValidationReport {
    let mut report = ValidationReport::default();
    for entry in template.days() {
        report.extend(validate_slots(Location::Day(entry.day), entry.effective_slots()));
    }
    report
}

pub fn validate_overrides(overrides: &DateOverrides) -> ValidationReport {
    let mut report = ValidationReport::default();
    for o in overrides {
        report.extend(validate_slots(Location::Date(o.date), o.effective_slots()));
    }
    report
}

pub fn validate_config(config: &ScheduleConfig) -> ValidationReport {
    let mut report = validate_template(&config.weekly);
    report.extend(validate_overrides(&config.overrides));
    report
}
