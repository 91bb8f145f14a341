//! Flat row form of a schedule's availability, one row per slot.
//!
//! This is the shape a relational store keeps: weekly rows keyed by weekday
//! number (0 = Sunday), override rows keyed by date. An override without
//! slots is a single row without times, flagged when it marks the date
//! unavailable.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::interval::{Slot, SlotId};
use crate::overrides::{date_only, DateOverride, DateOverrides, OverrideId};
use crate::weekly::{Day, DayAvailability, WeeklyTemplate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowKind {
    Weekly,
    Override,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRow {
    pub id: String,
    pub kind: RowKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "opt_date")]
    pub specific_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    /// Set on the single row of an override that closes its date. A row
    /// without times and without this flag is an override with no slots.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_unavailable: bool,
}

/// Flatten a template and its overrides. Closed days produce no rows.
pub fn to_rows(template: &WeeklyTemplate, overrides: &DateOverrides) -> Vec<AvailabilityRow> {
    let mut rows = Vec::new();

    for entry in template.days() {
        for slot in entry.effective_slots() {
            rows.push(AvailabilityRow {
                id: slot.id.to_string(),
                kind: RowKind::Weekly,
                day_of_week: Some(entry.day.index()),
                specific_date: None,
                override_id: None,
                start_time: Some(slot.start.clone()),
                end_time: Some(slot.end.clone()),
                is_unavailable: false,
            });
        }
    }

    for o in overrides {
        let base = AvailabilityRow {
            id: o.id.to_string(),
            kind: RowKind::Override,
            day_of_week: None,
            specific_date: Some(o.date),
            override_id: Some(o.id.to_string()),
            start_time: None,
            end_time: None,
            is_unavailable: o.is_unavailable,
        };
        if o.effective_slots().is_empty() {
            rows.push(base);
            continue;
        }
        for slot in &o.slots {
            rows.push(AvailabilityRow {
                id: slot.id.to_string(),
                start_time: Some(slot.start.clone()),
                end_time: Some(slot.end.clone()),
                ..base.clone()
            });
        }
    }

    rows
}

/// Rebuild a template and overrides from rows.
///
/// Weekdays without rows come back closed. Override rows are grouped by date
/// in first-seen order; a row flagged `is_unavailable` closes the date, a row
/// without times contributes no slot. Rows with an out-of-range weekday or no date are skipped.
pub fn from_rows(rows: &[AvailabilityRow]) -> (WeeklyTemplate, DateOverrides) {
    let mut weekly: Vec<Vec<Slot>> = vec![Vec::new(); 7];
    let mut groups: Vec<(NaiveDate, Option<String>, Vec<Slot>, bool)> = Vec::new();

    for row in rows {
        match row.kind {
            RowKind::Weekly => {
                let Some(day) = row.day_of_week.and_then(Day::from_index) else {
                    continue;
                };
                weekly[day.index() as usize].push(row_slot(row));
            }
            RowKind::Override => {
                let Some(date) = row.specific_date else {
                    continue;
                };
                let pos = match groups.iter().position(|g| g.0 == date) {
                    Some(p) => p,
                    None => {
                        groups.push((date, row.override_id.clone(), Vec::new(), false));
                        groups.len() - 1
                    }
                };
                if row.is_unavailable {
                    groups[pos].3 = true;
                } else if row.start_time.is_some() {
                    groups[pos].2.push(row_slot(row));
                }
            }
        }
    }

    let days = Day::ALL.into_iter().zip(weekly).map(|(day, slots)| DayAvailability {
        day,
        available: !slots.is_empty(),
        slots,
    });
    // Each weekday appears exactly once by construction.
    let template = WeeklyTemplate::from_days(days).unwrap_or_else(|_| WeeklyTemplate::closed());

    let overrides = groups
        .into_iter()
        .fold(DateOverrides::new(), |acc, (date, id, slots, unavailable)| {
            let mut record = DateOverride::new(date, slots, unavailable);
            if let Some(id) = id {
                record.id = OverrideId::from(id);
            }
            acc.insert(record)
        });

    (template, overrides)
}

fn row_slot(row: &AvailabilityRow) -> Slot {
    Slot::with_id(
        SlotId::from(row.id.as_str()),
        row.start_time.clone().unwrap_or_default(),
        row.end_time.clone().unwrap_or_default(),
    )
}

mod opt_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::date_only;

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => date_only::serialize(d, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => date_only::parse(&raw)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {:?}", raw))),
            None => Ok(None),
        }
    }
}
