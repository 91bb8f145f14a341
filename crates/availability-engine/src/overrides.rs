//! One-off, date-specific replacements of the weekly template.
//!
//! At most one override exists per calendar date. Writing an override for a
//! date that already has one replaces the old record outright; slot lists are
//! never merged, because a revised date states the complete new truth for
//! that day.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::interval::{self, Slot, SlotField, SlotId};

/// Opaque override identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverrideId(String);

impl OverrideId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for OverrideId {
    fn default() -> Self {
        Self::generate()
    }
}

impl From<&str> for OverrideId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for OverrideId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for OverrideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateOverride {
    #[serde(default)]
    pub id: OverrideId,
    #[serde(with = "date_only")]
    pub date: NaiveDate,
    #[serde(default)]
    pub slots: Vec<Slot>,
    #[serde(default)]
    pub is_unavailable: bool,
}

impl DateOverride {
    /// A new record with a fresh id. An unavailable override carries no slots.
    pub fn new(date: NaiveDate, slots: Vec<Slot>, is_unavailable: bool) -> Self {
        Self {
            id: OverrideId::generate(),
            date,
            slots: if is_unavailable { Vec::new() } else { slots },
            is_unavailable,
        }
    }

    /// Slots that apply on this date.
    pub fn effective_slots(&self) -> &[Slot] {
        if self.is_unavailable {
            &[]
        } else {
            &self.slots
        }
    }
}

/// The override list of one schedule, in user order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<DateOverride>", into = "Vec<DateOverride>")]
pub struct DateOverrides {
    items: Vec<DateOverride>,
}

impl DateOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DateOverride> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[DateOverride] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The override for `date`, if any.
    pub fn get(&self, date: NaiveDate) -> Option<&DateOverride> {
        self.items.iter().find(|o| o.date == date)
    }

    /// Write the override for `date`.
    ///
    /// An existing record for the same calendar date is discarded and the new
    /// one (fresh id, given payload) takes its position; otherwise the record
    /// is appended.
    pub fn upsert(&self, date: NaiveDate, slots: Vec<Slot>, is_unavailable: bool) -> Self {
        self.insert(DateOverride::new(date, slots, is_unavailable))
    }

    /// Like [`upsert`](Self::upsert) with a prepared record.
    pub fn insert(&self, record: DateOverride) -> Self {
        let mut record = record;
        if record.is_unavailable {
            record.slots.clear();
        }
        let mut items = self.items.clone();
        match items.iter().position(|o| o.date == record.date) {
            Some(i) => items[i] = record,
            None => items.push(record),
        }
        Self { items }
    }

    /// Delete by identity. Unknown ids leave the list unchanged.
    pub fn remove(&self, id: &OverrideId) -> Self {
        Self {
            items: self.items.iter().filter(|o| &o.id != id).cloned().collect(),
        }
    }

    /// Dates whose override slots collide, in list order.
    pub fn overlapping_dates(&self) -> Vec<NaiveDate> {
        self.items
            .iter()
            .filter(|o| interval::slots_overlap(o.effective_slots()))
            .map(|o| o.date)
            .collect()
    }
}

impl From<Vec<DateOverride>> for DateOverrides {
    /// Later records for an already-seen date replace earlier ones.
    fn from(records: Vec<DateOverride>) -> Self {
        records
            .into_iter()
            .fold(DateOverrides::new(), |acc, record| acc.insert(record))
    }
}

impl From<DateOverrides> for Vec<DateOverride> {
    fn from(o: DateOverrides) -> Self {
        o.items
    }
}

impl<'a> IntoIterator for &'a DateOverrides {
    type Item = &'a DateOverride;
    type IntoIter = std::slice::Iter<'a, DateOverride>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Overlap check for the slot list being edited for a single date, before it
/// is committed with [`DateOverrides::upsert`].
pub fn overlaps_in_dialog(slots: &[Slot]) -> bool {
    interval::slots_overlap(slots)
}

/// Field edit on a draft slot list (same semantics as the weekly template).
pub fn update_draft_slot(slots: &[Slot], id: &SlotId, field: SlotField, value: &str) -> Vec<Slot> {
    interval::update_slot_field(slots, id, field, value)
}

/// Serde adapter: writes `YYYY-MM-DD`; reads a plain date or any date-time
/// string and keeps only its calendar date.
pub mod date_only {
    use chrono::{DateTime, NaiveDate, NaiveDateTime};
    use serde::{de, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid date: {:?}", raw)))
    }

    /// Calendar date of `raw`, ignoring any time-of-day or offset.
    pub fn parse(raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        if let Ok(d) = NaiveDate::parse_from_str(raw, FORMAT) {
            return Some(d);
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.date_naive());
        }
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|dt| dt.date())
    }
}
