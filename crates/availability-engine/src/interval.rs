//! Time slots and the overlap algebra over them.
//!
//! Slots keep the user's raw strings so that half-typed or malformed input can
//! still be shown back; comparisons go through [`Span`], the parsed and
//! rollover-adjusted minute range. Spans are half-open: a slot ending at
//! 5:00 PM and one starting at 5:00 PM do NOT overlap.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::SlotDefaults;
use crate::error::Result;
use crate::time_code::{TimeCode, MINUTES_PER_DAY};

/// Opaque slot identifier. A missing id on deserialisation gets a fresh one.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotId(String);

impl SlotId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SlotId {
    fn default() -> Self {
        Self::generate()
    }
}

impl From<&str> for SlotId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SlotId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A start–end pair of user-entered times, owned by one weekday or one
/// date override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    #[serde(default)]
    pub id: SlotId,
    pub start: String,
    pub end: String,
}

impl Slot {
    /// A slot with a freshly generated id.
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            id: SlotId::generate(),
            start: start.into(),
            end: end.into(),
        }
    }

    pub fn with_id(id: impl Into<SlotId>, start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            start: start.into(),
            end: end.into(),
        }
    }

    /// Same times, new identity.
    pub fn duplicate(&self) -> Self {
        Self::new(self.start.clone(), self.end.clone())
    }

    pub fn start_code(&self) -> Result<TimeCode> {
        TimeCode::parse(&self.start)
    }

    pub fn end_code(&self) -> Result<TimeCode> {
        TimeCode::parse(&self.end)
    }

    /// Parsed, rollover-adjusted range of this slot.
    pub fn span(&self) -> Result<Span> {
        Ok(rollover_adjust(Span::new(self.start_code()?, self.end_code()?)))
    }

    /// Both times parse and are equal. Rollover would stretch such a slot to a
    /// full day, so it is rejected as a range error instead.
    pub fn is_zero_length(&self) -> bool {
        matches!((self.start_code(), self.end_code()), (Ok(a), Ok(b)) if a == b)
    }
}

/// Which end of a slot a field-level edit or error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotField {
    Start,
    End,
}

impl fmt::Display for SlotField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotField::Start => f.write_str("start"),
            SlotField::End => f.write_str("end"),
        }
    }
}

/// Replace one field of the slot with `id`, leaving the rest of the list as is.
pub fn update_slot_field(slots: &[Slot], id: &SlotId, field: SlotField, value: &str) -> Vec<Slot> {
    slots
        .iter()
        .map(|slot| {
            if &slot.id != id {
                return slot.clone();
            }
            let mut updated = slot.clone();
            match field {
                SlotField::Start => updated.start = value.to_string(),
                SlotField::End => updated.end = value.to_string(),
            }
            updated
        })
        .collect()
}

/// A comparable minute range. `end` may exceed one day after rollover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: TimeCode,
    pub end: TimeCode,
}

impl Span {
    pub const fn new(start: TimeCode, end: TimeCode) -> Self {
        Self { start, end }
    }

    pub fn duration_minutes(&self) -> i64 {
        self.end.minutes() as i64 - self.start.minutes() as i64
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        overlaps(self, other)
    }
}

/// Two spans overlap iff `a.start < b.end && b.start < a.end`.
pub fn overlaps(a: &Span, b: &Span) -> bool {
    a.start < b.end && b.start < a.end
}

/// Treat a span as crossing midnight when its end is not after its start, or
/// when the end falls within the first hour of the day. Only the comparison
/// value moves; the slot's display strings stay as typed.
///
/// This is a heuristic: a genuinely short slot such as 12:00 AM–12:30 AM is
/// read as running into the following night.
pub fn rollover_adjust(span: Span) -> Span {
    let start = span.start.minutes();
    let end = span.end.minutes();
    if end < MINUTES_PER_DAY && (end <= start || end < 60) {
        Span::new(span.start, TimeCode::from_minutes(end + MINUTES_PER_DAY))
    } else {
        span
    }
}

/// Pairwise check over every unordered pair; stops at the first collision.
pub fn has_any_overlap(spans: &[Span]) -> bool {
    spans.iter().enumerate().any(|(i, a)| {
        spans[i + 1..].iter().any(|b| overlaps(a, b))
    })
}

/// [`has_any_overlap`] over slots. Slots whose times do not parse, and
/// zero-length slots, are left out; they are reported as their own errors.
pub fn slots_overlap(slots: &[Slot]) -> bool {
    let spans: Vec<Span> = slots
        .iter()
        .filter(|s| !s.is_zero_length())
        .filter_map(|s| s.span().ok())
        .collect();
    has_any_overlap(&spans)
}

/// Propose the next slot to append to `existing`.
///
/// With no slots this is the default window. Otherwise the LAST slot in list
/// order (not the latest by time) anchors the suggestion: it starts
/// `suggestion_gap_minutes` after that slot's adjusted end and lasts
/// `suggestion_length_minutes`. No free-gap search happens, so callers must
/// still check the result for overlap.
pub fn suggest_next(existing: &[Slot], defaults: &SlotDefaults) -> Slot {
    let anchor = match existing.last().map(Slot::span) {
        Some(Ok(span)) => span,
        _ => return defaults.default_slot(),
    };

    let start = anchor.end.minutes().saturating_add(defaults.suggestion_gap_minutes);
    let end = start.saturating_add(defaults.suggestion_length_minutes);
    Slot::new(
        TimeCode::from_minutes(start).format(),
        TimeCode::from_minutes(end).format(),
    )
}
