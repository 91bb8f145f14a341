//! Change detection between configuration snapshots, and membership deltas
//! for linking event categories to a schedule.
//!
//! Equality here compares content and is order-sensitive: slot lists are
//! ordered by the user, so reordering counts as an edit, while generated ids
//! do not take part.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::interval::Slot;
use crate::overrides::DateOverrides;
use crate::schedule::ScheduleConfig;
use crate::weekly::WeeklyTemplate;

/// Identifier of an external bookable category ("event type"). Compared by
/// value only.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(String);

impl CategoryId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CategoryId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for CategoryId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The set of categories linked to one schedule.
pub type LinkedCategorySet = BTreeSet<CategoryId>;

/// Same times in the same order. Slot ids are ignored: a slot read without an
/// id gets a fresh one on every load.
fn slots_equal(a: &[Slot], b: &[Slot]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.start == y.start && x.end == y.end)
}

pub fn template_equals(a: &WeeklyTemplate, b: &WeeklyTemplate) -> bool {
    a.days().len() == b.days().len()
        && a.days().iter().zip(b.days()).all(|(x, y)| {
            x.day == y.day && x.available == y.available && slots_equal(&x.slots, &y.slots)
        })
}

/// Record ids are ignored, like slot ids.
pub fn overrides_equal(a: &DateOverrides, b: &DateOverrides) -> bool {
    a.len() == b.len()
        && a.iter().zip(b.iter()).all(|(x, y)| {
            x.date == y.date
                && x.is_unavailable == y.is_unavailable
                && slots_equal(&x.slots, &y.slots)
        })
}

/// What differs between a working copy and the snapshot it started from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Changes {
    pub weekly: bool,
    pub overrides: bool,
    pub booking_buffer: bool,
}

impl Changes {
    pub fn between(current: &ScheduleConfig, original: &ScheduleConfig) -> Self {
        Self {
            weekly: !template_equals(&current.weekly, &original.weekly),
            overrides: !overrides_equal(&current.overrides, &original.overrides),
            booking_buffer: current.booking_buffer_hours != original.booking_buffer_hours,
        }
    }

    /// Template or overrides changed (the part saved together).
    pub fn availability(&self) -> bool {
        self.weekly || self.overrides
    }

    pub fn any(&self) -> bool {
        self.weekly || self.overrides || self.booking_buffer
    }
}

pub fn is_dirty(current: &ScheduleConfig, original: &ScheduleConfig) -> bool {
    Changes::between(current, original).any()
}

/// Operations that turn a current membership into a desired one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipDelta<T> {
    pub to_add: Vec<T>,
    pub to_remove: Vec<T>,
}

impl<T> MembershipDelta<T> {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// `desired − current` to add, `current − desired` to remove, both in
/// ascending order.
///
/// Stateless: if applying a delta only partly succeeds, re-read `current`
/// and call this again rather than patching the old delta.
pub fn membership_delta<T: Ord + Clone>(current: &BTreeSet<T>, desired: &BTreeSet<T>) -> MembershipDelta<T> {
    MembershipDelta {
        to_add: desired.difference(current).cloned().collect(),
        to_remove: current.difference(desired).cloned().collect(),
    }
}
