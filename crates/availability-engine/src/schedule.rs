//! Schedules, the persistence contract, and the editing session.
//!
//! A schedule's weekly template, date overrides and booking buffer load and
//! save as one unit keyed by [`ScheduleId`]. Storage itself sits behind
//! [`ScheduleStore`]; [`ScheduleEditor`] is the caller-held session that edits
//! a working copy, tracks it against the last saved snapshot, and refuses to
//! persist anything that fails validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{EngineConfig, SlotDefaults};
use crate::diff::{self, CategoryId, Changes, LinkedCategorySet, MembershipDelta};
use crate::error::{Result, ScheduleError};
use crate::overrides::DateOverrides;
use crate::validate::{self, ValidationReport};
use crate::weekly::WeeklyTemplate;

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScheduleId(String);

impl ScheduleId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ScheduleId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ScheduleId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for ScheduleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named bundle of weekly template, overrides and booking buffer.
///
/// At most one schedule per owner is the default; the store maintains that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: ScheduleId,
    pub name: String,
    pub is_default: bool,
    pub booking_buffer_hours: u32,
}

/// Everything that is loaded and saved for one schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleConfig {
    #[serde(default)]
    pub weekly: WeeklyTemplate,
    #[serde(default)]
    pub overrides: DateOverrides,
    #[serde(default = "default_buffer")]
    pub booking_buffer_hours: u32,
}

fn default_buffer() -> u32 {
    EngineConfig::default().default_booking_buffer_hours
}

impl ScheduleConfig {
    /// What a never-configured schedule starts with.
    pub fn initial(config: &EngineConfig) -> Self {
        Self {
            weekly: WeeklyTemplate::default_template(&config.slots),
            overrides: DateOverrides::new(),
            booking_buffer_hours: config.default_booking_buffer_hours,
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self::initial(&EngineConfig::default())
    }
}

// ---------------------------------------------------------------------------
// ScheduleStore
// ---------------------------------------------------------------------------

/// Persistence contract consumed by the engine.
///
/// Implementations report transport or storage failures as
/// [`ScheduleError::StoreUnavailable`] and unknown ids as
/// [`ScheduleError::NotFound`].
pub trait ScheduleStore {
    fn load_schedule_config(&self, id: &ScheduleId) -> Result<ScheduleConfig>;

    /// Replace the schedule's template and overrides.
    fn save_schedule_config(
        &mut self,
        id: &ScheduleId,
        weekly: &WeeklyTemplate,
        overrides: &DateOverrides,
    ) -> Result<()>;

    fn save_booking_buffer(&mut self, id: &ScheduleId, hours: u32) -> Result<()>;

    fn linked_categories(&self, id: &ScheduleId) -> Result<LinkedCategorySet>;

    /// Apply link changes. When only some succeed, the failures come back as
    /// [`ScheduleError::PartialLinkFailure`] and the successes stay applied.
    fn reconcile_category_links(
        &mut self,
        id: &ScheduleId,
        to_add: &[CategoryId],
        to_remove: &[CategoryId],
    ) -> Result<()>;
}

/// Bring the schedule's linked categories to `desired`.
///
/// The delta is computed against a fresh read of the current links. Returns
/// the delta that was applied (empty when nothing needed to change).
pub fn sync_category_links<S: ScheduleStore + ?Sized>(
    store: &mut S,
    id: &ScheduleId,
    desired: &LinkedCategorySet,
) -> Result<MembershipDelta<CategoryId>> {
    let current = store.linked_categories(id)?;
    let delta = diff::membership_delta(&current, desired);
    if delta.is_empty() {
        debug!(schedule_id = %id, "category links already up to date");
        return Ok(delta);
    }

    match store.reconcile_category_links(id, &delta.to_add, &delta.to_remove) {
        Ok(()) => {
            info!(
                schedule_id = %id,
                added = delta.to_add.len(),
                removed = delta.to_remove.len(),
                "category links reconciled"
            );
            Ok(delta)
        }
        Err(e) => {
            warn!(schedule_id = %id, error = %e, "category link reconciliation failed");
            Err(e)
        }
    }
}

// ---------------------------------------------------------------------------
// ScheduleEditor
// ---------------------------------------------------------------------------

/// Which parts a [`ScheduleEditor::save`] call wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveOutcome {
    pub availability_saved: bool,
    pub buffer_saved: bool,
}

/// An editing session over one schedule.
#[derive(Debug, Clone)]
pub struct ScheduleEditor {
    schedule_id: ScheduleId,
    defaults: SlotDefaults,
    original: ScheduleConfig,
    current: ScheduleConfig,
}

impl ScheduleEditor {
    pub fn new(schedule_id: ScheduleId, config: ScheduleConfig, defaults: SlotDefaults) -> Self {
        Self {
            schedule_id,
            defaults,
            original: config.clone(),
            current: config,
        }
    }

    pub fn load<S: ScheduleStore + ?Sized>(
        store: &S,
        schedule_id: ScheduleId,
        defaults: SlotDefaults,
    ) -> Result<Self> {
        let config = store.load_schedule_config(&schedule_id)?;
        debug!(schedule_id = %schedule_id, "schedule config loaded");
        Ok(Self::new(schedule_id, config, defaults))
    }

    pub fn schedule_id(&self) -> &ScheduleId {
        &self.schedule_id
    }

    pub fn defaults(&self) -> &SlotDefaults {
        &self.defaults
    }

    /// The working copy.
    pub fn current(&self) -> &ScheduleConfig {
        &self.current
    }

    /// The snapshot from the last successful load or save.
    pub fn original(&self) -> &ScheduleConfig {
        &self.original
    }

    /// Replace the template with the result of `f`.
    pub fn edit_weekly(&mut self, f: impl FnOnce(&WeeklyTemplate, &SlotDefaults) -> WeeklyTemplate) {
        self.current.weekly = f(&self.current.weekly, &self.defaults);
    }

    /// Replace the overrides with the result of `f`.
    pub fn edit_overrides(&mut self, f: impl FnOnce(&DateOverrides) -> DateOverrides) {
        self.current.overrides = f(&self.current.overrides);
    }

    pub fn set_booking_buffer(&mut self, hours: u32) {
        self.current.booking_buffer_hours = hours;
    }

    pub fn changes(&self) -> Changes {
        Changes::between(&self.current, &self.original)
    }

    pub fn is_dirty(&self) -> bool {
        diff::is_dirty(&self.current, &self.original)
    }

    /// Discard all edits since the last load or save.
    pub fn reset(&mut self) {
        self.current = self.original.clone();
    }

    pub fn validate(&self) -> ValidationReport {
        validate::validate_config(&self.current)
    }

    /// Persist whatever changed.
    ///
    /// Nothing is written when the working copy has validation issues. Each
    /// part (template + overrides, buffer) is only written when it differs
    /// from the snapshot, and the snapshot advances per part as writes
    /// succeed. On failure the working copy is left as it was.
    pub fn save<S: ScheduleStore + ?Sized>(&mut self, store: &mut S) -> Result<SaveOutcome> {
        let changes = self.changes();
        let mut outcome = SaveOutcome::default();
        if !changes.any() {
            debug!(schedule_id = %self.schedule_id, "nothing to save");
            return Ok(outcome);
        }

        if changes.availability() {
            let report = self.validate();
            if report.blocks_save() {
                warn!(
                    schedule_id = %self.schedule_id,
                    issues = report.issues.len(),
                    "save refused: availability has validation issues"
                );
                return Err(ScheduleError::SaveBlocked(report));
            }

            store
                .save_schedule_config(&self.schedule_id, &self.current.weekly, &self.current.overrides)
                .inspect_err(|e| warn!(schedule_id = %self.schedule_id, error = %e, "availability save failed"))?;
            self.original.weekly = self.current.weekly.clone();
            self.original.overrides = self.current.overrides.clone();
            outcome.availability_saved = true;
        }

        if changes.booking_buffer {
            self.save_booking_buffer(store)?;
            outcome.buffer_saved = true;
        }

        info!(
            schedule_id = %self.schedule_id,
            availability = outcome.availability_saved,
            buffer = outcome.buffer_saved,
            "schedule saved"
        );
        Ok(outcome)
    }

    /// Persist only the booking buffer, independent of template validity.
    pub fn save_booking_buffer<S: ScheduleStore + ?Sized>(&mut self, store: &mut S) -> Result<()> {
        let hours = self.current.booking_buffer_hours;
        store
            .save_booking_buffer(&self.schedule_id, hours)
            .inspect_err(|e| warn!(schedule_id = %self.schedule_id, error = %e, "booking buffer save failed"))?;
        self.original.booking_buffer_hours = hours;
        Ok(())
    }

    pub fn sync_categories<S: ScheduleStore + ?Sized>(
        &self,
        store: &mut S,
        desired: &LinkedCategorySet,
    ) -> Result<MembershipDelta<CategoryId>> {
        sync_category_links(store, &self.schedule_id, desired)
    }
}
