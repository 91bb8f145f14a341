//! In-memory [`ScheduleStore`] with the schedule registry operations an
//! owner performs: create, rename, set default, duplicate, delete.
//!
//! Availability is kept in the flat [`AvailabilityRow`] form, the same shape a
//! relational backend stores, so loads go through the row → template
//! reconstruction a real store would use.

use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::diff::{CategoryId, LinkedCategorySet};
use crate::error::{Result, ScheduleError};
use crate::interval::Slot;
use crate::overrides::DateOverrides;
use crate::rows::{self, AvailabilityRow};
use crate::schedule::{Schedule, ScheduleConfig, ScheduleId, ScheduleStore};
use crate::weekly::{DayAvailability, WeeklyTemplate};

#[derive(Debug, Clone)]
struct Entry {
    schedule: Schedule,
    /// `None` until the availability is saved for the first time.
    rows: Option<Vec<AvailabilityRow>>,
    links: LinkedCategorySet,
}

#[derive(Debug, Clone)]
pub struct MemoryStore {
    config: EngineConfig,
    /// Creation order.
    entries: Vec<Entry>,
}

impl MemoryStore {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            entries: Vec::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn list_schedules(&self) -> Vec<Schedule> {
        self.entries.iter().map(|e| e.schedule.clone()).collect()
    }

    pub fn schedule(&self, id: &ScheduleId) -> Result<&Schedule> {
        self.entry(id).map(|e| &e.schedule)
    }

    pub fn default_schedule(&self) -> Option<&Schedule> {
        self.entries
            .iter()
            .map(|e| &e.schedule)
            .find(|s| s.is_default)
    }

    /// The schedule a category is currently linked to.
    pub fn schedule_for_category(&self, category: &CategoryId) -> Option<&Schedule> {
        self.entries
            .iter()
            .find(|e| e.links.contains(category))
            .map(|e| &e.schedule)
    }

    /// Stored rows of a schedule (empty if never saved).
    pub fn rows(&self, id: &ScheduleId) -> Result<&[AvailabilityRow]> {
        Ok(self.entry(id)?.rows.as_deref().unwrap_or(&[]))
    }

    /// Add a schedule. The first schedule is always the default; a new
    /// default takes the flag from every other schedule.
    pub fn create_schedule(&mut self, name: &str, is_default: bool) -> Result<Schedule> {
        let name = self.check_name(name, None)?;
        let is_default = is_default || self.entries.is_empty();
        if is_default {
            self.clear_default();
        }

        let schedule = Schedule {
            id: ScheduleId::generate(),
            name,
            is_default,
            booking_buffer_hours: self.config.default_booking_buffer_hours,
        };
        self.entries.push(Entry {
            schedule: schedule.clone(),
            rows: None,
            links: LinkedCategorySet::new(),
        });
        info!(schedule_id = %schedule.id, name = %schedule.name, "schedule created");
        Ok(schedule)
    }

    pub fn rename_schedule(&mut self, id: &ScheduleId, name: &str) -> Result<Schedule> {
        let name = self.check_name(name, Some(id))?;
        let entry = self.entry_mut(id)?;
        entry.schedule.name = name;
        Ok(entry.schedule.clone())
    }

    pub fn set_default(&mut self, id: &ScheduleId) -> Result<()> {
        self.entry(id)?;
        self.clear_default();
        self.entry_mut(id)?.schedule.is_default = true;
        Ok(())
    }

    /// Remove a schedule with its availability and links. The last schedule
    /// cannot be deleted; removing the default hands the flag to the
    /// earliest-created remaining schedule.
    pub fn delete_schedule(&mut self, id: &ScheduleId) -> Result<()> {
        let pos = self.position(id)?;
        if self.entries.len() <= 1 {
            return Err(ScheduleError::LastSchedule);
        }
        let removed = self.entries.remove(pos);
        if removed.schedule.is_default {
            if let Some(first) = self.entries.first_mut() {
                first.schedule.is_default = true;
            }
        }
        info!(schedule_id = %id, "schedule deleted");
        Ok(())
    }

    /// Copy a schedule's availability and buffer into a new, non-default
    /// schedule named "<name> (copy)". Category links are not copied.
    pub fn duplicate_schedule(&mut self, id: &ScheduleId) -> Result<Schedule> {
        let source = self.entry(id)?.clone();
        let base = format!("{} (copy)", source.schedule.name);
        let mut name = base.clone();
        let mut n = 2;
        while self.name_taken(&name, None) {
            name = format!("{} {}", base, n);
            n += 1;
        }

        let schedule = Schedule {
            id: ScheduleId::generate(),
            name,
            is_default: false,
            booking_buffer_hours: source.schedule.booking_buffer_hours,
        };
        // Fresh identities for the copied slots and overrides.
        let rows = source.rows.as_ref().map(|_| {
            let config = self.load_entry(&source);
            copy_rows(&config.weekly, &config.overrides)
        });
        self.entries.push(Entry {
            schedule: schedule.clone(),
            rows,
            links: LinkedCategorySet::new(),
        });
        info!(source = %id, schedule_id = %schedule.id, "schedule duplicated");
        Ok(schedule)
    }

    fn load_entry(&self, entry: &Entry) -> ScheduleConfig {
        match &entry.rows {
            Some(rows) => {
                let (weekly, overrides) = rows::from_rows(rows);
                ScheduleConfig {
                    weekly,
                    overrides,
                    booking_buffer_hours: entry.schedule.booking_buffer_hours,
                }
            }
            None => ScheduleConfig {
                booking_buffer_hours: entry.schedule.booking_buffer_hours,
                ..ScheduleConfig::initial(&self.config)
            },
        }
    }

    fn check_name(&self, name: &str, except: Option<&ScheduleId>) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ScheduleError::Config("schedule name must not be empty".to_string()));
        }
        if self.name_taken(name, except) {
            return Err(ScheduleError::DuplicateName(name.to_string()));
        }
        Ok(name.to_string())
    }

    fn name_taken(&self, name: &str, except: Option<&ScheduleId>) -> bool {
        self.entries
            .iter()
            .any(|e| e.schedule.name == name && Some(&e.schedule.id) != except)
    }

    fn clear_default(&mut self) {
        for e in &mut self.entries {
            e.schedule.is_default = false;
        }
    }

    fn position(&self, id: &ScheduleId) -> Result<usize> {
        self.entries
            .iter()
            .position(|e| &e.schedule.id == id)
            .ok_or_else(|| ScheduleError::NotFound(id.clone()))
    }

    fn entry(&self, id: &ScheduleId) -> Result<&Entry> {
        self.position(id).map(|i| &self.entries[i])
    }

    fn entry_mut(&mut self, id: &ScheduleId) -> Result<&mut Entry> {
        let i = self.position(id)?;
        Ok(&mut self.entries[i])
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

fn copy_rows(weekly: &WeeklyTemplate, overrides: &DateOverrides) -> Vec<AvailabilityRow> {
    let days = weekly.days().iter().map(|d| DayAvailability {
        day: d.day,
        available: d.available,
        slots: d.slots.iter().map(Slot::duplicate).collect(),
    });
    // Same days as a valid template, so no duplicates can occur.
    let weekly_copy = WeeklyTemplate::from_days(days).unwrap_or_else(|_| weekly.clone());
    let overrides_copy = overrides.iter().fold(DateOverrides::new(), |acc, o| {
        acc.upsert(o.date, o.slots.iter().map(Slot::duplicate).collect(), o.is_unavailable)
    });
    rows::to_rows(&weekly_copy, &overrides_copy)
}

impl ScheduleStore for MemoryStore {
    fn load_schedule_config(&self, id: &ScheduleId) -> Result<ScheduleConfig> {
        let entry = self.entry(id)?;
        Ok(self.load_entry(entry))
    }

    fn save_schedule_config(
        &mut self,
        id: &ScheduleId,
        weekly: &WeeklyTemplate,
        overrides: &DateOverrides,
    ) -> Result<()> {
        let rows = rows::to_rows(weekly, overrides);
        debug!(schedule_id = %id, rows = rows.len(), "replacing availability rows");
        self.entry_mut(id)?.rows = Some(rows);
        Ok(())
    }

    fn save_booking_buffer(&mut self, id: &ScheduleId, hours: u32) -> Result<()> {
        self.entry_mut(id)?.schedule.booking_buffer_hours = hours;
        Ok(())
    }

    fn linked_categories(&self, id: &ScheduleId) -> Result<LinkedCategorySet> {
        Ok(self.entry(id)?.links.clone())
    }

    fn reconcile_category_links(
        &mut self,
        id: &ScheduleId,
        to_add: &[CategoryId],
        to_remove: &[CategoryId],
    ) -> Result<()> {
        self.entry(id)?;
        for e in &mut self.entries {
            if &e.schedule.id == id {
                for c in to_remove {
                    e.links.remove(c);
                }
                e.links.extend(to_add.iter().cloned());
            } else {
                // A category belongs to at most one schedule.
                for c in to_add {
                    e.links.remove(c);
                }
            }
        }
        Ok(())
    }
}
