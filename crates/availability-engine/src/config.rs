//! Engine configuration: default slot window, suggestion spacing and booking
//! notice defaults.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};
use crate::interval::Slot;
use crate::time_code::TimeCode;

// -----------------------------------------------------------------------------
// EngineConfig (root)
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    #[serde(default)]
    pub slots: SlotDefaults,
    #[serde(default = "default_booking_buffer_hours")]
    pub default_booking_buffer_hours: u32,
    #[serde(default = "default_schedule_name")]
    pub default_schedule_name: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            slots: SlotDefaults::default(),
            default_booking_buffer_hours: default_booking_buffer_hours(),
            default_schedule_name: default_schedule_name(),
        }
    }
}

impl EngineConfig {
    /// Load a JSON config file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(ScheduleError::Config(format!(
                    "failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ScheduleError::Config(format!("invalid config: {}", e)))?;
        config.slots.check()?;
        Ok(config)
    }
}

fn default_booking_buffer_hours() -> u32 {
    24
}

fn default_schedule_name() -> String {
    "Working hours".to_string()
}

// -----------------------------------------------------------------------------
// SlotDefaults
// -----------------------------------------------------------------------------

/// The window seeded into newly opened days, and the spacing used by
/// [`suggest_next`](crate::interval::suggest_next).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotDefaults {
    #[serde(default = "default_start")]
    pub default_start: String,
    #[serde(default = "default_end")]
    pub default_end: String,
    #[serde(default = "default_gap")]
    pub suggestion_gap_minutes: u32,
    #[serde(default = "default_length")]
    pub suggestion_length_minutes: u32,
}

impl Default for SlotDefaults {
    fn default() -> Self {
        Self {
            default_start: default_start(),
            default_end: default_end(),
            suggestion_gap_minutes: default_gap(),
            suggestion_length_minutes: default_length(),
        }
    }
}

impl SlotDefaults {
    /// A fresh slot covering the default window.
    pub fn default_slot(&self) -> Slot {
        Slot::new(self.default_start.clone(), self.default_end.clone())
    }

    fn check(&self) -> Result<()> {
        for value in [&self.default_start, &self.default_end] {
            TimeCode::parse(value)
                .map_err(|_| ScheduleError::Config(format!("invalid default slot time: {:?}", value)))?;
        }
        if self.suggestion_length_minutes == 0 {
            return Err(ScheduleError::Config(
                "suggestionLengthMinutes must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_start() -> String {
    "09:00 AM".to_string()
}

fn default_end() -> String {
    "05:00 PM".to_string()
}

fn default_gap() -> u32 {
    60
}

fn default_length() -> u32 {
    60
}
