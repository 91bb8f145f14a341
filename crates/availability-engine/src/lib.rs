//! # availability-engine
//!
//! Availability and schedule configuration for bookable service providers.
//!
//! A provider describes when they can be booked with a recurring weekly
//! template plus one-off date overrides, and requires a minimum advance notice
//! for bookings. This crate holds the rules for that data: parsing and
//! comparing 12-hour clock times, rejecting overlapping or malformed slots,
//! resolving a calendar date against the template and its overrides, telling
//! whether an edit session has unsaved changes, computing link/unlink
//! operations for event categories, and gating booking requests on notice.
//!
//! All operations are pure and synchronous. Persistence is reached only
//! through the [`ScheduleStore`] trait.
//!
//! ## Modules
//!
//! - [`time_code`] — `"9:30 AM"` ↔ minutes since midnight
//! - [`interval`] — slots, overlap detection, midnight rollover, next-slot suggestion
//! - [`weekly`] — the per-weekday template and its edits
//! - [`overrides`] — date-specific replacements (replace, never merge)
//! - [`availability`] — effective hours for a date or date range
//! - [`validate`] — field/slot/list validation reports
//! - [`diff`] — dirty detection and category membership deltas
//! - [`buffer`] — minimum-notice booking gate
//! - [`rows`] — flat storage rows
//! - [`schedule`] — schedules, the store contract, the editing session
//! - [`store`] — in-memory store with schedule registry operations
//! - [`config`] — engine defaults
//! - [`error`] — error types

pub mod availability;
pub mod buffer;
pub mod config;
pub mod diff;
pub mod error;
pub mod interval;
pub mod overrides;
pub mod rows;
pub mod schedule;
pub mod store;
pub mod time_code;
pub mod validate;
pub mod weekly;

pub use availability::{resolve_date, resolve_range, ResolvedDay};
pub use buffer::is_bookable;
pub use config::{EngineConfig, SlotDefaults};
pub use diff::{membership_delta, CategoryId, LinkedCategorySet, MembershipDelta};
pub use error::ScheduleError;
pub use interval::{has_any_overlap, suggest_next, Slot, SlotId, Span};
pub use overrides::{DateOverride, DateOverrides, OverrideId};
pub use schedule::{Schedule, ScheduleConfig, ScheduleEditor, ScheduleId, ScheduleStore};
pub use store::MemoryStore;
pub use time_code::TimeCode;
pub use validate::{ValidationIssue, ValidationReport};
pub use weekly::{Day, DayAvailability, WeeklyTemplate};
