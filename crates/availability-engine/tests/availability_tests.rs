//! Tests for resolving calendar dates against the weekly template and
//! date overrides.

use availability_engine::availability::{resolve_date, resolve_range, Source};
use availability_engine::config::SlotDefaults;
use availability_engine::interval::Slot;
use availability_engine::overrides::DateOverrides;
use availability_engine::weekly::{Day, WeeklyTemplate};
use chrono::NaiveDate;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn template() -> WeeklyTemplate {
    WeeklyTemplate::default_template(&SlotDefaults::default())
}

#[test]
fn weekday_without_override_uses_template() {
    // 2026-03-16 is a Monday.
    let r = resolve_date(&template(), &DateOverrides::new(), date(2026, 3, 16));
    assert_eq!(r.day, Day::Monday);
    assert_eq!(r.source, Source::Weekly);
    assert_eq!(r.slots.len(), 1);
    assert!(r.is_available());
}

#[test]
fn weekend_without_override_is_unavailable() {
    let r = resolve_date(&template(), &DateOverrides::new(), date(2026, 3, 15));
    assert_eq!(r.day, Day::Sunday);
    assert!(!r.is_available());
}

#[test]
fn unavailable_override_blanks_a_working_day() {
    let christmas = date(2025, 12, 25);
    let overrides = DateOverrides::new().upsert(christmas, vec![], true);
    let r = resolve_date(&template(), &overrides, christmas);
    assert_eq!(r.source, Source::Override);
    assert!(!r.is_available());
}

#[test]
fn override_replaces_weekly_hours_entirely() {
    let d = date(2026, 3, 17);
    let overrides = DateOverrides::new().upsert(d, vec![Slot::new("1:00 PM", "2:00 PM")], false);
    let r = resolve_date(&template(), &overrides, d);
    assert_eq!(r.slots.len(), 1);
    assert_eq!(r.slots[0].start, "1:00 PM");
}

#[test]
fn override_can_open_a_weekend() {
    let saturday = date(2026, 3, 21);
    let overrides = DateOverrides::new().upsert(saturday, vec![Slot::new("10:00 AM", "12:00 PM")], false);
    assert!(resolve_date(&template(), &overrides, saturday).is_available());
}

#[test]
fn closed_day_with_stale_slots_resolves_unavailable() {
    let t = template().toggle_day(Day::Monday, false, &SlotDefaults::default());
    let r = resolve_date(&t, &DateOverrides::new(), date(2026, 3, 16));
    assert!(!r.is_available());
}

#[test]
fn range_is_inclusive_and_mixes_sources() {
    let overrides = DateOverrides::new().upsert(date(2026, 3, 18), vec![], true);
    let days = resolve_range(&template(), &overrides, date(2026, 3, 15), date(2026, 3, 21));
    assert_eq!(days.len(), 7);
    let open: Vec<Day> = days.iter().filter(|d| d.is_available()).map(|d| d.day).collect();
    assert_eq!(open, vec![Day::Monday, Day::Tuesday, Day::Thursday, Day::Friday]);
    assert_eq!(days[3].source, Source::Override);
}

#[test]
fn reversed_range_is_empty() {
    let days = resolve_range(&template(), &DateOverrides::new(), date(2026, 3, 21), date(2026, 3, 15));
    assert!(days.is_empty());
}
