//! Property-based tests for time codes, overlap detection, template edits,
//! override upserts, membership deltas and the booking buffer.

use std::collections::BTreeSet;

use availability_engine::buffer::is_bookable;
use availability_engine::config::SlotDefaults;
use availability_engine::diff::membership_delta;
use availability_engine::interval::{has_any_overlap, overlaps, Slot, Span};
use availability_engine::overrides::DateOverrides;
use availability_engine::time_code::{normalize, TimeCode, MINUTES_PER_DAY};
use availability_engine::weekly::{Day, WeeklyTemplate};
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// A well-formed time string in any accepted spelling.
fn arb_time_string() -> impl Strategy<Value = String> {
    (1u32..=12, 0u32..=59, any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(h, m, pad, space, pm, upper)| {
            let meridiem = match (pm, upper) {
                (true, true) => "PM",
                (true, false) => "pm",
                (false, true) => "AM",
                (false, false) => "am",
            };
            let hour = if pad { format!("{:02}", h) } else { h.to_string() };
            let sep = if space { " " } else { "" };
            format!("{}:{:02}{}{}", hour, m, sep, meridiem)
        },
    )
}

/// A non-empty span within a day.
fn arb_span() -> impl Strategy<Value = Span> {
    (0u32..MINUTES_PER_DAY - 1)
        .prop_flat_map(|start| (Just(start), start + 1..=MINUTES_PER_DAY))
        .prop_map(|(s, e)| Span::new(TimeCode::from_minutes(s), TimeCode::from_minutes(e)))
}

fn arb_day() -> impl Strategy<Value = Day> {
    (0u8..7).prop_map(|i| Day::from_index(i).unwrap())
}

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (2025i32..=2027, 1u32..=12, 1u32..=28).prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn arb_category_set() -> impl Strategy<Value = BTreeSet<u8>> {
    prop::collection::btree_set(0u8..20, 0..10)
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Time codes
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config())]

    #[test]
    fn format_then_parse_is_identity(minutes in 0u32..MINUTES_PER_DAY) {
        let code = TimeCode::from_minutes(minutes);
        prop_assert_eq!(TimeCode::parse(&code.format()).unwrap(), code);
    }

    #[test]
    fn parsed_values_stay_within_a_day(s in arb_time_string()) {
        let code = TimeCode::parse(&s).unwrap();
        prop_assert!(code.minutes() < MINUTES_PER_DAY);
    }

    #[test]
    fn normalize_is_idempotent(s in arb_time_string()) {
        let once = normalize(&s).unwrap();
        prop_assert_eq!(normalize(&once).unwrap(), once.clone());
        prop_assert_eq!(TimeCode::parse(&s).unwrap().format(), once);
    }
}

// ---------------------------------------------------------------------------
// Overlap
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config())]

    #[test]
    fn non_empty_span_overlaps_itself(span in arb_span()) {
        prop_assert!(overlaps(&span, &span));
    }

    #[test]
    fn overlap_is_symmetric(a in arb_span(), b in arb_span()) {
        prop_assert_eq!(overlaps(&a, &b), overlaps(&b, &a));
    }

    #[test]
    fn any_overlap_ignores_order(spans in prop::collection::vec(arb_span(), 0..8), shift in 0usize..8) {
        let mut rotated = spans.clone();
        if !rotated.is_empty() {
            let k = shift % rotated.len();
            rotated.rotate_left(k);
        }
        let mut reversed = spans.clone();
        reversed.reverse();
        let expected = has_any_overlap(&spans);
        prop_assert_eq!(has_any_overlap(&rotated), expected);
        prop_assert_eq!(has_any_overlap(&reversed), expected);
    }
}

// ---------------------------------------------------------------------------
// Template and overrides
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config())]

    #[test]
    fn removing_every_slot_closes_the_day(day in arb_day(), extra in 0usize..4) {
        let defaults = SlotDefaults::default();
        let mut t = WeeklyTemplate::closed().toggle_day(day, true, &defaults);
        for _ in 0..extra {
            t = t.add_slot(day, &defaults);
        }
        let ids: Vec<_> = t.day(day).slots.iter().map(|s| s.id.clone()).collect();
        for id in &ids {
            t = t.remove_slot(day, id);
        }
        prop_assert!(!t.day(day).available);
        prop_assert!(t.day(day).slots.is_empty());
    }

    #[test]
    fn upsert_keeps_one_record_per_date(date in arb_date(), first_closed in any::<bool>(), n in 0usize..3) {
        let slots: Vec<Slot> = (0..n)
            .map(|i| Slot::new(format!("{}:00 AM", i + 1), format!("{}:30 AM", i + 1)))
            .collect();
        let o = DateOverrides::new()
            .upsert(date, vec![Slot::new("9:00 AM", "10:00 AM")], first_closed)
            .upsert(date, slots.clone(), false);
        prop_assert_eq!(o.len(), 1);
        let record = o.get(date).unwrap();
        prop_assert!(!record.is_unavailable);
        prop_assert_eq!(&record.slots, &slots);
    }
}

// ---------------------------------------------------------------------------
// Membership delta and buffer
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config())]

    #[test]
    fn delta_of_a_set_with_itself_is_empty(s in arb_category_set()) {
        prop_assert!(membership_delta(&s, &s).is_empty());
    }

    #[test]
    fn applying_delta_reaches_desired(current in arb_category_set(), desired in arb_category_set()) {
        let delta = membership_delta(&current, &desired);
        let mut result = current.clone();
        for c in &delta.to_remove {
            result.remove(c);
        }
        result.extend(delta.to_add.iter().copied());
        prop_assert_eq!(result, desired);
    }

    #[test]
    fn buffer_boundary(hours in 0u32..=168, offset in -3600i64..=3600) {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let candidate = now + Duration::hours(i64::from(hours)) + Duration::seconds(offset);
        prop_assert_eq!(is_bookable(candidate, now, hours), offset >= 0);
    }
}
