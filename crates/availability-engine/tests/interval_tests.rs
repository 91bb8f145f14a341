//! Tests for slot overlap, midnight rollover and next-slot suggestion.

use availability_engine::config::SlotDefaults;
use availability_engine::interval::{
    has_any_overlap, overlaps, rollover_adjust, slots_overlap, suggest_next, update_slot_field,
    Slot, SlotField, SlotId, Span,
};
use availability_engine::TimeCode;

// ── Helpers ─────────────────────────────────────────────────────────────────

fn span(start: &str, end: &str) -> Span {
    Span::new(TimeCode::parse(start).unwrap(), TimeCode::parse(end).unwrap())
}

fn slot(start: &str, end: &str) -> Slot {
    Slot::new(start, end)
}

// ── overlaps ────────────────────────────────────────────────────────────────

#[test]
fn overlapping_spans_detected() {
    assert!(overlaps(&span("9:00 AM", "12:00 PM"), &span("11:00 AM", "1:00 PM")));
}

#[test]
fn adjacent_spans_do_not_overlap() {
    assert!(!overlaps(&span("9:00 AM", "5:00 PM"), &span("5:00 PM", "6:00 PM")));
    assert!(!overlaps(&span("5:00 PM", "6:00 PM"), &span("9:00 AM", "5:00 PM")));
}

#[test]
fn contained_span_overlaps() {
    assert!(span("9:00 AM", "5:00 PM").overlaps(&span("10:00 AM", "11:00 AM")));
}

#[test]
fn span_overlaps_itself() {
    let s = span("9:00 AM", "10:00 AM");
    assert!(overlaps(&s, &s));
}

// ── has_any_overlap ─────────────────────────────────────────────────────────

#[test]
fn empty_and_single_lists_have_no_overlap() {
    assert!(!has_any_overlap(&[]));
    assert!(!has_any_overlap(&[span("9:00 AM", "10:00 AM")]));
}

#[test]
fn finds_collision_between_non_neighbours() {
    let spans = [
        span("9:00 AM", "10:00 AM"),
        span("1:00 PM", "2:00 PM"),
        span("9:30 AM", "9:45 AM"),
    ];
    assert!(has_any_overlap(&spans));
}

#[test]
fn disjoint_list_has_no_overlap() {
    let spans = [
        span("9:00 AM", "10:00 AM"),
        span("10:00 AM", "11:00 AM"),
        span("1:00 PM", "2:00 PM"),
    ];
    assert!(!has_any_overlap(&spans));
}

#[test]
fn slots_with_bad_times_are_left_out_of_overlap() {
    let slots = [slot("9:00 AM", "5:00 PM"), slot("garbage", "10:00 AM")];
    assert!(!slots_overlap(&slots));
}

#[test]
fn overnight_slot_collides_with_early_morning_continuation() {
    // Both slots end after midnight and are compared on the rolled-over clock.
    let slots = [slot("10:00 PM", "1:00 AM"), slot("11:30 PM", "2:00 AM")];
    assert!(slots_overlap(&slots));
}

// ── rollover_adjust ─────────────────────────────────────────────────────────

#[test]
fn end_before_start_rolls_over() {
    let adjusted = rollover_adjust(span("10:00 PM", "2:00 AM"));
    assert_eq!(adjusted.start.minutes(), 1320);
    assert_eq!(adjusted.end.minutes(), 120 + 1440);
    assert_eq!(adjusted.duration_minutes(), 240);
}

#[test]
fn end_in_first_hour_rolls_over_even_after_start() {
    // The known ambiguity: a short early-morning slot is read as overnight.
    let adjusted = rollover_adjust(span("12:00 AM", "12:30 AM"));
    assert_eq!(adjusted.end.minutes(), 30 + 1440);
}

#[test]
fn ordinary_daytime_span_is_unchanged() {
    let s = span("9:00 AM", "5:00 PM");
    assert_eq!(rollover_adjust(s), s);
}

#[test]
fn already_rolled_span_is_not_adjusted_twice() {
    let s = Span::new(TimeCode::from_minutes(1320), TimeCode::from_minutes(1500));
    assert_eq!(rollover_adjust(s), s);
}

#[test]
fn rollover_leaves_display_strings_alone() {
    let s = slot("10:00 PM", "2:00 AM");
    let adjusted = s.span().unwrap();
    assert!(adjusted.end.is_next_day());
    assert_eq!(s.end, "2:00 AM");
}

// ── suggest_next ────────────────────────────────────────────────────────────

#[test]
fn suggestion_for_empty_day_is_default_window() {
    let s = suggest_next(&[], &SlotDefaults::default());
    assert_eq!(s.start, "09:00 AM");
    assert_eq!(s.end, "05:00 PM");
}

#[test]
fn suggestion_after_working_hours() {
    let s = suggest_next(&[slot("9:00 AM", "5:00 PM")], &SlotDefaults::default());
    assert_eq!(s.start, "06:00 PM");
    assert_eq!(s.end, "07:00 PM");
}

#[test]
fn suggestion_anchors_on_last_slot_in_list_order() {
    // The last slot by insertion ends at noon even though an earlier one ends later.
    let existing = [slot("6:00 PM", "8:00 PM"), slot("9:00 AM", "12:00 PM")];
    let s = suggest_next(&existing, &SlotDefaults::default());
    assert_eq!(s.start, "01:00 PM");
    assert_eq!(s.end, "02:00 PM");
}

#[test]
fn suggestion_wraps_past_midnight() {
    let s = suggest_next(&[slot("9:00 PM", "11:30 PM")], &SlotDefaults::default());
    assert_eq!(s.start, "12:30 AM");
    assert_eq!(s.end, "01:30 AM");
}

#[test]
fn suggestion_uses_rolled_over_end() {
    let s = suggest_next(&[slot("10:00 PM", "12:30 AM")], &SlotDefaults::default());
    assert_eq!(s.start, "01:30 AM");
    assert_eq!(s.end, "02:30 AM");
}

#[test]
fn suggestion_falls_back_to_default_when_last_slot_is_malformed() {
    let s = suggest_next(&[slot("9:00 AM", "whenever")], &SlotDefaults::default());
    assert_eq!((s.start.as_str(), s.end.as_str()), ("09:00 AM", "05:00 PM"));
}

#[test]
fn suggestion_honours_configured_spacing() {
    let defaults = SlotDefaults {
        suggestion_gap_minutes: 0,
        suggestion_length_minutes: 30,
        ..SlotDefaults::default()
    };
    let s = suggest_next(&[slot("9:00 AM", "10:00 AM")], &defaults);
    assert_eq!((s.start.as_str(), s.end.as_str()), ("10:00 AM", "10:30 AM"));
}

#[test]
fn huge_configured_spacing_does_not_overflow() {
    let defaults = SlotDefaults {
        suggestion_gap_minutes: u32::MAX,
        suggestion_length_minutes: u32::MAX,
        ..SlotDefaults::default()
    };
    let s = suggest_next(&[slot("9:00 AM", "10:00 AM")], &defaults);
    assert!(s.start_code().is_ok());
    assert!(s.end_code().is_ok());
}

#[test]
fn suggested_slot_gets_fresh_identity() {
    let existing = [slot("9:00 AM", "10:00 AM")];
    let s = suggest_next(&existing, &SlotDefaults::default());
    assert_ne!(s.id, existing[0].id);
}

// ── Slot helpers ────────────────────────────────────────────────────────────

#[test]
fn zero_length_slot_detected() {
    assert!(slot("9:00 AM", "09:00 am").is_zero_length());
    assert!(!slot("9:00 AM", "9:01 AM").is_zero_length());
    assert!(!slot("bad", "bad").is_zero_length());
}

#[test]
fn duplicate_keeps_times_but_not_identity() {
    let s = Slot::with_id("a", "9:00 AM", "10:00 AM");
    let d = s.duplicate();
    assert_eq!((d.start.as_str(), d.end.as_str()), ("9:00 AM", "10:00 AM"));
    assert_ne!(d.id, s.id);
}

#[test]
fn update_slot_field_targets_one_slot() {
    let slots = vec![
        Slot::with_id("a", "9:00 AM", "10:00 AM"),
        Slot::with_id("b", "1:00 PM", "2:00 PM"),
    ];
    let updated = update_slot_field(&slots, &SlotId::from("b"), SlotField::End, "3:00 PM");
    assert_eq!(updated[0], slots[0]);
    assert_eq!(updated[1].end, "3:00 PM");
    assert_eq!(slots[1].end, "2:00 PM", "input list is not modified");
}

#[test]
fn slot_without_id_gets_one_on_deserialise() {
    let s: Slot = serde_json::from_str(r#"{"start":"9:00 AM","end":"5:00 PM"}"#).unwrap();
    assert!(!s.id.as_str().is_empty());
}
