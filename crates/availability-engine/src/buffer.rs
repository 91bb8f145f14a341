//! Minimum-advance-notice gate for booking requests.
//!
//! "Now" is always passed in by the caller, never read from the clock, so
//! every check here is deterministic.

use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Earliest start time that satisfies a `buffer_hours` notice at `now`.
pub fn earliest_bookable(now: DateTime<Utc>, buffer_hours: u32) -> DateTime<Utc> {
    now + Duration::hours(i64::from(buffer_hours))
}

/// True iff `candidate_start - now >= buffer_hours` hours.
///
/// With a zero buffer any start at or after `now` qualifies; a start in the
/// past never does.
pub fn is_bookable(candidate_start: DateTime<Utc>, now: DateTime<Utc>, buffer_hours: u32) -> bool {
    candidate_start - now >= Duration::hours(i64::from(buffer_hours))
}

/// Day-level pre-check: a date is ruled out entirely when it falls before the
/// calendar date of [`earliest_bookable`]. Passing this check does not make
/// every slot on the date bookable; individual starts still go through
/// [`is_bookable`].
pub fn is_date_bookable(date: NaiveDate, now: DateTime<Utc>, buffer_hours: u32) -> bool {
    date >= earliest_bookable(now, buffer_hours).date_naive()
}
