//! Accounting clock — owns the last-accounted timestamp and hour math.

use crate::types::SimTime;
use chrono::{Datelike, Duration, DurationRound, Timelike, Weekday};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountingClock {
    pub last_accounted_at: SimTime,
}

impl AccountingClock {
    pub fn new(last_accounted_at: SimTime) -> Self {
        Self { last_accounted_at }
    }

    /// The hour the next cycle accounts for.
    pub fn cycle_start(&self) -> SimTime {
        floor_to_hour(self.last_accounted_at)
    }

    /// Whole hours due between the rounded last-accounted time and `now`.
    pub fn hours_due(&self, now: SimTime) -> u32 {
        hours_due(self.last_accounted_at, now)
    }

    /// Record one completed cycle. Returns the new last-accounted time,
    /// exactly one hour after the rounded start.
    pub fn advance(&mut self) -> SimTime {
        self.last_accounted_at = self.cycle_start() + Duration::hours(1);
        self.last_accounted_at
    }
}

/// Round down to the start of the hour.
pub fn floor_to_hour(at: SimTime) -> SimTime {
    at.duration_trunc(Duration::hours(1)).unwrap_or(at)
}

/// Number of whole hours between `floor_to_hour(last)` and `now`.
/// Zero when `now` is before the next hour boundary, or before `last`.
pub fn hours_due(last: SimTime, now: SimTime) -> u32 {
    let start = floor_to_hour(last);
    if now < start + Duration::hours(1) {
        return 0;
    }
    let hours = (now - start).num_hours();
    u32::try_from(hours).unwrap_or(u32::MAX)
}

/// Stable per-hour index used to derive per-cycle RNG streams.
pub fn cycle_index(at: SimTime) -> i64 {
    floor_to_hour(at).timestamp() / 3600
}

/// Whether `at` falls on the weekly aging hour.
pub fn is_aging_hour(at: SimTime, weekday: Weekday, hour: u32) -> bool {
    at.weekday() == weekday && at.hour() == hour
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn floors_to_the_hour() {
        let at = Utc.with_ymd_and_hms(2031, 5, 4, 13, 47, 12).unwrap();
        let floored = floor_to_hour(at);
        assert_eq!(floored, Utc.with_ymd_and_hms(2031, 5, 4, 13, 0, 0).unwrap());
    }

    #[test]
    fn nothing_due_inside_the_same_hour() {
        let last = Utc.with_ymd_and_hms(2031, 5, 4, 13, 5, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2031, 5, 4, 13, 59, 59).unwrap();
        assert_eq!(hours_due(last, now), 0);
    }

    #[test]
    fn counts_whole_hours_from_rounded_start() {
        let last = Utc.with_ymd_and_hms(2031, 5, 4, 7, 20, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2031, 5, 4, 10, 20, 0).unwrap();
        assert_eq!(hours_due(last, now), 3);
    }

    #[test]
    fn clock_in_the_future_is_not_due() {
        let last = Utc.with_ymd_and_hms(2031, 5, 4, 10, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2031, 5, 4, 8, 0, 0).unwrap();
        assert_eq!(hours_due(last, now), 0);
    }

    #[test]
    fn advance_moves_exactly_one_hour_from_rounded_start() {
        let last = Utc.with_ymd_and_hms(2031, 5, 4, 7, 20, 0).unwrap();
        let mut clock = AccountingClock::new(last);
        let next = clock.advance();
        assert_eq!(next, Utc.with_ymd_and_hms(2031, 5, 4, 8, 0, 0).unwrap());
    }

    #[test]
    fn monday_midnight_is_aging_hour() {
        // 2031-05-05 is a Monday.
        let at = Utc.with_ymd_and_hms(2031, 5, 5, 0, 0, 0).unwrap();
        assert!(is_aging_hour(at, Weekday::Mon, 0));
        assert!(!is_aging_hour(at + Duration::hours(1), Weekday::Mon, 0));
    }
}
