//! # Slot Window Generation
//!
//! Produces the bookable slots for a rolling week. The shop opens at 13:00
//! every day and takes its last appointment at 19:00 Monday through
//! Thursday, and at 20:00 on Friday, Saturday and Sunday. Both ends are
//! inclusive, so a weekday has 7 slots and a long day has 8.

use std::ops::RangeInclusive;

use chrono::{Datelike, Days, NaiveDate, Weekday};

use crate::models::slot::Slot;

pub const OPENING_HOUR: u32 = 13;
pub const WEEKDAY_CLOSING_HOUR: u32 = 19;
pub const WEEKEND_CLOSING_HOUR: u32 = 20;
/// Days covered by a window, today included.
pub const WINDOW_DAYS: u64 = 7;

/// Hour of the last appointment on the given weekday.
pub fn closing_hour(weekday: Weekday) -> u32 {
    match weekday {
        Weekday::Fri | Weekday::Sat | Weekday::Sun => WEEKEND_CLOSING_HOUR,
        _ => WEEKDAY_CLOSING_HOUR,
    }
}

/// Bookable start hours for `date`.
pub fn opening_hours(date: NaiveDate) -> RangeInclusive<u32> {
    OPENING_HOUR..=closing_hour(date.weekday())
}

/// Generates a fresh window of free slots starting at `today`.
///
/// Output is ordered by date, then hour. Ids are unique because each
/// `(date, hour)` pair is visited once.
pub fn generate_weekly_slots(today: NaiveDate) -> Vec<Slot> {
    (0..WINDOW_DAYS)
        .filter_map(|offset| today.checked_add_days(Days::new(offset)))
        .flat_map(|date| opening_hours(date).map(move |hour| Slot::free(date, hour)))
        .collect()
}
