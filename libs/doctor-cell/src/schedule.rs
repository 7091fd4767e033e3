//! Pure scheduling primitives: the hourly slot grid, the recurring shift
//! window, and the daily capacity rule. Everything here takes its clock as a
//! parameter and touches no I/O.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Fixed daily slot catalog: one slot per whole hour, 00:00 through 23:00.
pub const SLOTS_PER_DAY: u32 = 24;

/// Exact shift length every doctor record must have.
pub const REQUIRED_SHIFT_MINUTES: u32 = 12 * 60;

pub fn minutes_of(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// The full slot catalog for one day, ascending.
pub fn hourly_slots() -> Vec<NaiveTime> {
    (0..SLOTS_PER_DAY)
        .map(|hour| NaiveTime::from_hms_opt(hour, 0, 0).unwrap())
        .collect()
}

/// Slot catalog for `date`, with slots not strictly after the current
/// time-of-day removed when `date` is the same calendar day as `now`.
pub fn slots_for_date(now: NaiveDateTime, date: NaiveDate) -> Vec<NaiveTime> {
    let slots = hourly_slots();
    if date != now.date() {
        return slots;
    }

    let current = minutes_of(now.time());
    slots
        .into_iter()
        .filter(|slot| minutes_of(*slot) > current)
        .collect()
}

/// A doctor's recurring daily working window in minutes since midnight.
///
/// `end <= start` is the wrap-around form: the window runs through midnight
/// and membership is `t >= start || t < end`. Equal endpoints are evaluated
/// with the same formula, which makes them an always-inside window; valid
/// doctor records never produce that shape because of the 12-hour rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftWindow {
    start: u32,
    end: u32,
}

impl ShiftWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            start: minutes_of(start),
            end: minutes_of(end),
        }
    }

    pub fn wraps_midnight(&self) -> bool {
        self.end <= self.start
    }

    pub fn contains(&self, time: NaiveTime) -> bool {
        let t = minutes_of(time);
        if self.wraps_midnight() {
            t >= self.start || t < self.end
        } else {
            t >= self.start && t < self.end
        }
    }
}

/// Shift length in minutes, measured forward from `start` to `end` modulo
/// 24 hours.
pub fn shift_duration_minutes(start: NaiveTime, end: NaiveTime) -> u32 {
    let minutes_per_day = SLOTS_PER_DAY * 60;
    (minutes_of(end) + minutes_per_day - minutes_of(start)) % minutes_per_day
}

/// How many more bookings the doctor can take that day.
pub fn remaining_capacity(booked: usize, max_per_day: u32) -> u32 {
    max_per_day.saturating_sub(booked as u32)
}
