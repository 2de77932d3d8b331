// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Slot intervals, the facility operating-hours table, and request
//! validation.
//!
//! A slot is the half-open interval `[start, end)` on one calendar date. Two
//! slots conflict only under true interval intersection
//! (`a.start < b.end && a.end > b.start`), so back-to-back bookings never
//! collide.

use crate::base::SlotTime;
use crate::error::ReservationError;
use chrono::{Datelike, Days, NaiveDate, Weekday};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Furthest ahead a booking or hold may be placed, in days.
pub const MAX_ADVANCE_DAYS: u64 = 30;

/// A concrete `[start, end)` window on one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Slot {
    pub date: NaiveDate,
    pub start: SlotTime,
    pub end: SlotTime,
}

impl Slot {
    /// True interval intersection on the same date.
    pub fn overlaps(&self, other: &Slot) -> bool {
        self.date == other.date && self.start < other.end && self.end > other.start
    }

    /// Slot length in hours, exact (ticks are half hours).
    pub fn duration_hours(&self) -> Decimal {
        Decimal::from(self.end.ticks() - self.start.ticks()) / dec!(2)
    }
}

/// Opening window for a day of the week; `None` means closed all day.
///
/// Weekdays run 09:00-18:00, Saturday 10:00-16:00, Sunday closed.
pub fn operating_window(day: Weekday) -> Option<(SlotTime, SlotTime)> {
    let window = match day {
        Weekday::Sun => return None,
        Weekday::Sat => (20, 32), // 10.0 - 16.0
        _ => (18, 36),            // 9.0 - 18.0
    };
    // Window bounds are in-range tick constants.
    Some((SlotTime::from_ticks(window.0)?, SlotTime::from_ticks(window.1)?))
}

/// Validates a raw booking/hold request and produces its slot.
///
/// Checks, in order: half-hour grid for start and duration, positive
/// duration, the operating-hours table for the date's weekday, and the
/// advance window (no past dates, at most [`MAX_ADVANCE_DAYS`] ahead).
pub fn validate_request(
    date: NaiveDate,
    start_hours: f64,
    duration_hours: f64,
    today: NaiveDate,
) -> Result<Slot, ReservationError> {
    let start = SlotTime::from_hours(start_hours).ok_or_else(|| {
        ReservationError::InvalidRequest(format!(
            "start time {start_hours} must be a multiple of 0.5 hours"
        ))
    })?;

    let duration_ticks = duration_hours * 2.0;
    if !duration_ticks.is_finite() || duration_ticks.fract() != 0.0 || duration_hours <= 0.0 {
        return Err(ReservationError::InvalidRequest(format!(
            "duration {duration_hours} must be a positive multiple of 0.5 hours"
        )));
    }
    let end = start.advance(duration_ticks as u16).ok_or_else(|| {
        ReservationError::InvalidRequest(format!(
            "reservation from {start_hours} for {duration_hours} hours runs past midnight"
        ))
    })?;

    let (open, close) = operating_window(date.weekday()).ok_or_else(|| {
        ReservationError::InvalidRequest("no bookings allowed on Sunday".to_string())
    })?;
    if start < open || end > close {
        return Err(ReservationError::InvalidRequest(format!(
            "bookings on {} run from {open} to {close}",
            date.weekday()
        )));
    }

    if date < today {
        return Err(ReservationError::InvalidRequest(
            "reservation date is in the past".to_string(),
        ));
    }
    let horizon = today
        .checked_add_days(Days::new(MAX_ADVANCE_DAYS))
        .unwrap_or(NaiveDate::MAX);
    if date > horizon {
        return Err(ReservationError::InvalidRequest(format!(
            "reservations can be made at most {MAX_ADVANCE_DAYS} days in advance"
        )));
    }

    Ok(Slot { date, start, end })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn slot(d: &str, start: f64, end: f64) -> Slot {
        Slot {
            date: date(d),
            start: SlotTime::from_hours(start).unwrap(),
            end: SlotTime::from_hours(end).unwrap(),
        }
    }

    #[test]
    fn overlap_is_true_interval_intersection() {
        let a = slot("2024-01-08", 9.0, 11.0);
        assert!(a.overlaps(&slot("2024-01-08", 10.0, 12.0)));
        assert!(a.overlaps(&slot("2024-01-08", 9.5, 10.0)));
        assert!(a.overlaps(&slot("2024-01-08", 8.0, 18.0)));
    }

    #[test]
    fn back_to_back_slots_do_not_overlap() {
        let a = slot("2024-01-08", 9.0, 11.0);
        assert!(!a.overlaps(&slot("2024-01-08", 11.0, 12.0)));
        assert!(!a.overlaps(&slot("2024-01-08", 8.0, 9.0)));
    }

    #[test]
    fn different_dates_never_overlap() {
        let a = slot("2024-01-08", 9.0, 11.0);
        assert!(!a.overlaps(&slot("2024-01-09", 9.0, 11.0)));
    }

    #[test]
    fn sunday_is_closed() {
        // 2024-01-07 is a Sunday
        let err = validate_request(date("2024-01-07"), 10.0, 1.0, date("2024-01-01"));
        assert!(matches!(err, Err(ReservationError::InvalidRequest(_))));
    }

    #[test]
    fn saturday_window_is_ten_to_sixteen() {
        let today = date("2024-01-01");
        // 2024-01-06 is a Saturday
        assert!(validate_request(date("2024-01-06"), 10.0, 6.0, today).is_ok());
        assert!(validate_request(date("2024-01-06"), 16.5, 0.5, today).is_err());
        assert!(validate_request(date("2024-01-06"), 15.5, 1.0, today).is_err());
        assert!(validate_request(date("2024-01-06"), 9.5, 1.0, today).is_err());
    }

    #[test]
    fn weekday_window_is_nine_to_eighteen() {
        let today = date("2024-01-01");
        // 2024-01-08 is a Monday
        assert!(validate_request(date("2024-01-08"), 9.0, 9.0, today).is_ok());
        assert!(validate_request(date("2024-01-08"), 8.5, 1.0, today).is_err());
        assert!(validate_request(date("2024-01-08"), 17.5, 1.0, today).is_err());
    }

    #[test]
    fn off_grid_and_nonpositive_durations_rejected() {
        let today = date("2024-01-01");
        assert!(validate_request(date("2024-01-08"), 9.25, 1.0, today).is_err());
        assert!(validate_request(date("2024-01-08"), 9.0, 0.75, today).is_err());
        assert!(validate_request(date("2024-01-08"), 9.0, 0.0, today).is_err());
        assert!(validate_request(date("2024-01-08"), 9.0, -1.0, today).is_err());
    }

    #[test]
    fn advance_window_enforced() {
        let today = date("2024-01-01");
        assert!(validate_request(date("2023-12-29"), 9.0, 1.0, today).is_err());
        // 30 days out is the last allowed day
        assert!(validate_request(date("2024-01-31"), 9.0, 1.0, today).is_ok());
        assert!(validate_request(date("2024-02-01"), 9.0, 1.0, today).is_err());
    }

    #[test]
    fn duration_hours_is_exact() {
        assert_eq!(slot("2024-01-08", 9.0, 9.5).duration_hours(), dec!(0.5));
        assert_eq!(slot("2024-01-08", 9.0, 18.0).duration_hours(), dec!(9));
    }
}
