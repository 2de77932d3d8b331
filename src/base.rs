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

//! Core identifier types for reservations, accounts, and ledger entries,
//! plus the half-hour slot-time representation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a reservation or hold.
///
/// Wraps a `u32`. Ids increase monotonically (max existing id + 1) and are
/// never reused, even after cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ReservationId(pub u32);

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for an account.
///
/// Account ids are caller-assigned strings (e.g. `"client1"`), matching the
/// identifiers the authorization layer hands the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct AccountId(pub String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Unique identifier for a ledger entry.
///
/// Composed of the owning reservation id plus a sequence suffix: the payment
/// written at booking time is `"{id}-t1"`, the refund written at cancellation
/// is `"{id}-t2"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct TransactionId(pub String);

impl TransactionId {
    /// Id of the payment entry for a reservation.
    pub fn payment(reservation: ReservationId) -> Self {
        Self(format!("{reservation}-t1"))
    }

    /// Id of the refund entry for a reservation.
    pub fn refund(reservation: ReservationId) -> Self {
        Self(format!("{reservation}-t2"))
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A time of day at half-hour granularity.
///
/// Stored as half-hour ticks since midnight (9.5 hours = 19 ticks), so slot
/// arithmetic and interval comparisons are exact integer operations. The wire
/// form is the float hours value used by the request payloads (`9.0`, `9.5`,
/// ... `18.0`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct SlotTime(u16);

impl SlotTime {
    /// Number of half-hour ticks in a day.
    const TICKS_PER_DAY: u16 = 48;

    /// Parses a float-hours value, requiring a non-negative multiple of 0.5
    /// within a single day.
    pub fn from_hours(hours: f64) -> Option<Self> {
        let ticks = hours * 2.0;
        if !ticks.is_finite()
            || ticks.fract() != 0.0
            || !(0.0..=f64::from(Self::TICKS_PER_DAY)).contains(&ticks)
        {
            return None;
        }
        Some(Self(ticks as u16))
    }

    /// Builds a slot time from whole half-hour ticks since midnight.
    pub fn from_ticks(ticks: u16) -> Option<Self> {
        (ticks <= Self::TICKS_PER_DAY).then_some(Self(ticks))
    }

    pub fn ticks(self) -> u16 {
        self.0
    }

    pub fn hours(self) -> f64 {
        f64::from(self.0) / 2.0
    }

    /// Adds a duration in half-hour ticks; `None` past end of day.
    pub fn advance(self, duration_ticks: u16) -> Option<Self> {
        Self::from_ticks(self.0.checked_add(duration_ticks)?)
    }
}

impl TryFrom<f64> for SlotTime {
    type Error = String;

    fn try_from(hours: f64) -> Result<Self, Self::Error> {
        Self::from_hours(hours).ok_or_else(|| format!("{hours} is not a valid half-hour time of day"))
    }
}

impl From<SlotTime> for f64 {
    fn from(time: SlotTime) -> f64 {
        time.hours()
    }
}

impl fmt::Display for SlotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hours())
    }
}
