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

//! Reservation records and their lifecycle states.
//!
//! A reservation is created `Active` (paid booking) or `Held` (provisional
//! block, no payment) and can only ever transition to `Cancelled`. Records
//! are never rescheduled or deleted.

use crate::base::{AccountId, ReservationId, SlotTime};
use crate::catalog::ItemKind;
use crate::schedule::Slot;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    /// Paid booking; has exactly one payment ledger entry.
    Active,
    /// Provisional capacity block with no payment.
    Held,
    /// Terminal; set once by cancellation, never left.
    Cancelled,
}

/// A booked or held interval on one resource item.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub facility: String,
    /// Reserved for future recurring bookings; currently always 0.
    pub recurring: u32,
    pub date: NaiveDate,
    pub item: ItemKind,
    pub client: AccountId,
    pub start_time: SlotTime,
    pub end_time: SlotTime,
    pub status: ReservationStatus,
}

impl Reservation {
    pub fn slot(&self) -> Slot {
        Slot {
            date: self.date,
            start: self.start_time,
            end: self.end_time,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == ReservationStatus::Cancelled
    }

    /// Whether this reservation still consumes capacity in `slot`.
    pub fn blocks(&self, slot: &Slot) -> bool {
        !self.is_cancelled() && self.slot().overlaps(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reservation(status: ReservationStatus) -> Reservation {
        Reservation {
            id: ReservationId(1),
            facility: "facility1".to_string(),
            recurring: 0,
            date: "2024-01-08".parse().unwrap(),
            item: ItemKind::Workshop,
            client: AccountId::from("client1"),
            start_time: SlotTime::from_hours(9.0).unwrap(),
            end_time: SlotTime::from_hours(11.0).unwrap(),
            status,
        }
    }

    #[test]
    fn active_and_held_block_overlapping_slots() {
        let slot = Slot {
            date: "2024-01-08".parse().unwrap(),
            start: SlotTime::from_hours(10.0).unwrap(),
            end: SlotTime::from_hours(12.0).unwrap(),
        };
        assert!(reservation(ReservationStatus::Active).blocks(&slot));
        assert!(reservation(ReservationStatus::Held).blocks(&slot));
        assert!(!reservation(ReservationStatus::Cancelled).blocks(&slot));
    }

    #[test]
    fn adjacent_slot_is_not_blocked() {
        let slot = Slot {
            date: "2024-01-08".parse().unwrap(),
            start: SlotTime::from_hours(11.0).unwrap(),
            end: SlotTime::from_hours(12.0).unwrap(),
        };
        assert!(!reservation(ReservationStatus::Active).blocks(&slot));
    }
}
