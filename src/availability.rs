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

//! Availability checker: capacity remaining for an item kind in a window.
//!
//! Pure read over the reservation store; safe to call repeatedly. The answer
//! is only stable while the orchestrator holds the write stripe for the
//! `(date, item)` key, which is why booking runs the check under that lock.

use crate::catalog::ItemKind;
use crate::schedule::Slot;
use crate::store::ReservationStore;

/// Number of non-cancelled reservations of `item` intersecting `slot`.
pub fn booked_count(store: &ReservationStore, slot: &Slot, item: ItemKind) -> usize {
    store.blocking(slot, item).len()
}

/// Whether capacity remains for one more reservation of `item` in `slot`.
pub fn is_available(store: &ReservationStore, slot: &Slot, item: ItemKind) -> bool {
    booked_count(store, slot, item) < item.capacity() as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::{AccountId, ReservationId, SlotTime};
    use crate::reservation::{Reservation, ReservationStatus};

    fn slot(start: f64, end: f64) -> Slot {
        Slot {
            date: "2024-01-08".parse().unwrap(),
            start: SlotTime::from_hours(start).unwrap(),
            end: SlotTime::from_hours(end).unwrap(),
        }
    }

    fn insert(store: &ReservationStore, id: u32, item: ItemKind, status: ReservationStatus) {
        let window = slot(9.0, 11.0);
        store.insert(Reservation {
            id: ReservationId(id),
            facility: "facility1".to_string(),
            recurring: 0,
            date: window.date,
            item,
            client: AccountId::from("client1"),
            start_time: window.start,
            end_time: window.end,
            status,
        });
    }

    #[test]
    fn capacity_counts_both_active_and_held() {
        let store = ReservationStore::new();
        insert(&store, 1, ItemKind::Extruder, ReservationStatus::Active);
        insert(&store, 2, ItemKind::Extruder, ReservationStatus::Held);

        // extruder capacity is 2: full
        assert!(!is_available(&store, &slot(10.0, 11.0), ItemKind::Extruder));
        // other kinds unaffected
        assert!(is_available(&store, &slot(10.0, 11.0), ItemKind::Workshop));
    }

    #[test]
    fn cancelled_reservations_release_capacity() {
        let store = ReservationStore::new();
        insert(&store, 1, ItemKind::Crusher, ReservationStatus::Active);
        assert!(!is_available(&store, &slot(9.0, 10.0), ItemKind::Crusher));

        store.cancel(ReservationId(1)).unwrap();
        assert!(is_available(&store, &slot(9.0, 10.0), ItemKind::Crusher));
    }

    #[test]
    fn adjacent_window_is_free() {
        let store = ReservationStore::new();
        insert(&store, 1, ItemKind::Crusher, ReservationStatus::Active);
        assert!(is_available(&store, &slot(11.0, 12.0), ItemKind::Crusher));
    }
}
