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

//! In-memory reservation store.
//!
//! Durable record of every reservation and hold. Records are inserted once,
//! transitioned to `Cancelled` at most once, and never deleted; ids are
//! monotone and never reused. Range queries return rows in id order (which
//! is insertion order), so repeated reads with no intervening writes are
//! byte-identical.

use crate::base::{AccountId, ReservationId};
use crate::catalog::ItemKind;
use crate::error::ReservationError;
use crate::reservation::{Reservation, ReservationStatus};
use crate::schedule::Slot;
use chrono::NaiveDate;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU32, Ordering};

/// Concurrent reservation store.
///
/// Reads reflect the latest committed write at the moment of the call; the
/// orchestrator serializes the check-then-insert sequences that need more
/// than single-call consistency.
#[derive(Debug, Default)]
pub struct ReservationStore {
    reservations: DashMap<ReservationId, Reservation>,
    last_id: AtomicU32,
}

impl ReservationStore {
    pub fn new() -> Self {
        Self {
            reservations: DashMap::new(),
            last_id: AtomicU32::new(0),
        }
    }

    /// Next unused reservation id (max existing + 1, never reused).
    pub fn next_id(&self) -> ReservationId {
        ReservationId(self.last_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Persists a freshly created reservation.
    pub fn insert(&self, reservation: Reservation) {
        let prior = self.reservations.insert(reservation.id, reservation);
        debug_assert!(prior.is_none(), "reservation ids are never reused");
    }

    pub fn get(&self, id: ReservationId) -> Option<Reservation> {
        self.reservations.get(&id).map(|r| r.clone())
    }

    pub fn len(&self) -> usize {
        self.reservations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reservations.is_empty()
    }

    /// Transitions a reservation to `Cancelled`.
    ///
    /// The transition is the only mutation the store permits; `Cancelled` is
    /// terminal.
    pub fn cancel(&self, id: ReservationId) -> Result<(), ReservationError> {
        let mut reservation = self
            .reservations
            .get_mut(&id)
            .ok_or(ReservationError::NotFound(id))?;
        if reservation.is_cancelled() {
            return Err(ReservationError::AlreadyCancelled(id));
        }
        reservation.status = ReservationStatus::Cancelled;
        Ok(())
    }

    /// Non-cancelled reservations of `item` whose interval intersects `slot`.
    pub fn blocking(&self, slot: &Slot, item: ItemKind) -> Vec<Reservation> {
        self.collect_sorted(|r| r.item == item && r.blocks(slot))
    }

    /// Active reservations for a facility within `[start, end]`, optionally
    /// restricted to one client.
    pub fn active_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        facility: &str,
        client: Option<&AccountId>,
    ) -> Vec<Reservation> {
        self.collect_sorted(|r| {
            r.status == ReservationStatus::Active
                && r.facility == facility
                && (start..=end).contains(&r.date)
                && client.is_none_or(|c| &r.client == c)
        })
    }

    /// Holds within `[start, end]`, or every hold when no range is given.
    pub fn holds_between(&self, range: Option<(NaiveDate, NaiveDate)>) -> Vec<Reservation> {
        self.collect_sorted(|r| {
            r.status == ReservationStatus::Held
                && range.is_none_or(|(start, end)| (start..=end).contains(&r.date))
        })
    }

    fn collect_sorted(&self, keep: impl Fn(&Reservation) -> bool) -> Vec<Reservation> {
        let mut rows: Vec<Reservation> = self
            .reservations
            .iter()
            .filter(|entry| keep(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        rows.sort_by_key(|r| r.id);
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::SlotTime;

    fn reservation(id: u32, date: &str, start: f64, end: f64, status: ReservationStatus) -> Reservation {
        Reservation {
            id: ReservationId(id),
            facility: "facility1".to_string(),
            recurring: 0,
            date: date.parse().unwrap(),
            item: ItemKind::Workshop,
            client: AccountId::from("client1"),
            start_time: SlotTime::from_hours(start).unwrap(),
            end_time: SlotTime::from_hours(end).unwrap(),
            status,
        }
    }

    #[test]
    fn ids_are_monotone_and_never_reused() {
        let store = ReservationStore::new();
        let first = store.next_id();
        let second = store.next_id();
        assert_eq!(first, ReservationId(1));
        assert_eq!(second, ReservationId(2));

        store.insert(reservation(1, "2024-01-08", 9.0, 10.0, ReservationStatus::Active));
        store.cancel(ReservationId(1)).unwrap();
        // a cancelled id stays burned
        assert_eq!(store.next_id(), ReservationId(3));
    }

    #[test]
    fn cancel_is_terminal() {
        let store = ReservationStore::new();
        store.insert(reservation(1, "2024-01-08", 9.0, 10.0, ReservationStatus::Active));

        store.cancel(ReservationId(1)).unwrap();
        assert_eq!(
            store.cancel(ReservationId(1)),
            Err(ReservationError::AlreadyCancelled(ReservationId(1)))
        );
        assert_eq!(
            store.cancel(ReservationId(9)),
            Err(ReservationError::NotFound(ReservationId(9)))
        );
    }

    #[test]
    fn blocking_ignores_cancelled_and_adjacent() {
        let store = ReservationStore::new();
        store.insert(reservation(1, "2024-01-08", 9.0, 11.0, ReservationStatus::Active));
        store.insert(reservation(2, "2024-01-08", 11.0, 12.0, ReservationStatus::Active));
        store.insert(reservation(3, "2024-01-08", 9.0, 11.0, ReservationStatus::Cancelled));
        store.insert(reservation(4, "2024-01-08", 9.0, 11.0, ReservationStatus::Held));

        let slot = Slot {
            date: "2024-01-08".parse().unwrap(),
            start: SlotTime::from_hours(10.0).unwrap(),
            end: SlotTime::from_hours(11.0).unwrap(),
        };
        let ids: Vec<u32> = store.blocking(&slot, ItemKind::Workshop).iter().map(|r| r.id.0).collect();
        assert_eq!(ids, vec![1, 4]);
    }

    #[test]
    fn active_between_filters_and_orders() {
        let store = ReservationStore::new();
        store.insert(reservation(2, "2024-01-10", 9.0, 10.0, ReservationStatus::Active));
        store.insert(reservation(1, "2024-01-09", 9.0, 10.0, ReservationStatus::Active));
        store.insert(reservation(3, "2024-01-11", 9.0, 10.0, ReservationStatus::Held));
        store.insert(reservation(4, "2024-02-01", 9.0, 10.0, ReservationStatus::Active));

        let rows = store.active_between(
            "2024-01-01".parse().unwrap(),
            "2024-01-31".parse().unwrap(),
            "facility1",
            None,
        );
        let ids: Vec<u32> = rows.iter().map(|r| r.id.0).collect();
        assert_eq!(ids, vec![1, 2]);

        let none = store.active_between(
            "2024-01-01".parse().unwrap(),
            "2024-01-31".parse().unwrap(),
            "facility1",
            Some(&AccountId::from("someone-else")),
        );
        assert!(none.is_empty());
    }

    #[test]
    fn holds_between_supports_open_range() {
        let store = ReservationStore::new();
        store.insert(reservation(1, "2024-01-09", 9.0, 10.0, ReservationStatus::Held));
        store.insert(reservation(2, "2024-03-09", 10.0, 11.0, ReservationStatus::Held));
        store.insert(reservation(3, "2024-01-09", 9.0, 10.0, ReservationStatus::Active));

        assert_eq!(store.holds_between(None).len(), 2);
        let january = store.holds_between(Some((
            "2024-01-01".parse().unwrap(),
            "2024-01-31".parse().unwrap(),
        )));
        assert_eq!(january.len(), 1);
        assert_eq!(january[0].id, ReservationId(1));
    }
}
