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

//! Reservation and hold orchestrator.
//!
//! The [`Engine`] is the only component that creates or transitions
//! reservations and appends ledger entries; everything else reads. It
//! validates each request, serializes writes per `(date, item kind)` stripe,
//! and commits the reservation-state write and the ledger mutation as one
//! unit.
//!
//! # Operations
//!
//! | Operation | Outcome |
//! |-----------|---------|
//! | Book | `Active` reservation + payment entry + balance debit |
//! | Hold | `Held` reservation, no ledger effect |
//! | Cancel (active) | `Cancelled` + refund entry + balance credit |
//! | Cancel (held) | `Cancelled`, no ledger effect |
//! | Views | read-only projections, id/append order |
//!
//! # Concurrency
//!
//! Writes for the same `(date, item kind)` key take a striped mutex, so the
//! availability check and the subsequent insert form one atomic unit; two
//! concurrent bookers can never jointly exceed capacity. Writes on different
//! stripes, and all views, proceed in parallel.

use crate::account::AccountDirectory;
use crate::availability;
use crate::base::{AccountId, ReservationId};
use crate::catalog::ItemKind;
use crate::error::ReservationError;
use crate::ledger::Ledger;
use crate::pricing;
use crate::reservation::{Reservation, ReservationStatus};
use crate::schedule;
use crate::store::ReservationStore;
use crate::transaction::Transaction;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use dashmap::DashMap;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Facility tag applied when a request does not name one.
pub const DEFAULT_FACILITY: &str = "facility1";

fn default_facility() -> String {
    DEFAULT_FACILITY.to_string()
}

/// Source of "today" for pricing, refunds, and the advance window.
///
/// Injected so the calendar-dependent rules are deterministic under test.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    System,
    Fixed(NaiveDate),
}

impl Clock {
    pub fn today(&self) -> NaiveDate {
        match self {
            Clock::System => Utc::now().date_naive(),
            Clock::Fixed(date) => *date,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(date) => NaiveDateTime::new(*date, NaiveTime::MIN).and_utc(),
        }
    }
}

/// Payload for creating a paid booking.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BookingRequest {
    #[serde(default = "default_facility")]
    pub facility: String,
    pub item: ItemKind,
    pub client: AccountId,
    pub date: NaiveDate,
    pub start_time: f64,
    pub duration: f64,
}

/// Payload for creating a provisional hold. Same shape as a booking, but no
/// payment is taken and no account checks run.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HoldRequest {
    #[serde(default = "default_facility")]
    pub facility: String,
    pub item: ItemKind,
    pub client: AccountId,
    pub date: NaiveDate,
    pub start_time: f64,
    pub duration: f64,
}

/// What a successful cancellation did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum CancelOutcome {
    /// An active reservation was cancelled and this amount credited back.
    Refunded { amount: Decimal },
    /// A hold was released; no ledger effect.
    HoldReleased,
}

/// Reservation and hold orchestrator.
///
/// # Invariants
///
/// - Non-cancelled reservations of a kind overlapping any instant never
///   exceed that kind's catalog capacity.
/// - Every `Active` reservation has exactly one payment entry; every
///   cancelled-from-active reservation exactly one refund entry; holds have
///   none.
/// - A success response means the reservation state and the balance are both
///   already observable; there is no deferred ledger application.
pub struct Engine {
    store: Arc<ReservationStore>,
    accounts: Arc<AccountDirectory>,
    ledger: Arc<Ledger>,
    /// Write stripes keyed by (date, item kind).
    slot_locks: DashMap<(NaiveDate, ItemKind), Arc<Mutex<()>>>,
    clock: Clock,
}

impl Engine {
    /// Engine over fresh in-memory state and the system clock.
    pub fn new() -> Self {
        Self::with_clock(Clock::System)
    }

    /// Engine over fresh in-memory state and the given clock.
    pub fn with_clock(clock: Clock) -> Self {
        Self::with_parts(
            Arc::new(ReservationStore::new()),
            Arc::new(AccountDirectory::new()),
            Arc::new(Ledger::new()),
            clock,
        )
    }

    /// Engine over externally owned collaborators.
    pub fn with_parts(
        store: Arc<ReservationStore>,
        accounts: Arc<AccountDirectory>,
        ledger: Arc<Ledger>,
        clock: Clock,
    ) -> Self {
        Self {
            store,
            accounts,
            ledger,
            slot_locks: DashMap::new(),
            clock,
        }
    }

    pub fn store(&self) -> &ReservationStore {
        &self.store
    }

    pub fn accounts(&self) -> &AccountDirectory {
        &self.accounts
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Creates a paid booking.
    ///
    /// Checks run in order: operating hours and request shape, account
    /// active, balance against the computed price, availability. The first
    /// failing check aborts with no writes. On success the reservation is
    /// persisted `Active`, the account debited, and the payment entry
    /// appended, all under the slot stripe.
    ///
    /// # Errors
    ///
    /// - [`ReservationError::InvalidRequest`] - malformed slot or out of hours.
    /// - [`ReservationError::UnknownAccount`] - client id not registered.
    /// - [`ReservationError::AccountInactive`] - client is deactivated.
    /// - [`ReservationError::InsufficientFunds`] - balance below price.
    /// - [`ReservationError::CapacityExceeded`] - no capacity in the window.
    pub fn book(&self, request: &BookingRequest) -> Result<ReservationId, ReservationError> {
        let today = self.clock.today();
        let slot = schedule::validate_request(request.date, request.start_time, request.duration, today)?;

        let stripe = self.slot_guard(request.date, request.item);
        let _write = stripe.lock();

        if !self.accounts.is_active(&request.client)? {
            return Err(ReservationError::AccountInactive(request.client.clone()));
        }

        let price = pricing::booking_price(request.item, &slot, today);
        let balance = self.accounts.balance(&request.client)?;
        if balance < price {
            return Err(ReservationError::InsufficientFunds {
                cost: price,
                balance,
            });
        }

        if !availability::is_available(&self.store, &slot, request.item) {
            return Err(ReservationError::CapacityExceeded(request.item));
        }

        let id = self.store.next_id();
        // Debit + ledger entry first: the debit is the one remaining fallible
        // step, and the insert below cannot fail, so the pair is
        // all-or-nothing.
        self.ledger.record_payment(
            &self.accounts,
            id,
            &request.client,
            price,
            self.clock.timestamp(),
        )?;
        self.store.insert(Reservation {
            id,
            facility: request.facility.clone(),
            recurring: 0,
            date: slot.date,
            item: request.item,
            client: request.client.clone(),
            start_time: slot.start,
            end_time: slot.end,
            status: ReservationStatus::Active,
        });

        Ok(id)
    }

    /// Creates a provisional hold.
    ///
    /// Holds block capacity like bookings but take no payment and skip the
    /// account checks; remote parties do not transact on the ledger.
    pub fn hold(&self, request: &HoldRequest) -> Result<ReservationId, ReservationError> {
        let today = self.clock.today();
        let slot = schedule::validate_request(request.date, request.start_time, request.duration, today)?;

        let stripe = self.slot_guard(request.date, request.item);
        let _write = stripe.lock();

        if !availability::is_available(&self.store, &slot, request.item) {
            return Err(ReservationError::CapacityExceeded(request.item));
        }

        let id = self.store.next_id();
        self.store.insert(Reservation {
            id,
            facility: request.facility.clone(),
            recurring: 0,
            date: slot.date,
            item: request.item,
            client: request.client.clone(),
            start_time: slot.start,
            end_time: slot.end,
            status: ReservationStatus::Held,
        });

        Ok(id)
    }

    /// Cancels a reservation or hold.
    ///
    /// An active reservation is refunded a share of its *recorded* payment
    /// according to the notice given (75% above 7 days, 50% above 2, else 0);
    /// the refund entry is appended even when the amount is zero. Cancelling
    /// a hold touches no ledger state. `Cancelled` is terminal.
    pub fn cancel(&self, id: ReservationId) -> Result<CancelOutcome, ReservationError> {
        // First read only locates the stripe; date and item are immutable.
        let reservation = self.store.get(id).ok_or(ReservationError::NotFound(id))?;

        let stripe = self.slot_guard(reservation.date, reservation.item);
        let _write = stripe.lock();

        // Re-read under the stripe so a racing cancel is observed.
        let reservation = self.store.get(id).ok_or(ReservationError::NotFound(id))?;
        match reservation.status {
            ReservationStatus::Cancelled => Err(ReservationError::AlreadyCancelled(id)),
            ReservationStatus::Held => {
                self.store.cancel(id)?;
                Ok(CancelOutcome::HoldReleased)
            }
            ReservationStatus::Active => {
                let payment = self.ledger.payment_amount(id).ok_or_else(|| {
                    ReservationError::Unavailable(format!(
                        "payment record missing for reservation {id}"
                    ))
                })?;
                let amount = pricing::refund_amount(payment, reservation.date, self.clock.today());
                // Credit + entry before the status flip: the credit is the
                // only fallible step, and the transition cannot fail once the
                // status is known to be Active under the stripe.
                self.ledger.record_refund(
                    &self.accounts,
                    id,
                    &reservation.client,
                    amount,
                    self.clock.timestamp(),
                )?;
                self.store.cancel(id)?;
                Ok(CancelOutcome::Refunded { amount })
            }
        }
    }

    /// Active reservations for a facility within a date range, optionally for
    /// one client. Id order.
    pub fn reservations_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        facility: &str,
        client: Option<&AccountId>,
    ) -> Vec<Reservation> {
        self.store.active_between(start, end, facility, client)
    }

    /// Holds within a date range, or all holds. Id order.
    pub fn holds_between(&self, range: Option<(NaiveDate, NaiveDate)>) -> Vec<Reservation> {
        self.store.holds_between(range)
    }

    /// Ledger entries within a date range whose reservation belongs to the
    /// facility. Append order.
    pub fn transactions_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        facility: &str,
    ) -> Vec<Transaction> {
        self.ledger
            .entries_between(start, end)
            .into_iter()
            .filter(|t| {
                self.store
                    .get(t.reservation)
                    .is_some_and(|r| r.facility == facility)
            })
            .collect()
    }

    /// Ledger entries for one account, or all of them. Append order.
    pub fn transactions_for_account(&self, account: Option<&AccountId>) -> Vec<Transaction> {
        self.ledger.entries_for_account(account)
    }

    /// Current balance of an account.
    pub fn balance(&self, account: &AccountId) -> Result<Decimal, ReservationError> {
        self.accounts.balance(account)
    }

    fn slot_guard(&self, date: NaiveDate, item: ItemKind) -> Arc<Mutex<()>> {
        self.slot_locks.entry((date, item)).or_default().clone()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
