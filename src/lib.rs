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

//! # Slotbook
//!
//! This library provides a reservation and ledger engine for a facility of
//! capacity-limited resources: paid bookings, provisional holds placed by
//! remote parties, cancellations with tiered refunds, and an append-only
//! payment/refund ledger that moves in lock-step with reservation state.
//!
//! ## Core Components
//!
//! - [`Engine`]: the orchestrator that validates requests, serializes writes
//!   per `(date, item kind)`, and commits reservation + ledger mutations
//!   atomically
//! - [`ItemKind`]: the resource catalog (per-slot capacity, hourly rate)
//! - [`ReservationStore`]: durable record of every reservation and hold
//! - [`Ledger`]: append-only payment/refund transaction log
//! - [`AccountDirectory`]: the per-account balance collaborator
//! - [`ReservationError`]: rejection taxonomy for all operations
//!
//! ## Example
//!
//! ```
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//! use slotbook_rs::{
//!     AccountId, BookingRequest, Clock, Engine, ItemKind, Role, DEFAULT_FACILITY,
//! };
//!
//! let engine = Engine::with_clock(Clock::Fixed("2024-01-01".parse().unwrap()));
//! let client = AccountId::from("client1");
//! engine.accounts().open(client.clone(), Role::Client, dec!(500)).unwrap();
//!
//! let id = engine
//!     .book(&BookingRequest {
//!         facility: DEFAULT_FACILITY.to_string(),
//!         item: ItemKind::Workshop,
//!         client: client.clone(),
//!         date: "2024-01-08".parse::<NaiveDate>().unwrap(),
//!         start_time: 9.0,
//!         duration: 2.0,
//!     })
//!     .unwrap();
//!
//! // The payment is observable immediately: 99/hr x 2h, no discount.
//! assert_eq!(engine.balance(&client).unwrap(), dec!(302));
//! assert!(engine.store().get(id).is_some());
//! ```
//!
//! ## Thread Safety
//!
//! Booking, hold, and cancellation requests for the same date and item kind
//! are mutually exclusive; everything else runs in parallel. Views never
//! block writers.

pub mod account;
pub mod availability;
mod base;
pub mod catalog;
mod engine;
pub mod error;
pub mod ledger;
pub mod pricing;
mod reservation;
pub mod role;
pub mod schedule;
mod store;
mod transaction;

pub use account::{Account, AccountDirectory, AccountSnapshot};
pub use base::{AccountId, ReservationId, SlotTime, TransactionId};
pub use catalog::ItemKind;
pub use engine::{
    BookingRequest, CancelOutcome, Clock, DEFAULT_FACILITY, Engine, HoldRequest,
};
pub use error::ReservationError;
pub use ledger::Ledger;
pub use reservation::{Reservation, ReservationStatus};
pub use role::{Operation, Role};
pub use schedule::{MAX_ADVANCE_DAYS, Slot};
pub use store::ReservationStore;
pub use transaction::{Transaction, TransactionKind};
