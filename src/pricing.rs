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

//! Pricing and refund calculators.
//!
//! Both are pure functions of the catalog rate and the calendar distance
//! between "today" and the booked date; the caller supplies "today" so the
//! results are deterministic under test.
//!
//! - Price: hourly rate x duration, 25% off when booked at least 14 days out.
//! - Refund: tiered on notice before the booked date, applied to the
//!   *recorded* payment amount, never a recomputed price:
//!   more than 7 days notice refunds 75%, more than 2 days 50%, otherwise 0.

use crate::catalog::ItemKind;
use crate::schedule::Slot;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Minimum lead time, in days, for the early-booking discount.
pub const DISCOUNT_LEAD_DAYS: i64 = 14;

/// Price of booking `item` for `slot`, as of `today`.
pub fn booking_price(item: ItemKind, slot: &Slot, today: NaiveDate) -> Decimal {
    let base = item.hourly_rate() * slot.duration_hours();
    let lead_days = slot.date.signed_duration_since(today).num_days();
    if lead_days >= DISCOUNT_LEAD_DAYS {
        base * dec!(0.75)
    } else {
        base
    }
}

/// Refund owed when a reservation for `booked_for` is cancelled `today`,
/// given the payment amount recorded at booking time.
pub fn refund_amount(payment: Decimal, booked_for: NaiveDate, today: NaiveDate) -> Decimal {
    let notice_days = booked_for.signed_duration_since(today).num_days();
    if notice_days > 7 {
        payment * dec!(0.75)
    } else if notice_days > 2 {
        payment * dec!(0.5)
    } else {
        Decimal::ZERO
    }
}
