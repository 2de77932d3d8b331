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

//! Ledger entry types.
//!
//! Each entry belongs to exactly one reservation: an `Active` reservation
//! gets one `Payment` at creation, a cancelled-from-active reservation one
//! `Refund` (possibly of amount zero). Entries are immutable once written.

use crate::base::{AccountId, ReservationId, TransactionId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Balance debit at booking time.
    Payment,
    /// Balance credit at cancellation time.
    Refund,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Payment => f.write_str("payment"),
            TransactionKind::Refund => f.write_str("refund"),
        }
    }
}

/// One immutable ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub kind: TransactionKind,
    /// Non-negative; refunds may legitimately be zero.
    pub amount: Decimal,
    pub timestamp: DateTime<Utc>,
    pub account: AccountId,
    pub reservation: ReservationId,
}

impl Transaction {
    pub fn payment(
        reservation: ReservationId,
        account: AccountId,
        amount: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: TransactionId::payment(reservation),
            kind: TransactionKind::Payment,
            amount,
            timestamp,
            account,
            reservation,
        }
    }

    pub fn refund(
        reservation: ReservationId,
        account: AccountId,
        amount: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: TransactionId::refund(reservation),
            kind: TransactionKind::Refund,
            amount,
            timestamp,
            account,
            reservation,
        }
    }
}
