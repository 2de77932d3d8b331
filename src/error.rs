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

//! Error types for reservation and ledger processing.

use crate::base::{AccountId, ReservationId};
use crate::catalog::ItemKind;
use rust_decimal::Decimal;
use thiserror::Error;

/// Reservation processing errors.
///
/// Every variant is reported synchronously to the caller; none of them leaves
/// partial state behind (failed checks roll back the whole operation).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReservationError {
    /// Malformed date/time, off-grid increment, outside operating hours, or
    /// zero/negative duration
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Booking attempted by a deactivated account
    #[error("{0} is not an active account")]
    AccountInactive(AccountId),

    /// Referenced account id is not registered
    #[error("{0} does not exist in our system")]
    UnknownAccount(AccountId),

    /// Balance below the computed price at booking time
    #[error("insufficient balance: cost is {cost} and balance is {balance}")]
    InsufficientFunds { cost: Decimal, balance: Decimal },

    /// No capacity left for the requested window and item kind
    #[error("{0} is booked for that time")]
    CapacityExceeded(ItemKind),

    /// Cancellation targets an unknown reservation id
    #[error("reservation {0} does not exist in our system")]
    NotFound(ReservationId),

    /// Cancellation targets a reservation already in terminal state
    #[error("reservation {0} is already cancelled")]
    AlreadyCancelled(ReservationId),

    /// Storage-layer fault; never a business rejection. The in-memory store
    /// does not raise it, storage-backed implementations map their faults here.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::ReservationError;
    use crate::base::{AccountId, ReservationId};
    use crate::catalog::ItemKind;
    use rust_decimal_macros::dec;

    #[test]
    fn error_display_messages() {
        assert_eq!(
            ReservationError::InvalidRequest("no bookings on Sunday".into()).to_string(),
            "invalid request: no bookings on Sunday"
        );
        assert_eq!(
            ReservationError::AccountInactive(AccountId::from("client1")).to_string(),
            "client1 is not an active account"
        );
        assert_eq!(
            ReservationError::InsufficientFunds {
                cost: dec!(49.5),
                balance: dec!(10),
            }
            .to_string(),
            "insufficient balance: cost is 49.5 and balance is 10"
        );
        assert_eq!(
            ReservationError::CapacityExceeded(ItemKind::Crusher).to_string(),
            "crusher is booked for that time"
        );
        assert_eq!(
            ReservationError::NotFound(ReservationId(7)).to_string(),
            "reservation 7 does not exist in our system"
        );
        assert_eq!(
            ReservationError::AlreadyCancelled(ReservationId(7)).to_string(),
            "reservation 7 is already cancelled"
        );
    }

    #[test]
    fn errors_are_cloneable() {
        let error = ReservationError::CapacityExceeded(ItemKind::Workshop);
        let cloned = error.clone();
        assert_eq!(error, cloned);
    }
}
