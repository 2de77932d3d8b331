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

//! Append-only transaction ledger.
//!
//! `record_payment` and `record_refund` apply the account balance delta and
//! append the entry as one unit: the balance mutation runs first (it is the
//! only fallible half), and the append cannot fail, so a rejected debit
//! leaves neither an entry nor a balance change behind.

use crate::account::AccountDirectory;
use crate::base::{AccountId, ReservationId};
use crate::error::ReservationError;
use crate::transaction::{Transaction, TransactionKind};
use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::RwLock;
use rust_decimal::Decimal;

/// Durable, append-only record of payment and refund transactions.
#[derive(Debug, Default)]
pub struct Ledger {
    entries: RwLock<Vec<Transaction>>,
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Debits the account and appends the payment entry for a reservation.
    ///
    /// All-or-nothing: if the debit is rejected (insufficient funds, unknown
    /// account) nothing is written.
    pub fn record_payment(
        &self,
        accounts: &AccountDirectory,
        reservation: ReservationId,
        account: &AccountId,
        amount: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Result<(), ReservationError> {
        accounts.debit(account, amount)?;
        self.entries.write().push(Transaction::payment(
            reservation,
            account.clone(),
            amount,
            timestamp,
        ));
        Ok(())
    }

    /// Credits the account and appends the refund entry for a reservation.
    ///
    /// Zero-amount refunds are recorded too, so every cancelled-from-active
    /// reservation carries exactly one refund entry.
    pub fn record_refund(
        &self,
        accounts: &AccountDirectory,
        reservation: ReservationId,
        account: &AccountId,
        amount: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Result<(), ReservationError> {
        accounts.credit(account, amount)?;
        self.entries.write().push(Transaction::refund(
            reservation,
            account.clone(),
            amount,
            timestamp,
        ));
        Ok(())
    }

    /// Amount of the payment recorded for a reservation, if any.
    pub fn payment_amount(&self, reservation: ReservationId) -> Option<Decimal> {
        self.entries
            .read()
            .iter()
            .find(|t| t.reservation == reservation && t.kind == TransactionKind::Payment)
            .map(|t| t.amount)
    }

    /// Every entry for one reservation, in append order.
    pub fn entries_for_reservation(&self, reservation: ReservationId) -> Vec<Transaction> {
        self.filtered(|t| t.reservation == reservation)
    }

    /// Entries whose timestamp falls on a date within `[start, end]`.
    pub fn entries_between(&self, start: NaiveDate, end: NaiveDate) -> Vec<Transaction> {
        self.filtered(|t| (start..=end).contains(&t.timestamp.date_naive()))
    }

    /// Entries for one account, or all entries, in append order.
    pub fn entries_for_account(&self, account: Option<&AccountId>) -> Vec<Transaction> {
        self.filtered(|t| account.is_none_or(|a| &t.account == a))
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn filtered(&self, keep: impl Fn(&Transaction) -> bool) -> Vec<Transaction> {
        self.entries
            .read()
            .iter()
            .filter(|t| keep(t))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::Role;
    use rust_decimal_macros::dec;

    fn funded_directory(id: &str, balance: Decimal) -> AccountDirectory {
        let directory = AccountDirectory::new();
        directory.open(AccountId::from(id), Role::Client, balance).unwrap();
        directory
    }

    #[test]
    fn payment_debits_and_appends_together() {
        let accounts = funded_directory("client1", dec!(100));
        let ledger = Ledger::new();
        let id = AccountId::from("client1");

        ledger
            .record_payment(&accounts, ReservationId(1), &id, dec!(49.5), Utc::now())
            .unwrap();

        assert_eq!(accounts.balance(&id).unwrap(), dec!(50.5));
        assert_eq!(ledger.payment_amount(ReservationId(1)), Some(dec!(49.5)));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn rejected_debit_appends_nothing() {
        let accounts = funded_directory("client1", dec!(10));
        let ledger = Ledger::new();
        let id = AccountId::from("client1");

        let result = ledger.record_payment(&accounts, ReservationId(1), &id, dec!(49.5), Utc::now());
        assert!(matches!(
            result,
            Err(ReservationError::InsufficientFunds { .. })
        ));
        assert!(ledger.is_empty());
        assert_eq!(accounts.balance(&id).unwrap(), dec!(10));
    }

    #[test]
    fn zero_amount_refund_is_recorded() {
        let accounts = funded_directory("client1", dec!(0));
        let ledger = Ledger::new();
        let id = AccountId::from("client1");

        ledger
            .record_refund(&accounts, ReservationId(4), &id, dec!(0), Utc::now())
            .unwrap();

        let entries = ledger.entries_for_reservation(ReservationId(4));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, TransactionKind::Refund);
        assert_eq!(entries[0].amount, dec!(0));
        assert_eq!(entries[0].id.0, "4-t2");
    }

    #[test]
    fn entries_between_is_inclusive_of_both_dates() {
        let accounts = funded_directory("client1", dec!(1000));
        let ledger = Ledger::new();
        let id = AccountId::from("client1");
        let jan_1 = "2024-01-01T09:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let jan_31 = "2024-01-31T23:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let feb_1 = "2024-02-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap();

        ledger.record_payment(&accounts, ReservationId(1), &id, dec!(1), jan_1).unwrap();
        ledger.record_payment(&accounts, ReservationId(2), &id, dec!(1), jan_31).unwrap();
        ledger.record_payment(&accounts, ReservationId(3), &id, dec!(1), feb_1).unwrap();

        let january = ledger.entries_between(
            "2024-01-01".parse().unwrap(),
            "2024-01-31".parse().unwrap(),
        );
        assert_eq!(january.len(), 2);
    }

    #[test]
    fn account_filter_returns_append_order() {
        let accounts = funded_directory("client1", dec!(1000));
        accounts.open(AccountId::from("client2"), Role::Client, dec!(1000)).unwrap();
        let ledger = Ledger::new();

        ledger
            .record_payment(&accounts, ReservationId(1), &AccountId::from("client1"), dec!(1), Utc::now())
            .unwrap();
        ledger
            .record_payment(&accounts, ReservationId(2), &AccountId::from("client2"), dec!(2), Utc::now())
            .unwrap();
        ledger
            .record_refund(&accounts, ReservationId(1), &AccountId::from("client1"), dec!(1), Utc::now())
            .unwrap();

        let mine = ledger.entries_for_account(Some(&AccountId::from("client1")));
        let ids: Vec<&str> = mine.iter().map(|t| t.id.0.as_str()).collect();
        assert_eq!(ids, vec!["1-t1", "1-t2"]);
        assert_eq!(ledger.entries_for_account(None).len(), 3);
    }
}
