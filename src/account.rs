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

//! Account balance collaborator.
//!
//! The engine only ever calls `debit`, `credit`, and balance/activity reads
//! here; each call is synchronous and atomic per account. `debit` is a
//! check-and-debit under the account mutex, so a balance can never go
//! negative through racing bookings.

use crate::base::AccountId;
use crate::error::ReservationError;
use crate::role::Role;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug)]
struct AccountData {
    role: Role,
    balance: Decimal,
    active: bool,
}

/// A single funds-holding account.
#[derive(Debug)]
pub struct Account {
    inner: Mutex<AccountData>,
}

impl Account {
    const DECIMAL_PRECISION: u32 = 4;

    pub fn new(role: Role, balance: Decimal) -> Self {
        Self {
            inner: Mutex::new(AccountData {
                role,
                balance,
                active: true,
            }),
        }
    }

    pub fn balance(&self) -> Decimal {
        self.inner.lock().balance
    }

    pub fn role(&self) -> Role {
        self.inner.lock().role
    }

    pub fn is_active(&self) -> bool {
        self.inner.lock().active
    }

    /// Atomic check-and-debit; rejects rather than going negative.
    fn debit(&self, amount: Decimal) -> Result<(), ReservationError> {
        let mut data = self.inner.lock();
        if data.balance < amount {
            return Err(ReservationError::InsufficientFunds {
                cost: amount,
                balance: data.balance,
            });
        }
        data.balance -= amount;
        debug_assert!(data.balance >= Decimal::ZERO);
        Ok(())
    }

    fn credit(&self, amount: Decimal) {
        self.inner.lock().balance += amount;
    }
}

/// Point-in-time account state, for reports and the CLI output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountSnapshot {
    pub account: AccountId,
    pub role: Role,
    pub balance: Decimal,
    pub active: bool,
}

/// Registry of accounts keyed by account id.
///
/// Stands in for the external account-ledger collaborator: every mutation is
/// atomic per call, and the engine holds it behind an `Arc` handle rather
/// than any process-wide state.
#[derive(Debug, Default)]
pub struct AccountDirectory {
    accounts: DashMap<AccountId, Account>,
}

impl AccountDirectory {
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
        }
    }

    /// Registers a new account. Rejects ids that are already taken.
    pub fn open(
        &self,
        id: AccountId,
        role: Role,
        initial_balance: Decimal,
    ) -> Result<(), ReservationError> {
        if initial_balance < Decimal::ZERO {
            return Err(ReservationError::InvalidRequest(
                "initial balance cannot be negative".to_string(),
            ));
        }
        match self.accounts.entry(id) {
            Entry::Occupied(entry) => Err(ReservationError::InvalidRequest(format!(
                "{} is already a registered account",
                entry.key()
            ))),
            Entry::Vacant(entry) => {
                entry.insert(Account::new(role, initial_balance));
                Ok(())
            }
        }
    }

    pub fn contains(&self, id: &AccountId) -> bool {
        self.accounts.contains_key(id)
    }

    pub fn balance(&self, id: &AccountId) -> Result<Decimal, ReservationError> {
        self.with_account(id, |account| account.balance())
    }

    pub fn role(&self, id: &AccountId) -> Result<Role, ReservationError> {
        self.with_account(id, |account| account.role())
    }

    pub fn is_active(&self, id: &AccountId) -> Result<bool, ReservationError> {
        self.with_account(id, |account| account.is_active())
    }

    /// Atomically removes `amount` from the account, or rejects with
    /// [`ReservationError::InsufficientFunds`] leaving the balance untouched.
    pub fn debit(&self, id: &AccountId, amount: Decimal) -> Result<(), ReservationError> {
        self.with_account(id, |account| account.debit(amount))?
    }

    /// Adds `amount` to the account. Negative amounts are rejected.
    pub fn credit(&self, id: &AccountId, amount: Decimal) -> Result<(), ReservationError> {
        if amount < Decimal::ZERO {
            return Err(ReservationError::InvalidRequest(
                "credit amount cannot be negative".to_string(),
            ));
        }
        self.with_account(id, |account| account.credit(amount))
    }

    /// Re-enables a deactivated account; rejects if already active.
    pub fn activate(&self, id: &AccountId) -> Result<(), ReservationError> {
        self.set_active(id, true)
    }

    /// Disables an account so it can no longer pay for bookings; rejects if
    /// already inactive.
    pub fn deactivate(&self, id: &AccountId) -> Result<(), ReservationError> {
        self.set_active(id, false)
    }

    fn set_active(&self, id: &AccountId, active: bool) -> Result<(), ReservationError> {
        let account = self
            .accounts
            .get(id)
            .ok_or_else(|| ReservationError::UnknownAccount(id.clone()))?;
        let mut data = account.inner.lock();
        if data.active == active {
            let state = if active { "active" } else { "deactivated" };
            return Err(ReservationError::InvalidRequest(format!(
                "{id} is already {state}"
            )));
        }
        data.active = active;
        Ok(())
    }

    /// Snapshots of every account, ordered by account id.
    pub fn snapshots(&self) -> Vec<AccountSnapshot> {
        let mut rows: Vec<AccountSnapshot> = self
            .accounts
            .iter()
            .map(|entry| {
                let data = entry.value().inner.lock();
                AccountSnapshot {
                    account: entry.key().clone(),
                    role: data.role,
                    balance: data.balance.round_dp(Account::DECIMAL_PRECISION),
                    active: data.active,
                }
            })
            .collect();
        rows.sort_by(|a, b| a.account.0.cmp(&b.account.0));
        rows
    }

    fn with_account<T>(
        &self,
        id: &AccountId,
        f: impl FnOnce(&Account) -> T,
    ) -> Result<T, ReservationError> {
        self.accounts
            .get(id)
            .map(|account| f(account.value()))
            .ok_or_else(|| ReservationError::UnknownAccount(id.clone()))
    }
}
