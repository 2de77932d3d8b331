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

//! Role capability table.
//!
//! The routing layer consults this table before dispatching an operation;
//! the engine itself only enforces operation-level checks (an inactive
//! account cannot pay, regardless of role). Ownership checks (a client may
//! only cancel its own reservations) also stay with the routing layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Caller role attached to an authenticated account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Front-desk staff booking on behalf of clients.
    Scheduler,
    /// Full administrative access.
    Admin,
    /// Self-service booking client.
    Client,
    /// Remote party placing provisional holds; never transacts on the ledger.
    Remote,
}

/// Engine operations gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Book,
    Hold,
    Cancel,
    ViewReservations,
    ViewHolds,
    ViewTransactions,
    ViewBalance,
    AddFunds,
    ManageAccounts,
}

impl Role {
    /// Whether this role may invoke `op`.
    pub fn permits(self, op: Operation) -> bool {
        use Operation::*;
        match self {
            Role::Admin => true,
            Role::Scheduler => matches!(
                op,
                Book | Cancel | ViewReservations | ViewHolds | ViewTransactions | ViewBalance
            ),
            Role::Client => matches!(op, Book | Cancel | ViewReservations | ViewBalance),
            Role::Remote => matches!(op, Hold | Cancel | ViewHolds),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Scheduler => "scheduler",
            Role::Admin => "admin",
            Role::Client => "client",
            Role::Remote => "remote",
        };
        f.write_str(name)
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "scheduler" => Ok(Role::Scheduler),
            "admin" => Ok(Role::Admin),
            "client" => Ok(Role::Client),
            "remote" => Ok(Role::Remote),
            other => Err(format!("unknown role: {other}")),
        }
    }
}
