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

//! Resource catalog: the bookable item kinds with their per-slot capacity
//! and hourly rate. Static, read-only, no failure modes.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A category of bookable resource at the facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Workshop,
    Microvac,
    Irradiator,
    Extruder,
    Crusher,
    Harvester,
}

impl ItemKind {
    pub const ALL: [ItemKind; 6] = [
        ItemKind::Workshop,
        ItemKind::Microvac,
        ItemKind::Irradiator,
        ItemKind::Extruder,
        ItemKind::Crusher,
        ItemKind::Harvester,
    ];

    /// How many simultaneous non-cancelled reservations a slot admits.
    pub fn capacity(self) -> u32 {
        match self {
            ItemKind::Workshop => 4,
            ItemKind::Microvac => 2,
            ItemKind::Irradiator => 2,
            ItemKind::Extruder => 2,
            ItemKind::Crusher => 1,
            ItemKind::Harvester => 1,
        }
    }

    /// Undiscounted price per hour of use.
    pub fn hourly_rate(self) -> Decimal {
        match self {
            ItemKind::Workshop => dec!(99),
            ItemKind::Microvac => dec!(1000),
            ItemKind::Irradiator => dec!(2220),
            ItemKind::Extruder => dec!(600),
            ItemKind::Crusher => dec!(20000),
            ItemKind::Harvester => dec!(8800),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ItemKind::Workshop => "workshop",
            ItemKind::Microvac => "microvac",
            ItemKind::Irradiator => "irradiator",
            ItemKind::Extruder => "extruder",
            ItemKind::Crusher => "crusher",
            ItemKind::Harvester => "harvester",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "workshop" => Ok(ItemKind::Workshop),
            "microvac" => Ok(ItemKind::Microvac),
            "irradiator" => Ok(ItemKind::Irradiator),
            "extruder" => Ok(ItemKind::Extruder),
            "crusher" => Ok(ItemKind::Crusher),
            "harvester" => Ok(ItemKind::Harvester),
            other => Err(format!("unknown item kind: {other}")),
        }
    }
}
