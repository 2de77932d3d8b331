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

use chrono::NaiveDate;
use clap::Parser;
use csv::{ReaderBuilder, Trim, Writer};
use rust_decimal::Decimal;
use serde::Deserialize;
use slotbook_rs::{
    AccountId, BookingRequest, Clock, Engine, HoldRequest, ItemKind, ReservationId, Role,
    DEFAULT_FACILITY,
};
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::PathBuf;
use std::process;

/// Reservation Engine - Process booking request CSV files
///
/// Reads account and reservation requests from a CSV file and outputs the
/// resulting account states (or, with --reservations, the reservation table)
/// to stdout.
#[derive(Parser, Debug)]
#[command(name = "slotbook-rs")]
#[command(about = "A reservation engine that processes booking request CSVs", long_about = None)]
struct Args {
    /// Path to CSV file with requests
    ///
    /// Expected format: op,account,role,item,date,start,duration,reservation,amount
    /// Example: cargo run -- requests.csv > accounts.csv
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Output the reservation table instead of account states
    #[arg(long)]
    reservations: bool,

    /// Fix "today" for pricing/refund rules (YYYY-MM-DD); defaults to the
    /// system date
    #[arg(long, value_name = "DATE")]
    as_of: Option<NaiveDate>,
}

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // Open input file
    let file = match File::open(&args.input) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error opening file '{}': {}", args.input.display(), e);
            process::exit(1);
        }
    };

    let clock = match args.as_of {
        Some(date) => Clock::Fixed(date),
        None => Clock::System,
    };

    // Process requests from CSV
    let engine = match process_requests(BufReader::new(file), clock) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Error processing requests: {}", e);
            process::exit(1);
        }
    };

    // Write results to stdout
    let result = if args.reservations {
        write_reservations(&engine, std::io::stdout())
    } else {
        write_accounts(&engine, std::io::stdout())
    };
    if let Err(e) = result {
        eprintln!("Error writing output: {}", e);
        process::exit(1);
    }
}

/// Raw CSV record matching the input format.
///
/// Fields: `op, account, role, item, date, start, duration, reservation, amount`
#[derive(Debug, Deserialize)]
struct CsvRecord {
    op: String,
    account: Option<String>,
    role: Option<String>,
    item: Option<String>,
    #[serde(deserialize_with = "csv::invalid_option")]
    date: Option<NaiveDate>,
    #[serde(deserialize_with = "csv::invalid_option")]
    start: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    duration: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    reservation: Option<u32>,
    #[serde(deserialize_with = "csv::invalid_option")]
    amount: Option<Decimal>,
}

/// An engine operation decoded from one CSV row.
#[derive(Debug)]
enum Request {
    Open {
        account: AccountId,
        role: Role,
        balance: Decimal,
    },
    Fund {
        account: AccountId,
        amount: Decimal,
    },
    Deactivate(AccountId),
    Activate(AccountId),
    Book(BookingRequest),
    Hold(HoldRequest),
    Cancel(ReservationId),
}

impl CsvRecord {
    /// Converts a CSV record into an engine request.
    ///
    /// Returns `None` for unknown ops or missing required fields.
    fn into_request(self) -> Option<Request> {
        let account = self.account.map(AccountId::new);

        match self.op.to_lowercase().as_str() {
            "open" => Some(Request::Open {
                account: account?,
                role: self.role?.parse().ok()?,
                balance: self.amount.unwrap_or(Decimal::ZERO),
            }),
            "fund" => Some(Request::Fund {
                account: account?,
                amount: self.amount?,
            }),
            "deactivate" => Some(Request::Deactivate(account?)),
            "activate" => Some(Request::Activate(account?)),
            "book" => Some(Request::Book(BookingRequest {
                facility: DEFAULT_FACILITY.to_string(),
                item: self.item?.parse::<ItemKind>().ok()?,
                client: account?,
                date: self.date?,
                start_time: self.start?,
                duration: self.duration?,
            })),
            "hold" => Some(Request::Hold(HoldRequest {
                facility: DEFAULT_FACILITY.to_string(),
                item: self.item?.parse::<ItemKind>().ok()?,
                client: account?,
                date: self.date?,
                start_time: self.start?,
                duration: self.duration?,
            })),
            "cancel" => Some(Request::Cancel(ReservationId(self.reservation?))),
            _ => None,
        }
    }
}

/// Process requests from a CSV reader.
///
/// Streaming parse; malformed rows and rejected requests are skipped without
/// stopping the run (rejections are business outcomes, not input errors).
///
/// # CSV Format
///
/// Expected columns: `op, account, role, item, date, start, duration,
/// reservation, amount`
///
/// # Example
///
/// ```csv
/// op,account,role,item,date,start,duration,reservation,amount
/// open,client1,client,,,,,,500
/// book,client1,,workshop,2024-01-08,9.0,2.0,,
/// cancel,,,,,,,1,
/// ```
///
/// # Errors
///
/// Returns a CSV error if the reader fails or the CSV structure is invalid.
pub fn process_requests<R: Read>(reader: R, clock: Clock) -> Result<Engine, csv::Error> {
    let engine = Engine::with_clock(clock);

    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All) // Handle whitespace in fields like " book "
        .flexible(true) // Allow trailing fields to be omitted
        .has_headers(true) // Skip first row as header
        .from_reader(reader);

    for result in rdr.deserialize::<CsvRecord>() {
        match result {
            Ok(record) => {
                let Some(request) = record.into_request() else {
                    #[cfg(debug_assertions)]
                    eprintln!("Skipping invalid request record");
                    continue;
                };

                // Apply the request, ignoring rejections (silent failure)
                if let Err(e) = apply(&engine, request) {
                    #[cfg(debug_assertions)]
                    eprintln!("Skipping request: {}", e);
                }
            }
            Err(e) => {
                // Skip malformed rows
                #[cfg(debug_assertions)]
                eprintln!("Skipping malformed row: {}", e);
                continue;
            }
        }
    }

    Ok(engine)
}

fn apply(engine: &Engine, request: Request) -> Result<(), slotbook_rs::ReservationError> {
    match request {
        Request::Open {
            account,
            role,
            balance,
        } => engine.accounts().open(account, role, balance),
        Request::Fund { account, amount } => engine.accounts().credit(&account, amount),
        Request::Deactivate(account) => engine.accounts().deactivate(&account),
        Request::Activate(account) => engine.accounts().activate(&account),
        Request::Book(request) => engine.book(&request).map(|_| ()),
        Request::Hold(request) => engine.hold(&request).map(|_| ()),
        Request::Cancel(id) => engine.cancel(id).map(|_| ()),
    }
}

/// Write account states to a CSV writer.
///
/// Columns: `account, role, balance, active`, ordered by account id.
///
/// # Errors
///
/// Returns a CSV error if writing fails.
pub fn write_accounts<W: Write>(engine: &Engine, writer: W) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(writer);

    for snapshot in engine.accounts().snapshots() {
        wtr.serialize(&snapshot)?;
    }

    // Flush to ensure all data is written
    wtr.flush()?;
    Ok(())
}

/// Write the reservation table to a CSV writer, in id order.
///
/// Columns mirror the reservation record: `id, facility, recurring, date,
/// item, client, start_time, end_time, status`.
///
/// # Errors
///
/// Returns a CSV error if writing fails.
pub fn write_reservations<W: Write>(engine: &Engine, writer: W) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(writer);

    let mut id = 1u32;
    // Ids are dense from 1; walk them in order until the store runs out.
    let mut remaining = engine.store().len();
    while remaining > 0 {
        if let Some(reservation) = engine.store().get(ReservationId(id)) {
            wtr.serialize(&reservation)?;
            remaining -= 1;
        }
        id += 1;
    }

    wtr.flush()?;
    Ok(())
}
