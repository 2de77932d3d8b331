//! Simple REST API server example for the reservation engine.
//!
//! Run with: `cargo run --example server`
//!
//! ## Endpoints
//!
//! - `POST /reservations` - Create a paid booking
//! - `POST /holds` - Create a provisional hold
//! - `DELETE /reservations/{id}` - Cancel a reservation or hold
//! - `GET /reservations?start=..&end=..&facility=..&client=..` - List reservations
//! - `GET /holds?start=..&end=..` - List holds
//! - `GET /transactions?start=..&end=..&facility=..` - List ledger entries
//! - `GET /accounts/{id}/balance` - Current balance
//! - `POST /accounts` - Open an account
//! - `POST /accounts/{id}/funds` - Add funds
//!
//! ## Example Usage
//!
//! ```bash
//! # Open a funded account
//! curl -X POST http://localhost:3000/accounts \
//!   -H "Content-Type: application/json" \
//!   -d '{"account": "client1", "role": "client", "balance": "500"}'
//!
//! # Book a workshop slot
//! curl -X POST http://localhost:3000/reservations \
//!   -H "Content-Type: application/json" \
//!   -d '{"item": "workshop", "client": "client1", "date": "2026-09-07", "start_time": 9.0, "duration": 2.0}'
//!
//! # Cancel it
//! curl -X DELETE http://localhost:3000/reservations/1
//! ```

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use slotbook_rs::{
    AccountId, BookingRequest, CancelOutcome, Engine, HoldRequest, Reservation, ReservationError,
    ReservationId, Role, Transaction, DEFAULT_FACILITY,
};
use std::sync::Arc;
use tokio::net::TcpListener;

// === Request/Response DTOs ===

/// Request body for opening an account.
#[derive(Debug, Deserialize)]
struct OpenAccountRequest {
    account: AccountId,
    role: Role,
    #[serde(default)]
    balance: Decimal,
}

/// Request body for adding funds.
#[derive(Debug, Deserialize)]
struct AddFundsRequest {
    amount: Decimal,
}

/// Query parameters for reservation listings.
#[derive(Debug, Deserialize)]
struct ReservationQuery {
    start: NaiveDate,
    end: NaiveDate,
    facility: Option<String>,
    client: Option<AccountId>,
}

/// Query parameters for hold listings; the range is optional.
#[derive(Debug, Deserialize)]
struct HoldQuery {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

/// Response body for a created reservation or hold.
#[derive(Debug, Serialize)]
struct CreatedResponse {
    reservation_id: ReservationId,
}

/// Response body for a balance lookup.
#[derive(Debug, Serialize)]
struct BalanceResponse {
    account: AccountId,
    balance: Decimal,
}

/// Response body for errors.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    code: String,
}

// === Application State ===

/// Shared application state containing the reservation engine.
#[derive(Clone)]
struct AppState {
    engine: Arc<Engine>,
}

// === Error Handling ===

/// Wrapper for converting `ReservationError` into HTTP responses.
struct AppError(ReservationError);

impl From<ReservationError> for AppError {
    fn from(err: ReservationError) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self.0 {
            ReservationError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
            ReservationError::AccountInactive(_) => (StatusCode::FORBIDDEN, "ACCOUNT_INACTIVE"),
            ReservationError::UnknownAccount(_) => (StatusCode::NOT_FOUND, "UNKNOWN_ACCOUNT"),
            ReservationError::InsufficientFunds { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "INSUFFICIENT_FUNDS")
            }
            ReservationError::CapacityExceeded(_) => (StatusCode::CONFLICT, "CAPACITY_EXCEEDED"),
            ReservationError::NotFound(_) => (StatusCode::NOT_FOUND, "RESERVATION_NOT_FOUND"),
            ReservationError::AlreadyCancelled(_) => (StatusCode::CONFLICT, "ALREADY_CANCELLED"),
            ReservationError::Unavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "UNAVAILABLE"),
        };

        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
                code: code.to_string(),
            }),
        )
            .into_response()
    }
}

// === Handlers ===

/// POST /reservations - Create a paid booking.
async fn create_reservation(
    State(state): State<AppState>,
    Json(request): Json<BookingRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let reservation_id = state.engine.book(&request)?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { reservation_id })))
}

/// POST /holds - Create a provisional hold.
async fn create_hold(
    State(state): State<AppState>,
    Json(request): Json<HoldRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let reservation_id = state.engine.hold(&request)?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { reservation_id })))
}

/// DELETE /reservations/{id} - Cancel a reservation or hold.
async fn cancel_reservation(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<CancelOutcome>, AppError> {
    let outcome = state.engine.cancel(ReservationId(id))?;
    Ok(Json(outcome))
}

/// GET /reservations - List active reservations in a date range.
async fn list_reservations(
    State(state): State<AppState>,
    Query(query): Query<ReservationQuery>,
) -> Json<Vec<Reservation>> {
    let facility = query.facility.as_deref().unwrap_or(DEFAULT_FACILITY);
    Json(state.engine.reservations_between(
        query.start,
        query.end,
        facility,
        query.client.as_ref(),
    ))
}

/// GET /holds - List holds, optionally limited to a date range.
async fn list_holds(
    State(state): State<AppState>,
    Query(query): Query<HoldQuery>,
) -> Json<Vec<Reservation>> {
    let range = match (query.start, query.end) {
        (Some(start), Some(end)) => Some((start, end)),
        _ => None,
    };
    Json(state.engine.holds_between(range))
}

/// GET /transactions - List ledger entries in a date range.
async fn list_transactions(
    State(state): State<AppState>,
    Query(query): Query<ReservationQuery>,
) -> Json<Vec<Transaction>> {
    let facility = query.facility.as_deref().unwrap_or(DEFAULT_FACILITY);
    Json(state.engine.transactions_between(query.start, query.end, facility))
}

/// GET /accounts/{id}/balance - Current balance.
async fn get_balance(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BalanceResponse>, AppError> {
    let account = AccountId::new(id);
    let balance = state.engine.balance(&account)?;
    Ok(Json(BalanceResponse { account, balance }))
}

/// POST /accounts - Open an account.
async fn open_account(
    State(state): State<AppState>,
    Json(request): Json<OpenAccountRequest>,
) -> Result<StatusCode, AppError> {
    state
        .engine
        .accounts()
        .open(request.account, request.role, request.balance)?;
    Ok(StatusCode::CREATED)
}

/// POST /accounts/{id}/funds - Add funds to an account.
async fn add_funds(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<AddFundsRequest>,
) -> Result<Json<BalanceResponse>, AppError> {
    let account = AccountId::new(id);
    state.engine.accounts().credit(&account, request.amount)?;
    let balance = state.engine.balance(&account)?;
    Ok(Json(BalanceResponse { account, balance }))
}

// === Router ===

fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/reservations", post(create_reservation).get(list_reservations))
        .route("/reservations/{id}", delete(cancel_reservation))
        .route("/holds", post(create_hold).get(list_holds))
        .route("/transactions", get(list_transactions))
        .route("/accounts", post(open_account))
        .route("/accounts/{id}/balance", get(get_balance))
        .route("/accounts/{id}/funds", post(add_funds))
        .with_state(state)
}

// === Main ===

#[tokio::main]
async fn main() {
    let state = AppState {
        engine: Arc::new(Engine::new()),
    };

    let app = create_router(state);

    let listener = TcpListener::bind("127.0.0.1:3000").await.unwrap();
    println!("Reservation API server running on http://127.0.0.1:3000");
    println!();
    println!("Endpoints:");
    println!("  POST   /reservations          - Create a booking");
    println!("  POST   /holds                 - Create a hold");
    println!("  DELETE /reservations/:id      - Cancel");
    println!("  GET    /reservations          - List reservations");
    println!("  GET    /holds                 - List holds");
    println!("  GET    /transactions          - List ledger entries");
    println!("  POST   /accounts              - Open an account");
    println!("  GET    /accounts/:id/balance  - Balance lookup");
    println!("  POST   /accounts/:id/funds    - Add funds");

    axum::serve(listener, app).await.unwrap();
}
