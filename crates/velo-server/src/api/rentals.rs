//! Rental API endpoints.
//!
//! Starting a rental reserves the bike and opens a ledger record; stopping
//! it closes the record, releases the bike, and settles the fare in one
//! call. Renter identity arrives as an explicit parameter; this server
//! performs no authentication.

use std::collections::BTreeMap;

use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::api::error::ApiResult;
use crate::state::SharedState;
use velo_core::Rental;

/// Creates the rentals router with all endpoints.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", get(list_rentals))
        .route("/start", post(start_rental))
        .route("/stop", post(stop_rental))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// A rental record as returned by the listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "id": "R0",
    "renter_id": "User1",
    "bike_id": "B1",
    "start_time": "2025-03-01T10:00:00Z",
    "start_location": "Aleea Pinilor 1",
    "end_time": null,
    "end_location": null,
    "active": true
}))]
pub struct RentalRecord {
    /// Ledger-assigned identifier.
    #[schema(example = "R0")]
    pub id: String,

    /// Renter who started the session.
    #[schema(example = "User1")]
    pub renter_id: String,

    /// Bike the session is for.
    #[schema(example = "B1")]
    pub bike_id: String,

    /// Start instant (RFC 3339).
    #[schema(example = "2025-03-01T10:00:00Z")]
    pub start_time: String,

    /// Pick-up location.
    #[schema(example = "Aleea Pinilor 1")]
    pub start_location: String,

    /// End instant (RFC 3339), absent while active.
    #[schema(nullable)]
    pub end_time: Option<String>,

    /// Drop-off location, absent while active.
    #[schema(nullable)]
    pub end_location: Option<String>,

    /// Whether the rental is still open.
    #[schema(example = true)]
    pub active: bool,
}

impl From<&Rental> for RentalRecord {
    fn from(rental: &Rental) -> Self {
        Self {
            id: rental.id.clone(),
            renter_id: rental.renter_id.clone(),
            bike_id: rental.bike_id.clone(),
            start_time: rental.start_time.to_rfc3339(),
            start_location: rental.start_location.clone(),
            end_time: rental.end_time.map(|t| t.to_rfc3339()),
            end_location: rental.end_location.clone(),
            active: rental.is_active(),
        }
    }
}

/// Query parameters for the rentals listing.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ListRentalsQuery {
    /// Renter whose rentals to list.
    #[param(example = "User1")]
    pub renter_id: String,
}

/// Request body for starting a rental.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[schema(example = json!({
    "renter_id": "User1",
    "bike_id": "B1",
    "start_location": "Aleea Pinilor 1"
}))]
pub struct StartRentalRequest {
    /// Renter taking the bike.
    #[schema(example = "User1")]
    pub renter_id: String,

    /// Bike to rent. Must currently be available.
    #[schema(example = "B1")]
    pub bike_id: String,

    /// Pick-up location.
    #[schema(example = "Aleea Pinilor 1")]
    pub start_location: String,
}

/// Response after successfully starting a rental.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "rental_id": "R0"
}))]
pub struct StartRentalResponse {
    /// The newly opened rental.
    #[schema(example = "R0")]
    pub rental_id: String,
}

/// Request body for stopping a rental.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[schema(example = json!({
    "rental_id": "R0",
    "end_location": "Aleea Padurilor 3"
}))]
pub struct StopRentalRequest {
    /// Rental to close.
    #[schema(example = "R0")]
    pub rental_id: String,

    /// Drop-off location.
    #[schema(example = "Aleea Padurilor 3")]
    pub end_location: String,

    /// Masked instrument hint to record on the payment. Falls back to the
    /// configured default when omitted.
    #[schema(example = "************1234", nullable)]
    pub card_hint: Option<String>,
}

/// Response after successfully stopping a rental.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "rental_id": "R0",
    "payment_id": "7f8d2c1e-4a5b-4c3d-9e8f-123456789abc",
    "amount": 5.0,
    "currency": "eur",
    "message": "Rental and payment of 5 successful"
}))]
pub struct StopRentalResponse {
    /// The rental that was closed.
    #[schema(example = "R0")]
    pub rental_id: String,

    /// The payment created for it.
    pub payment_id: uuid::Uuid,

    /// Computed fare.
    #[schema(example = 5.0)]
    pub amount: f64,

    /// Currency of the fare.
    pub currency: velo_core::Currency,

    /// Human-readable confirmation containing the amount.
    #[schema(example = "Rental and payment of 5 successful")]
    pub message: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// List a renter's rentals, active and completed.
#[utoipa::path(
    get,
    path = "/rentals",
    tag = "rentals",
    operation_id = "listRentals",
    summary = "List a renter's rentals",
    description = "Returns every rental for the given renter keyed by rental \
        id. Each record carries its start instant; order by start_time (or \
        the numeric part of the id) to reconstruct creation order. Unknown \
        renters simply have no rentals.",
    params(ListRentalsQuery),
    responses(
        (status = 200, description = "Rentals retrieved", body = BTreeMap<String, RentalRecord>)
    )
)]
pub async fn list_rentals(
    State(state): State<SharedState>,
    Query(query): Query<ListRentalsQuery>,
) -> ApiResult<Json<BTreeMap<String, RentalRecord>>> {
    let state_guard = state.read().await;

    let rentals = state_guard
        .service
        .rentals_of(&query.renter_id)
        .into_iter()
        .map(|r| (r.id.clone(), RentalRecord::from(r)))
        .collect();

    Ok(Json(rentals))
}

/// Start a rental.
#[utoipa::path(
    post,
    path = "/rentals/start",
    tag = "rentals",
    operation_id = "startRental",
    summary = "Start a rental",
    description = "Marks the bike in use and opens a rental record. Fails \
        with 409 if the bike is not currently available and 404 if the bike \
        or renter is unknown.",
    request_body = StartRentalRequest,
    responses(
        (status = 200, description = "Rental started", body = StartRentalResponse),
        (status = 404, description = "Unknown bike or renter"),
        (status = 409, description = "Bike not available")
    )
)]
pub async fn start_rental(
    State(state): State<SharedState>,
    Json(request): Json<StartRentalRequest>,
) -> ApiResult<Json<StartRentalResponse>> {
    let mut state_guard = state.write().await;

    let rental_id = state_guard.service.begin_rental(
        &request.renter_id,
        &request.bike_id,
        &request.start_location,
    )?;

    Ok(Json(StartRentalResponse { rental_id }))
}

/// Stop a rental and settle its fare.
#[utoipa::path(
    post,
    path = "/rentals/stop",
    tag = "rentals",
    operation_id = "stopRental",
    summary = "Stop a rental",
    description = "Closes the rental, releases the bike, computes the fare \
        from elapsed minutes, tariff, and membership discount, and records \
        the payment. Stopping an already-stopped rental fails with 409 and \
        creates no second payment.",
    request_body = StopRentalRequest,
    responses(
        (status = 200, description = "Rental stopped and paid", body = StopRentalResponse),
        (status = 404, description = "Unknown rental id"),
        (status = 409, description = "Rental already completed")
    )
)]
pub async fn stop_rental(
    State(state): State<SharedState>,
    Json(request): Json<StopRentalRequest>,
) -> ApiResult<Json<StopRentalResponse>> {
    let mut state_guard = state.write().await;

    let receipt = state_guard.service.end_rental(
        &request.rental_id,
        &request.end_location,
        request.card_hint.as_deref(),
    )?;

    Ok(Json(StopRentalResponse {
        rental_id: receipt.rental_id,
        payment_id: receipt.payment_id,
        amount: receipt.amount,
        currency: receipt.currency,
        message: receipt.message,
    }))
}
