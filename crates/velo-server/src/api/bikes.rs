//! Bike catalog API endpoints.
//!
//! Read-only views over the fleet: the full catalog, the subset that can
//! be rented right now, and a per-bike availability check used by the UI
//! before it offers the rent button.

use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::error::ApiResult;
use crate::state::SharedState;
use velo_core::{Bike, BikeStatus};

/// Creates the bikes router with all endpoints.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", get(list_bikes))
        .route("/available", get(list_available_bikes))
        .route("/{bike_id}/availability", get(check_availability))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// A bike record as returned by the listing endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "id": "B1",
    "model": "Mountain",
    "producer": "P1",
    "tariff_per_minute": 0.5,
    "status": "available"
}))]
pub struct BikeRecord {
    /// Stable unique identifier.
    #[schema(example = "B1")]
    pub id: String,

    /// Model label.
    #[schema(example = "Mountain")]
    pub model: String,

    /// Producer/vendor label.
    #[schema(example = "P1")]
    pub producer: String,

    /// Per-minute tariff before membership discount.
    #[schema(example = 0.5)]
    pub tariff_per_minute: f64,

    /// Current lifecycle status.
    pub status: BikeStatus,
}

impl From<&Bike> for BikeRecord {
    fn from(bike: &Bike) -> Self {
        Self {
            id: bike.id.clone(),
            model: bike.model.clone(),
            producer: bike.producer.clone(),
            tariff_per_minute: bike.tariff_per_minute,
            status: bike.status,
        }
    }
}

/// Availability check response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "bike_id": "B1",
    "available": true
}))]
pub struct AvailabilityResponse {
    /// The bike that was checked.
    #[schema(example = "B1")]
    pub bike_id: String,

    /// Whether the bike can be rented right now.
    #[schema(example = true)]
    pub available: bool,
}

fn to_map(bikes: Vec<&Bike>) -> BTreeMap<String, BikeRecord> {
    bikes
        .into_iter()
        .map(|b| (b.id.clone(), BikeRecord::from(b)))
        .collect()
}

// ============================================================================
// Handlers
// ============================================================================

/// List every bike in the fleet, any status.
#[utoipa::path(
    get,
    path = "/bikes",
    tag = "bikes",
    operation_id = "listBikes",
    summary = "List all bikes",
    description = "Returns every bike in the fleet keyed by id, regardless \
        of status.",
    responses(
        (status = 200, description = "Catalog retrieved", body = BTreeMap<String, BikeRecord>)
    )
)]
pub async fn list_bikes(
    State(state): State<SharedState>,
) -> ApiResult<Json<BTreeMap<String, BikeRecord>>> {
    let state_guard = state.read().await;
    Ok(Json(to_map(state_guard.service.bikes())))
}

/// List bikes that can be rented right now.
#[utoipa::path(
    get,
    path = "/bikes/available",
    tag = "bikes",
    operation_id = "listAvailableBikes",
    summary = "List available bikes",
    description = "Returns only bikes whose status is Available, keyed by id.",
    responses(
        (status = 200, description = "Available bikes retrieved", body = BTreeMap<String, BikeRecord>)
    )
)]
pub async fn list_available_bikes(
    State(state): State<SharedState>,
) -> ApiResult<Json<BTreeMap<String, BikeRecord>>> {
    let state_guard = state.read().await;
    Ok(Json(to_map(state_guard.service.available_bikes())))
}

/// Check whether a single bike is available.
#[utoipa::path(
    get,
    path = "/bikes/{bike_id}/availability",
    tag = "bikes",
    operation_id = "checkAvailability",
    summary = "Check a bike's availability",
    description = "Re-checks a bike's status just before renting. Returns \
        404 for a bike id that is not in the catalog.",
    params(
        ("bike_id" = String, Path, description = "Bike identifier", example = "B1")
    ),
    responses(
        (status = 200, description = "Availability retrieved", body = AvailabilityResponse),
        (status = 404, description = "Unknown bike id")
    )
)]
pub async fn check_availability(
    State(state): State<SharedState>,
    Path(bike_id): Path<String>,
) -> ApiResult<Json<AvailabilityResponse>> {
    let state_guard = state.read().await;
    let available = state_guard.service.is_bike_available(&bike_id)?;

    Ok(Json(AvailabilityResponse { bike_id, available }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bike_record_serialization() {
        let record = BikeRecord {
            id: "B1".to_string(),
            model: "Mountain".to_string(),
            producer: "P1".to_string(),
            tariff_per_minute: 0.5,
            status: BikeStatus::Available,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"status\":\"available\""));
        assert!(json.contains("\"tariff_per_minute\":0.5"));
    }

    #[test]
    fn test_availability_response_serialization() {
        let response = AvailabilityResponse {
            bike_id: "B1".to_string(),
            available: false,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"available\":false"));
    }
}
