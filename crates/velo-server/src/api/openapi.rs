//! OpenAPI specification generation for the velo API.
//!
//! The document is served at `/api/openapi.json` and can be written to a
//! file with the `gen-openapi` binary for client generation.

use axum::Json;
use utoipa::OpenApi;

use super::bikes::{AvailabilityResponse, BikeRecord};
use super::error::ErrorResponse;
use super::health::HealthResponse;
use super::rentals::{
    RentalRecord, StartRentalRequest, StartRentalResponse, StopRentalRequest, StopRentalResponse,
};

/// Serve the OpenAPI specification as JSON.
pub async fn get_openapi_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Returns the OpenAPI specification as a string (for writing to file).
/// Used by the gen-openapi binary.
#[allow(dead_code)]
pub fn get_openapi_json() -> String {
    ApiDoc::openapi()
        .to_pretty_json()
        .expect("Failed to serialize OpenAPI spec")
}

/// Main OpenAPI document structure for velo.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "velo API",
        version = "0.1.0",
        description = r#"
# velo API

velo tracks a fleet of rentable bikes, the rental sessions against them, and
the fare charged when a rental ends.

## Overview

1. **Catalog**: Browse the fleet or only the bikes available right now
2. **Rentals**: Start a rental on an available bike; stop it to release the
   bike and settle the fare
3. **Billing**: Fares are elapsed whole minutes times the bike's tariff,
   reduced by the renter's membership discount (standard 0%, premium 10%,
   vip 20%)

Renter identity is an explicit request parameter; authentication is handled
upstream of this service.
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "/", description = "Local velo server")
    ),
    tags(
        (
            name = "system",
            description = "Health checks and system status"
        ),
        (
            name = "bikes",
            description = "Fleet catalog and availability checks"
        ),
        (
            name = "rentals",
            description = "Rental lifecycle - start, stop, and history"
        )
    ),
    paths(
        // Health endpoints
        super::health::health_check,
        // Bike endpoints
        super::bikes::list_bikes,
        super::bikes::list_available_bikes,
        super::bikes::check_availability,
        // Rental endpoints
        super::rentals::list_rentals,
        super::rentals::start_rental,
        super::rentals::stop_rental,
    ),
    components(
        schemas(
            // Error types
            ErrorResponse,
            // Health types
            HealthResponse,
            // Bike types
            BikeRecord,
            AvailabilityResponse,
            // Rental types
            RentalRecord,
            StartRentalRequest,
            StartRentalResponse,
            StopRentalRequest,
            StopRentalResponse,
        )
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_generation() {
        let spec = ApiDoc::openapi();
        assert_eq!(spec.info.title, "velo API");
        assert!(!spec.paths.paths.is_empty());
    }

    #[test]
    fn test_openapi_json_serialization() {
        let json = get_openapi_json();
        assert!(json.contains("\"openapi\":"));
        assert!(json.contains("\"velo API\""));
    }
}
