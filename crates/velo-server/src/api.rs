//! HTTP API routes and handlers.
//!
//! This module contains all HTTP endpoint implementations organized by domain:
//! - `bikes` - Fleet catalog and availability checks
//! - `rentals` - Rental lifecycle (start, stop, history)
//! - `health` - Service health checks
//! - `error` - API error types
//! - `openapi` - OpenAPI specification generation

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::SharedState;

pub mod bikes;
pub mod error;
pub mod health;
pub mod openapi;
pub mod rentals;

// Re-export commonly used types
#[allow(unused_imports)]
pub use error::{ApiError, ApiResult, ErrorResponse};

// Re-export OpenAPI utilities for the gen-openapi binary
#[allow(unused_imports)]
pub use openapi::get_openapi_json;

/// Creates the combined API router with all endpoints.
///
/// # Route Structure
///
/// ```text
/// /health                            - Health check
/// /api
/// ├── /bikes                         - Full catalog
/// ├── /bikes/available               - Rentable bikes only
/// ├── /bikes/{bike_id}/availability  - Single-bike availability check
/// ├── /rentals?renter_id=            - A renter's rental history
/// ├── /rentals/start                 - Begin a rental
/// ├── /rentals/stop                  - End a rental and settle the fare
/// └── /openapi.json                  - OpenAPI specification
/// ```
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .nest("/health", health::router())
        .nest(
            "/api",
            Router::new()
                // OpenAPI spec at /api/openapi.json
                .route("/openapi.json", get(openapi::get_openapi_spec))
                // Fleet catalog
                .nest("/bikes", bikes::router())
                // Rental lifecycle
                .nest("/rentals", rentals::router()),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
