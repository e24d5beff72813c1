//! Application state shared across handlers.

use std::sync::Arc;

use tokio::sync::RwLock;
use velo_core::{RentalService, VeloConfig};

/// Shared application state handed to every handler.
///
/// One lock guards all catalog and ledger mutation, which is what makes
/// begin/end rental indivisible with respect to each other.
pub type SharedState = Arc<RwLock<AppState>>;

/// The state behind the lock.
pub struct AppState {
    /// The rental domain core.
    pub service: RentalService,

    /// Loaded configuration, kept for handlers that report settings.
    pub config: VeloConfig,
}

impl AppState {
    /// Build application state from configuration.
    #[must_use]
    pub fn new(config: VeloConfig) -> Self {
        let service = RentalService::from_config(&config);
        Self { service, config }
    }

    /// Wrap the state for sharing across handlers.
    #[must_use]
    pub fn into_shared(self) -> SharedState {
        Arc::new(RwLock::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_seeds_service_from_config() {
        let state = AppState::new(VeloConfig::default());
        assert_eq!(state.service.bikes().len(), 2);
        assert!(state.service.is_bike_available("B1").unwrap());
    }
}
