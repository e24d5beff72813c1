//! Unified error types for the velo core library.
//!
//! Every fallible core operation returns [`VeloError`]. Variants map one to
//! one onto the failure modes of the rental state machine, so the transport
//! layer can translate them into status codes without string matching.

use std::path::PathBuf;
use thiserror::Error;

use crate::catalog::BikeStatus;

/// The unified error type for all velo core operations.
#[derive(Debug, Error)]
pub enum VeloError {
    // =========================================================================
    // LOOKUP ERRORS
    // =========================================================================
    /// The referenced bike does not exist in the catalog.
    #[error("Bike not found: '{0}'")]
    BikeNotFound(String),

    /// The referenced rental does not exist in the ledger.
    #[error("Rental not found: '{0}'")]
    RentalNotFound(String),

    /// The referenced renter is not in the roster.
    #[error("Renter not found: '{0}'")]
    RenterNotFound(String),

    // =========================================================================
    // STATE MACHINE ERRORS
    // =========================================================================
    /// The requested bike status transition is not permitted from the
    /// bike's current status.
    #[error("Bike '{bike_id}' cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        /// Bike whose transition was rejected.
        bike_id: String,
        /// Status the bike is currently in.
        from: BikeStatus,
        /// Status the caller asked for.
        to: BikeStatus,
    },

    /// A rental was requested on a bike that is not Available.
    #[error("Bike '{0}' is not available for rental")]
    BikeUnavailable(String),

    /// The rental already has an end timestamp recorded.
    #[error("Rental '{0}' is already completed")]
    RentalAlreadyCompleted(String),

    /// The supplied end time precedes the rental's start time.
    #[error("Rental '{rental_id}' end time {end} precedes start time {start}")]
    InvalidTimeRange {
        /// Rental being completed.
        rental_id: String,
        /// Recorded start instant (RFC 3339).
        start: String,
        /// Rejected end instant (RFC 3339).
        end: String,
    },

    /// A fare was requested for a rental that has no end timestamp yet.
    #[error("Rental '{0}' is still active; fare requires a completed rental")]
    RentalNotCompleted(String),

    // =========================================================================
    // CONFIGURATION ERRORS
    // =========================================================================
    /// The configuration file exists but could not be parsed.
    #[error("Failed to parse configuration: {0}")]
    ConfigParseError(String),

    /// The configuration was parsed but contains invalid values.
    #[error("Configuration validation failed: {0}")]
    ConfigValidationError(String),

    /// The configuration could not be read or written.
    #[error("Failed to access configuration at {}: {source}", .path.display())]
    ConfigIoError {
        /// Path that was being accessed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

/// A specialized [`Result`] type for velo core operations.
pub type Result<T> = std::result::Result<T, VeloError>;

/// Shorter alias used throughout the crate.
pub type Error = VeloError;

impl VeloError {
    /// Returns `true` if this error means a referenced entity does not exist.
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::BikeNotFound(_) | Self::RentalNotFound(_) | Self::RenterNotFound(_)
        )
    }

    /// Returns `true` if this error is a rejected state transition rather
    /// than a malformed request. These are expected operational outcomes,
    /// not system failures.
    #[inline]
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::InvalidTransition { .. }
                | Self::BikeUnavailable(_)
                | Self::RentalAlreadyCompleted(_)
                | Self::RentalNotCompleted(_)
        )
    }

    /// Returns `true` if this error is related to configuration handling.
    #[inline]
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigParseError(_) | Self::ConfigValidationError(_) | Self::ConfigIoError { .. }
        )
    }

    /// Returns a machine-readable error code for API responses.
    #[inline]
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::BikeNotFound(_) => "BIKE_NOT_FOUND",
            Self::RentalNotFound(_) => "RENTAL_NOT_FOUND",
            Self::RenterNotFound(_) => "RENTER_NOT_FOUND",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::BikeUnavailable(_) => "BIKE_UNAVAILABLE",
            Self::RentalAlreadyCompleted(_) => "RENTAL_ALREADY_COMPLETED",
            Self::InvalidTimeRange { .. } => "INVALID_TIME_RANGE",
            Self::RentalNotCompleted(_) => "RENTAL_NOT_COMPLETED",
            Self::ConfigParseError(_) => "CONFIG_PARSE_ERROR",
            Self::ConfigValidationError(_) => "CONFIG_VALIDATION_ERROR",
            Self::ConfigIoError { .. } => "CONFIG_IO_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        assert!(VeloError::BikeNotFound("B9".into()).is_not_found());
        assert!(VeloError::RentalNotFound("R9".into()).is_not_found());
        assert!(VeloError::RenterNotFound("User9".into()).is_not_found());

        assert!(!VeloError::BikeUnavailable("B1".into()).is_not_found());
    }

    #[test]
    fn test_conflict_classification() {
        assert!(VeloError::BikeUnavailable("B1".into()).is_conflict());
        assert!(VeloError::RentalAlreadyCompleted("R0".into()).is_conflict());
        assert!(VeloError::RentalNotCompleted("R0".into()).is_conflict());
        assert!(VeloError::InvalidTransition {
            bike_id: "B1".into(),
            from: BikeStatus::Maintenance,
            to: BikeStatus::InUse,
        }
        .is_conflict());

        assert!(!VeloError::BikeNotFound("B1".into()).is_conflict());
    }

    #[test]
    fn test_config_classification() {
        assert!(VeloError::ConfigParseError("bad toml".into()).is_config_error());
        assert!(VeloError::ConfigValidationError("negative tariff".into()).is_config_error());
        assert!(!VeloError::BikeNotFound("B1".into()).is_config_error());
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            VeloError::BikeUnavailable("B1".into()).error_code(),
            "BIKE_UNAVAILABLE"
        );
        assert_eq!(
            VeloError::RentalAlreadyCompleted("R0".into()).error_code(),
            "RENTAL_ALREADY_COMPLETED"
        );
        assert_eq!(
            VeloError::ConfigParseError("x".into()).error_code(),
            "CONFIG_PARSE_ERROR"
        );
    }

    #[test]
    fn test_error_display_messages() {
        let err = VeloError::BikeNotFound("B42".into());
        assert!(format!("{err}").contains("B42"));

        let err = VeloError::InvalidTransition {
            bike_id: "B1".into(),
            from: BikeStatus::InUse,
            to: BikeStatus::InUse,
        };
        assert!(format!("{err}").contains("B1"));
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<VeloError>();
        assert_sync::<VeloError>();
    }
}
