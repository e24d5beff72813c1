//! Bike catalog and status transitions.
//!
//! The catalog owns every bike record the system knows about. Bikes are
//! provisioned once at startup and never removed; taking a bike out of
//! circulation is a status change, not a deletion.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{Error, Result};

/// Lifecycle status of a bike.
///
/// The core only ever moves bikes between `Available` and `InUse`.
/// `Maintenance` and `Retired` are parked states set by an external
/// administrative action; once there, a bike is invisible to renters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BikeStatus {
    /// Ready to be rented.
    Available,
    /// Currently out on an active rental.
    InUse,
    /// Pulled from circulation for servicing.
    Maintenance,
    /// Permanently out of the fleet.
    Retired,
}

/// A rentable bike.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Bike {
    /// Stable unique identifier, e.g. "B1".
    #[schema(example = "B1")]
    pub id: String,

    /// Model label, e.g. "Mountain" or "Electric".
    #[schema(example = "Mountain")]
    pub model: String,

    /// Producer/vendor label.
    #[schema(example = "P1")]
    pub producer: String,

    /// Base rate charged per started minute, before membership discount.
    #[schema(example = 0.5, minimum = 0.0)]
    pub tariff_per_minute: f64,

    /// Current lifecycle status.
    pub status: BikeStatus,
}

/// Owns all bike records and enforces the per-bike status machine.
#[derive(Debug, Default)]
pub struct Catalog {
    bikes: std::collections::HashMap<String, Bike>,
}

impl Catalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Provision a bike. New bikes always start out `Available`.
    ///
    /// Re-provisioning an existing id replaces the record; seed loading is
    /// the only caller, and config validation rejects duplicate ids first.
    pub fn add(&mut self, id: &str, model: &str, producer: &str, tariff_per_minute: f64) {
        self.bikes.insert(
            id.to_owned(),
            Bike {
                id: id.to_owned(),
                model: model.to_owned(),
                producer: producer.to_owned(),
                tariff_per_minute,
                status: BikeStatus::Available,
            },
        );
    }

    /// All bikes, any status.
    #[must_use]
    pub fn list_all(&self) -> Vec<&Bike> {
        let mut bikes: Vec<&Bike> = self.bikes.values().collect();
        bikes.sort_by(|a, b| a.id.cmp(&b.id));
        bikes
    }

    /// Only bikes that are ready to rent.
    #[must_use]
    pub fn list_available(&self) -> Vec<&Bike> {
        let mut bikes: Vec<&Bike> = self
            .bikes
            .values()
            .filter(|b| b.status == BikeStatus::Available)
            .collect();
        bikes.sort_by(|a, b| a.id.cmp(&b.id));
        bikes
    }

    /// Look up a bike by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BikeNotFound`] if the id is unknown.
    pub fn get(&self, bike_id: &str) -> Result<&Bike> {
        self.bikes
            .get(bike_id)
            .ok_or_else(|| Error::BikeNotFound(bike_id.to_owned()))
    }

    /// Whether the bike can be rented right now.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BikeNotFound`] if the id is unknown.
    pub fn is_available(&self, bike_id: &str) -> Result<bool> {
        Ok(self.get(bike_id)?.status == BikeStatus::Available)
    }

    /// Transition `Available -> InUse` when a rental starts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BikeNotFound`] for an unknown id, or
    /// [`Error::InvalidTransition`] if the bike is not `Available`.
    pub fn mark_in_use(&mut self, bike_id: &str) -> Result<()> {
        self.transition(bike_id, BikeStatus::Available, BikeStatus::InUse)
    }

    /// Transition `InUse -> Available` when a rental ends.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BikeNotFound`] for an unknown id, or
    /// [`Error::InvalidTransition`] if the bike is not `InUse`.
    pub fn mark_available(&mut self, bike_id: &str) -> Result<()> {
        self.transition(bike_id, BikeStatus::InUse, BikeStatus::Available)
    }

    fn transition(&mut self, bike_id: &str, from: BikeStatus, to: BikeStatus) -> Result<()> {
        let bike = self
            .bikes
            .get_mut(bike_id)
            .ok_or_else(|| Error::BikeNotFound(bike_id.to_owned()))?;

        if bike.status != from {
            return Err(Error::InvalidTransition {
                bike_id: bike_id.to_owned(),
                from: bike.status,
                to,
            });
        }

        bike.status = to;
        Ok(())
    }
}
