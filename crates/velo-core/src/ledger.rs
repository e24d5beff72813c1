//! Rental ledger: session records and their lifecycle.
//!
//! A rental is created when a renter takes a bike out and mutated exactly
//! once, when it is completed. Records are never deleted; history queries
//! return active and completed rentals alike.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{Error, Result};

/// A time-bounded session linking one renter to one bike.
///
/// A rental is *active* while `end_time` is `None`. Completion fills in
/// `end_time` and `end_location` together; no other field ever changes.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Rental {
    /// Ledger-assigned identifier, e.g. "R0".
    #[schema(example = "R0")]
    pub id: String,

    /// Renter who started the session.
    #[schema(example = "User1")]
    pub renter_id: String,

    /// Bike the session is for.
    #[schema(example = "B1")]
    pub bike_id: String,

    /// When the session started (UTC).
    pub start_time: DateTime<Utc>,

    /// Where the bike was picked up.
    #[schema(example = "Aleea Pinilor 1")]
    pub start_location: String,

    /// When the session ended (UTC). `None` while active.
    pub end_time: Option<DateTime<Utc>>,

    /// Where the bike was dropped off. `None` while active.
    #[schema(example = "Aleea Padurilor 3")]
    pub end_location: Option<String>,

    /// Creation order within the ledger, used to sort history queries.
    #[serde(skip)]
    #[schema(ignore)]
    seq: u64,
}

impl Rental {
    /// Whether this rental has no end timestamp yet.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.end_time.is_none()
    }
}

/// Owns all rental records and hands out their identifiers.
#[derive(Debug, Default)]
pub struct RentalLedger {
    rentals: std::collections::HashMap<String, Rental>,
    // Monotonic within the ledger's lifetime; completed rentals are never
    // deleted, so the counter can never collide with a live id.
    next_seq: u64,
}

impl RentalLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new active rental and return its id.
    ///
    /// Ids are `R{n}` from a running counter, so they are unique and
    /// monotonic for the lifetime of the ledger.
    pub fn create(
        &mut self,
        renter_id: &str,
        bike_id: &str,
        start_location: &str,
        now: DateTime<Utc>,
    ) -> String {
        let seq = self.next_seq;
        self.next_seq += 1;
        let id = format!("R{seq}");

        let rental = Rental {
            id: id.clone(),
            renter_id: renter_id.to_owned(),
            bike_id: bike_id.to_owned(),
            start_time: now,
            start_location: start_location.to_owned(),
            end_time: None,
            end_location: None,
            seq,
        };

        let previous = self.rentals.insert(id.clone(), rental);
        debug_assert!(previous.is_none(), "rental id collision");

        id
    }

    /// Close an active rental, recording end time and drop-off location.
    ///
    /// # Errors
    ///
    /// - [`Error::RentalNotFound`] if the id is unknown.
    /// - [`Error::RentalAlreadyCompleted`] if the rental already ended.
    /// - [`Error::InvalidTimeRange`] if `now` precedes the recorded start.
    pub fn complete(
        &mut self,
        rental_id: &str,
        end_location: &str,
        now: DateTime<Utc>,
    ) -> Result<&Rental> {
        let rental = self
            .rentals
            .get_mut(rental_id)
            .ok_or_else(|| Error::RentalNotFound(rental_id.to_owned()))?;

        if rental.end_time.is_some() {
            return Err(Error::RentalAlreadyCompleted(rental_id.to_owned()));
        }

        if now < rental.start_time {
            return Err(Error::InvalidTimeRange {
                rental_id: rental_id.to_owned(),
                start: rental.start_time.to_rfc3339(),
                end: now.to_rfc3339(),
            });
        }

        rental.end_time = Some(now);
        rental.end_location = Some(end_location.to_owned());

        Ok(rental)
    }

    /// Look up a rental by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RentalNotFound`] if the id is unknown.
    pub fn get(&self, rental_id: &str) -> Result<&Rental> {
        self.rentals
            .get(rental_id)
            .ok_or_else(|| Error::RentalNotFound(rental_id.to_owned()))
    }

    /// All rentals for a renter, active and completed, in creation order.
    #[must_use]
    pub fn list_by_renter(&self, renter_id: &str) -> Vec<&Rental> {
        let mut rentals: Vec<&Rental> = self
            .rentals
            .values()
            .filter(|r| r.renter_id == renter_id)
            .collect();
        rentals.sort_by_key(|r| r.seq);
        rentals
    }

    /// The single active rental for a bike, if any.
    ///
    /// The service keeps this in lockstep with [`BikeStatus::InUse`]: an
    /// in-use bike has exactly one active rental and vice versa.
    ///
    /// [`BikeStatus::InUse`]: crate::catalog::BikeStatus::InUse
    #[must_use]
    pub fn active_rental_for_bike(&self, bike_id: &str) -> Option<&Rental> {
        self.rentals
            .values()
            .find(|r| r.bike_id == bike_id && r.is_active())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn t0() -> DateTime<Utc> {
        "2025-03-01T10:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_create_assigns_monotonic_ids() {
        let mut ledger = RentalLedger::new();
        let a = ledger.create("User1", "B1", "Depot", t0());
        let b = ledger.create("User2", "B2", "Depot", t0());
        let c = ledger.create("User1", "B3", "Depot", t0());

        assert_eq!(a, "R0");
        assert_eq!(b, "R1");
        assert_eq!(c, "R2");
    }

    #[test]
    fn test_created_rental_is_active_with_no_end_fields() {
        let mut ledger = RentalLedger::new();
        let id = ledger.create("User1", "B1", "Aleea Pinilor 1", t0());

        let rental = ledger.get(&id).unwrap();
        assert!(rental.is_active());
        assert_eq!(rental.start_time, t0());
        assert_eq!(rental.start_location, "Aleea Pinilor 1");
        assert!(rental.end_time.is_none());
        assert!(rental.end_location.is_none());
    }

    #[test]
    fn test_complete_sets_end_fields() {
        let mut ledger = RentalLedger::new();
        let id = ledger.create("User1", "B1", "Depot", t0());
        let end = t0() + Duration::minutes(10);

        let rental = ledger.complete(&id, "Aleea Padurilor 3", end).unwrap();
        assert!(!rental.is_active());
        assert_eq!(rental.end_time, Some(end));
        assert_eq!(rental.end_location.as_deref(), Some("Aleea Padurilor 3"));
    }

    #[test]
    fn test_complete_twice_fails() {
        let mut ledger = RentalLedger::new();
        let id = ledger.create("User1", "B1", "Depot", t0());
        ledger.complete(&id, "Depot", t0()).unwrap();

        let err = ledger.complete(&id, "Elsewhere", t0()).unwrap_err();
        assert!(matches!(err, Error::RentalAlreadyCompleted(_)));

        // First completion stands.
        let rental = ledger.get(&id).unwrap();
        assert_eq!(rental.end_location.as_deref(), Some("Depot"));
    }

    #[test]
    fn test_complete_unknown_rental_fails() {
        let mut ledger = RentalLedger::new();
        let err = ledger.complete("R99", "Depot", t0()).unwrap_err();
        assert!(matches!(err, Error::RentalNotFound(_)));
    }

    #[test]
    fn test_complete_before_start_is_rejected() {
        let mut ledger = RentalLedger::new();
        let id = ledger.create("User1", "B1", "Depot", t0());

        let err = ledger
            .complete(&id, "Depot", t0() - Duration::seconds(1))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidTimeRange { .. }));

        // Rental stays active after the rejected completion.
        assert!(ledger.get(&id).unwrap().is_active());
    }

    #[test]
    fn test_complete_at_start_instant_is_valid() {
        let mut ledger = RentalLedger::new();
        let id = ledger.create("User1", "B1", "Depot", t0());
        assert!(ledger.complete(&id, "Depot", t0()).is_ok());
    }

    #[test]
    fn test_list_by_renter_in_creation_order() {
        let mut ledger = RentalLedger::new();
        let a = ledger.create("User1", "B1", "Depot", t0());
        ledger.create("User2", "B2", "Depot", t0());
        let c = ledger.create("User1", "B3", "Depot", t0());
        ledger.complete(&a, "Depot", t0()).unwrap();

        let rentals = ledger.list_by_renter("User1");
        let ids: Vec<&str> = rentals.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec![a.as_str(), c.as_str()]);

        // Completed and active rentals both appear.
        assert!(!rentals[0].is_active());
        assert!(rentals[1].is_active());
    }

    #[test]
    fn test_list_by_renter_order_survives_double_digit_ids() {
        // Lexical id order would put R10 before R2; creation order must not.
        let mut ledger = RentalLedger::new();
        for _ in 0..12 {
            ledger.create("User1", "B1", "Depot", t0());
        }

        let ids: Vec<&str> = ledger
            .list_by_renter("User1")
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        let expected: Vec<String> = (0..12).map(|n| format!("R{n}")).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_list_by_renter_unknown_is_empty() {
        let ledger = RentalLedger::new();
        assert!(ledger.list_by_renter("nobody").is_empty());
    }

    #[test]
    fn test_active_rental_for_bike() {
        let mut ledger = RentalLedger::new();
        let a = ledger.create("User1", "B1", "Depot", t0());
        assert_eq!(ledger.active_rental_for_bike("B1").unwrap().id, a);
        assert!(ledger.active_rental_for_bike("B2").is_none());

        ledger.complete(&a, "Depot", t0()).unwrap();
        assert!(ledger.active_rental_for_bike("B1").is_none());
    }
}
