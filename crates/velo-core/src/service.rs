//! Rental service: the orchestrator over catalog, ledger, and billing.
//!
//! This is the only place bike status and rental end fields are mutated,
//! which keeps the coupling invariant local: a bike is `InUse` iff exactly
//! one active rental references it. Callers must serialize access to a
//! service instance (the server wraps it in one `RwLock`); the service
//! itself holds no locks and performs no I/O.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::billing::{compute_fare, Payment, Renter};
use crate::catalog::{Bike, Catalog};
use crate::config::{BillingConfig, VeloConfig};
use crate::error::{Error, Result};
use crate::ledger::{Rental, RentalLedger};

/// Confirmation returned when a rental is ended and paid.
#[derive(Debug, Clone)]
pub struct RentalReceipt {
    /// The rental that was completed.
    pub rental_id: String,
    /// The payment created for it.
    pub payment_id: uuid::Uuid,
    /// Computed fare.
    pub amount: f64,
    /// Currency of the fare.
    pub currency: crate::billing::Currency,
    /// Human-readable confirmation.
    pub message: String,
}

/// Owns all mutable rental-domain state and composes the two domain
/// operations, [`begin_rental`] and [`end_rental`].
///
/// [`begin_rental`]: RentalService::begin_rental
/// [`end_rental`]: RentalService::end_rental
#[derive(Debug)]
pub struct RentalService {
    catalog: Catalog,
    ledger: RentalLedger,
    renters: std::collections::HashMap<String, Renter>,
    payments: std::collections::HashMap<uuid::Uuid, Payment>,
    billing: BillingConfig,
}

impl RentalService {
    /// Build a service seeded from configuration.
    #[must_use]
    pub fn from_config(config: &VeloConfig) -> Self {
        let mut catalog = Catalog::new();
        for bike in &config.bikes {
            catalog.add(&bike.id, &bike.model, &bike.producer, bike.tariff_per_minute);
        }

        let renters = config
            .renters
            .iter()
            .map(|seed| {
                (
                    seed.id.clone(),
                    Renter {
                        id: seed.id.clone(),
                        first_name: seed.first_name.clone(),
                        last_name: seed.last_name.clone(),
                        tier: seed.tier,
                    },
                )
            })
            .collect();

        Self {
            catalog,
            ledger: RentalLedger::new(),
            renters,
            payments: std::collections::HashMap::new(),
            billing: config.billing.clone(),
        }
    }

    // =========================================================================
    // READ OPERATIONS
    // =========================================================================

    /// All bikes, any status.
    #[must_use]
    pub fn bikes(&self) -> Vec<&Bike> {
        self.catalog.list_all()
    }

    /// Bikes that can be rented right now.
    #[must_use]
    pub fn available_bikes(&self) -> Vec<&Bike> {
        self.catalog.list_available()
    }

    /// Whether a bike can be rented right now.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BikeNotFound`] for an unknown id.
    pub fn is_bike_available(&self, bike_id: &str) -> Result<bool> {
        self.catalog.is_available(bike_id)
    }

    /// A renter's rentals, active and completed, in creation order.
    #[must_use]
    pub fn rentals_of(&self, renter_id: &str) -> Vec<&Rental> {
        self.ledger.list_by_renter(renter_id)
    }

    /// Look up a rental by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RentalNotFound`] for an unknown id.
    pub fn rental(&self, rental_id: &str) -> Result<&Rental> {
        self.ledger.get(rental_id)
    }

    /// The payment that settled a rental, if it has been completed.
    #[must_use]
    pub fn payment_for_rental(&self, rental_id: &str) -> Option<&Payment> {
        self.payments.values().find(|p| p.rental_id == rental_id)
    }

    // =========================================================================
    // DOMAIN OPERATIONS
    // =========================================================================

    /// Begin a rental: flip the bike to `InUse` and open a ledger record.
    ///
    /// # Errors
    ///
    /// - [`Error::RenterNotFound`] for an unknown renter.
    /// - [`Error::BikeNotFound`] for an unknown bike.
    /// - [`Error::BikeUnavailable`] if the bike is not `Available`.
    ///
    /// All checks run before any mutation, and ledger creation is
    /// infallible, so a failure never leaves the catalog half-updated.
    pub fn begin_rental(
        &mut self,
        renter_id: &str,
        bike_id: &str,
        start_location: &str,
    ) -> Result<String> {
        self.begin_rental_at(renter_id, bike_id, start_location, Utc::now())
    }

    /// [`begin_rental`](Self::begin_rental) with an explicit clock reading.
    ///
    /// # Errors
    ///
    /// Same as [`begin_rental`](Self::begin_rental).
    pub fn begin_rental_at(
        &mut self,
        renter_id: &str,
        bike_id: &str,
        start_location: &str,
        now: DateTime<Utc>,
    ) -> Result<String> {
        if !self.renters.contains_key(renter_id) {
            return Err(Error::RenterNotFound(renter_id.to_owned()));
        }
        if !self.catalog.is_available(bike_id)? {
            warn!(bike_id, renter_id, "rental refused, bike unavailable");
            return Err(Error::BikeUnavailable(bike_id.to_owned()));
        }

        // Nothing below can fail: the status check above guarantees the
        // transition, and ledger creation has no failure path.
        self.catalog.mark_in_use(bike_id)?;
        let rental_id = self.ledger.create(renter_id, bike_id, start_location, now);

        // An in-use bike has exactly one active rental referencing it.
        debug_assert_eq!(
            self.ledger
                .active_rental_for_bike(bike_id)
                .map(|r| r.id.as_str()),
            Some(rental_id.as_str())
        );

        info!(rental_id, bike_id, renter_id, "rental started");
        Ok(rental_id)
    }

    /// End a rental: close the ledger record, release the bike, compute the
    /// fare, and record the payment.
    ///
    /// `instrument_hint` overrides the configured masked card hint.
    ///
    /// # Errors
    ///
    /// - [`Error::RentalNotFound`] for an unknown rental.
    /// - [`Error::RentalAlreadyCompleted`] if it was ended before; no
    ///   second payment is created.
    /// - [`Error::InvalidTimeRange`] if the clock reads earlier than the
    ///   rental's start.
    pub fn end_rental(
        &mut self,
        rental_id: &str,
        end_location: &str,
        instrument_hint: Option<&str>,
    ) -> Result<RentalReceipt> {
        self.end_rental_at(rental_id, end_location, instrument_hint, Utc::now())
    }

    /// [`end_rental`](Self::end_rental) with an explicit clock reading.
    ///
    /// # Errors
    ///
    /// Same as [`end_rental`](Self::end_rental).
    pub fn end_rental_at(
        &mut self,
        rental_id: &str,
        end_location: &str,
        instrument_hint: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<RentalReceipt> {
        // Completing validates existence, one-shot semantics, and the time
        // range before anything is written.
        let rental = self.ledger.complete(rental_id, end_location, now)?.clone();

        self.catalog.mark_available(&rental.bike_id)?;

        let bike = self.catalog.get(&rental.bike_id)?;
        let renter = self
            .renters
            .get(&rental.renter_id)
            .ok_or_else(|| Error::RenterNotFound(rental.renter_id.clone()))?;

        let amount = compute_fare(&rental, bike, renter)?;

        let payment = Payment {
            id: uuid::Uuid::new_v4(),
            rental_id: rental.id.clone(),
            amount,
            currency: self.billing.currency,
            method: self.billing.method,
            instrument_hint: instrument_hint
                .unwrap_or(&self.billing.default_card_hint)
                .to_owned(),
            // Payment date is the rental's end instant, not the wall clock
            // at insert time.
            paid_at: now,
        };
        let payment_id = payment.id;
        self.payments.insert(payment_id, payment);

        info!(rental_id, %payment_id, amount, "rental ended, payment recorded");

        Ok(RentalReceipt {
            rental_id: rental.id,
            payment_id,
            amount,
            currency: self.billing.currency,
            message: format!("Rental and payment of {amount} successful"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::MembershipTier;
    use crate::catalog::BikeStatus;
    use crate::config::RenterSeed;
    use chrono::Duration;

    fn t0() -> DateTime<Utc> {
        "2025-03-01T10:00:00Z".parse().unwrap()
    }

    /// Default seed (B1 @0.5, B2 @1.0, User1 standard) plus a VIP renter.
    fn service() -> RentalService {
        let mut config = VeloConfig::default();
        config.renters.push(RenterSeed {
            id: "User2".to_owned(),
            first_name: "c".to_owned(),
            last_name: "d".to_owned(),
            tier: MembershipTier::Vip,
        });
        RentalService::from_config(&config)
    }

    #[test]
    fn test_begin_rental_flips_bike_to_in_use() {
        let mut service = service();
        let rental_id = service.begin_rental("User1", "B1", "Depot").unwrap();

        assert!(!service.is_bike_available("B1").unwrap());
        let rental = service.rental(&rental_id).unwrap();
        assert!(rental.is_active());
        assert_eq!(rental.bike_id, "B1");
        assert_eq!(rental.renter_id, "User1");
    }

    #[test]
    fn test_in_use_bike_has_exactly_one_active_rental() {
        let mut service = service();
        let first = service.begin_rental_at("User1", "B1", "Depot", t0()).unwrap();

        // Second attempt on the same bike fails and opens no rental.
        let err = service
            .begin_rental_at("User2", "B1", "Depot", t0())
            .unwrap_err();
        assert!(matches!(err, Error::BikeUnavailable(_)));
        assert_eq!(
            service.rentals_of("User1").len() + service.rentals_of("User2").len(),
            1
        );

        // Releasing the bike restores the coupling the other way.
        service.end_rental_at(&first, "Depot", None, t0()).unwrap();
        assert!(service.is_bike_available("B1").unwrap());
        assert!(!service.rental(&first).unwrap().is_active());
    }

    #[test]
    fn test_begin_rental_unknown_bike_leaves_no_trace() {
        let mut service = service();
        let err = service.begin_rental("User1", "B99", "Depot").unwrap_err();
        assert!(matches!(err, Error::BikeNotFound(_)));
        assert!(service.rentals_of("User1").is_empty());
    }

    #[test]
    fn test_begin_rental_unknown_renter_leaves_bike_available() {
        let mut service = service();
        let err = service.begin_rental("Nobody", "B1", "Depot").unwrap_err();
        assert!(matches!(err, Error::RenterNotFound(_)));
        assert!(service.is_bike_available("B1").unwrap());
    }

    #[test]
    fn test_rentals_on_different_bikes_are_independent() {
        let mut service = service();
        let r1 = service.begin_rental("User1", "B1", "Depot").unwrap();
        let r2 = service.begin_rental("User1", "B2", "Depot").unwrap();
        assert_ne!(r1, r2);
        assert!(!service.is_bike_available("B1").unwrap());
        assert!(!service.is_bike_available("B2").unwrap());
    }

    #[test]
    fn test_immediate_return_costs_nothing() {
        let mut service = service();
        let rental_id = service.begin_rental_at("User1", "B1", "Depot", t0()).unwrap();
        let receipt = service.end_rental_at(&rental_id, "Depot", None, t0()).unwrap();

        assert_eq!(receipt.amount, 0.0);
        assert!(service.is_bike_available("B1").unwrap());
        assert!(!service.rental(&rental_id).unwrap().is_active());
    }

    #[test]
    fn test_ten_minutes_standard_on_b1_costs_five() {
        let mut service = service();
        let rental_id = service.begin_rental_at("User1", "B1", "Depot", t0()).unwrap();
        let receipt = service
            .end_rental_at(&rental_id, "Depot", None, t0() + Duration::minutes(10))
            .unwrap();

        assert!((receipt.amount - 5.0).abs() < f64::EPSILON);
        assert!(receipt.message.contains('5'));
    }

    #[test]
    fn test_ten_minutes_vip_on_b2_costs_eight() {
        let mut service = service();
        let rental_id = service.begin_rental_at("User2", "B2", "Depot", t0()).unwrap();
        let receipt = service
            .end_rental_at(&rental_id, "Depot", None, t0() + Duration::minutes(10))
            .unwrap();

        assert!((receipt.amount - 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_end_rental_records_one_payment() {
        let mut service = service();
        let rental_id = service.begin_rental_at("User1", "B1", "Depot", t0()).unwrap();
        let end = t0() + Duration::minutes(10);
        let receipt = service.end_rental_at(&rental_id, "Depot", None, end).unwrap();

        let payment = service.payment_for_rental(&rental_id).unwrap();
        assert_eq!(payment.id, receipt.payment_id);
        assert_eq!(payment.amount, receipt.amount);
        assert_eq!(payment.instrument_hint, "************1234");
        assert_eq!(payment.paid_at, end);
    }

    #[test]
    fn test_caller_supplied_hint_overrides_default() {
        let mut service = service();
        let rental_id = service.begin_rental_at("User1", "B1", "Depot", t0()).unwrap();
        service
            .end_rental_at(&rental_id, "Depot", Some("****5678"), t0())
            .unwrap();

        let payment = service.payment_for_rental(&rental_id).unwrap();
        assert_eq!(payment.instrument_hint, "****5678");
    }

    #[test]
    fn test_end_rental_twice_fails_without_double_payment() {
        let mut service = service();
        let rental_id = service.begin_rental_at("User1", "B1", "Depot", t0()).unwrap();
        service.end_rental_at(&rental_id, "Depot", None, t0()).unwrap();

        let err = service
            .end_rental_at(&rental_id, "Elsewhere", None, t0())
            .unwrap_err();
        assert!(matches!(err, Error::RentalAlreadyCompleted(_)));

        // Exactly one payment, and the bike stays available.
        assert_eq!(
            service
                .payments
                .values()
                .filter(|p| p.rental_id == rental_id)
                .count(),
            1
        );
        assert!(service.is_bike_available("B1").unwrap());
    }

    #[test]
    fn test_end_rental_unknown_id_changes_nothing() {
        let mut service = service();
        service.begin_rental("User1", "B1", "Depot").unwrap();

        let err = service.end_rental("R99", "Depot", None).unwrap_err();
        assert!(matches!(err, Error::RentalNotFound(_)));

        assert!(!service.is_bike_available("B1").unwrap());
        assert!(service.payments.is_empty());
    }

    #[test]
    fn test_end_before_start_changes_nothing() {
        let mut service = service();
        let rental_id = service.begin_rental_at("User1", "B1", "Depot", t0()).unwrap();

        let err = service
            .end_rental_at(&rental_id, "Depot", None, t0() - Duration::seconds(30))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidTimeRange { .. }));

        assert!(service.rental(&rental_id).unwrap().is_active());
        assert!(!service.is_bike_available("B1").unwrap());
        assert!(service.payments.is_empty());
    }

    #[test]
    fn test_bike_can_be_rented_again_after_return() {
        let mut service = service();
        let first = service.begin_rental_at("User1", "B1", "Depot", t0()).unwrap();
        service.end_rental_at(&first, "Depot", None, t0()).unwrap();

        let second = service.begin_rental_at("User2", "B1", "Depot", t0()).unwrap();
        assert_ne!(first, second);
        assert_eq!(service.bikes().len(), 2);
        assert_eq!(
            service
                .bikes()
                .iter()
                .filter(|b| b.status == BikeStatus::InUse)
                .count(),
            1
        );
    }
}
