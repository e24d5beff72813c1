//! Membership tiers, fare computation, and payment records.
//!
//! Fares are billed per started minute: elapsed whole minutes times the
//! bike's tariff, reduced by the renter's membership discount. The
//! calculator is pure; recording the resulting [`Payment`] is the rental
//! service's job.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::catalog::Bike;
use crate::error::{Error, Result};
use crate::ledger::Rental;

/// Renter classification that discounts the per-minute tariff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MembershipTier {
    /// Pays full tariff.
    Standard,
    /// 10% off every rental.
    Premium,
    /// 20% off every rental.
    Vip,
}

impl MembershipTier {
    /// Fractional discount applied to the tariff.
    ///
    /// Spelled out as a table rather than derived from the enum's ordinal,
    /// so reordering variants can never silently change billing.
    #[must_use]
    pub fn discount(self) -> f64 {
        match self {
            Self::Standard => 0.0,
            Self::Premium => 0.1,
            Self::Vip => 0.2,
        }
    }
}

/// A registered renter. Seeded at startup and read-only to the core.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Renter {
    /// Unique identifier, e.g. "User1".
    #[schema(example = "User1")]
    pub id: String,

    /// Given name.
    pub first_name: String,

    /// Family name.
    pub last_name: String,

    /// Membership tier used for fare discounts.
    pub tier: MembershipTier,
}

/// Billing currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Currency {
    /// Euro.
    Eur,
    /// US dollar.
    Usd,
    /// Romanian leu.
    Ron,
}

/// How a payment was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Charged to a stored card.
    Card,
    /// Debited from an account balance.
    Account,
}

/// An immutable payment record, created once per completed rental.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Payment {
    /// Unique payment identifier.
    pub id: uuid::Uuid,

    /// Rental this payment settles.
    #[schema(example = "R0")]
    pub rental_id: String,

    /// Computed fare. Never negative; zero for sub-minute rentals.
    #[schema(example = 5.0, minimum = 0.0)]
    pub amount: f64,

    /// Currency the amount is denominated in.
    pub currency: Currency,

    /// How the payment was settled.
    pub method: PaymentMethod,

    /// Masked instrument hint, e.g. a card number suffix.
    #[schema(example = "************1234")]
    pub instrument_hint: String,

    /// Payment date. Equals the rental's end timestamp.
    pub paid_at: DateTime<Utc>,
}

/// Compute the fare for a completed rental.
///
/// Elapsed minutes are truncated toward zero (a 59-second rental bills as
/// zero minutes). The discounted rate is `tariff * (1 - discount)`.
///
/// # Errors
///
/// Returns [`Error::RentalNotCompleted`] if the rental has no end
/// timestamp yet.
pub fn compute_fare(rental: &Rental, bike: &Bike, renter: &Renter) -> Result<f64> {
    let end_time = rental
        .end_time
        .ok_or_else(|| Error::RentalNotCompleted(rental.id.clone()))?;

    // The ledger refuses end < start, so the delta is non-negative here.
    let elapsed_minutes = (end_time - rental.start_time).num_seconds() / 60;

    let rate = bike.tariff_per_minute * (1.0 - renter.tier.discount());
    Ok(elapsed_minutes as f64 * rate)
}
