//! # velo-core
//!
//! Core business logic for the velo bike rental system.
//!
//! This crate provides:
//! - The bike catalog and its status machine
//! - The rental ledger (session records and lifecycle)
//! - Fare computation with membership discounts, and payment records
//! - The rental service that composes the above into the two domain
//!   operations, begin rental and end rental
//! - Configuration loading and validation
//!
//! ## Architecture
//!
//! The crate is organized into the following modules:
//!
//! - [`catalog`] - Bike records and availability transitions
//! - [`ledger`] - Rental session records and their one-way lifecycle
//! - [`billing`] - Membership tiers, fare calculation, payments
//! - [`service`] - The orchestrator that owns all mutable state
//! - [`config`] - Application configuration loading, saving, and validation
//! - [`error`] - Unified error types for the crate
//!
//! Everything is synchronous, in-memory state plus computation. Callers
//! that share a [`service::RentalService`] across tasks are responsible
//! for serializing access to it.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(missing_docs)]

pub mod billing;
pub mod catalog;
pub mod config;
pub mod error;
pub mod ledger;
pub mod service;

// Re-export primary types for convenience
pub use billing::{compute_fare, Currency, MembershipTier, Payment, PaymentMethod, Renter};
pub use catalog::{Bike, BikeStatus, Catalog};
pub use config::{BikeSeed, BillingConfig, RenterSeed, ServerConfig, VeloConfig};
pub use error::{Error, Result, VeloError};
pub use ledger::{Rental, RentalLedger};
pub use service::{RentalReceipt, RentalService};
