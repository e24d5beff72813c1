//! Application configuration management.
//!
//! Handles loading, saving, and validating velo configuration including:
//! - Server bind address
//! - Billing defaults (currency, payment method, masked card hint)
//! - Seed data for the bike fleet and the renter roster

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::billing::{Currency, MembershipTier, PaymentMethod};
use crate::error::{Error, Result};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VeloConfig {
    /// HTTP server settings.
    pub server: ServerConfig,

    /// Billing defaults applied to every payment.
    pub billing: BillingConfig,

    /// Bike fleet provisioned at startup.
    pub bikes: Vec<BikeSeed>,

    /// Renter roster loaded at startup. Read-only to the core.
    pub renters: Vec<RenterSeed>,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,

    /// Port to bind.
    pub port: u16,
}

/// Billing defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingConfig {
    /// Currency every payment is denominated in.
    pub currency: Currency,

    /// Payment method recorded on every payment.
    pub method: PaymentMethod,

    /// Masked instrument hint used when the caller supplies none.
    pub default_card_hint: String,
}

/// A bike to provision at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BikeSeed {
    /// Stable unique identifier.
    pub id: String,
    /// Model label.
    pub model: String,
    /// Producer/vendor label.
    pub producer: String,
    /// Per-minute tariff before discount.
    pub tariff_per_minute: f64,
}

/// A renter to register at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenterSeed {
    /// Unique identifier.
    pub id: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Membership tier.
    pub tier: MembershipTier,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_owned(),
            port: 5000,
        }
    }
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            currency: Currency::Eur,
            method: PaymentMethod::Card,
            default_card_hint: "************1234".to_owned(),
        }
    }
}

impl Default for VeloConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            billing: BillingConfig::default(),
            bikes: vec![
                BikeSeed {
                    id: "B1".to_owned(),
                    model: "Mountain".to_owned(),
                    producer: "P1".to_owned(),
                    tariff_per_minute: 0.5,
                },
                BikeSeed {
                    id: "B2".to_owned(),
                    model: "Electric".to_owned(),
                    producer: "P2".to_owned(),
                    tariff_per_minute: 1.0,
                },
            ],
            renters: vec![RenterSeed {
                id: "User1".to_owned(),
                first_name: "a".to_owned(),
                last_name: "b".to_owned(),
                tier: MembershipTier::Standard,
            }],
        }
    }
}

impl VeloConfig {
    /// Load configuration from `path`, falling back to defaults when the
    /// file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, parsed, or
    /// validated.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigIoError {
                path: path.to_path_buf(),
                source,
            })?;
            toml::from_str(&content).map_err(|e| Error::ConfigParseError(e.to_string()))?
        } else {
            Self::default()
        };

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| Error::ConfigIoError {
                path: path.to_path_buf(),
                source,
            })?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| Error::ConfigParseError(e.to_string()))?;
        std::fs::write(path, content).map_err(|source| Error::ConfigIoError {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Check the configuration for values the core cannot operate on.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigValidationError`] naming the offending field.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::ConfigValidationError(
                "server.port must be non-zero".to_owned(),
            ));
        }
        if self.billing.default_card_hint.is_empty() {
            return Err(Error::ConfigValidationError(
                "billing.default_card_hint must not be empty".to_owned(),
            ));
        }

        let mut bike_ids = std::collections::HashSet::new();
        for bike in &self.bikes {
            if !bike.tariff_per_minute.is_finite() || bike.tariff_per_minute < 0.0 {
                return Err(Error::ConfigValidationError(format!(
                    "bike '{}' has a negative or non-finite tariff",
                    bike.id
                )));
            }
            if !bike_ids.insert(bike.id.as_str()) {
                return Err(Error::ConfigValidationError(format!(
                    "duplicate bike id '{}'",
                    bike.id
                )));
            }
        }

        let mut renter_ids = std::collections::HashSet::new();
        for renter in &self.renters {
            if !renter_ids.insert(renter.id.as_str()) {
                return Err(Error::ConfigValidationError(format!(
                    "duplicate renter id '{}'",
                    renter.id
                )));
            }
        }

        Ok(())
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_path() -> PathBuf {
        // On servers: /etc/velo/config.toml
        // For development: ~/.config/velo/config.toml
        #[cfg(target_os = "linux")]
        {
            PathBuf::from("/etc/velo/config.toml")
        }
        #[cfg(not(target_os = "linux"))]
        {
            directories::ProjectDirs::from("", "", "velo")
                .map(|dirs| dirs.config_dir().join("config.toml"))
                .unwrap_or_else(|| PathBuf::from("./config.toml"))
        }
    }
}
