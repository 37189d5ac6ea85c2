use serde::{Deserialize, Serialize};

use crate::services::fx::{FixedFxRates, MIXED_CURRENCY_THRESHOLD, UZS_PER_EUR, UZS_PER_USD};
use crate::services::pricing_service::{PricingConfig, TOURIST_TAX_BASE_UZS, VAT_RATE};

pub const HOST: &str = "0.0.0.0";
pub const PORT: u16 = 8080;
pub const DATABASE: &str = "TourOps";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Required by the server binary, optional for tests
    pub mongodb_uri: Option<String>,
    pub mongodb_database: String,
    /// UZS for one USD
    pub uzs_per_usd: f64,
    /// UZS for one EUR
    pub uzs_per_eur: f64,
    pub mixed_currency_threshold: f64,
    pub tourist_tax_base_uzs: f64,
    pub vat_rate: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: HOST.to_string(),
            port: PORT,
            mongodb_uri: None,
            mongodb_database: DATABASE.to_string(),
            uzs_per_usd: UZS_PER_USD,
            uzs_per_eur: UZS_PER_EUR,
            mixed_currency_threshold: MIXED_CURRENCY_THRESHOLD,
            tourist_tax_base_uzs: TOURIST_TAX_BASE_UZS,
            vat_rate: VAT_RATE,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

impl AppConfig {
    /// Reads the environment; unset or unparseable values keep their defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: env_or("PORT", defaults.port),
            mongodb_uri: std::env::var("MONGODB_URI")
                .ok()
                .filter(|uri| !uri.trim().is_empty()),
            mongodb_database: std::env::var("MONGODB_DATABASE")
                .unwrap_or(defaults.mongodb_database),
            uzs_per_usd: env_or("FX_UZS_PER_USD", defaults.uzs_per_usd),
            uzs_per_eur: env_or("FX_UZS_PER_EUR", defaults.uzs_per_eur),
            mixed_currency_threshold: env_or(
                "FX_MIXED_THRESHOLD",
                defaults.mixed_currency_threshold,
            ),
            tourist_tax_base_uzs: env_or("TOURIST_TAX_BASE_UZS", defaults.tourist_tax_base_uzs),
            vat_rate: env_or("VAT_RATE", defaults.vat_rate),
        }
    }

    pub fn fx_rates(&self) -> FixedFxRates {
        FixedFxRates {
            uzs_per_usd: self.uzs_per_usd,
            uzs_per_eur: self.uzs_per_eur,
            mixed_threshold: self.mixed_currency_threshold,
        }
    }

    pub fn pricing(&self) -> PricingConfig {
        PricingConfig {
            vat_rate: self.vat_rate,
            tourist_tax_base_uzs: self.tourist_tax_base_uzs,
        }
    }
}
