use std::env;

use serial_test::serial;

use tour_ops_api::config::{AppConfig, DATABASE, PORT};

const KEYS: &[&str] = &[
    "HOST",
    "PORT",
    "MONGODB_URI",
    "MONGODB_DATABASE",
    "FX_UZS_PER_USD",
    "FX_UZS_PER_EUR",
    "FX_MIXED_THRESHOLD",
    "TOURIST_TAX_BASE_UZS",
    "VAT_RATE",
];

fn clear_env() {
    for key in KEYS {
        env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_defaults_without_environment() {
    clear_env();
    let config = AppConfig::from_env();

    assert_eq!(config, AppConfig::default());
    assert_eq!(config.port, PORT);
    assert_eq!(config.mongodb_database, DATABASE);
    assert!(config.mongodb_uri.is_none());
}

#[test]
#[serial]
fn test_environment_overrides() {
    clear_env();
    env::set_var("PORT", "9090");
    env::set_var("MONGODB_URI", "mongodb://localhost:27017");
    env::set_var("FX_UZS_PER_USD", "12800");
    env::set_var("VAT_RATE", "0.15");

    let config = AppConfig::from_env();
    clear_env();

    assert_eq!(config.port, 9090);
    assert_eq!(config.mongodb_uri.as_deref(), Some("mongodb://localhost:27017"));
    assert_eq!(config.uzs_per_usd, 12800.0);
    assert_eq!(config.fx_rates().uzs_per_usd, 12800.0);
    assert_eq!(config.pricing().vat_rate, 0.15);
}

#[test]
#[serial]
fn test_unparseable_values_keep_defaults() {
    clear_env();
    env::set_var("PORT", "eighty");
    env::set_var("MONGODB_URI", "   ");
    env::set_var("FX_MIXED_THRESHOLD", "");

    let config = AppConfig::from_env();
    clear_env();

    let defaults = AppConfig::default();
    assert_eq!(config.port, defaults.port);
    assert_eq!(config.mixed_currency_threshold, defaults.mixed_currency_threshold);
    assert!(config.mongodb_uri.is_none());
}
