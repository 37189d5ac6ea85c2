//! Exchange-rate seam for cost aggregation.
//!
//! The fixed rates are bookkeeping heuristics, not market rates. They only
//! decide which currency bucket a mixed-currency hotel lands in and convert
//! UZS-denominated taxes into a room's billing currency.

use crate::models::accommodation::Currency;

pub const UZS_PER_USD: f64 = 12_700.0;
pub const UZS_PER_EUR: f64 = 13_500.0;
/// Nightly prices above this are UZS amounts; also the UZS:USD ratio used to
/// pick the dominant bucket of a mixed-currency hotel.
pub const MIXED_CURRENCY_THRESHOLD: f64 = 10_000.0;

pub trait FxRateProvider: Send + Sync {
    /// How many UZS buy one unit of `currency`.
    fn uzs_per_unit(&self, currency: Currency) -> f64;

    fn mixed_currency_threshold(&self) -> f64 {
        MIXED_CURRENCY_THRESHOLD
    }

    fn from_uzs(&self, amount_uzs: f64, currency: Currency) -> f64 {
        amount_uzs / self.uzs_per_unit(currency)
    }

    fn convert(&self, amount: f64, from: Currency, to: Currency) -> f64 {
        if from == to {
            return amount;
        }
        self.from_uzs(amount * self.uzs_per_unit(from), to)
    }

    /// Explicit currency wins; otherwise large amounts are taken as UZS.
    fn detect_currency(&self, explicit: Option<Currency>, amount: f64) -> Currency {
        match explicit {
            Some(currency) => currency,
            None if amount > self.mixed_currency_threshold() => Currency::Uzs,
            None => Currency::Usd,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedFxRates {
    pub uzs_per_usd: f64,
    pub uzs_per_eur: f64,
    pub mixed_threshold: f64,
}

impl Default for FixedFxRates {
    fn default() -> Self {
        Self {
            uzs_per_usd: UZS_PER_USD,
            uzs_per_eur: UZS_PER_EUR,
            mixed_threshold: MIXED_CURRENCY_THRESHOLD,
        }
    }
}

impl FxRateProvider for FixedFxRates {
    fn uzs_per_unit(&self, currency: Currency) -> f64 {
        match currency {
            Currency::Usd => self.uzs_per_usd,
            Currency::Eur => self.uzs_per_eur,
            Currency::Uzs => 1.0,
        }
    }

    fn mixed_currency_threshold(&self) -> f64 {
        self.mixed_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_uzs() {
        let fx = FixedFxRates::default();
        assert_eq!(fx.from_uzs(127_000.0, Currency::Usd), 10.0);
        assert_eq!(fx.from_uzs(27_000.0, Currency::Eur), 2.0);
        assert_eq!(fx.from_uzs(5_000.0, Currency::Uzs), 5_000.0);
    }

    #[test]
    fn test_convert_between_foreign_currencies() {
        let fx = FixedFxRates::default();
        let eur = fx.convert(127.0, Currency::Usd, Currency::Eur);
        assert!((eur - 119.474).abs() < 0.001);
        assert_eq!(fx.convert(50.0, Currency::Usd, Currency::Usd), 50.0);
    }

    #[test]
    fn test_detect_currency_by_magnitude() {
        let fx = FixedFxRates::default();
        assert_eq!(fx.detect_currency(None, 450_000.0), Currency::Uzs);
        assert_eq!(fx.detect_currency(None, 85.0), Currency::Usd);
        assert_eq!(fx.detect_currency(Some(Currency::Eur), 85.0), Currency::Eur);
    }
}
