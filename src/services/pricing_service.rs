use crate::models::accommodation::{Currency, Hotel, HotelRoomType, RoomType};
use crate::services::fx::FxRateProvider;

pub const VAT_RATE: f64 = 0.12;
/// Base amount the tourist tax percentage applies to, in UZS per guest-night
pub const TOURIST_TAX_BASE_UZS: f64 = 375_000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingConfig {
    pub vat_rate: f64,
    pub tourist_tax_base_uzs: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            vat_rate: VAT_RATE,
            tourist_tax_base_uzs: TOURIST_TAX_BASE_UZS,
        }
    }
}

pub struct PricingService;

impl PricingService {
    /// Tourist tax percentage by hotel size (5% up to 10 rooms, 10% up to 40, 15% above)
    pub fn tourist_tax_rate(total_rooms: u32) -> f64 {
        match total_rooms {
            0..=10 => 0.05,
            11..=40 => 0.10,
            _ => 0.15,
        }
    }

    /// Tourist tax for one room-night, converted into the room's billing currency
    pub fn tourist_tax_per_night(
        hotel: &Hotel,
        room_type: RoomType,
        currency: Currency,
        config: &PricingConfig,
        fx: &dyn FxRateProvider,
    ) -> f64 {
        let per_guest_uzs = config.tourist_tax_base_uzs * Self::tourist_tax_rate(hotel.total_rooms);
        fx.from_uzs(per_guest_uzs * f64::from(room_type.capacity()), currency)
    }

    /// Nightly rate stored on a created room: list price plus VAT and tourist tax
    /// when the hotel's price list says they are not included yet
    pub fn nightly_price(
        hotel: &Hotel,
        listed: &HotelRoomType,
        room_type: RoomType,
        config: &PricingConfig,
        fx: &dyn FxRateProvider,
    ) -> (f64, Currency) {
        let currency = fx.detect_currency(listed.currency, listed.price);

        let mut price = listed.price;
        if listed.vat_applicable {
            price *= 1.0 + config.vat_rate;
        }
        if listed.tourist_tax_applicable {
            price += Self::tourist_tax_per_night(hotel, room_type, currency, config, fx);
        }

        (round_to(price, currency), currency)
    }
}

fn round_to(amount: f64, currency: Currency) -> f64 {
    match currency {
        Currency::Uzs => amount.round(),
        Currency::Usd | Currency::Eur => (amount * 100.0).round() / 100.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fx::FixedFxRates;

    fn hotel(total_rooms: u32) -> Hotel {
        Hotel {
            id: None,
            name: "Asia Bukhara".into(),
            city: "Bukhara".into(),
            total_rooms,
            room_types: vec![],
        }
    }

    fn listed(price: f64, currency: Option<Currency>, vat: bool, tax: bool) -> HotelRoomType {
        HotelRoomType {
            name: "DBL".into(),
            price,
            currency,
            vat_applicable: vat,
            tourist_tax_applicable: tax,
        }
    }

    #[test]
    fn test_tourist_tax_tiers() {
        assert_eq!(PricingService::tourist_tax_rate(8), 0.05);
        assert_eq!(PricingService::tourist_tax_rate(10), 0.05);
        assert_eq!(PricingService::tourist_tax_rate(11), 0.10);
        assert_eq!(PricingService::tourist_tax_rate(40), 0.10);
        assert_eq!(PricingService::tourist_tax_rate(41), 0.15);
    }

    #[test]
    fn test_plain_price_passes_through() {
        let fx = FixedFxRates::default();
        let (price, currency) = PricingService::nightly_price(
            &hotel(30),
            &listed(70.0, Some(Currency::Usd), false, false),
            RoomType::Dbl,
            &PricingConfig::default(),
            &fx,
        );
        assert_eq!(price, 70.0);
        assert_eq!(currency, Currency::Usd);
    }

    #[test]
    fn test_vat_is_added() {
        let fx = FixedFxRates::default();
        let (price, _) = PricingService::nightly_price(
            &hotel(30),
            &listed(100.0, Some(Currency::Usd), true, false),
            RoomType::Dbl,
            &PricingConfig::default(),
            &fx,
        );
        assert_eq!(price, 112.0);
    }

    #[test]
    fn test_tourist_tax_in_uzs_room() {
        let fx = FixedFxRates::default();
        // 10% of 375,000 per guest, two guests in a double
        let (price, currency) = PricingService::nightly_price(
            &hotel(30),
            &listed(500_000.0, None, false, true),
            RoomType::Dbl,
            &PricingConfig::default(),
            &fx,
        );
        assert_eq!(currency, Currency::Uzs);
        assert_eq!(price, 575_000.0);
    }

    #[test]
    fn test_tourist_tax_converted_to_usd() {
        let fx = FixedFxRates::default();
        // 5% of 375,000 = 18,750 UZS for a single, / 12,700
        let (price, _) = PricingService::nightly_price(
            &hotel(6),
            &listed(40.0, Some(Currency::Usd), false, true),
            RoomType::Sngl,
            &PricingConfig::default(),
            &fx,
        );
        assert_eq!(price, 41.48);
    }
}
