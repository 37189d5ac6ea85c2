//! Per-stay accommodation costs derived from the rooming list.
//!
//! Costs are computed in guest-nights first, converted to room-nights per room
//! type and only then multiplied by the nightly rate. Nothing here is stored;
//! callers rerun it whenever tourists or stays change.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::models::accommodation::{Accommodation, Currency, RoomType};
use crate::models::tourist::Tourist;
use crate::services::date_math;
use crate::services::fx::FxRateProvider;
use crate::services::matching;
use crate::services::room_allocation::allocate_rooms;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrencyTotals {
    pub usd: f64,
    pub eur: f64,
    pub uzs: f64,
}

impl CurrencyTotals {
    pub fn add(&mut self, currency: Currency, amount: f64) {
        match currency {
            Currency::Usd => self.usd += amount,
            Currency::Eur => self.eur += amount,
            Currency::Uzs => self.uzs += amount,
        }
    }

    pub fn get(&self, currency: Currency) -> f64 {
        match currency {
            Currency::Usd => self.usd,
            Currency::Eur => self.eur,
            Currency::Uzs => self.uzs,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.usd == 0.0 && self.eur == 0.0 && self.uzs == 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomCostLine {
    pub room_type: RoomType,
    pub guest_nights: u32,
    /// Guest-nights over room capacity, fractional for a shared room left half empty
    pub room_nights: f64,
    pub price_per_night: f64,
    pub currency: Currency,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccommodationCost {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accommodation_id: Option<ObjectId>,
    pub hotel_name: String,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    /// Bucket the whole stay is accounted in
    pub currency: Currency,
    pub total_cost: f64,
    /// Raw per-currency sums before bucketing
    pub totals: CurrencyTotals,
    pub total_rooms: u32,
    pub total_guests: u32,
    pub guest_nights: u32,
    pub breakdown: Vec<RoomCostLine>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostSummary {
    pub stays: Vec<AccommodationCost>,
    pub totals: CurrencyTotals,
    pub warnings: Vec<String>,
}

/// Earliest check-in of the booking; tourist date overrides only apply there.
pub fn first_check_in(accommodations: &[Accommodation]) -> Option<NaiveDate> {
    accommodations.iter().map(|acc| acc.check_in_date).min()
}

/// Tourists staying at `accommodation`: the stay's own rooming list when one
/// was loaded, otherwise name and date matching against the whole booking.
pub fn stay_tourists<'a>(
    accommodation: &Accommodation,
    rooming_list: Option<&'a [Tourist]>,
    tourists: &'a [Tourist],
) -> Vec<&'a Tourist> {
    match rooming_list {
        Some(list) => list.iter().collect(),
        None => tourists
            .iter()
            .filter(|tourist| {
                matching::tourist_matches_stay(
                    tourist,
                    &accommodation.hotel.name,
                    accommodation.check_in_date,
                    accommodation.check_out_date,
                )
            })
            .collect(),
    }
}

fn effective_nights(tourist: &Tourist, accommodation: &Accommodation, first_stay: bool) -> i64 {
    let (check_in, check_out) = if first_stay {
        (
            tourist.check_in_date.unwrap_or(accommodation.check_in_date),
            tourist.check_out_date.unwrap_or(accommodation.check_out_date),
        )
    } else {
        (accommodation.check_in_date, accommodation.check_out_date)
    };
    date_math::nights_between(check_in, check_out)
}

/// Assigns a stay to one currency bucket. Mixed UZS/foreign stays go to UZS
/// only when the UZS part outweighs the foreign part times the threshold; the
/// minority part is converted at the fixed rates.
fn bucket_totals(
    totals: &CurrencyTotals,
    fallback: Currency,
    fx: &dyn FxRateProvider,
) -> (Currency, f64) {
    let foreign_currency = if totals.eur > 0.0 && totals.usd == 0.0 {
        Currency::Eur
    } else {
        Currency::Usd
    };
    let foreign = match foreign_currency {
        Currency::Eur => totals.eur,
        _ => totals.usd + fx.convert(totals.eur, Currency::Eur, Currency::Usd),
    };

    match (totals.uzs > 0.0, foreign > 0.0) {
        (false, false) => (fallback, 0.0),
        (true, false) => (Currency::Uzs, totals.uzs),
        (false, true) => (foreign_currency, foreign),
        (true, true) => {
            let foreign_usd = fx.convert(foreign, foreign_currency, Currency::Usd);
            if totals.uzs > foreign_usd * fx.mixed_currency_threshold() {
                (
                    Currency::Uzs,
                    totals.uzs + fx.convert(foreign, foreign_currency, Currency::Uzs),
                )
            } else {
                (
                    foreign_currency,
                    foreign + fx.convert(totals.uzs, Currency::Uzs, foreign_currency),
                )
            }
        }
    }
}

/// Cost of one stay.
///
/// `first_check_in` is the earliest check-in over the whole booking; only the
/// stay starting then honours tourists' individual check-in/out dates.
pub fn accommodation_cost(
    accommodation: &Accommodation,
    tourists: &[&Tourist],
    first_check_in: Option<NaiveDate>,
    fx: &dyn FxRateProvider,
) -> AccommodationCost {
    let first_stay = first_check_in == Some(accommodation.check_in_date);
    let mut warnings = Vec::new();
    let mut guest_nights: HashMap<RoomType, u32> = HashMap::new();
    let mut all_guest_nights = 0u32;

    for tourist in tourists {
        let nights = effective_nights(tourist, accommodation, first_stay) as u32;
        all_guest_nights += nights;
        match tourist.room_type() {
            Some(room_type) => *guest_nights.entry(room_type).or_default() += nights,
            None => {
                log::warn!(
                    "Tourist {} at {} has no recognised room type",
                    tourist.full_name,
                    accommodation.hotel.name
                );
                warnings.push(format!(
                    "{}: no room type for {}",
                    accommodation.hotel.name, tourist.full_name
                ));
            }
        }
    }

    let mut breakdown = Vec::new();
    let mut totals = CurrencyTotals::default();
    let mut billed: HashSet<RoomType> = HashSet::new();

    for room in &accommodation.rooms {
        let Some(room_type) = room.room_type() else {
            log::warn!(
                "Unknown room type {} at {}",
                room.room_type_code,
                accommodation.hotel.name
            );
            continue;
        };
        if !billed.insert(room_type) {
            continue;
        }

        let nights_for_type = guest_nights.get(&room_type).copied().unwrap_or(0);
        let (type_guest_nights, room_nights) = if room_type == RoomType::Pax {
            // PAX guests bill per night; without any, one unit per guest
            if nights_for_type > 0 {
                (nights_for_type, f64::from(nights_for_type))
            } else {
                (all_guest_nights, tourists.len() as f64)
            }
        } else {
            (
                nights_for_type,
                f64::from(nights_for_type) / f64::from(room_type.capacity()),
            )
        };
        if type_guest_nights == 0 {
            continue;
        }

        let currency = fx.detect_currency(
            room.currency.or(accommodation.hotel.currency),
            room.price_per_night,
        );
        let cost = room_nights * room.price_per_night;
        totals.add(currency, cost);
        breakdown.push(RoomCostLine {
            room_type,
            guest_nights: type_guest_nights,
            room_nights,
            price_per_night: room.price_per_night,
            currency,
            cost,
        });
    }

    let pax_billed = billed.contains(&RoomType::Pax);
    for (room_type, nights) in &guest_nights {
        if *nights > 0 && !billed.contains(room_type) && !pax_billed {
            warnings.push(format!(
                "{}: {} guest-nights in {} without a room price",
                accommodation.hotel.name, nights, room_type
            ));
        }
    }
    breakdown.sort_by_key(|line| line.room_type);

    let fallback = accommodation.hotel.currency.unwrap_or(Currency::Usd);
    let (currency, total_cost) = bucket_totals(&totals, fallback, fx);

    AccommodationCost {
        accommodation_id: accommodation.id,
        hotel_name: accommodation.hotel.name.clone(),
        check_in_date: accommodation.check_in_date,
        check_out_date: accommodation.check_out_date,
        currency,
        total_cost,
        totals,
        total_rooms: allocate_rooms(tourists.iter().copied()).total,
        total_guests: tourists.len() as u32,
        guest_nights: all_guest_nights,
        breakdown,
        warnings,
    }
}

/// Grand totals across stays, each stay counted in its own bucket.
pub fn grand_totals(costs: &[AccommodationCost]) -> CurrencyTotals {
    costs.iter().fold(CurrencyTotals::default(), |mut totals, cost| {
        totals.add(cost.currency, cost.total_cost);
        totals
    })
}

/// Costs for every stay of a booking. `rooming_lists` holds accommodation-scoped
/// rooming lists that were already loaded, keyed by accommodation id.
pub fn summarize_costs(
    accommodations: &[Accommodation],
    tourists: &[Tourist],
    rooming_lists: &HashMap<ObjectId, Vec<Tourist>>,
    fx: &dyn FxRateProvider,
) -> CostSummary {
    let first = first_check_in(accommodations);
    let mut warnings = Vec::new();

    let stays: Vec<AccommodationCost> = accommodations
        .iter()
        .map(|accommodation| {
            let rooming_list = accommodation
                .id
                .and_then(|id| rooming_lists.get(&id))
                .map(Vec::as_slice);
            let guests = stay_tourists(accommodation, rooming_list, tourists);
            if guests.is_empty() {
                log::warn!("No tourists matched {}", accommodation.hotel.name);
                warnings.push(format!("{}: no tourists matched", accommodation.hotel.name));
            }
            let cost = accommodation_cost(accommodation, &guests, first, fx);
            warnings.extend(cost.warnings.iter().cloned());
            cost
        })
        .collect();

    CostSummary {
        totals: grand_totals(&stays),
        stays,
        warnings,
    }
}
