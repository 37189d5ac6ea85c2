//! Creates a booking's hotel stays from its tour type's day-by-day program.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::Result;
use crate::models::accommodation::{Accommodation, Hotel, Room, RoomType};
use crate::models::booking::Booking;
use crate::models::itinerary::ItineraryDay;
use crate::models::tourist::Tourist;
use crate::services::date_math;
use crate::services::fx::FxRateProvider;
use crate::services::matching::{self, find_hotel, hotel_names_match, normalize_name};
use crate::services::pricing_service::{PricingConfig, PricingService};
use crate::services::room_allocation::allocate_rooms;

/// Same-hotel stays this many free days apart are one booking.
pub const MAX_REENTRY_GAP_DAYS: u32 = 2;

/// Consecutive program nights at one hotel, as day numbers (day 1 = arrival).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedStay {
    pub hotel_name: String,
    pub first_day: u32,
    pub last_day: u32,
}

impl PlannedStay {
    pub fn check_in(&self, arrival: NaiveDate) -> Result<NaiveDate> {
        date_math::add_days(arrival, i64::from(self.first_day) - 1)
    }

    pub fn check_out(&self, arrival: NaiveDate) -> Result<NaiveDate> {
        date_math::add_days(arrival, i64::from(self.last_day))
    }
}

/// Groups the program into stays and merges re-entries into the same hotel.
pub fn plan_stays(itinerary: &[ItineraryDay]) -> Vec<PlannedStay> {
    let mut days: Vec<&ItineraryDay> = itinerary.iter().collect();
    days.sort_by_key(|day| day.day_number);

    let mut runs: Vec<PlannedStay> = Vec::new();
    for day in days {
        let Some(hotel) = day.hotel_name() else {
            continue;
        };
        match runs.last_mut() {
            Some(run)
                if run.last_day.checked_add(1) == Some(day.day_number)
                    && normalize_name(&run.hotel_name) == normalize_name(hotel) =>
            {
                run.last_day = day.day_number;
            }
            _ => runs.push(PlannedStay {
                hotel_name: hotel.to_string(),
                first_day: day.day_number,
                last_day: day.day_number,
            }),
        }
    }

    let mut merged: Vec<PlannedStay> = Vec::new();
    for run in runs {
        let earlier = merged.iter_mut().rev().find(|stay| {
            normalize_name(&stay.hotel_name) == normalize_name(&run.hotel_name)
        });
        match earlier {
            Some(stay)
                if run.first_day.saturating_sub(stay.last_day.saturating_add(1))
                    <= MAX_REENTRY_GAP_DAYS =>
            {
                stay.last_day = stay.last_day.max(run.last_day);
            }
            _ => merged.push(run),
        }
    }
    merged
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoFillReport {
    pub accommodations: Vec<Accommodation>,
    pub warnings: Vec<String>,
}

/// Priced room lines for a tourist subset at `hotel`.
pub fn rooms_for(
    hotel: &Hotel,
    tourists: &[&Tourist],
    pricing: &PricingConfig,
    fx: &dyn FxRateProvider,
    warnings: &mut Vec<String>,
) -> Vec<Room> {
    let counts = allocate_rooms(tourists.iter().copied());

    RoomType::ROOMS
        .into_iter()
        .filter(|room_type| counts.get(*room_type) > 0)
        .map(|room_type| {
            let (price, currency) = match hotel.room_type(room_type) {
                Some(listed) => {
                    let (price, currency) =
                        PricingService::nightly_price(hotel, listed, room_type, pricing, fx);
                    (price, Some(currency))
                }
                None => {
                    log::warn!("{} has no {} price", hotel.name, room_type);
                    warnings.push(format!("{}: no price for {} rooms", hotel.name, room_type));
                    (0.0, None)
                }
            };
            Room {
                room_type_code: room_type.code().to_string(),
                rooms_count: counts.get(room_type),
                guests_per_room: room_type.capacity(),
                price_per_night: price,
                currency,
            }
        })
        .collect()
}

/// Builds the accommodations for a booking from its tour program.
///
/// When the group splits, the last stay is booked for the Uzbekistan party
/// only; the Turkmenistan party checks out of the last shared hotel. Stays
/// already present in `existing` (same hotel, same check-in) are not created
/// twice.
pub fn auto_fill(
    booking: &Booking,
    itinerary: &[ItineraryDay],
    hotels: &[Hotel],
    tourists: &[Tourist],
    existing: &[Accommodation],
    pricing: &PricingConfig,
    fx: &dyn FxRateProvider,
) -> AutoFillReport {
    let arrival = booking.arrival_date();
    let stays = plan_stays(itinerary);
    let (uzbekistan, turkmenistan) = matching::split_by_group(tourists);
    let split = booking.has_turkmenistan_split() && !turkmenistan.is_empty();
    let everyone: Vec<&Tourist> = tourists.iter().collect();
    let final_day = stays.iter().map(|stay| stay.last_day).max();

    let mut warnings = Vec::new();
    let mut accommodations = Vec::new();
    for stay in &stays {
        let (check_in, check_out) = match (stay.check_in(arrival), stay.check_out(arrival)) {
            (Ok(check_in), Ok(check_out)) => (check_in, check_out),
            (Err(e), _) | (_, Err(e)) => {
                log::warn!("{} stay skipped: {}", stay.hotel_name, e);
                warnings.push(format!("{}: {}", stay.hotel_name, e));
                continue;
            }
        };
        if check_out > booking.end_date {
            log::warn!("{} stay ends after the tour, skipped", stay.hotel_name);
            warnings.push(format!(
                "{}: check-out {} is after the tour end {}",
                stay.hotel_name,
                check_out.format(date_math::DISPLAY_FORMAT),
                booking.end_date.format(date_math::DISPLAY_FORMAT)
            ));
            continue;
        }

        let Some(hotel) = find_hotel(hotels, &stay.hotel_name) else {
            log::warn!("Hotel {} not found", stay.hotel_name);
            warnings.push(format!("Hotel not found: {}", stay.hotel_name));
            continue;
        };

        let duplicate = existing.iter().any(|acc| {
            acc.check_in_date == check_in && hotel_names_match(&acc.hotel.name, &hotel.name)
        });
        if duplicate {
            log::debug!("{} on {} already booked", hotel.name, check_in);
            continue;
        }

        let guests = if split && Some(stay.last_day) == final_day {
            &uzbekistan
        } else {
            &everyone
        };
        if guests.is_empty() {
            warnings.push(format!("{}: no tourists to accommodate", hotel.name));
        }

        accommodations.push(Accommodation {
            id: None,
            booking_id: booking.id,
            hotel: hotel.to_hotel_ref(),
            check_in_date: check_in,
            check_out_date: check_out,
            nights: date_math::nights_between(check_in, check_out),
            rooms: rooms_for(hotel, guests, pricing, fx, &mut warnings),
        });
    }

    log::info!(
        "Auto-fill planned {} stays for booking {}",
        accommodations.len(),
        booking.booking_number
    );
    AutoFillReport {
        accommodations,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::accommodation::{Currency, HotelRoomType};
    use crate::services::fx::FixedFxRates;

    fn day(number: u32, hotel: Option<&str>) -> ItineraryDay {
        ItineraryDay::new(number, hotel)
    }

    fn hotel(name: &str, price: f64) -> Hotel {
        Hotel {
            id: None,
            name: name.into(),
            city: String::new(),
            total_rooms: 20,
            room_types: vec![
                HotelRoomType {
                    name: "DBL".into(),
                    price,
                    currency: Some(Currency::Usd),
                    vat_applicable: false,
                    tourist_tax_applicable: false,
                },
                HotelRoomType {
                    name: "SNGL".into(),
                    price: price * 0.8,
                    currency: Some(Currency::Usd),
                    vat_applicable: false,
                    tourist_tax_applicable: false,
                },
            ],
        }
    }

    fn tourist(name: &str, room: &str, group: &str) -> Tourist {
        Tourist {
            room_number: Some(room.into()),
            accommodation: Some(group.into()),
            ..Tourist::new(name)
        }
    }

    fn booking(tour_type: &str) -> Booking {
        Booking {
            id: None,
            booking_number: "ER-01".into(),
            tour_type: tour_type.into(),
            departure_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 5, 20).unwrap(),
            pax: 0,
            pax_uzbekistan: 0,
            pax_turkmenistan: 0,
        }
    }

    #[test]
    fn test_plan_groups_consecutive_nights() {
        let stays = plan_stays(&[
            day(1, Some("Lotte City")),
            day(2, Some("Lotte City")),
            day(3, Some("Asia Fergana")),
            day(4, None),
        ]);
        assert_eq!(
            stays,
            vec![
                PlannedStay {
                    hotel_name: "Lotte City".into(),
                    first_day: 1,
                    last_day: 2
                },
                PlannedStay {
                    hotel_name: "Asia Fergana".into(),
                    first_day: 3,
                    last_day: 3
                },
            ]
        );
    }

    #[test]
    fn test_plan_merges_reentry_after_side_trip() {
        let stays = plan_stays(&[
            day(1, Some("Lotte City")),
            day(2, Some("Lotte City")),
            day(3, Some("Asia Fergana")),
            day(4, Some("Asia Fergana")),
            day(5, Some("Lotte City")),
            day(9, Some("Lotte City")),
        ]);
        assert_eq!(stays.len(), 3);
        assert_eq!((stays[0].first_day, stays[0].last_day), (1, 5));
        // four free days is a new booking
        assert_eq!((stays[2].first_day, stays[2].last_day), (9, 9));
    }

    #[test]
    fn test_planned_dates_start_at_arrival() {
        let stay = PlannedStay {
            hotel_name: "Lotte City".into(),
            first_day: 1,
            last_day: 2,
        };
        let arrival = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        assert_eq!(stay.check_in(arrival).unwrap(), arrival);
        assert_eq!(stay.check_out(arrival).unwrap(), NaiveDate::from_ymd_opt(2024, 5, 4).unwrap());
    }

    #[test]
    fn test_far_program_day_is_skipped_with_warning() {
        let hotels = vec![hotel("Lotte City Tashkent", 90.0)];
        let tourists = vec![tourist("A", "SNGL-1", "Uzbekistan")];
        let itinerary = vec![
            day(1, Some("Lotte City")),
            day(u32::MAX - 1, Some("Lotte City")),
            day(u32::MAX, Some("Lotte City")),
        ];

        let report = auto_fill(
            &booking("CO"),
            &itinerary,
            &hotels,
            &tourists,
            &[],
            &PricingConfig::default(),
            &FixedFxRates::default(),
        );
        assert_eq!(report.accommodations.len(), 1);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].starts_with("Lotte City"));
    }

    #[test]
    fn test_auto_fill_creates_priced_rooms() {
        let hotels = vec![hotel("Lotte City Tashkent", 90.0), hotel("Asia Bukhara", 60.0)];
        let tourists = vec![
            tourist("A", "DBL-1", "Uzbekistan"),
            tourist("B", "DBL-1", "Uzbekistan"),
            tourist("C", "SNGL-1", "Uzbekistan"),
        ];
        let itinerary = vec![
            day(1, Some("Lotte City")),
            day(2, Some("Lotte City")),
            day(3, Some("Asia Bukhara")),
        ];

        let report = auto_fill(
            &booking("ER"),
            &itinerary,
            &hotels,
            &tourists,
            &[],
            &PricingConfig::default(),
            &FixedFxRates::default(),
        );
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);
        assert_eq!(report.accommodations.len(), 2);

        let first = &report.accommodations[0];
        assert_eq!(first.hotel.name, "Lotte City Tashkent");
        assert_eq!(first.nights, 2);
        assert_eq!(first.rooms.len(), 2);
        assert_eq!(first.rooms[0].room_type_code, "DBL");
        assert_eq!(first.rooms[0].rooms_count, 1);
        assert_eq!(first.rooms[0].price_per_night, 90.0);
        assert_eq!(first.rooms[1].price_per_night, 72.0);
    }

    #[test]
    fn test_final_stay_only_for_uzbekistan_party() {
        let hotels = vec![hotel("Khiva Palace", 50.0), hotel("Lotte City", 90.0)];
        let tourists = vec![
            tourist("A", "DBL-1", "Uzbekistan"),
            tourist("B", "DBL-1", "Uzbekistan"),
            tourist("C", "DBL-1", "Turkmenistan"),
            tourist("D", "DBL-1", "Turkmenistan"),
        ];
        let itinerary = vec![day(1, Some("Khiva Palace")), day(2, Some("Lotte City"))];

        let report = auto_fill(
            &booking("ER"),
            &itinerary,
            &hotels,
            &tourists,
            &[],
            &PricingConfig::default(),
            &FixedFxRates::default(),
        );
        assert_eq!(report.accommodations[0].rooms[0].rooms_count, 2);
        assert_eq!(report.accommodations[1].rooms[0].rooms_count, 1);
    }

    #[test]
    fn test_missing_hotel_and_late_stay_are_skipped() {
        let hotels = vec![hotel("Lotte City", 90.0)];
        let tourists = vec![tourist("A", "DBL-1", "Uzbekistan")];
        let itinerary = vec![day(1, Some("Unknown Inn")), day(25, Some("Lotte City"))];

        let report = auto_fill(
            &booking("ER"),
            &itinerary,
            &hotels,
            &tourists,
            &[],
            &PricingConfig::default(),
            &FixedFxRates::default(),
        );
        assert!(report.accommodations.is_empty());
        assert_eq!(report.warnings.len(), 2);
    }

    #[test]
    fn test_missing_room_price_defaults_to_zero() {
        let hotels = vec![hotel("Lotte City", 90.0)];
        let tourists = vec![
            tourist("A", "TWN-1", "Uzbekistan"),
            tourist("B", "TWN-1", "Uzbekistan"),
        ];

        let report = auto_fill(
            &booking("CO"),
            &[day(1, Some("Lotte City"))],
            &hotels,
            &tourists,
            &[],
            &PricingConfig::default(),
            &FixedFxRates::default(),
        );
        let room = &report.accommodations[0].rooms[0];
        assert_eq!(room.room_type_code, "TWN");
        assert_eq!(room.price_per_night, 0.0);
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_existing_stays_are_not_duplicated() {
        let hotels = vec![hotel("Lotte City", 90.0)];
        let tourists = vec![tourist("A", "SNGL-1", "Uzbekistan")];
        let itinerary = vec![day(1, Some("Lotte City"))];
        let pricing = PricingConfig::default();
        let fx = FixedFxRates::default();

        let first = auto_fill(&booking("ER"), &itinerary, &hotels, &tourists, &[], &pricing, &fx);
        let second = auto_fill(
            &booking("ER"),
            &itinerary,
            &hotels,
            &tourists,
            &first.accommodations,
            &pricing,
            &fx,
        );
        assert!(second.accommodations.is_empty());
    }
}
