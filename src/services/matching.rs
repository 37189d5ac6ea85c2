//! Free-text association between tourists, hotels and sub-groups.
//!
//! Rooming lists arrive without foreign keys, so tourists are tied to hotels
//! and groups by normalised names. Everything here is kept in one place so it
//! can be swapped for real references later.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::accommodation::Hotel;
use crate::models::booking::PaxSplit;
use crate::models::tourist::Tourist;
use crate::services::date_math;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouristGroup {
    Uzbekistan,
    Turkmenistan,
}

fn non_alphanumeric() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^\p{L}\p{N}]+").unwrap())
}

/// Lowercase, punctuation collapsed to single spaces.
pub fn normalize_name(raw: &str) -> String {
    non_alphanumeric()
        .replace_all(&raw.to_lowercase(), " ")
        .trim()
        .to_string()
}

/// "Turkmenistan" anywhere in the label wins; everything else travels with the
/// main Uzbekistan party.
pub fn classify_group(label: Option<&str>) -> TouristGroup {
    match label {
        Some(label) if normalize_name(label).contains("turkmen") => TouristGroup::Turkmenistan,
        _ => TouristGroup::Uzbekistan,
    }
}

pub fn split_by_group(tourists: &[Tourist]) -> (Vec<&Tourist>, Vec<&Tourist>) {
    tourists
        .iter()
        .partition(|tourist| tourist.group() == TouristGroup::Uzbekistan)
}

/// Uzbekistan/Turkmenistan head counts. Without split support everyone counts
/// as Uzbekistan.
pub fn derive_pax(tourists: &[Tourist], split_supported: bool) -> PaxSplit {
    if !split_supported {
        return PaxSplit {
            uzbekistan: tourists.len() as u32,
            turkmenistan: 0,
        };
    }

    let (uzbekistan, turkmenistan) = split_by_group(tourists);
    PaxSplit {
        uzbekistan: uzbekistan.len() as u32,
        turkmenistan: turkmenistan.len() as u32,
    }
}

/// Substring match in either direction on normalised names.
pub fn hotel_names_match(a: &str, b: &str) -> bool {
    let (a, b) = (normalize_name(a), normalize_name(b));
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.contains(&b) || b.contains(&a)
}

/// A tourist belongs to a stay when the hotel name (if any) matches and their
/// own dates (if any) overlap the stay.
pub fn tourist_matches_stay(
    tourist: &Tourist,
    hotel_name: &str,
    check_in: NaiveDate,
    check_out: NaiveDate,
) -> bool {
    let name_ok = match tourist.hotel_name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => hotel_names_match(name, hotel_name),
        _ => true,
    };

    let dates_ok = match (tourist.check_in_date, tourist.check_out_date) {
        (Some(t_in), Some(t_out)) => date_math::overlaps(t_in, t_out, check_in, check_out),
        _ => true,
    };

    name_ok && dates_ok
}

/// Exact normalised match first, then the closest substring match.
pub fn find_hotel<'a>(hotels: &'a [Hotel], name: &str) -> Option<&'a Hotel> {
    let wanted = normalize_name(name);
    hotels
        .iter()
        .find(|hotel| normalize_name(&hotel.name) == wanted)
        .or_else(|| {
            hotels
                .iter()
                .filter(|hotel| hotel_names_match(&hotel.name, name))
                .min_by_key(|hotel| normalize_name(&hotel.name).len().abs_diff(wanted.len()))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tourist(group: &str) -> Tourist {
        Tourist {
            accommodation: Some(group.into()),
            ..Tourist::new("Guest")
        }
    }

    fn hotel(name: &str) -> Hotel {
        Hotel {
            id: None,
            name: name.into(),
            city: String::new(),
            total_rooms: 0,
            room_types: vec![],
        }
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  Hotel  \"Asia\" - Bukhara "), "hotel asia bukhara");
    }

    #[test]
    fn test_turkmenistan_takes_precedence() {
        assert_eq!(classify_group(Some("Uzbekistan + Turkmenistan")), TouristGroup::Turkmenistan);
        assert_eq!(classify_group(Some("TM / turkmen ext.")), TouristGroup::Turkmenistan);
        assert_eq!(classify_group(Some("Uzbekistan")), TouristGroup::Uzbekistan);
        assert_eq!(classify_group(None), TouristGroup::Uzbekistan);
    }

    #[test]
    fn test_derive_pax() {
        let tourists = vec![tourist("Uzbekistan"), tourist("Turkmenistan"), tourist("Uzbekistan")];
        assert_eq!(
            derive_pax(&tourists, true),
            PaxSplit {
                uzbekistan: 2,
                turkmenistan: 1
            }
        );
        assert_eq!(
            derive_pax(&tourists, false),
            PaxSplit {
                uzbekistan: 3,
                turkmenistan: 0
            }
        );
    }

    #[test]
    fn test_hotel_names_match_either_direction() {
        assert!(hotel_names_match("Asia Bukhara", "Hotel Asia Bukhara"));
        assert!(hotel_names_match("HOTEL ASIA BUKHARA", "asia bukhara"));
        assert!(!hotel_names_match("Asia Khiva", "Asia Bukhara"));
        assert!(!hotel_names_match("", "Asia Bukhara"));
    }

    #[test]
    fn test_tourist_matches_stay() {
        let check_in = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();
        let check_out = NaiveDate::from_ymd_opt(2024, 5, 8).unwrap();

        let unnamed = Tourist::new("A");
        assert!(tourist_matches_stay(&unnamed, "Asia Bukhara", check_in, check_out));

        let elsewhere = Tourist {
            hotel_name: Some("Malika Khiva".into()),
            ..Tourist::new("B")
        };
        assert!(!tourist_matches_stay(&elsewhere, "Asia Bukhara", check_in, check_out));

        let left_early = Tourist {
            hotel_name: Some("Asia Bukhara".into()),
            check_in_date: NaiveDate::from_ymd_opt(2024, 5, 2),
            check_out_date: NaiveDate::from_ymd_opt(2024, 5, 6),
            ..Tourist::new("C")
        };
        assert!(!tourist_matches_stay(&left_early, "Asia Bukhara", check_in, check_out));
    }

    #[test]
    fn test_find_hotel_prefers_exact() {
        let hotels = vec![hotel("Asia Bukhara Deluxe"), hotel("Asia Bukhara")];
        assert_eq!(find_hotel(&hotels, "asia bukhara").unwrap().name, "Asia Bukhara");
        assert_eq!(find_hotel(&hotels, "Bukhara Deluxe").unwrap().name, "Asia Bukhara Deluxe");
        assert!(find_hotel(&hotels, "Malika").is_none());
    }
}
