//! Which tariff a leg is billed at, from its provider and route name.
//!
//! This is the only place the keyword tables live; manual edits, template
//! loads, recomputes and the repair pass all go through [`RateTypeResolver`].

use crate::models::vehicle::{Provider, RateType};

const TRANSFER_KEYWORDS: &[&str] = &[
    "pickup",
    "pick-up",
    "pick up",
    "drop-off",
    "dropoff",
    "drop off",
    "train station",
    "airport",
    "vokzal",
];
const MOUNTAIN_KEYWORDS: &[&str] = &["chimgan", "charvak"];
const CITY_TOUR_KEYWORDS: &[&str] = &["city tour", "citytour"];

fn mentions(route_name: &str, keywords: &[&str]) -> bool {
    let name = route_name.to_lowercase();
    keywords.iter().any(|keyword| name.contains(keyword))
}

/// Chimgan/Charvak day trips always run with a Sprinter.
pub fn is_mountain_excursion(route_name: &str) -> bool {
    mentions(route_name, MOUNTAIN_KEYWORDS)
}

pub fn is_transfer(route_name: &str) -> bool {
    mentions(route_name, TRANSFER_KEYWORDS)
}

pub struct RateTypeResolver;

impl RateTypeResolver {
    pub fn resolve(provider: Provider, route_name: &str) -> RateType {
        match provider {
            Provider::Xayrulla => Self::xayrulla(route_name),
            Provider::Sevil => Self::sevil(route_name),
            Provider::Nosir => Self::nosir(route_name),
        }
    }

    /// A hand-picked rate survives every automatic pass; anything else is
    /// recomputed from the route name.
    pub fn resolve_sticky(
        provider: Provider,
        route_name: &str,
        current: Option<RateType>,
        manual: bool,
    ) -> RateType {
        match current {
            Some(rate) if manual => rate,
            _ => Self::resolve(provider, route_name),
        }
    }

    fn xayrulla(route_name: &str) -> RateType {
        if is_transfer(route_name) {
            RateType::Vstrecha
        } else if is_mountain_excursion(route_name) {
            RateType::Chimgan
        } else if mentions(route_name, CITY_TOUR_KEYWORDS) {
            RateType::CityTour
        } else {
            RateType::Tag
        }
    }

    fn sevil(route_name: &str) -> RateType {
        if is_transfer(route_name) {
            RateType::Vstrecha
        } else if mentions(route_name, &["shovot"]) {
            RateType::Shovot
        } else if mentions(route_name, &["urgench"]) {
            RateType::Urgench
        } else {
            RateType::Tag
        }
    }

    fn nosir(route_name: &str) -> RateType {
        if is_transfer(route_name) {
            RateType::Vstrecha
        } else if mentions(route_name, &["margilan", "marg'ilon"]) {
            RateType::Margilan
        } else if mentions(route_name, &["kokand", "qoqon", "qo'qon"]) {
            RateType::Qoqon
        } else if mentions(route_name, &["dostlik", "do'stlik"]) {
            RateType::Dostlik
        } else {
            RateType::Tag
        }
    }
}
