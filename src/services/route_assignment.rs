//! Provider, vehicle, rate and price for every leg of a transport itinerary.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::booking::{supports_turkmenistan_split, PaxSplit};
use crate::models::route::{Route, RouteTemplateLeg};
use crate::models::vehicle::{Provider, VehicleCatalogs};
use crate::services::date_math;
use crate::services::matching::normalize_name;
use crate::services::rate_type::RateTypeResolver;
use crate::services::route_sorter::sort_routes;
use crate::services::vehicle_picker::VehiclePicker;

/// Leg where a split group parts ways.
pub const FORK_ROUTE: &str = "Khiva - Urgench";
pub const SHOVOT_ROUTE: &str = "Khiva - Shovot";
pub const AIRPORT_PICKUP: &str = "Airport Pickup";
pub const AIRPORT_DROP_OFF: &str = "Airport Drop-off";
const TASHKENT: &str = "Tashkent";

const XAYRULLA_CITIES: &[&str] = &["tashkent", "toshkent"];
const NOSIR_CITIES: &[&str] = &[
    "fergana", "fargona", "farg ona", "margilan", "kokand", "qoqon", "qo qon", "andijan",
    "namangan", "rishtan",
];

const ER_TEMPLATE: &[(i64, &str, &str)] = &[
    (0, "Tashkent", "Airport Pickup"),
    (0, "Tashkent", "Tashkent City Tour"),
    (1, "Tashkent", "Tashkent - Chimgan - Tashkent"),
    (2, "Tashkent", "Train Station Drop-off"),
    (2, "Fergana", "Train Station Pickup"),
    (3, "Fergana", "Fergana - Margilan - Rishtan - Kokand"),
    (4, "Fergana", "Fergana - Tashkent"),
    (5, "Tashkent", "Train Station Drop-off"),
    (5, "Samarkand", "Train Station Pickup"),
    (6, "Samarkand", "Samarkand City Tour"),
    (8, "Samarkand", "Samarkand - Asraf"),
    (9, "Asraf", "Asraf - Bukhara"),
    (10, "Bukhara", "Bukhara City Tour"),
    (12, "Bukhara", "Bukhara - Khiva"),
    (13, "Khiva", "Khiva - Urgench"),
];

pub fn provider_for_city(city: &str) -> Provider {
    let city = normalize_name(city);
    if XAYRULLA_CITIES.iter().any(|name| city.contains(name)) {
        Provider::Xayrulla
    } else if NOSIR_CITIES.iter().any(|name| city.contains(name)) {
        Provider::Nosir
    } else {
        Provider::Sevil
    }
}

/// Built-in skeleton used when no template is stored for a tour type.
pub fn default_template(tour_type: &str) -> Vec<RouteTemplateLeg> {
    if !tour_type.trim().eq_ignore_ascii_case("ER") {
        return Vec::new();
    }
    ER_TEMPLATE
        .iter()
        .map(|(day_offset, city, route_name)| RouteTemplateLeg::new(*day_offset, city, route_name))
        .collect()
}

fn same_route(route: &Route, name: &str) -> bool {
    normalize_name(&route.route_name) == normalize_name(name)
}

fn is_tashkent(route: &Route) -> bool {
    provider_for_city(&route.city) == Provider::Xayrulla
}

fn fork_index(routes: &[Route]) -> Option<usize> {
    routes.iter().position(|route| same_route(route, FORK_ROUTE))
}

fn split_leg(day_offset: i64, city: &str, route_name: &str, provider: Option<Provider>) -> Route {
    let mut leg = Route::from_leg(&RouteTemplateLeg::new(day_offset, city, route_name));
    leg.choice_tab = provider;
    leg.split_leg = true;
    leg
}

/// Adds the legs a split group needs after the fork, or drops them once the
/// Turkmenistan party is gone. Existing split legs are left as they are.
pub fn apply_split(routes: &mut Vec<Route>, pax: PaxSplit) {
    if !pax.has_split() {
        routes.retain(|route| !route.split_leg);
        return;
    }
    if routes.iter().any(|route| route.split_leg) {
        return;
    }
    let Some(fork) = fork_index(routes) else {
        return;
    };

    let day = routes[fork].day_offset;
    let city = routes[fork].city.clone();
    let injected = [
        split_leg(day, &city, SHOVOT_ROUTE, Some(Provider::Sevil)),
        split_leg(day, TASHKENT, AIRPORT_PICKUP, None),
        split_leg(day + 1, TASHKENT, AIRPORT_DROP_OFF, None),
    ];
    log::debug!("Group splits at {}, adding {} legs", FORK_ROUTE, injected.len());
    routes.splice(fork + 1..fork + 1, injected);
}

/// Passenger count per leg. Before the fork everyone travels together; from
/// the fork on the Shovot leg carries the Turkmenistan party and the
/// Urgench and Tashkent legs carry the Uzbekistan party.
pub fn leg_passengers(routes: &[Route], pax: PaxSplit) -> Vec<u32> {
    let fork = if pax.has_split() { fork_index(routes) } else { None };

    routes
        .iter()
        .enumerate()
        .map(|(index, route)| match fork {
            Some(fork) if index >= fork => {
                if normalize_name(&route.route_name).contains("shovot") {
                    pax.turkmenistan
                } else if index == fork || is_tashkent(route) {
                    pax.uzbekistan
                } else {
                    pax.total()
                }
            }
            _ => pax.total(),
        })
        .collect()
}

/// Derives every automatic field of one leg.
pub fn assign_leg(
    route: &Route,
    passengers: u32,
    catalogs: &VehicleCatalogs,
    departure: NaiveDate,
) -> (Route, Vec<String>) {
    let mut warnings = Vec::new();
    let provider = route
        .choice_tab
        .unwrap_or_else(|| provider_for_city(&route.city));
    let catalog = catalogs.for_provider(provider);
    let vehicle = VehiclePicker::pick(provider, catalog, passengers, &route.route_name);
    let rate = RateTypeResolver::resolve_sticky(
        provider,
        &route.route_name,
        route.choice_rate,
        route.manual_rate,
    );

    let date = match date_math::leg_date(departure, route.day_offset) {
        Ok(date) => Some(date),
        Err(e) => {
            log::warn!("{}: {}", route.route_name, e);
            warnings.push(format!("{}: {}", route.route_name, e));
            None
        }
    };
    let label = date_math::format_offset(date_math::arrival_date(departure), route.day_offset);
    let price = vehicle.and_then(|vehicle| vehicle.rate(rate));
    match vehicle {
        None if passengers > 0 => warnings.push(format!(
            "{} ({}): no {} vehicle for {} passengers",
            route.route_name, label, provider, passengers
        )),
        Some(vehicle) if price.is_none() => warnings.push(format!(
            "{} ({}): {} has no {} rate",
            route.route_name,
            label,
            vehicle.name,
            rate.rate_field()
        )),
        _ => {}
    }

    let assigned = Route {
        date,
        person: passengers.to_string(),
        choice_tab: Some(provider),
        transport_type: vehicle.map(|vehicle| vehicle.name.clone()),
        choice_rate: Some(rate),
        price,
        ..route.clone()
    };
    (assigned, warnings)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRecompute {
    pub routes: Vec<Route>,
    /// False when the derived list equals the one passed in
    pub changed: bool,
    pub warnings: Vec<String>,
}

fn assign_all(
    mut routes: Vec<Route>,
    pax: PaxSplit,
    catalogs: &VehicleCatalogs,
    departure: NaiveDate,
) -> (Vec<Route>, Vec<String>) {
    apply_split(&mut routes, pax);
    let passengers = leg_passengers(&routes, pax);

    let mut warnings = Vec::new();
    let mut assigned = Vec::with_capacity(routes.len());
    for (route, count) in routes.iter().zip(passengers) {
        let (route, leg_warnings) = assign_leg(route, count, catalogs, departure);
        warnings.extend(leg_warnings);
        assigned.push(route);
    }
    (sort_routes(assigned), warnings)
}

/// Fresh leg list from a template skeleton.
pub fn build_routes(
    template: &[RouteTemplateLeg],
    pax: PaxSplit,
    catalogs: &VehicleCatalogs,
    departure: NaiveDate,
) -> (Vec<Route>, Vec<String>) {
    let routes = template.iter().map(Route::from_leg).collect();
    assign_all(routes, pax, catalogs, departure)
}

/// Re-derives an existing leg list. Running it twice on the same inputs
/// yields `changed == false` the second time.
pub fn recompute_routes(
    existing: &[Route],
    pax: PaxSplit,
    catalogs: &VehicleCatalogs,
    departure: NaiveDate,
) -> RouteRecompute {
    let (routes, warnings) = assign_all(existing.to_vec(), pax, catalogs, departure);
    let changed = routes.as_slice() != existing;
    if changed {
        log::debug!("Route recompute updated {} legs", routes.len());
    }
    RouteRecompute {
        routes,
        changed,
        warnings,
    }
}

/// Split counts only apply to tour types that fork.
pub fn effective_pax(tour_type: &str, pax: PaxSplit) -> PaxSplit {
    if supports_turkmenistan_split(tour_type) {
        pax
    } else {
        PaxSplit {
            uzbekistan: pax.total(),
            turkmenistan: 0,
        }
    }
}
