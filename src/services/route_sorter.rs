use chrono::NaiveDate;
use serde::Serialize;

use crate::models::booking::PaxSplit;
use crate::models::route::Route;
use crate::models::vehicle::VehicleCatalogs;
use crate::services::date_math;
use crate::services::rate_type::RateTypeResolver;
use crate::services::route_assignment::{apply_split, leg_passengers, provider_for_city};
use crate::services::vehicle_catalog::lookup_price;
use crate::services::vehicle_picker::VehiclePicker;

/// Chronological order by leg date, then day offset. Stable, so legs sharing a
/// day keep their relative order and sorting a sorted list changes nothing.
pub fn sort_routes(mut routes: Vec<Route>) -> Vec<Route> {
    routes.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.day_offset.cmp(&b.day_offset))
    });
    routes
}

pub fn is_sorted(routes: &[Route]) -> bool {
    routes
        .windows(2)
        .all(|pair| (pair[0].date, pair[0].day_offset) <= (pair[1].date, pair[1].day_offset))
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairOutcome {
    pub routes: Vec<Route>,
    /// Legs that were incomplete and are now priced
    pub fixed: usize,
    /// Legs still missing a vehicle or price
    pub unresolved: usize,
    pub warnings: Vec<String>,
}

/// Fills in provider, vehicle, rate and price on every leg missing a vehicle
/// or price. Complete legs are untouched, and a vehicle already on a leg is
/// kept and only re-priced. Split-group legs are added or dropped first.
pub fn auto_fix(
    mut routes: Vec<Route>,
    pax: PaxSplit,
    catalogs: &VehicleCatalogs,
    departure: NaiveDate,
) -> RepairOutcome {
    apply_split(&mut routes, pax);
    let passengers = leg_passengers(&routes, pax);
    let mut fixed = 0;
    let mut unresolved = 0;
    let mut warnings = Vec::new();

    let mut repaired = Vec::with_capacity(routes.len());
    for (mut route, count) in routes.into_iter().zip(passengers) {
        if !route.is_incomplete() {
            repaired.push(route);
            continue;
        }

        let provider = route
            .choice_tab
            .unwrap_or_else(|| provider_for_city(&route.city));
        let catalog = catalogs.for_provider(provider);
        route.choice_tab = Some(provider);
        route.person = count.to_string();
        route.date = date_math::leg_date(departure, route.day_offset).ok();

        let has_vehicle = route
            .transport_type
            .as_deref()
            .is_some_and(|name| !name.trim().is_empty());
        if !has_vehicle {
            route.transport_type = VehiclePicker::pick(provider, catalog, count, &route.route_name)
                .map(|vehicle| vehicle.name.clone());
        }

        let rate = RateTypeResolver::resolve_sticky(
            provider,
            &route.route_name,
            route.choice_rate,
            route.manual_rate,
        );
        route.choice_rate = Some(rate);
        route.price = route
            .transport_type
            .as_deref()
            .and_then(|name| lookup_price(catalog, name, rate));

        if route.is_incomplete() {
            unresolved += 1;
            log::warn!("Could not repair {} on day {}", route.route_name, route.day_offset);
            warnings.push(format!(
                "{} ({}): no vehicle or price for {} passengers",
                route.route_name,
                date_math::format_offset(date_math::arrival_date(departure), route.day_offset),
                count
            ));
        } else {
            fixed += 1;
        }
        repaired.push(route);
    }

    RepairOutcome {
        routes: sort_routes(repaired),
        fixed,
        unresolved,
        warnings,
    }
}
