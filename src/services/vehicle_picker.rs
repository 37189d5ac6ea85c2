use crate::models::vehicle::{Provider, Vehicle};
use crate::services::rate_type::is_mountain_excursion;
use crate::services::vehicle_catalog::find_vehicle;

const MOUNTAIN_VEHICLE: &str = "Sprinter";

fn named(vehicle: &Vehicle, fragment: &str) -> bool {
    vehicle.name.to_lowercase().contains(fragment)
}

pub struct VehiclePicker;

impl VehiclePicker {
    /// Best-fit vehicle for `pax` passengers on a leg.
    ///
    /// Mountain excursions always get the Sprinter. Otherwise the smallest
    /// vehicle whose capacity range holds `pax` wins, except that Sevil and
    /// Xayrulla send a Yutong whenever a Yutong and a Sprinter both fit. With no
    /// range match the smallest vehicle with enough seats is used.
    pub fn pick<'a>(
        provider: Provider,
        catalog: &'a [Vehicle],
        pax: u32,
        route_name: &str,
    ) -> Option<&'a Vehicle> {
        if is_mountain_excursion(route_name) {
            if let Some(sprinter) = find_vehicle(catalog, MOUNTAIN_VEHICLE) {
                return Some(sprinter);
            }
            log::warn!("{} has no {} for {}", provider, MOUNTAIN_VEHICLE, route_name);
        }

        if pax == 0 {
            return None;
        }

        let mut fitting: Vec<&Vehicle> = catalog
            .iter()
            .filter(|vehicle| vehicle.capacity().is_some_and(|range| range.contains(pax)))
            .collect();
        fitting.sort_by_key(|vehicle| vehicle.seats);

        if provider.prefers_yutong() {
            let yutong = fitting.iter().find(|vehicle| named(vehicle, "yutong"));
            let sprinter_fits = fitting.iter().any(|vehicle| named(vehicle, "sprinter"));
            if let (Some(yutong), true) = (yutong, sprinter_fits) {
                return Some(*yutong);
            }
        }

        if let Some(best) = fitting.first() {
            return Some(*best);
        }

        let fallback = catalog
            .iter()
            .filter(|vehicle| vehicle.seats >= pax)
            .min_by_key(|vehicle| vehicle.seats);
        if fallback.is_none() {
            log::warn!("No {} vehicle seats {} passengers", provider, pax);
        }
        fallback
    }
}
