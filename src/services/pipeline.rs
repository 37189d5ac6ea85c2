//! Explicit recompute entry points. Call them after any change to tourists,
//! stays, dates or vehicle catalogs; nothing recomputes on its own.

use std::collections::HashMap;

use chrono::NaiveDate;
use mongodb::bson::oid::ObjectId;

use crate::models::accommodation::Accommodation;
use crate::models::booking::{supports_turkmenistan_split, PaxSplit};
use crate::models::route::{Route, RouteTemplateLeg};
use crate::models::tourist::Tourist;
use crate::models::vehicle::VehicleCatalogs;
use crate::services::accommodation_cost::{summarize_costs, CostSummary};
use crate::services::fx::FxRateProvider;
use crate::services::matching;
use crate::services::room_allocation::{allocate_rooms, RoomCounts};
use crate::services::route_assignment::{self, RouteRecompute};

pub fn recompute_rooms(tourists: &[Tourist]) -> RoomCounts {
    allocate_rooms(tourists)
}

pub fn recompute_pax(tour_type: &str, tourists: &[Tourist]) -> PaxSplit {
    matching::derive_pax(tourists, supports_turkmenistan_split(tour_type))
}

pub fn recompute_costs(
    accommodations: &[Accommodation],
    tourists: &[Tourist],
    rooming_lists: &HashMap<ObjectId, Vec<Tourist>>,
    fx: &dyn FxRateProvider,
) -> CostSummary {
    summarize_costs(accommodations, tourists, rooming_lists, fx)
}

/// Routes for a booking. Stored legs are re-derived in place; a booking
/// without legs starts from `template`.
pub fn recompute_routes(
    template: &[RouteTemplateLeg],
    existing: &[Route],
    tour_type: &str,
    tourists: &[Tourist],
    catalogs: &VehicleCatalogs,
    departure: NaiveDate,
) -> RouteRecompute {
    let pax = recompute_pax(tour_type, tourists);
    log::debug!("Recomputing routes for {} passengers", pax.total());

    if existing.is_empty() {
        let (routes, warnings) = route_assignment::build_routes(template, pax, catalogs, departure);
        return RouteRecompute {
            changed: !routes.is_empty(),
            routes,
            warnings,
        };
    }
    route_assignment::recompute_routes(existing, pax, catalogs, departure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::route_assignment::default_template;
    use crate::services::vehicle_catalog::default_catalogs;

    fn tourist(room: &str, group: &str) -> Tourist {
        Tourist {
            room_number: Some(room.into()),
            accommodation: Some(group.into()),
            ..Tourist::new("Guest")
        }
    }

    #[test]
    fn test_pax_split_only_for_split_tours() {
        let tourists = vec![
            tourist("DBL-1", "Uzbekistan"),
            tourist("DBL-1", "Uzbekistan"),
            tourist("SNGL-1", "Turkmenistan"),
        ];
        assert_eq!(
            recompute_pax("ER", &tourists),
            PaxSplit {
                uzbekistan: 2,
                turkmenistan: 1
            }
        );
        assert_eq!(recompute_pax("CO", &tourists).turkmenistan, 0);
        assert_eq!(recompute_pax("CO", &tourists).total(), 3);
    }

    #[test]
    fn test_rooms_follow_tourists() {
        let tourists = vec![tourist("DBL-1", "Uzbekistan"), tourist("DBL-1", "Uzbekistan")];
        assert_eq!(recompute_rooms(&tourists).dbl, 1);
        assert_eq!(recompute_rooms(&[]).total, 0);
    }

    #[test]
    fn test_routes_start_from_template_then_stay_stable() {
        let tourists: Vec<Tourist> = (0..6).map(|_| tourist("DBL-1", "Uzbekistan")).collect();
        let departure = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let catalogs = default_catalogs();
        let template = default_template("ER");

        let first = recompute_routes(&template, &[], "ER", &tourists, &catalogs, departure);
        assert!(first.changed);
        assert_eq!(first.routes.len(), 15);
        assert!(first.routes.iter().all(|route| route.person == "6"));

        let second =
            recompute_routes(&template, &first.routes, "ER", &tourists, &catalogs, departure);
        assert!(!second.changed);
    }
}
