//! Per-booking orchestration: fetch through the repositories, run the
//! engines, and write back only on explicit requests.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::try_join_all;
use mongodb::bson::oid::ObjectId;
use serde::Serialize;

use crate::error::{Result, TourOpsError};
use crate::models::accommodation::Accommodation;
use crate::models::booking::{Booking, PaxSplit};
use crate::models::route::{Route, RouteTemplateLeg};
use crate::models::tourist::Tourist;
use crate::models::vehicle::VehicleCatalogs;
use crate::repositories::Repositories;
use crate::services::accommodation_autofill::{self, AutoFillReport};
use crate::services::accommodation_cost::CostSummary;
use crate::services::fx::FxRateProvider;
use crate::services::pipeline;
use crate::services::pricing_service::PricingConfig;
use crate::services::room_allocation::RoomCounts;
use crate::services::route_assignment::{default_template, effective_pax, RouteRecompute};
use crate::services::route_sorter::{self, RepairOutcome};
use crate::services::vehicle_catalog::{default_catalogs, resolve_catalogs};
use crate::services::date_math;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSummary {
    pub booking: Booking,
    pub pax: PaxSplit,
    pub rooms: RoomCounts,
    pub costs: CostSummary,
    pub routes: RouteRecompute,
    pub warnings: Vec<String>,
}

struct BookingContext {
    booking: Booking,
    tourists: Vec<Tourist>,
    pax: PaxSplit,
}

#[derive(Clone)]
pub struct BookingService {
    repos: Repositories,
    fx: Arc<dyn FxRateProvider>,
    pricing: PricingConfig,
    fallback_catalogs: VehicleCatalogs,
}

impl BookingService {
    pub fn new(repos: Repositories, fx: Arc<dyn FxRateProvider>, pricing: PricingConfig) -> Self {
        Self {
            repos,
            fx,
            pricing,
            fallback_catalogs: default_catalogs(),
        }
    }

    /// Stored catalogs, falling back to the built-in tables per provider.
    pub async fn catalogs(&self) -> VehicleCatalogs {
        resolve_catalogs(self.repos.vehicles.get_all().await, &self.fallback_catalogs)
    }

    /// Booking plus tourists, with the stored head counts refreshed from the
    /// tourist list when they drifted.
    async fn context(&self, booking_id: ObjectId) -> Result<BookingContext> {
        let (mut booking, tourists) = futures::try_join!(
            self.repos.bookings.get(booking_id),
            self.repos.tourists.list_by_booking(booking_id),
        )?;

        let pax = pipeline::recompute_pax(&booking.tour_type, &tourists);
        if pax != booking.pax_split() || booking.pax != pax.total() {
            log::info!(
                "Booking {} pax {} -> {}",
                booking.booking_number,
                booking.pax,
                pax.total()
            );
            self.repos.bookings.update_pax(booking_id, pax).await?;
            booking.apply_pax(pax);
        }

        Ok(BookingContext {
            booking,
            tourists,
            pax,
        })
    }

    pub async fn template_for(&self, tour_type: &str) -> Result<Vec<RouteTemplateLeg>> {
        match self.repos.routes.get_template(tour_type).await? {
            Some(legs) => Ok(legs),
            None => {
                log::debug!("No stored template for {}, using default", tour_type);
                Ok(default_template(tour_type))
            }
        }
    }

    pub async fn save_template(
        &self,
        tour_type: &str,
        routes: &[Route],
    ) -> Result<Vec<RouteTemplateLeg>> {
        if tour_type.trim().is_empty() {
            return Err(TourOpsError::Validation("Tour type is required".to_string()));
        }
        validate_routes(routes)?;
        let legs: Vec<RouteTemplateLeg> = route_sorter::sort_routes(routes.to_vec())
            .iter()
            .map(Route::to_template_leg)
            .collect();
        self.repos.routes.save_template(tour_type, legs.clone()).await?;
        log::info!("Saved {}-leg template for {}", legs.len(), tour_type);
        Ok(legs)
    }

    pub async fn rooms(&self, booking_id: ObjectId) -> Result<RoomCounts> {
        let context = self.context(booking_id).await?;
        Ok(pipeline::recompute_rooms(&context.tourists))
    }

    async fn costs_for(&self, booking_id: ObjectId, tourists: &[Tourist]) -> Result<CostSummary> {
        let accommodations = self.repos.accommodations.list(booking_id).await?;
        let ids: Vec<ObjectId> = accommodations.iter().filter_map(|acc| acc.id).collect();

        let lists = try_join_all(
            ids.iter()
                .map(|id| self.repos.tourists.list_by_accommodation(booking_id, *id)),
        )
        .await?;
        let rooming_lists: HashMap<ObjectId, Vec<Tourist>> = ids
            .into_iter()
            .zip(lists)
            .filter_map(|(id, list)| list.map(|list| (id, list)))
            .collect();

        Ok(pipeline::recompute_costs(
            &accommodations,
            tourists,
            &rooming_lists,
            self.fx.as_ref(),
        ))
    }

    pub async fn costs(&self, booking_id: ObjectId) -> Result<CostSummary> {
        let context = self.context(booking_id).await?;
        self.costs_for(booking_id, &context.tourists).await
    }

    async fn routes_for(
        &self,
        booking_id: ObjectId,
        context: &BookingContext,
    ) -> Result<RouteRecompute> {
        let (existing, template, catalogs) = futures::join!(
            self.repos.routes.list_by_booking(booking_id),
            self.template_for(&context.booking.tour_type),
            self.catalogs(),
        );
        Ok(pipeline::recompute_routes(
            &template?,
            &existing?,
            &context.booking.tour_type,
            &context.tourists,
            &catalogs,
            context.booking.departure_date,
        ))
    }

    /// Derived routes; nothing is written.
    pub async fn routes(&self, booking_id: ObjectId) -> Result<RouteRecompute> {
        let context = self.context(booking_id).await?;
        self.routes_for(booking_id, &context).await
    }

    /// Explicit save: legs are dated, sorted and replace the stored list.
    pub async fn save_routes(
        &self,
        booking_id: ObjectId,
        routes: Vec<Route>,
    ) -> Result<Vec<Route>> {
        validate_routes(&routes)?;
        let booking = self.repos.bookings.get(booking_id).await?;
        let dated = routes
            .into_iter()
            .map(|mut route| {
                route.date = Some(date_math::leg_date(booking.departure_date, route.day_offset)?);
                Ok(route)
            })
            .collect::<Result<Vec<Route>>>()?;
        self.repos
            .routes
            .bulk_replace(booking_id, route_sorter::sort_routes(dated))
            .await
    }

    /// Repairs incomplete legs and saves the result when anything was fixed.
    pub async fn auto_fix_routes(&self, booking_id: ObjectId) -> Result<RepairOutcome> {
        let context = self.context(booking_id).await?;
        let mut existing = self.repos.routes.list_by_booking(booking_id).await?;
        if existing.is_empty() {
            existing = self
                .template_for(&context.booking.tour_type)
                .await?
                .iter()
                .map(Route::from_leg)
                .collect();
        }

        let catalogs = self.catalogs().await;
        let pax = effective_pax(&context.booking.tour_type, context.pax);
        let mut outcome =
            route_sorter::auto_fix(existing, pax, &catalogs, context.booking.departure_date);
        if outcome.fixed > 0 {
            outcome.routes = self
                .repos
                .routes
                .bulk_replace(booking_id, outcome.routes)
                .await?;
        }
        Ok(outcome)
    }

    pub async fn create_accommodation(
        &self,
        booking_id: ObjectId,
        accommodation: Accommodation,
    ) -> Result<Accommodation> {
        let accommodation = accommodation.validated()?;
        self.repos.bookings.get(booking_id).await?;
        self.repos.accommodations.create(booking_id, accommodation).await
    }

    pub async fn update_accommodation(
        &self,
        booking_id: ObjectId,
        accommodation_id: ObjectId,
        accommodation: Accommodation,
    ) -> Result<Accommodation> {
        let accommodation = accommodation.validated()?;
        self.repos
            .accommodations
            .update(booking_id, accommodation_id, accommodation)
            .await
    }

    pub async fn delete_accommodation(
        &self,
        booking_id: ObjectId,
        accommodation_id: ObjectId,
    ) -> Result<()> {
        self.repos.accommodations.delete(booking_id, accommodation_id).await
    }

    /// Creates the stays planned from the tour program and stores them.
    pub async fn auto_fill(&self, booking_id: ObjectId) -> Result<AutoFillReport> {
        let context = self.context(booking_id).await?;
        let (itinerary, hotels, existing) = futures::try_join!(
            self.repos.itineraries.get(&context.booking.tour_type),
            self.repos.hotels.list_all(),
            self.repos.accommodations.list(booking_id),
        )?;
        let itinerary = itinerary.ok_or_else(|| {
            TourOpsError::NotFound(format!("itinerary for tour type {}", context.booking.tour_type))
        })?;

        let planned = accommodation_autofill::auto_fill(
            &context.booking,
            &itinerary,
            &hotels,
            &context.tourists,
            &existing,
            &self.pricing,
            self.fx.as_ref(),
        );

        let mut stored = Vec::with_capacity(planned.accommodations.len());
        for accommodation in planned.accommodations {
            stored.push(self.repos.accommodations.create(booking_id, accommodation).await?);
        }
        Ok(AutoFillReport {
            accommodations: stored,
            warnings: planned.warnings,
        })
    }

    pub async fn summary(&self, booking_id: ObjectId) -> Result<BookingSummary> {
        let context = self.context(booking_id).await?;
        let (costs, routes) = futures::try_join!(
            self.costs_for(booking_id, &context.tourists),
            self.routes_for(booking_id, &context),
        )?;

        let mut warnings = costs.warnings.clone();
        warnings.extend(routes.warnings.iter().cloned());
        Ok(BookingSummary {
            rooms: pipeline::recompute_rooms(&context.tourists),
            pax: context.pax,
            booking: context.booking,
            costs,
            routes,
            warnings,
        })
    }
}

fn validate_routes(routes: &[Route]) -> Result<()> {
    for route in routes {
        if route.route_name.trim().is_empty() {
            return Err(TourOpsError::Validation("Route name is required".to_string()));
        }
        if !(0..=date_math::MAX_DAY_OFFSET).contains(&route.day_offset) {
            return Err(TourOpsError::Validation(format!(
                "{}: day offset must be between 0 and {}",
                route.route_name,
                date_math::MAX_DAY_OFFSET
            )));
        }
    }
    Ok(())
}
