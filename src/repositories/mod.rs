//! Storage seams the booking service works through.
//!
//! Everything is keyed by booking id. Implementations: [`memory::InMemoryStore`]
//! for tests and local runs, `db::mongo::MongoStore` for the deployed service.

use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::error::Result;
use crate::models::accommodation::{Accommodation, Hotel};
use crate::models::booking::{Booking, PaxSplit};
use crate::models::itinerary::ItineraryDay;
use crate::models::route::{Route, RouteTemplateLeg};
use crate::models::tourist::Tourist;
use crate::models::vehicle::VehicleCatalogs;

pub mod memory;

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Fails with `NotFound` for unknown ids.
    async fn get(&self, booking_id: ObjectId) -> Result<Booking>;
    async fn update_pax(&self, booking_id: ObjectId, pax: PaxSplit) -> Result<()>;
}

#[async_trait]
pub trait TouristRepository: Send + Sync {
    async fn list_by_booking(&self, booking_id: ObjectId) -> Result<Vec<Tourist>>;
    /// The stay's own rooming list, `None` when none was uploaded.
    async fn list_by_accommodation(
        &self,
        booking_id: ObjectId,
        accommodation_id: ObjectId,
    ) -> Result<Option<Vec<Tourist>>>;
}

#[async_trait]
pub trait AccommodationRepository: Send + Sync {
    async fn list(&self, booking_id: ObjectId) -> Result<Vec<Accommodation>>;
    async fn create(
        &self,
        booking_id: ObjectId,
        accommodation: Accommodation,
    ) -> Result<Accommodation>;
    async fn update(
        &self,
        booking_id: ObjectId,
        accommodation_id: ObjectId,
        accommodation: Accommodation,
    ) -> Result<Accommodation>;
    async fn delete(&self, booking_id: ObjectId, accommodation_id: ObjectId) -> Result<()>;
}

#[async_trait]
pub trait RouteRepository: Send + Sync {
    async fn list_by_booking(&self, booking_id: ObjectId) -> Result<Vec<Route>>;
    /// Replaces every leg of the booking with `routes`, in order.
    async fn bulk_replace(&self, booking_id: ObjectId, routes: Vec<Route>) -> Result<Vec<Route>>;
    async fn get_template(&self, tour_type: &str) -> Result<Option<Vec<RouteTemplateLeg>>>;
    async fn save_template(&self, tour_type: &str, legs: Vec<RouteTemplateLeg>) -> Result<()>;
}

#[async_trait]
pub trait VehicleCatalogRepository: Send + Sync {
    async fn get_all(&self) -> Result<VehicleCatalogs>;
}

#[async_trait]
pub trait HotelRepository: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Hotel>>;
}

#[async_trait]
pub trait ItineraryRepository: Send + Sync {
    async fn get(&self, tour_type: &str) -> Result<Option<Vec<ItineraryDay>>>;
}

/// Every repository the service needs, behind shared trait objects.
#[derive(Clone)]
pub struct Repositories {
    pub bookings: Arc<dyn BookingRepository>,
    pub tourists: Arc<dyn TouristRepository>,
    pub accommodations: Arc<dyn AccommodationRepository>,
    pub routes: Arc<dyn RouteRepository>,
    pub vehicles: Arc<dyn VehicleCatalogRepository>,
    pub hotels: Arc<dyn HotelRepository>,
    pub itineraries: Arc<dyn ItineraryRepository>,
}

impl Repositories {
    /// Uses one store for every concern.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: BookingRepository
            + TouristRepository
            + AccommodationRepository
            + RouteRepository
            + VehicleCatalogRepository
            + HotelRepository
            + ItineraryRepository
            + 'static,
    {
        Self {
            bookings: store.clone(),
            tourists: store.clone(),
            accommodations: store.clone(),
            routes: store.clone(),
            vehicles: store.clone(),
            hotels: store.clone(),
            itineraries: store,
        }
    }
}

/// Template lookups ignore case and surrounding whitespace.
pub fn template_key(tour_type: &str) -> String {
    tour_type.trim().to_uppercase()
}
