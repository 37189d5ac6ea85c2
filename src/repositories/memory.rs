use std::collections::HashMap;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use crate::error::{Result, TourOpsError};
use crate::models::accommodation::{Accommodation, Hotel};
use crate::models::booking::{Booking, PaxSplit};
use crate::models::itinerary::ItineraryDay;
use crate::models::route::{Route, RouteTemplateLeg};
use crate::models::tourist::Tourist;
use crate::models::vehicle::VehicleCatalogs;
use crate::repositories::{
    template_key, AccommodationRepository, BookingRepository, HotelRepository, ItineraryRepository,
    RouteRepository, TouristRepository, VehicleCatalogRepository,
};

#[derive(Default)]
struct State {
    bookings: HashMap<ObjectId, Booking>,
    tourists: Vec<Tourist>,
    rooming_lists: HashMap<ObjectId, Vec<Tourist>>,
    accommodations: Vec<Accommodation>,
    routes: Vec<Route>,
    templates: HashMap<String, Vec<RouteTemplateLeg>>,
    /// `None` behaves like an unreachable catalog service
    vehicles: Option<VehicleCatalogs>,
    hotels: Vec<Hotel>,
    itineraries: HashMap<String, Vec<ItineraryDay>>,
}

/// Process-local store. Ids are assigned on insert.
#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_booking(&self, mut booking: Booking) -> ObjectId {
        let id = *booking.id.get_or_insert_with(ObjectId::new);
        self.state.write().await.bookings.insert(id, booking);
        id
    }

    pub async fn insert_tourists(&self, booking_id: ObjectId, tourists: Vec<Tourist>) {
        let mut state = self.state.write().await;
        for mut tourist in tourists {
            tourist.id.get_or_insert_with(ObjectId::new);
            tourist.booking_id = Some(booking_id);
            state.tourists.push(tourist);
        }
    }

    pub async fn set_rooming_list(&self, accommodation_id: ObjectId, tourists: Vec<Tourist>) {
        self.state
            .write()
            .await
            .rooming_lists
            .insert(accommodation_id, tourists);
    }

    pub async fn insert_hotel(&self, mut hotel: Hotel) -> ObjectId {
        let id = *hotel.id.get_or_insert_with(ObjectId::new);
        self.state.write().await.hotels.push(hotel);
        id
    }

    pub async fn set_vehicles(&self, catalogs: Option<VehicleCatalogs>) {
        self.state.write().await.vehicles = catalogs;
    }

    pub async fn set_itinerary(&self, tour_type: &str, days: Vec<ItineraryDay>) {
        self.state
            .write()
            .await
            .itineraries
            .insert(template_key(tour_type), days);
    }
}

#[async_trait]
impl BookingRepository for InMemoryStore {
    async fn get(&self, booking_id: ObjectId) -> Result<Booking> {
        self.state
            .read()
            .await
            .bookings
            .get(&booking_id)
            .cloned()
            .ok_or_else(|| TourOpsError::NotFound(format!("booking {}", booking_id)))
    }

    async fn update_pax(&self, booking_id: ObjectId, pax: PaxSplit) -> Result<()> {
        let mut state = self.state.write().await;
        let booking = state
            .bookings
            .get_mut(&booking_id)
            .ok_or_else(|| TourOpsError::NotFound(format!("booking {}", booking_id)))?;
        booking.apply_pax(pax);
        Ok(())
    }
}

#[async_trait]
impl TouristRepository for InMemoryStore {
    async fn list_by_booking(&self, booking_id: ObjectId) -> Result<Vec<Tourist>> {
        Ok(self
            .state
            .read()
            .await
            .tourists
            .iter()
            .filter(|tourist| tourist.booking_id == Some(booking_id))
            .cloned()
            .collect())
    }

    async fn list_by_accommodation(
        &self,
        _booking_id: ObjectId,
        accommodation_id: ObjectId,
    ) -> Result<Option<Vec<Tourist>>> {
        Ok(self
            .state
            .read()
            .await
            .rooming_lists
            .get(&accommodation_id)
            .cloned())
    }
}

#[async_trait]
impl AccommodationRepository for InMemoryStore {
    async fn list(&self, booking_id: ObjectId) -> Result<Vec<Accommodation>> {
        let mut accommodations: Vec<Accommodation> = self
            .state
            .read()
            .await
            .accommodations
            .iter()
            .filter(|acc| acc.booking_id == Some(booking_id))
            .cloned()
            .collect();
        accommodations.sort_by_key(|acc| acc.check_in_date);
        Ok(accommodations)
    }

    async fn create(
        &self,
        booking_id: ObjectId,
        mut accommodation: Accommodation,
    ) -> Result<Accommodation> {
        accommodation.id = Some(ObjectId::new());
        accommodation.booking_id = Some(booking_id);
        self.state
            .write()
            .await
            .accommodations
            .push(accommodation.clone());
        Ok(accommodation)
    }

    async fn update(
        &self,
        booking_id: ObjectId,
        accommodation_id: ObjectId,
        mut accommodation: Accommodation,
    ) -> Result<Accommodation> {
        let mut state = self.state.write().await;
        let slot = state
            .accommodations
            .iter_mut()
            .find(|acc| acc.id == Some(accommodation_id) && acc.booking_id == Some(booking_id))
            .ok_or_else(|| TourOpsError::NotFound(format!("accommodation {}", accommodation_id)))?;
        accommodation.id = Some(accommodation_id);
        accommodation.booking_id = Some(booking_id);
        *slot = accommodation.clone();
        Ok(accommodation)
    }

    async fn delete(&self, booking_id: ObjectId, accommodation_id: ObjectId) -> Result<()> {
        let mut state = self.state.write().await;
        let before = state.accommodations.len();
        state
            .accommodations
            .retain(|acc| {
                !(acc.id == Some(accommodation_id) && acc.booking_id == Some(booking_id))
            });
        if state.accommodations.len() == before {
            return Err(TourOpsError::NotFound(format!("accommodation {}", accommodation_id)));
        }
        state.rooming_lists.remove(&accommodation_id);
        Ok(())
    }
}

#[async_trait]
impl RouteRepository for InMemoryStore {
    async fn list_by_booking(&self, booking_id: ObjectId) -> Result<Vec<Route>> {
        Ok(self
            .state
            .read()
            .await
            .routes
            .iter()
            .filter(|route| route.booking_id == Some(booking_id))
            .cloned()
            .collect())
    }

    async fn bulk_replace(&self, booking_id: ObjectId, routes: Vec<Route>) -> Result<Vec<Route>> {
        let stored: Vec<Route> = routes
            .into_iter()
            .map(|mut route| {
                route.id.get_or_insert_with(ObjectId::new);
                route.booking_id = Some(booking_id);
                route
            })
            .collect();

        let mut state = self.state.write().await;
        state.routes.retain(|route| route.booking_id != Some(booking_id));
        state.routes.extend(stored.iter().cloned());
        Ok(stored)
    }

    async fn get_template(&self, tour_type: &str) -> Result<Option<Vec<RouteTemplateLeg>>> {
        Ok(self
            .state
            .read()
            .await
            .templates
            .get(&template_key(tour_type))
            .cloned())
    }

    async fn save_template(&self, tour_type: &str, legs: Vec<RouteTemplateLeg>) -> Result<()> {
        self.state
            .write()
            .await
            .templates
            .insert(template_key(tour_type), legs);
        Ok(())
    }
}

#[async_trait]
impl VehicleCatalogRepository for InMemoryStore {
    async fn get_all(&self) -> Result<VehicleCatalogs> {
        self.state
            .read()
            .await
            .vehicles
            .clone()
            .ok_or_else(|| {
                TourOpsError::CatalogUnavailable("no vehicle catalog loaded".to_string())
            })
    }
}

#[async_trait]
impl HotelRepository for InMemoryStore {
    async fn list_all(&self) -> Result<Vec<Hotel>> {
        Ok(self.state.read().await.hotels.clone())
    }
}

#[async_trait]
impl ItineraryRepository for InMemoryStore {
    async fn get(&self, tour_type: &str) -> Result<Option<Vec<ItineraryDay>>> {
        Ok(self
            .state
            .read()
            .await
            .itineraries
            .get(&template_key(tour_type))
            .cloned())
    }
}
