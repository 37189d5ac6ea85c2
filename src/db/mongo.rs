use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use futures::TryStreamExt;
use mongodb::{
    options::{ClientOptions, ServerApi, ServerApiVersion},
    Client, Collection, Database,
};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TourOpsError};
use crate::models::accommodation::{Accommodation, Hotel};
use crate::models::booking::{Booking, PaxSplit};
use crate::models::itinerary::{ItineraryDay, TourItinerary};
use crate::models::route::{Route, RouteTemplate, RouteTemplateLeg};
use crate::models::tourist::Tourist;
use crate::models::vehicle::{Provider, Vehicle, VehicleCatalogs};
use crate::repositories::{
    template_key, AccommodationRepository, BookingRepository, HotelRepository, ItineraryRepository,
    RouteRepository, TouristRepository, VehicleCatalogRepository,
};

pub async fn create_mongo_client(uri: &str) -> Result<Arc<Client>> {
    log::info!("Connecting to MongoDB");

    let mut client_options = ClientOptions::parse(uri).await?;
    client_options.connect_timeout = Some(Duration::from_secs(10));
    client_options.server_selection_timeout = Some(Duration::from_secs(10));
    client_options.max_pool_size = Some(10);
    client_options.min_pool_size = Some(1);

    let server_api = ServerApi::builder().version(ServerApiVersion::V1).build();
    client_options.server_api = Some(server_api);

    let client = Client::with_options(client_options)?;

    // a failed ping is not fatal, the driver reconnects on demand
    match client.database("admin").run_command(doc! {"ping": 1}).await {
        Ok(_) => log::info!("Connected to MongoDB"),
        Err(e) => log::warn!("Connected to MongoDB but ping failed: {}", e),
    }

    Ok(Arc::new(client))
}

/// One vehicle per document, tagged with its provider.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VehicleDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    provider: String,
    name: String,
    seats: u32,
    person: String,
    #[serde(default)]
    rates: std::collections::BTreeMap<String, f64>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoomingListDocument {
    booking_id: ObjectId,
    accommodation_id: ObjectId,
    #[serde(default)]
    tourists: Vec<Tourist>,
}

/// Repositories backed by one MongoDB database.
#[derive(Clone)]
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    pub fn new(client: &Client, database: &str) -> Self {
        Self {
            db: client.database(database),
        }
    }

    pub async fn ping(&self) -> Result<()> {
        self.db.run_command(doc! {"ping": 1}).await?;
        Ok(())
    }

    fn bookings(&self) -> Collection<Booking> {
        self.db.collection("bookings")
    }

    fn tourists(&self) -> Collection<Tourist> {
        self.db.collection("tourists")
    }

    fn rooming_lists(&self) -> Collection<RoomingListDocument> {
        self.db.collection("roomingLists")
    }

    fn accommodations(&self) -> Collection<Accommodation> {
        self.db.collection("accommodations")
    }

    fn routes(&self) -> Collection<Route> {
        self.db.collection("routes")
    }

    fn templates(&self) -> Collection<RouteTemplate> {
        self.db.collection("routeTemplates")
    }

    fn vehicles(&self) -> Collection<VehicleDocument> {
        self.db.collection("vehicles")
    }

    fn hotels(&self) -> Collection<Hotel> {
        self.db.collection("hotels")
    }

    fn itineraries(&self) -> Collection<TourItinerary> {
        self.db.collection("itineraries")
    }
}

#[async_trait]
impl BookingRepository for MongoStore {
    async fn get(&self, booking_id: ObjectId) -> Result<Booking> {
        self.bookings()
            .find_one(doc! { "_id": booking_id })
            .await?
            .ok_or_else(|| TourOpsError::NotFound(format!("booking {}", booking_id)))
    }

    async fn update_pax(&self, booking_id: ObjectId, pax: PaxSplit) -> Result<()> {
        let update = doc! {
            "$set": {
                "pax": i64::from(pax.total()),
                "paxUzbekistan": i64::from(pax.uzbekistan),
                "paxTurkmenistan": i64::from(pax.turkmenistan),
            }
        };
        let result = self
            .bookings()
            .update_one(doc! { "_id": booking_id }, update)
            .await?;
        if result.matched_count == 0 {
            return Err(TourOpsError::NotFound(format!("booking {}", booking_id)));
        }
        Ok(())
    }
}

#[async_trait]
impl TouristRepository for MongoStore {
    async fn list_by_booking(&self, booking_id: ObjectId) -> Result<Vec<Tourist>> {
        let cursor = self.tourists().find(doc! { "bookingId": booking_id }).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn list_by_accommodation(
        &self,
        booking_id: ObjectId,
        accommodation_id: ObjectId,
    ) -> Result<Option<Vec<Tourist>>> {
        let list = self
            .rooming_lists()
            .find_one(doc! { "bookingId": booking_id, "accommodationId": accommodation_id })
            .await?;
        Ok(list.map(|list| list.tourists))
    }
}

#[async_trait]
impl AccommodationRepository for MongoStore {
    async fn list(&self, booking_id: ObjectId) -> Result<Vec<Accommodation>> {
        let cursor = self
            .accommodations()
            .find(doc! { "bookingId": booking_id })
            .sort(doc! { "checkInDate": 1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn create(
        &self,
        booking_id: ObjectId,
        mut accommodation: Accommodation,
    ) -> Result<Accommodation> {
        accommodation.id = Some(ObjectId::new());
        accommodation.booking_id = Some(booking_id);
        self.accommodations().insert_one(&accommodation).await?;
        Ok(accommodation)
    }

    async fn update(
        &self,
        booking_id: ObjectId,
        accommodation_id: ObjectId,
        mut accommodation: Accommodation,
    ) -> Result<Accommodation> {
        accommodation.id = Some(accommodation_id);
        accommodation.booking_id = Some(booking_id);
        let result = self
            .accommodations()
            .replace_one(
                doc! { "_id": accommodation_id, "bookingId": booking_id },
                &accommodation,
            )
            .await?;
        if result.matched_count == 0 {
            return Err(TourOpsError::NotFound(format!("accommodation {}", accommodation_id)));
        }
        Ok(accommodation)
    }

    async fn delete(&self, booking_id: ObjectId, accommodation_id: ObjectId) -> Result<()> {
        let result = self
            .accommodations()
            .delete_one(doc! { "_id": accommodation_id, "bookingId": booking_id })
            .await?;
        if result.deleted_count == 0 {
            return Err(TourOpsError::NotFound(format!("accommodation {}", accommodation_id)));
        }
        self.rooming_lists()
            .delete_many(doc! { "accommodationId": accommodation_id })
            .await?;
        Ok(())
    }
}

#[async_trait]
impl RouteRepository for MongoStore {
    async fn list_by_booking(&self, booking_id: ObjectId) -> Result<Vec<Route>> {
        let cursor = self.routes().find(doc! { "bookingId": booking_id }).await?;
        Ok(cursor.try_collect().await?)
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

        self.routes()
            .delete_many(doc! { "bookingId": booking_id })
            .await?;
        if !stored.is_empty() {
            self.routes().insert_many(&stored).await?;
        }
        log::info!("Saved {} routes for booking {}", stored.len(), booking_id);
        Ok(stored)
    }

    async fn get_template(&self, tour_type: &str) -> Result<Option<Vec<RouteTemplateLeg>>> {
        let template = self
            .templates()
            .find_one(doc! { "tourType": template_key(tour_type) })
            .await?;
        Ok(template.map(|template| template.legs))
    }

    async fn save_template(&self, tour_type: &str, legs: Vec<RouteTemplateLeg>) -> Result<()> {
        let key = template_key(tour_type);
        let template = RouteTemplate {
            id: None,
            tour_type: key.clone(),
            legs,
        };
        self.templates()
            .replace_one(doc! { "tourType": key }, &template)
            .upsert(true)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl VehicleCatalogRepository for MongoStore {
    async fn get_all(&self) -> Result<VehicleCatalogs> {
        let cursor = self.vehicles().find(doc! {}).await?;
        let documents: Vec<VehicleDocument> = cursor.try_collect().await?;

        let mut catalogs = VehicleCatalogs::default();
        for document in documents {
            let Some(provider) = Provider::parse(&document.provider) else {
                log::warn!("Vehicle {} has unknown provider {}", document.name, document.provider);
                continue;
            };
            catalogs.for_provider_mut(provider).push(Vehicle {
                id: document.id,
                name: document.name,
                seats: document.seats,
                person: document.person,
                rates: document.rates,
            });
        }
        Ok(catalogs)
    }
}

#[async_trait]
impl HotelRepository for MongoStore {
    async fn list_all(&self) -> Result<Vec<Hotel>> {
        let cursor = self.hotels().find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }
}

#[async_trait]
impl ItineraryRepository for MongoStore {
    async fn get(&self, tour_type: &str) -> Result<Option<Vec<ItineraryDay>>> {
        let itinerary = self
            .itineraries()
            .find_one(doc! { "tourType": template_key(tour_type) })
            .await?;
        Ok(itinerary.map(|itinerary| itinerary.days))
    }
}
