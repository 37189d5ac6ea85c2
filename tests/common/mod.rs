#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{middleware::Logger, web, App};
use chrono::NaiveDate;
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;

use tour_ops_api::models::accommodation::{Currency, Hotel, HotelRoomType};
use tour_ops_api::models::booking::Booking;
use tour_ops_api::models::tourist::Tourist;
use tour_ops_api::repositories::memory::InMemoryStore;
use tour_ops_api::repositories::Repositories;
use tour_ops_api::routes;
use tour_ops_api::services::booking_service::BookingService;
use tour_ops_api::services::fx::FixedFxRates;
use tour_ops_api::services::pricing_service::PricingConfig;

pub struct TestApp {
    pub store: Arc<InMemoryStore>,
    pub service: BookingService,
}

impl TestApp {
    pub async fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let service = BookingService::new(
            Repositories::from_store(store.clone()),
            Arc::new(FixedFxRates::default()),
            PricingConfig::default(),
        );

        Self { store, service }
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<impl MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(self.service.clone()))
            .wrap(Logger::default())
            .configure(routes::configure)
    }

    /// Booking departing 2024-05-01 (arrival 2024-05-02), ending 2024-05-17.
    pub async fn seed_booking(&self, tour_type: &str, tourists: Vec<Tourist>) -> ObjectId {
        let id = self.store.insert_booking(booking(tour_type)).await;
        self.store.insert_tourists(id, tourists).await;
        id
    }
}

pub fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, day).unwrap()
}

pub fn booking(tour_type: &str) -> Booking {
    Booking {
        id: None,
        booking_number: format!("{}-2024-05", tour_type),
        tour_type: tour_type.to_string(),
        departure_date: date(5, 1),
        end_date: date(5, 17),
        pax: 0,
        pax_uzbekistan: 0,
        pax_turkmenistan: 0,
    }
}

pub fn tourist(name: &str, room: &str, group: &str) -> Tourist {
    Tourist {
        room_number: Some(room.to_string()),
        accommodation: Some(group.to_string()),
        ..Tourist::new(name)
    }
}

pub fn hotel(name: &str, price: f64, currency: Currency) -> Hotel {
    let room = |code: &str| HotelRoomType {
        name: code.to_string(),
        price,
        currency: Some(currency),
        vat_applicable: false,
        tourist_tax_applicable: false,
    };
    Hotel {
        id: None,
        name: name.to_string(),
        city: String::new(),
        total_rooms: 30,
        room_types: vec![room("DBL"), room("TWN"), room("SNGL")],
    }
}
