use actix_web::web;
use mongodb::bson::oid::ObjectId;

use crate::error::{Result, TourOpsError};

pub mod accommodations;
pub mod bookings;
pub mod health;
pub mod route_templates;
pub mod vehicles;

pub(crate) fn parse_id(raw: &str) -> Result<ObjectId> {
    ObjectId::parse_str(raw.trim()).map_err(|_| TourOpsError::InvalidId(raw.to_string()))
}

/// Mounts every endpoint. Expects `web::Data<BookingService>` on the app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check)).service(
        web::scope("/api")
            .service(
                web::scope("/bookings/{id}")
                    .route("/summary", web::get().to(bookings::summary))
                    .route("/rooms", web::get().to(bookings::rooms))
                    .route("/costs", web::get().to(bookings::costs))
                    .route("/routes", web::get().to(bookings::routes))
                    .route("/routes", web::put().to(bookings::save_routes))
                    .route("/routes/auto-fix", web::post().to(bookings::auto_fix_routes))
                    .route("/accommodations", web::post().to(accommodations::create))
                    .route("/accommodations/auto-fill", web::post().to(accommodations::auto_fill))
                    .route("/accommodations/{acc_id}", web::put().to(accommodations::update))
                    .route("/accommodations/{acc_id}", web::delete().to(accommodations::delete)),
            )
            .route("/route-templates/{tour_type}", web::get().to(route_templates::get_template))
            .route("/route-templates/{tour_type}", web::put().to(route_templates::save_template))
            .route("/vehicles", web::get().to(vehicles::get_all)),
    );
}
