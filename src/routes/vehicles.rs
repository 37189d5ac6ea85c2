use actix_web::{web, HttpResponse, Responder};

use crate::services::booking_service::BookingService;

/*
    GET /api/vehicles (stored catalogs, defaults for empty providers)
*/
pub async fn get_all(service: web::Data<BookingService>) -> impl Responder {
    HttpResponse::Ok().json(service.catalogs().await)
}
