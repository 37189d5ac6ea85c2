use actix_web::{web, HttpResponse};

use crate::error::Result;
use crate::models::route::Route;
use crate::routes::parse_id;
use crate::services::booking_service::BookingService;

/*
    GET /api/bookings/{id}/summary
*/
pub async fn summary(
    path: web::Path<String>,
    service: web::Data<BookingService>,
) -> Result<HttpResponse> {
    let booking_id = parse_id(&path)?;
    Ok(HttpResponse::Ok().json(service.summary(booking_id).await?))
}

/*
    GET /api/bookings/{id}/rooms
*/
pub async fn rooms(
    path: web::Path<String>,
    service: web::Data<BookingService>,
) -> Result<HttpResponse> {
    let booking_id = parse_id(&path)?;
    Ok(HttpResponse::Ok().json(service.rooms(booking_id).await?))
}

/*
    GET /api/bookings/{id}/costs
*/
pub async fn costs(
    path: web::Path<String>,
    service: web::Data<BookingService>,
) -> Result<HttpResponse> {
    let booking_id = parse_id(&path)?;
    Ok(HttpResponse::Ok().json(service.costs(booking_id).await?))
}

/*
    GET /api/bookings/{id}/routes (derived, not saved)
*/
pub async fn routes(
    path: web::Path<String>,
    service: web::Data<BookingService>,
) -> Result<HttpResponse> {
    let booking_id = parse_id(&path)?;
    Ok(HttpResponse::Ok().json(service.routes(booking_id).await?))
}

/*
    PUT /api/bookings/{id}/routes
*/
pub async fn save_routes(
    path: web::Path<String>,
    input: web::Json<Vec<Route>>,
    service: web::Data<BookingService>,
) -> Result<HttpResponse> {
    let booking_id = parse_id(&path)?;
    let saved = service.save_routes(booking_id, input.into_inner()).await?;
    Ok(HttpResponse::Ok().json(saved))
}

/*
    POST /api/bookings/{id}/routes/auto-fix
*/
pub async fn auto_fix_routes(
    path: web::Path<String>,
    service: web::Data<BookingService>,
) -> Result<HttpResponse> {
    let booking_id = parse_id(&path)?;
    Ok(HttpResponse::Ok().json(service.auto_fix_routes(booking_id).await?))
}
