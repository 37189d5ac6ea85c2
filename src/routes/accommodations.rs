use actix_web::{web, HttpResponse};

use crate::error::Result;
use crate::models::accommodation::Accommodation;
use crate::routes::parse_id;
use crate::services::booking_service::BookingService;

/*
    POST /api/bookings/{id}/accommodations
*/
pub async fn create(
    path: web::Path<String>,
    input: web::Json<Accommodation>,
    service: web::Data<BookingService>,
) -> Result<HttpResponse> {
    let booking_id = parse_id(&path)?;
    let created = service
        .create_accommodation(booking_id, input.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(created))
}

/*
    PUT /api/bookings/{id}/accommodations/{acc_id}
*/
pub async fn update(
    path: web::Path<(String, String)>,
    input: web::Json<Accommodation>,
    service: web::Data<BookingService>,
) -> Result<HttpResponse> {
    let (booking_id, accommodation_id) = path.into_inner();
    let updated = service
        .update_accommodation(
            parse_id(&booking_id)?,
            parse_id(&accommodation_id)?,
            input.into_inner(),
        )
        .await?;
    Ok(HttpResponse::Ok().json(updated))
}

/*
    DELETE /api/bookings/{id}/accommodations/{acc_id}
*/
pub async fn delete(
    path: web::Path<(String, String)>,
    service: web::Data<BookingService>,
) -> Result<HttpResponse> {
    let (booking_id, accommodation_id) = path.into_inner();
    service
        .delete_accommodation(parse_id(&booking_id)?, parse_id(&accommodation_id)?)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/*
    POST /api/bookings/{id}/accommodations/auto-fill
*/
pub async fn auto_fill(
    path: web::Path<String>,
    service: web::Data<BookingService>,
) -> Result<HttpResponse> {
    let booking_id = parse_id(&path)?;
    let report = service.auto_fill(booking_id).await?;
    Ok(HttpResponse::Created().json(report))
}
