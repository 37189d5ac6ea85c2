use actix_web::{web, HttpResponse};

use crate::error::Result;
use crate::models::route::Route;
use crate::services::booking_service::BookingService;

/*
    GET /api/route-templates/{tour_type}
*/
pub async fn get_template(
    path: web::Path<String>,
    service: web::Data<BookingService>,
) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.template_for(&path).await?))
}

/*
    PUT /api/route-templates/{tour_type}
    Body: the legs of a booking; only day offset, city, route name and provider are kept.
*/
pub async fn save_template(
    path: web::Path<String>,
    input: web::Json<Vec<Route>>,
    service: web::Data<BookingService>,
) -> Result<HttpResponse> {
    let legs = service.save_template(&path, &input).await?;
    Ok(HttpResponse::Ok().json(legs))
}
