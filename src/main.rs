use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use tour_ops_api::config::AppConfig;
use tour_ops_api::db::mongo::{create_mongo_client, MongoStore};
use tour_ops_api::repositories::Repositories;
use tour_ops_api::routes;
use tour_ops_api::services::booking_service::BookingService;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::from_env();
    log::info!("Attempting to bind to {}:{}", config.host, config.port);

    let Some(mongo_uri) = config.mongodb_uri.clone() else {
        log::error!("MONGODB_URI must be set");
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "MONGODB_URI must be set",
        ));
    };
    let client = create_mongo_client(&mongo_uri)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    let store = Arc::new(MongoStore::new(&client, &config.mongodb_database));
    log::info!("Using database {}", config.mongodb_database);

    let service = BookingService::new(
        Repositories::from_store(store.clone()),
        Arc::new(config.fx_rates()),
        config.pricing(),
    );
    let store = web::Data::from(store);
    let service = web::Data::new(service);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .app_data(store.clone())
            .app_data(service.clone())
            .configure(routes::configure)
    })
    .bind((config.host.clone(), config.port))?
    .run()
    .await
}
