use std::collections::HashMap;
use std::env;

use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;

use crate::db::mongo::MongoStore;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

/*
    /health
*/
pub async fn health_check(store: Option<web::Data<MongoStore>>) -> impl Responder {
    let mongodb = check_mongodb(store.as_ref().map(|store| store.get_ref())).await;
    let status = if mongodb.status == "error" { "DEGRADED" } else { "OK" };

    let mut services = HashMap::new();
    services.insert("mongodb".to_string(), mongodb);

    HttpResponse::Ok().json(HealthStatus {
        status: status.to_string(),
        services,
        environment: env::var("RUST_ENV").unwrap_or("development".to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn check_mongodb(store: Option<&MongoStore>) -> ServiceStatus {
    let Some(store) = store else {
        return ServiceStatus {
            status: "skipped".to_string(),
            details: Some("Running without MongoDB".to_string()),
        };
    };

    match store.ping().await {
        Ok(()) => ServiceStatus {
            status: "ok".to_string(),
            details: Some("Connected successfully to MongoDB".to_string()),
        },
        Err(e) => {
            log::error!("MongoDB health check failed: {}", e);
            ServiceStatus {
                status: "error".to_string(),
                details: Some(format!("Failed to connect: {}", e)),
            }
        }
    }
}
