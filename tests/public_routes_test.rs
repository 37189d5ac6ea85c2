mod common;

use actix_web::{http::StatusCode, test};
use serde_json::{json, Value};
use serial_test::serial;

use tour_ops_api::models::vehicle::{Vehicle, VehicleCatalogs};

use common::{tourist, TestApp};

#[actix_rt::test]
#[serial]
async fn test_health_check() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get()
        .uri("/health")
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "OK");
    assert_eq!(body["services"]["mongodb"]["status"], "skipped");
}

#[actix_rt::test]
#[serial]
async fn test_vehicles_fall_back_to_defaults() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get().uri("/api/vehicles").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    for provider in ["sevil", "xayrulla", "nosir"] {
        assert!(!body[provider].as_array().unwrap().is_empty(), "{}", provider);
    }
}

#[actix_rt::test]
#[serial]
async fn test_stored_vehicles_replace_defaults() {
    let test_app = TestApp::new().await;
    test_app
        .store
        .set_vehicles(Some(VehicleCatalogs {
            sevil: vec![Vehicle {
                id: None,
                name: "Golden Dragon".to_string(),
                seats: 50,
                person: "1-45".to_string(),
                rates: [("tagRate".to_string(), 300.0)].into_iter().collect(),
            }],
            xayrulla: vec![],
            nosir: vec![],
        }))
        .await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get().uri("/api/vehicles").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let sevil = body["sevil"].as_array().unwrap();
    assert_eq!(sevil.len(), 1);
    assert_eq!(sevil[0]["name"], "Golden Dragon");
    assert!(!body["xayrulla"].as_array().unwrap().is_empty());
}

#[actix_rt::test]
#[serial]
async fn test_default_er_template() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get()
        .uri("/api/route-templates/er")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let legs = body.as_array().unwrap();

    assert_eq!(legs.len(), 15);
    assert_eq!(legs[0]["routeName"], "Airport Pickup");
    assert_eq!(legs[14]["routeName"], "Khiva - Urgench");

    let req = test::TestRequest::get()
        .uri("/api/route-templates/KG")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[actix_rt::test]
#[serial]
async fn test_saved_template_drives_new_bookings() {
    let test_app = TestApp::new().await;
    let booking_id = test_app
        .seed_booking("KG", vec![tourist("Anna", "SNGL-1", "Uzbekistan")])
        .await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::put()
        .uri("/api/route-templates/KG")
        .set_json(json!([
            {
                "dayOffset": 3,
                "city": "Samarkand",
                "routeName": "Samarkand City Tour",
                "price": 70.0
            },
            {
                "dayOffset": 0,
                "city": "Tashkent",
                "routeName": "Airport Pickup",
                "transportType": "Sedan"
            }
        ]))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let legs = body.as_array().unwrap();
    assert_eq!(legs.len(), 2);
    assert_eq!(legs[0]["routeName"], "Airport Pickup");
    assert!(legs[0].get("transportType").is_none());

    let req = test::TestRequest::get()
        .uri(&format!("/api/bookings/{}/routes", booking_id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let routes = body["routes"].as_array().unwrap();
    assert_eq!(routes.len(), 2);
    assert_eq!(routes[1]["date"], "2024-05-05");
    assert_eq!(routes[1]["choiceTab"], "sevil");
}

#[actix_rt::test]
#[serial]
async fn test_template_rejects_blank_route_name() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::put()
        .uri("/api/route-templates/KG")
        .set_json(json!([{"dayOffset": 0, "city": "Tashkent", "routeName": "  "}]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
