use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{NaiveDate, NaiveDateTime};
use migration::MigratorTrait;
use serde_json::{json, Value};
use service::appointment::{
    clock::FixedClock,
    repo::seaorm::SeaOrmAppointmentRepository,
    repository::{
        mock::{UnavailableAppointmentRepository, VanishingAppointmentRepository},
        AppointmentRepository,
    },
    AppointmentService,
};
use tower::ServiceExt;
use tower_http::cors::CorsLayer;

use server::routes::{self, ServerState};

fn cors() -> CorsLayer { CorsLayer::very_permissive() }

/// 2026-10-15 09:00:00 local time.
fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 15).unwrap().and_hms_opt(9, 0, 0).unwrap()
}

fn app_with(repo: Arc<dyn AppointmentRepository>) -> Router {
    let svc = AppointmentService::new(repo, Arc::new(FixedClock::at(now())));
    routes::build_router(ServerState::new(svc), cors())
}

async fn build_app() -> Router {
    let cfg = configs::DatabaseConfig { url: "sqlite::memory:".into(), ..Default::default() };
    let db = models::db::connect_with_config(&cfg).await.expect("connect sqlite");
    migration::Migrator::up(&db, None).await.expect("migrate up");
    app_with(Arc::new(SeaOrmAppointmentRepository::new(db)))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            req = req.header("content-type", "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let res = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, json)
}

fn booking(date: &str, time: &str) -> Value {
    json!({"patient": "Ana Souza", "practitioner": "Dr. Lima", "date": date, "time": time, "status": "scheduled"})
}

async fn list(app: &Router) -> Vec<Value> {
    let (status, body) = send(app, "GET", "/api/agenda", None).await;
    assert_eq!(status, StatusCode::OK);
    body.as_array().cloned().unwrap()
}

fn error_fields(body: &Value) -> Vec<String> {
    body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn created_record_is_listed_unchanged() {
    let app = build_app().await;
    let (status, body) = send(&app, "POST", "/api/agendar", Some(booking("2030-01-01", "10:00:00"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "appointment created successfully");
    let id = body["id"].as_i64().unwrap();

    let rows = list(&app).await;
    assert_eq!(
        rows,
        vec![json!({
            "id": id,
            "patient": "Ana Souza",
            "practitioner": "Dr. Lima",
            "date": "2030-01-01",
            "time": "10:00:00",
            "status": "scheduled"
        })]
    );
}

#[tokio::test]
async fn malformed_date_or_time_is_rejected() {
    let app = build_app().await;

    let (status, body) = send(&app, "POST", "/api/agendar", Some(booking("2024-13-40", "10:00:00"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_fields(&body), vec!["date"]);
    assert_eq!(body["errors"][0]["message"], "date must be in 'YYYY-MM-DD' format");
    assert_eq!(body["errors"][0]["value"], "2024-13-40");

    let (status, body) = send(&app, "POST", "/api/agendar", Some(booking("2030-01-01", "25:00"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_fields(&body), vec!["time"]);
    assert_eq!(body["errors"][0]["message"], "time must be in 'HH:MM:SS' format");

    assert!(list(&app).await.is_empty());
}

#[tokio::test]
async fn every_invalid_field_is_reported() {
    let app = build_app().await;
    let (status, body) = send(&app, "POST", "/api/agendar", Some(json!({"status": "maybe"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_fields(&body), vec!["patient", "practitioner", "date", "time", "status"]);
}

#[tokio::test]
async fn past_booking_rejected_future_accepted() {
    let app = build_app().await;
    let (status, body) = send(&app, "POST", "/api/agendar", Some(booking("2026-10-14", "23:59:59"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "cannot schedule in the past");
    assert!(list(&app).await.is_empty());

    let (status, _) = send(&app, "POST", "/api/agendar", Some(booking("2026-10-15", "09:30:00"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(list(&app).await.len(), 1);
}

#[tokio::test]
async fn occupied_slot_rejected_free_slot_accepted() {
    let app = build_app().await;
    let (status, _) = send(&app, "POST", "/api/agendar", Some(booking("2030-01-01", "10:00:00"))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "POST", "/api/agendar", Some(booking("2030-01-01", "10:00:00"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "an appointment already exists for that date and time");
    assert_eq!(list(&app).await.len(), 1);

    let (status, _) = send(&app, "POST", "/api/agendar", Some(booking("2030-01-01", "11:00:00"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(list(&app).await.len(), 2);
}

#[tokio::test]
async fn patch_status_only_and_empty_patch() {
    let app = build_app().await;
    let (_, created) = send(&app, "POST", "/api/agendar", Some(booking("2030-01-01", "10:00:00"))).await;
    let uri = format!("/api/agenda/{}", created["id"]);

    let (status, body) = send(&app, "PATCH", &uri, Some(json!({"status": "completed"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "appointment updated successfully");

    let row = list(&app).await.remove(0);
    assert_eq!(row["status"], "completed");
    assert_eq!(row["patient"], "Ana Souza");
    assert_eq!(row["practitioner"], "Dr. Lima");
    assert_eq!(row["date"], "2030-01-01");
    assert_eq!(row["time"], "10:00:00");

    let (status, body) = send(&app, "PATCH", &uri, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "no fields to update were provided");

    // no body at all reads the same as {}
    let (status, body) = send(&app, "PATCH", &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "no fields to update were provided");
}

#[tokio::test]
async fn patch_validates_present_fields_and_past_slot() {
    let app = build_app().await;
    let (_, created) = send(&app, "POST", "/api/agendar", Some(booking("2026-10-15", "17:00:00"))).await;
    let uri = format!("/api/agenda/{}", created["id"]);

    let (status, body) = send(&app, "PATCH", &uri, Some(json!({"time": "5pm", "status": "done"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_fields(&body), vec!["time", "status"]);

    let (status, body) = send(&app, "PATCH", &uri, Some(json!({"date": "2026-10-01"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "cannot schedule in the past");

    let (status, _) = send(&app, "PATCH", &uri, Some(json!({"time": "08:00:00"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "PATCH", &uri, Some(json!({"date": "2026-10-20", "time": "08:00:00"}))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn patch_onto_taken_slot_is_a_collision() {
    let app = build_app().await;
    send(&app, "POST", "/api/agendar", Some(booking("2030-01-01", "10:00:00"))).await;
    let (_, second) = send(&app, "POST", "/api/agendar", Some(booking("2030-01-01", "11:00:00"))).await;

    let uri = format!("/api/agenda/{}", second["id"]);
    let (status, body) = send(&app, "PATCH", &uri, Some(json!({"time": "10:00:00"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "an appointment already exists for that date and time");
}

#[tokio::test]
async fn missing_id_is_404_for_patch_and_delete() {
    let app = build_app().await;
    let (status, body) = send(&app, "PATCH", "/api/agenda/4242", Some(json!({"status": "cancelled"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "appointment not found");

    let (status, body) = send(&app, "DELETE", "/api/agenda/4242", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "appointment not found");
}

#[tokio::test]
async fn ids_no_row_can_carry_are_404() {
    let app = build_app().await;
    send(&app, "POST", "/api/agendar", Some(booking("2030-01-01", "10:00:00"))).await;

    for raw in ["0", "-3", "2147483648", "abc"] {
        let uri = format!("/api/agenda/{raw}");
        let (status, body) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "DELETE {uri}");
        assert_eq!(body, json!({"error": "appointment not found"}));

        let (status, body) = send(&app, "PATCH", &uri, Some(json!({"status": "cancelled"}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "PATCH {uri}");
        assert_eq!(body, json!({"error": "appointment not found"}));
    }
    assert_eq!(list(&app).await.len(), 1);
}

#[tokio::test]
async fn patch_matching_no_row_reports_no_effect() {
    let app = app_with(Arc::new(VanishingAppointmentRepository::default()));
    let (_, created) = send(&app, "POST", "/api/agendar", Some(booking("2030-01-01", "10:00:00"))).await;
    let uri = format!("/api/agenda/{}", created["id"]);

    let (status, body) = send(&app, "PATCH", &uri, Some(json!({"status": "completed"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "the update had no effect"}));
}

#[tokio::test]
async fn delete_removes_then_reports_not_found() {
    let app = build_app().await;
    let (_, created) = send(&app, "POST", "/api/agendar", Some(booking("2030-01-01", "10:00:00"))).await;
    let uri = format!("/api/agenda/{}", created["id"]);

    let (status, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "appointment deleted successfully");
    assert!(list(&app).await.is_empty());

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn store_failure_is_500_with_message() {
    let app = app_with(Arc::new(UnavailableAppointmentRepository { message: "unable to open database file".into() }));
    let (status, body) = send(&app, "GET", "/api/agenda", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "unable to open database file"}));

    let (status, _) = send(&app, "POST", "/api/agendar", Some(booking("2030-01-01", "10:00:00"))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn malformed_requests_still_get_json() {
    let app = build_app().await;

    let req = Request::builder()
        .method("POST")
        .uri("/api/agendar")
        .header("content-type", "application/json")
        .body(Body::from("{\"patient\": "))
        .unwrap();
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(error_fields(&body), vec!["body"]);

    let (status, body) = send(&app, "PUT", "/api/agenda/1", Some(json!({"status": "cancelled"}))).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, json!({"error": "method not allowed"}));

    let (status, body) = send(&app, "GET", "/api/nowhere", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "route not found");
}

#[tokio::test]
async fn any_origin_is_allowed() {
    let app = build_app().await;
    let req = Request::builder()
        .method("GET")
        .uri("/api/agenda")
        .header("origin", "http://clinic.example")
        .body(Body::empty())
        .unwrap();
    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("access-control-allow-origin"));
}

#[tokio::test]
async fn health_and_openapi_are_served() {
    let app = build_app().await;
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(&app, "GET", "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/agendar"].is_object());
}
