use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use appointment_cell::router::appointment_routes;
use shared_utils::test_utils::{JwtTestUtils, TestConfig, TestUser};

fn request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn response_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn test_app(config: &TestConfig) -> Router {
    appointment_routes(config.to_state())
}

fn booking_body(patient_id: i64, doctor_id: i64) -> Value {
    json!({
        "patient_id": patient_id,
        "doctor_id": doctor_id,
        "scheduled_at": Utc::now() + Duration::hours(24),
        "payment_method": "card",
        "notes": null,
    })
}

#[tokio::test]
async fn book_appointment_succeeds_for_authenticated_patient() {
    let config = TestConfig::default();
    let app = test_app(&config);
    let patient = TestUser::patient(100);
    let token = JwtTestUtils::create_test_token(&patient, &config.jwt_secret, None);

    let response = app
        .oneshot(request("POST", "/", Some(&token), booking_body(100, 7)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["appointment"]["status"], json!("scheduled"));
    assert_eq!(body["appointment"]["payment_status"], json!("pending"));
}

#[tokio::test]
async fn book_appointment_requires_authentication() {
    let config = TestConfig::default();
    let app = test_app(&config);

    let response = app
        .oneshot(request("POST", "/", None, booking_body(100, 7)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn patient_cannot_book_for_another_patient() {
    let config = TestConfig::default();
    let app = test_app(&config);
    let patient = TestUser::patient(200);
    let token = JwtTestUtils::create_test_token(&patient, &config.jwt_secret, None);

    let response = app
        .oneshot(request("POST", "/", Some(&token), booking_body(100, 7)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn double_booking_returns_conflict() {
    let config = TestConfig::default();
    let state = config.to_state();
    let app = appointment_routes(state);
    let patient = TestUser::patient(100);
    let token = JwtTestUtils::create_test_token(&patient, &config.jwt_secret, None);
    let body = booking_body(100, 7);

    let first = app
        .clone()
        .oneshot(request("POST", "/", Some(&token), body.clone()))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app
        .oneshot(request("POST", "/", Some(&token), body))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn patient_cannot_complete_an_appointment() {
    let config = TestConfig::default();
    let app = test_app(&config);
    let patient = TestUser::patient(100);
    let token = JwtTestUtils::create_test_token(&patient, &config.jwt_secret, None);

    let booked = app
        .clone()
        .oneshot(request("POST", "/", Some(&token), booking_body(100, 7)))
        .await
        .unwrap();
    let body = response_json(booked).await;
    let id = body["appointment"]["id"].as_i64().unwrap();

    let response = app
        .oneshot(request(
            "POST",
            &format!("/{}/complete", id),
            Some(&token),
            json!({}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn entitlements_are_readable_by_the_doctor() {
    let config = TestConfig::default();
    let app = test_app(&config);
    let patient = TestUser::patient(100);
    let doctor = TestUser::doctor(7);
    let patient_token = JwtTestUtils::create_test_token(&patient, &config.jwt_secret, None);
    let doctor_token = JwtTestUtils::create_test_token(&doctor, &config.jwt_secret, None);

    let booked = app
        .clone()
        .oneshot(request("POST", "/", Some(&patient_token), booking_body(100, 7)))
        .await
        .unwrap();
    let body = response_json(booked).await;
    let id = body["appointment"]["id"].as_i64().unwrap();

    let response = app
        .oneshot(request(
            "GET",
            &format!("/{}/entitlements", id),
            Some(&doctor_token),
            json!({}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["entitlements"]["chat_open"], json!(false));
    assert_eq!(body["entitlements"]["video_call_active"], json!(false));
}

#[tokio::test]
async fn completing_early_returns_unprocessable_entity() {
    let config = TestConfig::default();
    let app = test_app(&config);
    let patient = TestUser::patient(100);
    let doctor = TestUser::doctor(7);
    let patient_token = JwtTestUtils::create_test_token(&patient, &config.jwt_secret, None);
    let doctor_token = JwtTestUtils::create_test_token(&doctor, &config.jwt_secret, None);

    let booked = app
        .clone()
        .oneshot(request("POST", "/", Some(&patient_token), booking_body(100, 7)))
        .await
        .unwrap();
    let body = response_json(booked).await;
    let id = body["appointment"]["id"].as_i64().unwrap();

    let response = app
        .oneshot(request(
            "POST",
            &format!("/{}/complete", id),
            Some(&doctor_token),
            json!({}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn admin_can_view_another_patients_appointments() {
    let config = TestConfig::default();
    let app = test_app(&config);
    let patient = TestUser::patient(100);
    let admin = TestUser::admin(1);
    let patient_token = JwtTestUtils::create_test_token(&patient, &config.jwt_secret, None);
    let admin_token = JwtTestUtils::create_test_token(&admin, &config.jwt_secret, None);

    let booked = app
        .clone()
        .oneshot(request("POST", "/", Some(&patient_token), booking_body(100, 7)))
        .await
        .unwrap();
    assert_eq!(booked.status(), StatusCode::OK);

    let response = app
        .oneshot(request("GET", "/patients/100", Some(&admin_token), json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["count"], json!(1));
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let config = TestConfig::default();
    let app = test_app(&config);
    let patient = TestUser::patient(100);
    let token = JwtTestUtils::create_expired_token(&patient, &config.jwt_secret);

    let response = app
        .oneshot(request("POST", "/", Some(&token), booking_body(100, 7)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
