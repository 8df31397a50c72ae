//! Integration tests for the HTTP surface itself: the 405 contract on
//! unsupported verbs, authentication requirements, and login with each
//! identifier kind.

mod common;

use axum::{body, http::Method, response::Response};
use common::TestApp;
use leavedesk_api::models::UserRole;
use serde_json::{json, Value};

async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}

#[tokio::test]
async fn unsupported_verbs_answer_with_the_405_contract() {
    let app = TestApp::new().await;

    for (method, uri) in [
        (Method::PATCH, "/api/v1/leaves"),
        (Method::POST, "/api/v1/leaveBalances"),
        (Method::PATCH, "/api/v1/outlets"),
        (Method::PUT, "/api/v1/signupRequests"),
        (Method::GET, "/auth/login"),
    ] {
        let response = app.request(method.clone(), uri, None, None).await;
        assert_eq!(response.status(), 405, "{} {}", method, uri);
        let body = response_json(response).await;
        assert_eq!(body["message"], "Method not allowed", "{}", uri);
    }
}

#[tokio::test]
async fn protected_routes_require_a_bearer_token() {
    let app = TestApp::new().await;

    for uri in [
        "/api/v1/leaves",
        "/api/v1/leaveBalances",
        "/api/v1/users",
        "/api/v1/signupRequests",
        "/api/v1/stats",
    ] {
        let response = app.request(Method::GET, uri, None, None).await;
        assert_eq!(response.status(), 401, "{}", uri);
    }

    let response = app
        .request(Method::GET, "/api/v1/leaves", None, Some("not-a-jwt"))
        .await;
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn outlet_listing_is_public_for_the_signup_form() {
    let app = TestApp::new().await;
    app.seed_outlet("Central").await;

    let response = app.request(Method::GET, "/api/v1/outlets", None, None).await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["data"][0]["name"], "Central");
}

#[tokio::test]
async fn login_accepts_email_staff_id_and_mobile() {
    let app = TestApp::new().await;
    let outlet = app.seed_outlet("Central").await;
    let (_emp, _) = app
        .seed_user(
            UserRole::Employee,
            Some(outlet),
            "emp@test.com",
            "GS-EMP-001",
            "5550101",
        )
        .await;

    for identifier in ["emp@test.com", "GS-EMP-001", "5550101"] {
        let response = app
            .request(
                Method::POST,
                "/auth/login",
                Some(json!({ "identifier": identifier, "password": "secret123" })),
                None,
            )
            .await;
        assert_eq!(response.status(), 200, "identifier {}", identifier);
        let body = response_json(response).await;
        assert!(body["data"]["token"].as_str().is_some());
        assert_eq!(body["data"]["user"]["email"], "emp@test.com");
        assert!(body["data"]["user"].get("passwordHash").is_none());
    }

    let response = app
        .request(
            Method::POST,
            "/auth/login",
            Some(json!({ "identifier": "emp@test.com", "password": "wrong" })),
            None,
        )
        .await;
    assert_eq!(response.status(), 401);

    let response = app
        .request(
            Method::POST,
            "/auth/login",
            Some(json!({ "identifier": "ghost@test.com", "password": "secret123" })),
            None,
        )
        .await;
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn a_token_gates_the_stats_endpoint_by_role() {
    let app = TestApp::new().await;
    let outlet = app.seed_outlet("Central").await;
    let (_admin, admin_token) = app
        .seed_user(UserRole::Admin, None, "admin@test.com", "GS-ADMIN-001", "100")
        .await;
    let (_emp, emp_token) = app
        .seed_user(
            UserRole::Employee,
            Some(outlet),
            "emp@test.com",
            "GS-EMP-001",
            "101",
        )
        .await;

    let response = app
        .request(Method::GET, "/api/v1/stats", None, Some(&emp_token))
        .await;
    assert_eq!(response.status(), 403);

    let response = app
        .request(Method::GET, "/api/v1/stats", None, Some(&admin_token))
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["data"]["total_outlets"], 1);
    assert_eq!(body["data"]["total_employees"], 1);
}

#[tokio::test]
async fn health_endpoint_reports_database_state() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/health", None, None).await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["data"]["status"], "healthy");
}

#[tokio::test]
async fn deleting_a_pending_leave_withdraws_it() {
    let app = TestApp::new().await;
    let outlet = app.seed_outlet("Central").await;
    let (_emp, emp_token) = app
        .seed_user(
            UserRole::Employee,
            Some(outlet),
            "emp@test.com",
            "GS-EMP-001",
            "101",
        )
        .await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/leaves",
            Some(json!({
                "leaveType": "casual",
                "startDate": "2024-10-01",
                "endDate": "2024-10-02",
                "reason": "Trip"
            })),
            Some(&emp_token),
        )
        .await;
    let leave_id = response_json(response).await["data"]["id"]
        .as_str()
        .expect("leave id")
        .to_string();

    let response = app
        .request(
            Method::DELETE,
            "/api/v1/leaves",
            Some(json!({ "_id": leave_id })),
            Some(&emp_token),
        )
        .await;
    assert_eq!(response.status(), 200);

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/leaves/{leave_id}"),
            None,
            Some(&emp_token),
        )
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn update_clears_assignments_on_explicit_null_only() {
    let app = TestApp::new().await;
    let outlet = app.seed_outlet("Central").await;
    let (admin, admin_token) = app
        .seed_user(UserRole::Admin, None, "admin@test.com", "GS-ADM-001", "5550100")
        .await;
    let (emp, _) = app
        .seed_user(
            UserRole::Employee,
            Some(outlet),
            "emp@test.com",
            "GS-EMP-001",
            "5550101",
        )
        .await;

    // A body without the key leaves the outlet assignment alone.
    let response = app
        .request(
            Method::PUT,
            "/api/v1/users",
            Some(json!({ "_id": emp.id, "name": "Renamed" })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["data"]["name"], "Renamed");
    assert_eq!(body["data"]["outletId"], json!(outlet));

    // An explicit null clears it.
    let response = app
        .request(
            Method::PUT,
            "/api/v1/users",
            Some(json!({ "_id": emp.id, "outletId": null })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["data"]["outletId"], Value::Null);

    // Same contract for the outlet's manager assignment.
    let response = app
        .request(
            Method::PUT,
            "/api/v1/outlets",
            Some(json!({ "_id": outlet, "managerId": admin.id })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["data"]["managerId"], json!(admin.id));

    let response = app
        .request(
            Method::PUT,
            "/api/v1/outlets",
            Some(json!({ "_id": outlet, "city": "Metropolis" })),
            Some(&admin_token),
        )
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["managerId"], json!(admin.id));

    let response = app
        .request(
            Method::PUT,
            "/api/v1/outlets",
            Some(json!({ "_id": outlet, "managerId": null })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["data"]["managerId"], Value::Null);
}
