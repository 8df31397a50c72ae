//! Integration tests for the self-service signup workflow: public
//! submission, admin review, and the employee account plus default balance
//! an approval spawns.

mod common;

use axum::{body, http::Method, response::Response};
use common::TestApp;
use leavedesk_api::models::UserRole;
use serde_json::{json, Value};
use uuid::Uuid;

async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}

async fn submit_signup(app: &TestApp, outlet: Uuid, email: &str, mobile: &str) -> String {
    let response = app
        .request(
            Method::POST,
            "/api/v1/signupRequests",
            Some(json!({
                "fullName": "New Joiner",
                "email": email,
                "mobile": mobile,
                "password": "welcome1",
                "outletId": outlet,
                "department": "Sales",
                "designation": "Associate"
            })),
            None,
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["data"]["status"], "pending");
    body["data"]["id"].as_str().expect("request id").to_string()
}

#[tokio::test]
async fn approval_spawns_an_employee_with_the_default_balance() {
    let app = TestApp::new().await;
    let outlet = app.seed_outlet("Central").await;
    let (_admin, admin_token) = app
        .seed_user(UserRole::Admin, None, "admin@test.com", "GS-ADMIN-001", "100")
        .await;

    let request_id = submit_signup(&app, outlet, "joiner@test.com", "201").await;

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/signupRequests/{request_id}/approve"),
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["data"]["request"]["status"], "approved");

    let user = &body["data"]["user"];
    assert_eq!(user["email"], "joiner@test.com");
    assert_eq!(user["role"], "employee");
    assert_eq!(user["employeeId"], "GS-EMP-001");
    assert!(user.get("passwordHash").is_none());

    let user_id: Uuid = user["id"].as_str().expect("user id").parse().unwrap();
    let balance = app
        .state
        .balance_service()
        .get_or_default(user_id)
        .await
        .expect("balance for new employee");
    assert_eq!(
        (balance.casual, balance.sick, balance.paid, balance.emergency),
        (12, 12, 20, 5)
    );

    // The minted credentials work for login straight away.
    let response = app
        .request(
            Method::POST,
            "/auth/login",
            Some(json!({ "identifier": "joiner@test.com", "password": "welcome1" })),
            None,
        )
        .await;
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn staff_ids_are_minted_sequentially() {
    let app = TestApp::new().await;
    let outlet = app.seed_outlet("Central").await;
    let (_admin, admin_token) = app
        .seed_user(UserRole::Admin, None, "admin@test.com", "GS-ADMIN-001", "100")
        .await;

    let first = submit_signup(&app, outlet, "one@test.com", "211").await;
    let second = submit_signup(&app, outlet, "two@test.com", "212").await;

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/signupRequests/{first}/approve"),
            None,
            Some(&admin_token),
        )
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["user"]["employeeId"], "GS-EMP-001");

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/signupRequests/{second}/approve"),
            None,
            Some(&admin_token),
        )
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["user"]["employeeId"], "GS-EMP-002");
}

#[tokio::test]
async fn rejection_requires_remarks_and_creates_nothing() {
    let app = TestApp::new().await;
    let outlet = app.seed_outlet("Central").await;
    let (_admin, admin_token) = app
        .seed_user(UserRole::Admin, None, "admin@test.com", "GS-ADMIN-001", "100")
        .await;

    let request_id = submit_signup(&app, outlet, "reject@test.com", "221").await;

    // Missing remarks is a validation failure.
    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/signupRequests/{request_id}/reject"),
            Some(json!({ "remarks": "" })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status(), 400);

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/signupRequests/{request_id}/reject"),
            Some(json!({ "remarks": "Position filled" })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["data"]["status"], "rejected");
    assert_eq!(body["data"]["remarks"], "Position filled");

    // No account was created for the applicant.
    let response = app
        .request(
            Method::POST,
            "/auth/login",
            Some(json!({ "identifier": "reject@test.com", "password": "welcome1" })),
            None,
        )
        .await;
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn a_reviewed_request_cannot_be_reviewed_again() {
    let app = TestApp::new().await;
    let outlet = app.seed_outlet("Central").await;
    let (_admin, admin_token) = app
        .seed_user(UserRole::Admin, None, "admin@test.com", "GS-ADMIN-001", "100")
        .await;

    let request_id = submit_signup(&app, outlet, "once@test.com", "231").await;

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/signupRequests/{request_id}/approve"),
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status(), 200);

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/signupRequests/{request_id}/reject"),
            Some(json!({ "remarks": "Too late" })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn duplicate_email_approval_conflicts() {
    let app = TestApp::new().await;
    let outlet = app.seed_outlet("Central").await;
    let (_admin, admin_token) = app
        .seed_user(UserRole::Admin, None, "admin@test.com", "GS-ADMIN-001", "100")
        .await;

    let first = submit_signup(&app, outlet, "dup@test.com", "241").await;
    let second = submit_signup(&app, outlet, "dup@test.com", "242").await;

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/signupRequests/{first}/approve"),
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status(), 200);

    // The second request carries an email that now belongs to a user.
    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/signupRequests/{second}/approve"),
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status(), 409);
}

#[tokio::test]
async fn review_endpoints_are_admin_only() {
    let app = TestApp::new().await;
    let outlet = app.seed_outlet("Central").await;
    let (_manager, manager_token) = app
        .seed_user(
            UserRole::Manager,
            Some(outlet),
            "manager@test.com",
            "GS-MGR-001",
            "301",
        )
        .await;

    let request_id = submit_signup(&app, outlet, "applicant@test.com", "251").await;

    let response = app
        .request(
            Method::GET,
            "/api/v1/signupRequests",
            None,
            Some(&manager_token),
        )
        .await;
    assert_eq!(response.status(), 403);

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/signupRequests/{request_id}/approve"),
            None,
            Some(&manager_token),
        )
        .await;
    assert_eq!(response.status(), 403);
}
