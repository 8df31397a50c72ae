//! Integration tests for the leave request lifecycle: submission, the
//! one-shot approve/reject decision, and the balance decrement that rides
//! on approval.

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
async fn approving_a_leave_decrements_the_balance_inclusively() {
    let app = TestApp::new().await;
    let outlet = app.seed_outlet("Central").await;
    let (_admin, admin_token) = app
        .seed_user(UserRole::Admin, None, "admin@test.com", "GS-ADMIN-001", "100")
        .await;
    let (employee, emp_token) = app
        .seed_user(
            UserRole::Employee,
            Some(outlet),
            "emp@test.com",
            "GS-EMP-001",
            "101",
        )
        .await;

    // 2024-03-10 through 2024-03-12 is three days, both endpoints counted.
    let response = app
        .request(
            Method::POST,
            "/api/v1/leaves",
            Some(json!({
                "leaveType": "casual",
                "startDate": "2024-03-10",
                "endDate": "2024-03-12",
                "reason": "Family visit"
            })),
            Some(&emp_token),
        )
        .await;
    assert_eq!(response.status(), 200);
    let submitted = response_json(response).await;
    assert_eq!(submitted["data"]["status"], "pending");
    let leave_id = submitted["data"]["id"].as_str().expect("leave id").to_string();

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/leaves/{leave_id}/approve"),
            Some(json!({ "remarks": "Enjoy" })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status(), 200);
    let approved = response_json(response).await;
    assert_eq!(approved["data"]["status"], "approved");
    assert!(approved["data"]["reviewedOn"].is_string());

    let balance = app
        .state
        .balance_service()
        .get_or_default(employee.id)
        .await
        .expect("balance after approval");
    assert_eq!(balance.casual, 9);
    assert_eq!(balance.sick, 12);
}

#[tokio::test]
async fn approving_more_days_than_remaining_clamps_at_zero() {
    let app = TestApp::new().await;
    let outlet = app.seed_outlet("Central").await;
    let (_admin, admin_token) = app
        .seed_user(UserRole::Admin, None, "admin@test.com", "GS-ADMIN-001", "100")
        .await;
    let (employee, _) = app
        .seed_user(
            UserRole::Employee,
            Some(outlet),
            "emp@test.com",
            "GS-EMP-001",
            "101",
        )
        .await;

    // Shrink the casual balance to five days.
    let response = app
        .request(
            Method::PUT,
            "/api/v1/leaveBalances",
            Some(json!({
                "userId": employee.id,
                "balance": { "casual": 5, "sick": 12, "paid": 20, "emergency": 5 }
            })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status(), 200);

    // Admins may submit on behalf of staff and are not held to the
    // advisory balance check; a seven-day request goes through.
    let response = app
        .request(
            Method::POST,
            "/api/v1/leaves",
            Some(json!({
                "employeeId": employee.id,
                "leaveType": "casual",
                "startDate": "2024-06-01",
                "endDate": "2024-06-07",
                "reason": "Extended trip"
            })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status(), 200);
    let submitted = response_json(response).await;
    let leave_id = submitted["data"]["id"].as_str().expect("leave id").to_string();

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/leaves/{leave_id}/approve"),
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status(), 200);

    let balance = app
        .state
        .balance_service()
        .get_or_default(employee.id)
        .await
        .expect("balance after approval");
    assert_eq!(balance.casual, 0, "decrement clamps at zero, never negative");
}

#[tokio::test]
async fn rejecting_a_leave_leaves_the_balance_untouched() {
    let app = TestApp::new().await;
    let outlet = app.seed_outlet("Central").await;
    let (_admin, admin_token) = app
        .seed_user(UserRole::Admin, None, "admin@test.com", "GS-ADMIN-001", "100")
        .await;
    let (employee, emp_token) = app
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
                "leaveType": "sick",
                "startDate": "2024-04-01",
                "endDate": "2024-04-03",
                "reason": "Flu"
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
            Method::POST,
            &format!("/api/v1/leaves/{leave_id}/reject"),
            Some(json!({ "remarks": "Certificate missing" })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status(), 200);
    let rejected = response_json(response).await;
    assert_eq!(rejected["data"]["status"], "rejected");
    assert_eq!(rejected["data"]["remarks"], "Certificate missing");

    let balance = app
        .state
        .balance_service()
        .get_or_default(employee.id)
        .await
        .expect("balance after rejection");
    assert_eq!(balance.sick, 12);
}

#[tokio::test]
async fn a_decided_leave_cannot_be_decided_again() {
    let app = TestApp::new().await;
    let outlet = app.seed_outlet("Central").await;
    let (_admin, admin_token) = app
        .seed_user(UserRole::Admin, None, "admin@test.com", "GS-ADMIN-001", "100")
        .await;
    let (employee, emp_token) = app
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
                "leaveType": "paid",
                "startDate": "2024-05-01",
                "endDate": "2024-05-02",
                "reason": "Wedding"
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
            Method::POST,
            &format!("/api/v1/leaves/{leave_id}/approve"),
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status(), 200);

    // A second decision must fail and must not touch the balance again.
    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/leaves/{leave_id}/reject"),
            Some(json!({ "remarks": "Changed my mind" })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status(), 400);

    let balance = app
        .state
        .balance_service()
        .get_or_default(employee.id)
        .await
        .expect("balance after double decision");
    assert_eq!(balance.paid, 18);

    let leave = app
        .state
        .leave_service()
        .get_leave(leave_id.parse().unwrap())
        .await
        .expect("leave lookup")
        .expect("leave exists");
    assert_eq!(leave.status, leavedesk_api::models::LeaveStatus::Approved);
}

#[tokio::test]
async fn put_with_status_acts_as_a_decision() {
    let app = TestApp::new().await;
    let outlet = app.seed_outlet("Central").await;
    let (_admin, admin_token) = app
        .seed_user(UserRole::Admin, None, "admin@test.com", "GS-ADMIN-001", "100")
        .await;
    let (employee, emp_token) = app
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
                "leaveType": "emergency",
                "startDate": "2024-07-01",
                "endDate": "2024-07-01",
                "reason": "Urgent errand"
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
            Method::PUT,
            "/api/v1/leaves",
            Some(json!({
                "_id": leave_id,
                "status": "approved",
                "remarks": "Go ahead"
            })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status(), 200);
    let updated = response_json(response).await;
    assert_eq!(updated["data"]["status"], "approved");

    // A single-day emergency leave costs one day.
    let balance = app
        .state
        .balance_service()
        .get_or_default(employee.id)
        .await
        .expect("balance after put decision");
    assert_eq!(balance.emergency, 4);
}

#[tokio::test]
async fn submitting_beyond_the_balance_is_refused_for_employees() {
    let app = TestApp::new().await;
    let outlet = app.seed_outlet("Central").await;
    let (_employee, emp_token) = app
        .seed_user(
            UserRole::Employee,
            Some(outlet),
            "emp@test.com",
            "GS-EMP-001",
            "101",
        )
        .await;

    // Emergency allowance defaults to five days; ask for six.
    let response = app
        .request(
            Method::POST,
            "/api/v1/leaves",
            Some(json!({
                "leaveType": "emergency",
                "startDate": "2024-08-01",
                "endDate": "2024-08-06",
                "reason": "Too long"
            })),
            Some(&emp_token),
        )
        .await;
    assert_eq!(response.status(), 422);
}

#[tokio::test]
async fn start_after_end_is_rejected() {
    let app = TestApp::new().await;
    let outlet = app.seed_outlet("Central").await;
    let (_employee, emp_token) = app
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
                "startDate": "2024-03-12",
                "endDate": "2024-03-10",
                "reason": "Backwards range"
            })),
            Some(&emp_token),
        )
        .await;
    assert_eq!(response.status(), 400);
}
