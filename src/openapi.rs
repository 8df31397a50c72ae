use axum::{response::Json, routing::get, Router};
use utoipa::OpenApi;

use crate::{handlers, models, services, AppState};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "LeaveDesk API",
        version = "1.0.0",
        description = r#"
# LeaveDesk API

Leave management for multi-outlet retail staff: leave requests with a
one-shot approve/reject review, per-employee leave balances, outlet and
user administration, and a self-service signup workflow.

## Authentication

All endpoints except login, signup submission and the outlet listing
require a JWT bearer token:

```
Authorization: Bearer <your-jwt-token>
```
        "#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:8080/api/v1", description = "Local development")
    ),
    tags(
        (name = "Leaves", description = "Leave request lifecycle"),
        (name = "Leave Balances", description = "Per-employee day counters"),
        (name = "Outlets", description = "Outlet administration"),
        (name = "Users", description = "Staff roster administration"),
        (name = "Signup Requests", description = "Self-service registration"),
        (name = "Auth", description = "Login and tokens")
    ),
    components(schemas(
        models::LeaveStatus,
        models::LeaveType,
        models::SignupStatus,
        models::UserRole,
        handlers::leaves::LeaveSummary,
        handlers::leaves::SubmitLeaveRequest,
        handlers::leaves::UpdateLeaveRequest,
        handlers::leaves::DecisionRequest,
        handlers::leave_balances::BalanceSummary,
        handlers::leave_balances::AllocateBalanceRequest,
        handlers::outlets::OutletSummary,
        handlers::outlets::CreateOutletRequest,
        handlers::outlets::UpdateOutletRequest,
        handlers::users::UserSummary,
        handlers::users::CreateUserRequest,
        handlers::users::UpdateUserRequest,
        handlers::signup_requests::SignupSummary,
        handlers::signup_requests::CreateSignupRequest,
        handlers::signup_requests::RejectSignupRequest,
        handlers::auth::LoginRequest,
        handlers::auth::LoginResponse,
        services::balances::BalanceAllocation,
        services::stats::DashboardStats,
    ))
)]
pub struct ApiDoc;

async fn serve_openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api-docs/openapi.json", get(serve_openapi))
}
