//! LeaveDesk API Library
//!
//! This crate provides the core functionality for the LeaveDesk API: a
//! leave-management backend for a multi-outlet retail staff roster.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod migrator;
pub mod models;
pub mod openapi;
pub mod services;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use utoipa::ToSchema;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
}

impl AppState {
    pub fn auth_service(&self) -> Arc<auth::AuthService> {
        self.services.auth.clone()
    }

    pub fn leave_service(&self) -> Arc<services::leaves::LeaveService> {
        self.services.leaves.clone()
    }

    pub fn balance_service(&self) -> Arc<services::balances::BalanceService> {
        self.services.balances.clone()
    }

    pub fn signup_service(&self) -> Arc<services::signups::SignupService> {
        self.services.signups.clone()
    }

    pub fn user_service(&self) -> Arc<services::users::UserService> {
        self.services.users.clone()
    }

    pub fn outlet_service(&self) -> Arc<services::outlets::OutletService> {
        self.services.outlets.clone()
    }

    pub fn stats_service(&self) -> Arc<services::stats::StatsService> {
        self.services.stats.clone()
    }
}

// Common response wrapper
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub errors: Option<Vec<String>>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
            errors: None,
        }
    }

    pub fn validation_errors(errors: Vec<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some("Validation failed".to_string()),
            errors: Some(errors),
        }
    }
}

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

/// Shared 405 body. Every resource router installs this as its method
/// fallback so unsupported verbs answer with a JSON contract rather than
/// an empty response.
pub async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "message": "Method not allowed" })),
    )
}

pub fn api_v1_routes() -> Router<AppState> {
    use axum::routing::post;
    use handlers::{leave_balances, leaves, outlets, signup_requests, stats, users};

    let leave_routes = Router::new()
        .route(
            "/leaves",
            get(leaves::list_leaves)
                .post(leaves::submit_leave)
                .put(leaves::update_leave)
                .delete(leaves::delete_leave)
                .fallback(method_not_allowed),
        )
        .route(
            "/leaves/{id}",
            get(leaves::get_leave).fallback(method_not_allowed),
        )
        .route(
            "/leaves/{id}/approve",
            post(leaves::approve_leave).fallback(method_not_allowed),
        )
        .route(
            "/leaves/{id}/reject",
            post(leaves::reject_leave).fallback(method_not_allowed),
        );

    let balance_routes = Router::new().route(
        "/leaveBalances",
        get(leave_balances::list_balances)
            .put(leave_balances::allocate_balance)
            .fallback(method_not_allowed),
    );

    let outlet_routes = Router::new()
        .route(
            "/outlets",
            get(outlets::list_outlets)
                .post(outlets::create_outlet)
                .put(outlets::update_outlet)
                .delete(outlets::delete_outlet)
                .fallback(method_not_allowed),
        )
        .route(
            "/outlets/{id}",
            get(outlets::get_outlet).fallback(method_not_allowed),
        );

    let user_routes = Router::new()
        .route(
            "/users",
            get(users::list_users)
                .post(users::create_user)
                .put(users::update_user)
                .delete(users::delete_user)
                .fallback(method_not_allowed),
        )
        .route(
            "/users/{id}",
            get(users::get_user).fallback(method_not_allowed),
        );

    let signup_routes = Router::new()
        .route(
            "/signupRequests",
            get(signup_requests::list_signups)
                .post(signup_requests::submit_signup)
                .fallback(method_not_allowed),
        )
        .route(
            "/signupRequests/{id}",
            get(signup_requests::get_signup).fallback(method_not_allowed),
        )
        .route(
            "/signupRequests/{id}/approve",
            post(signup_requests::approve_signup).fallback(method_not_allowed),
        )
        .route(
            "/signupRequests/{id}/reject",
            post(signup_requests::reject_signup).fallback(method_not_allowed),
        );

    let stats_routes = Router::new().route(
        "/stats",
        get(stats::dashboard_stats).fallback(method_not_allowed),
    );

    Router::new()
        .merge(leave_routes)
        .merge(balance_routes)
        .merge(outlet_routes)
        .merge(user_routes)
        .merge(signup_routes)
        .merge(stats_routes)
}

pub async fn api_status() -> Result<Json<ApiResponse<Value>>, errors::ServiceError> {
    let version = env!("CARGO_PKG_VERSION");
    let status_data = json!({
        "status": "ok",
        "version": version,
        "service": "leavedesk-api",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "environment": std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
    });

    Ok(Json(ApiResponse::success(status_data)))
}

pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Value>>, errors::ServiceError> {
    let db_status = match state.db.ping().await {
        Ok(_) => "healthy",
        Err(_) => "unhealthy",
    };

    let health_data = json!({
        "status": db_status,
        "checks": {
            "database": db_status,
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    Ok(Json(ApiResponse::success(health_data)))
}
