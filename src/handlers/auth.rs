use axum::{extract::State, response::Json, routing::post, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    errors::ServiceError, handlers::users::UserSummary, method_not_allowed, ApiResponse,
    ApiResult, AppState,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// Email, staff id or mobile number.
    #[validate(length(min = 1, message = "identifier cannot be empty"))]
    pub identifier: String,
    #[validate(length(min = 1, message = "password cannot be empty"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserSummary,
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

    let (token, user) = state
        .auth_service()
        .login(&payload.identifier, &payload.password)
        .await?;

    Ok(Json(ApiResponse::success(LoginResponse {
        token,
        user: UserSummary::from(user),
    })))
}

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/login", post(login).fallback(method_not_allowed))
}
