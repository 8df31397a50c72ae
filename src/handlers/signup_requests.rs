use axum::{
    extract::{Path, State},
    response::Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::CurrentUser,
    errors::ServiceError,
    handlers::users::UserSummary,
    models::{signup_request, SignupStatus},
    services::signups::NewSignupRequest,
    ApiResponse, ApiResult, AppState,
};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupSummary {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub mobile: String,
    pub outlet_id: Uuid,
    pub department: String,
    pub designation: String,
    pub status: SignupStatus,
    pub applied_on: NaiveDate,
    pub remarks: Option<String>,
}

impl From<signup_request::Model> for SignupSummary {
    fn from(model: signup_request::Model) -> Self {
        Self {
            id: model.id,
            full_name: model.full_name,
            email: model.email,
            mobile: model.mobile,
            outlet_id: model.outlet_id,
            department: model.department,
            designation: model.designation,
            status: model.status,
            applied_on: model.applied_on,
            remarks: model.remarks,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSignupRequest {
    #[validate(length(min = 1, message = "full name cannot be empty"))]
    pub full_name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 1, message = "mobile cannot be empty"))]
    pub mobile: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
    pub outlet_id: Uuid,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub designation: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RejectSignupRequest {
    #[validate(length(min = 1, message = "remarks are required when rejecting"))]
    pub remarks: String,
}

/// Approval response carries both the reviewed request and the employee
/// account it spawned.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApproveSignupResponse {
    pub request: SignupSummary,
    pub user: UserSummary,
}

/// Public endpoint; prospective employees have no account yet. The
/// password is hashed before it leaves this handler.
pub async fn submit_signup(
    State(state): State<AppState>,
    Json(payload): Json<CreateSignupRequest>,
) -> ApiResult<SignupSummary> {
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

    let outlet = state.outlet_service().get(payload.outlet_id).await?;
    if outlet.is_none() {
        return Err(ServiceError::ValidationError(
            "unknown outlet".into(),
        ));
    }

    let password_hash = state.auth_service().hash_password(&payload.password)?;
    let created = state
        .signup_service()
        .submit(NewSignupRequest {
            full_name: payload.full_name,
            email: payload.email,
            mobile: payload.mobile,
            password_hash,
            outlet_id: payload.outlet_id,
            department: payload.department,
            designation: payload.designation,
        })
        .await?;
    Ok(Json(ApiResponse::success(SignupSummary::from(created))))
}

pub async fn list_signups(
    State(state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<Vec<SignupSummary>> {
    if !current.actor().can_review_signups() {
        return Err(ServiceError::Forbidden(
            "Only admins can view signup requests".into(),
        ));
    }
    let records = state.signup_service().list().await?;
    let items = records.into_iter().map(SignupSummary::from).collect();
    Ok(Json(ApiResponse::success(items)))
}

pub async fn get_signup(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<SignupSummary> {
    if !current.actor().can_review_signups() {
        return Err(ServiceError::Forbidden(
            "Only admins can view signup requests".into(),
        ));
    }
    let request = state
        .signup_service()
        .get(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Signup request {} not found", id)))?;
    Ok(Json(ApiResponse::success(SignupSummary::from(request))))
}

pub async fn approve_signup(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<ApproveSignupResponse> {
    if !current.actor().can_review_signups() {
        return Err(ServiceError::Forbidden(
            "Only admins can review signup requests".into(),
        ));
    }
    let (request, user) = state.signup_service().approve(id).await?;
    Ok(Json(ApiResponse::success(ApproveSignupResponse {
        request: SignupSummary::from(request),
        user: UserSummary::from(user),
    })))
}

pub async fn reject_signup(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RejectSignupRequest>,
) -> ApiResult<SignupSummary> {
    if !current.actor().can_review_signups() {
        return Err(ServiceError::Forbidden(
            "Only admins can review signup requests".into(),
        ));
    }
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

    let rejected = state.signup_service().reject(id, payload.remarks).await?;
    Ok(Json(ApiResponse::success(SignupSummary::from(rejected))))
}
