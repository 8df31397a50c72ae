use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::CurrentUser,
    errors::ServiceError,
    models::{user, UserRole},
    services::users::{NewUser, UpdateUser},
    ApiResponse, ApiResult, AppState,
};

/// A user record as exposed over the API. The password hash never leaves
/// the server.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub employee_id: String,
    pub mobile: String,
    pub outlet_id: Option<Uuid>,
    pub active: bool,
}

impl From<user::Model> for UserSummary {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            name: model.name,
            role: model.role,
            employee_id: model.employee_id,
            mobile: model.mobile,
            outlet_id: model.outlet_id,
            active: model.active,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "name cannot be empty"))]
    pub name: String,
    pub role: UserRole,
    #[validate(length(min = 1, message = "employee id cannot be empty"))]
    pub employee_id: String,
    #[validate(length(min = 1, message = "mobile cannot be empty"))]
    pub mobile: String,
    pub outlet_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(alias = "_id")]
    pub id: Uuid,
    pub email: Option<String>,
    pub name: Option<String>,
    pub mobile: Option<String>,
    pub role: Option<UserRole>,
    /// Absent leaves the assignment alone; an explicit `null` clears it.
    #[serde(default, deserialize_with = "crate::handlers::nullable_field")]
    pub outlet_id: Option<Option<Uuid>>,
    pub active: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteUserRequest {
    #[serde(alias = "_id")]
    pub id: Uuid,
}

pub async fn list_users(
    State(state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<Vec<UserSummary>> {
    let scope = current.actor().user_scope();
    let records = state.user_service().list(scope).await?;
    let items = records.into_iter().map(UserSummary::from).collect();
    Ok(Json(ApiResponse::success(items)))
}

pub async fn get_user(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<UserSummary> {
    let user = state
        .user_service()
        .get(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("User {} not found", id)))?;

    if !current.actor().can_view_user(&user) {
        return Err(ServiceError::Forbidden(
            "You cannot view this user".into(),
        ));
    }
    Ok(Json(ApiResponse::success(UserSummary::from(user))))
}

pub async fn create_user(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<UserSummary> {
    if !current.actor().can_manage_users() {
        return Err(ServiceError::Forbidden(
            "Only admins can create users".into(),
        ));
    }
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

    let password_hash = state.auth_service().hash_password(&payload.password)?;
    let created = state
        .user_service()
        .create(NewUser {
            email: payload.email,
            password_hash,
            name: payload.name,
            role: payload.role,
            employee_id: payload.employee_id,
            mobile: payload.mobile,
            outlet_id: payload.outlet_id,
        })
        .await?;

    Ok(Json(ApiResponse::success(UserSummary::from(created))))
}

pub async fn update_user(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(payload): Json<UpdateUserRequest>,
) -> ApiResult<UserSummary> {
    if !current.actor().can_manage_users() {
        return Err(ServiceError::Forbidden(
            "Only admins can update users".into(),
        ));
    }

    let updated = state
        .user_service()
        .update(
            payload.id,
            UpdateUser {
                email: payload.email,
                name: payload.name,
                mobile: payload.mobile,
                role: payload.role,
                outlet_id: payload.outlet_id,
                active: payload.active,
            },
        )
        .await?;

    Ok(Json(ApiResponse::success(UserSummary::from(updated))))
}

pub async fn delete_user(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(payload): Json<DeleteUserRequest>,
) -> ApiResult<serde_json::Value> {
    if !current.actor().can_manage_users() {
        return Err(ServiceError::Forbidden(
            "Only admins can delete users".into(),
        ));
    }
    state.user_service().delete(payload.id).await?;
    Ok(Json(ApiResponse::success(serde_json::json!({
        "deleted": payload.id
    }))))
}
