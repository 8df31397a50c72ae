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
    models::outlet,
    services::outlets::{NewOutlet, UpdateOutlet},
    ApiResponse, ApiResult, AppState,
};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OutletSummary {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub city: String,
    pub manager_id: Option<Uuid>,
    pub employee_count: i32,
}

impl From<outlet::Model> for OutletSummary {
    fn from(model: outlet::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            address: model.address,
            city: model.city,
            manager_id: model.manager_id,
            employee_count: model.employee_count,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOutletRequest {
    #[validate(length(min = 1, message = "name cannot be empty"))]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    pub manager_id: Option<Uuid>,
    #[serde(default)]
    pub employee_count: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutletRequest {
    #[serde(alias = "_id")]
    pub id: Uuid,
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    /// Absent leaves the assignment alone; an explicit `null` clears it.
    #[serde(default, deserialize_with = "crate::handlers::nullable_field")]
    pub manager_id: Option<Option<Uuid>>,
    pub employee_count: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteOutletRequest {
    #[serde(alias = "_id")]
    pub id: Uuid,
}

/// Listing is open to unauthenticated callers so the signup form can offer
/// the outlet choices.
pub async fn list_outlets(State(state): State<AppState>) -> ApiResult<Vec<OutletSummary>> {
    let records = state.outlet_service().list().await?;
    let items = records.into_iter().map(OutletSummary::from).collect();
    Ok(Json(ApiResponse::success(items)))
}

pub async fn get_outlet(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<OutletSummary> {
    let outlet = state
        .outlet_service()
        .get(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Outlet {} not found", id)))?;
    Ok(Json(ApiResponse::success(OutletSummary::from(outlet))))
}

pub async fn create_outlet(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(payload): Json<CreateOutletRequest>,
) -> ApiResult<OutletSummary> {
    if !current.actor().can_manage_outlets() {
        return Err(ServiceError::Forbidden(
            "Only admins can create outlets".into(),
        ));
    }
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

    let created = state
        .outlet_service()
        .create(NewOutlet {
            name: payload.name,
            address: payload.address,
            city: payload.city,
            manager_id: payload.manager_id,
            employee_count: payload.employee_count,
        })
        .await?;
    Ok(Json(ApiResponse::success(OutletSummary::from(created))))
}

pub async fn update_outlet(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(payload): Json<UpdateOutletRequest>,
) -> ApiResult<OutletSummary> {
    if !current.actor().can_manage_outlets() {
        return Err(ServiceError::Forbidden(
            "Only admins can update outlets".into(),
        ));
    }

    let updated = state
        .outlet_service()
        .update(
            payload.id,
            UpdateOutlet {
                name: payload.name,
                address: payload.address,
                city: payload.city,
                manager_id: payload.manager_id,
                employee_count: payload.employee_count,
            },
        )
        .await?;
    Ok(Json(ApiResponse::success(OutletSummary::from(updated))))
}

pub async fn delete_outlet(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(payload): Json<DeleteOutletRequest>,
) -> ApiResult<serde_json::Value> {
    if !current.actor().can_manage_outlets() {
        return Err(ServiceError::Forbidden(
            "Only admins can delete outlets".into(),
        ));
    }
    state.outlet_service().delete(payload.id).await?;
    Ok(Json(ApiResponse::success(serde_json::json!({
        "deleted": payload.id
    }))))
}
