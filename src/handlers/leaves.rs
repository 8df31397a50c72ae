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
    models::{leave, LeaveStatus, LeaveType},
    services::leaves::{day_count, LeaveDecision, NewLeave, UpdateLeave},
    ApiResponse, ApiResult, AppState,
};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaveSummary {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub employee_name: String,
    pub outlet_id: Uuid,
    pub outlet_name: String,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub status: LeaveStatus,
    pub applied_on: NaiveDate,
    pub document: Option<String>,
    pub remarks: Option<String>,
    pub reviewed_by: Option<String>,
    pub reviewed_on: Option<NaiveDate>,
}

impl From<leave::Model> for LeaveSummary {
    fn from(model: leave::Model) -> Self {
        Self {
            id: model.id,
            employee_id: model.employee_id,
            employee_name: model.employee_name,
            outlet_id: model.outlet_id,
            outlet_name: model.outlet_name,
            leave_type: model.leave_type,
            start_date: model.start_date,
            end_date: model.end_date,
            reason: model.reason,
            status: model.status,
            applied_on: model.applied_on,
            document: model.document,
            remarks: model.remarks,
            reviewed_by: model.reviewed_by,
            reviewed_on: model.reviewed_on,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitLeaveRequest {
    /// Defaults to the caller; admins may submit on behalf of any employee.
    pub employee_id: Option<Uuid>,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[validate(length(min = 1, message = "reason cannot be empty"))]
    pub reason: String,
    pub document: Option<String>,
}

/// Generic update body. When `status` is present the request is treated as
/// a review decision; otherwise it merges editable fields of a pending
/// request.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLeaveRequest {
    #[serde(alias = "_id")]
    pub id: Uuid,
    pub status: Option<LeaveStatus>,
    pub remarks: Option<String>,
    pub reason: Option<String>,
    pub document: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteLeaveRequest {
    #[serde(alias = "_id")]
    pub id: Uuid,
}

#[derive(Debug, Deserialize, Default, ToSchema)]
pub struct DecisionRequest {
    pub remarks: Option<String>,
}

pub async fn list_leaves(
    State(state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<Vec<LeaveSummary>> {
    let scope = current.actor().leave_scope();
    let records = state.leave_service().list_leaves(scope).await?;
    let items = records.into_iter().map(LeaveSummary::from).collect();
    Ok(Json(ApiResponse::success(items)))
}

pub async fn get_leave(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<LeaveSummary> {
    let leave = state
        .leave_service()
        .get_leave(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Leave {} not found", id)))?;

    if !current.actor().can_view_leave(&leave) {
        return Err(ServiceError::Forbidden(
            "You cannot view this leave request".into(),
        ));
    }
    Ok(Json(ApiResponse::success(LeaveSummary::from(leave))))
}

pub async fn submit_leave(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(payload): Json<SubmitLeaveRequest>,
) -> ApiResult<LeaveSummary> {
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

    let actor = current.actor();
    let employee_id = payload.employee_id.unwrap_or(current.user_id);
    if !actor.can_submit_for(employee_id) {
        return Err(ServiceError::Forbidden(
            "You cannot submit a leave request for another employee".into(),
        ));
    }

    let employee = state
        .user_service()
        .get(employee_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("User {} not found", employee_id)))?;
    let outlet_id = employee.outlet_id.ok_or_else(|| {
        ServiceError::ValidationError("employee has no outlet assignment".into())
    })?;
    let outlet_name = state
        .outlet_service()
        .get(outlet_id)
        .await?
        .map(|o| o.name)
        .unwrap_or_default();

    // Advisory guard at the edge; admins may overdraw on behalf of staff,
    // and the decrement itself clamps at zero either way.
    if !actor.is_admin() {
        let balance = state.balance_service().get_or_default(employee.id).await?;
        let days = day_count(payload.start_date, payload.end_date);
        if days > i64::from(balance.days_remaining(payload.leave_type)) {
            return Err(ServiceError::InsufficientBalance(format!(
                "{} days requested but only {} remaining",
                days,
                balance.days_remaining(payload.leave_type)
            )));
        }
    }

    let created = state
        .leave_service()
        .submit_leave(NewLeave {
            employee_id: employee.id,
            employee_name: employee.name,
            outlet_id,
            outlet_name,
            leave_type: payload.leave_type,
            start_date: payload.start_date,
            end_date: payload.end_date,
            reason: payload.reason,
            document: payload.document,
        })
        .await?;

    Ok(Json(ApiResponse::success(LeaveSummary::from(created))))
}

pub async fn update_leave(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(payload): Json<UpdateLeaveRequest>,
) -> ApiResult<LeaveSummary> {
    let actor = current.actor();
    let leave = state
        .leave_service()
        .get_leave(payload.id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Leave {} not found", payload.id)))?;

    if let Some(status) = payload.status {
        let decision = match status {
            LeaveStatus::Approved => LeaveDecision::Approve,
            LeaveStatus::Rejected => LeaveDecision::Reject,
            LeaveStatus::Pending => {
                return Err(ServiceError::InvalidOperation(
                    "A leave request cannot be reset to pending".into(),
                ))
            }
        };
        if !actor.can_decide_leave(&leave) {
            return Err(ServiceError::Forbidden(
                "You cannot review this leave request".into(),
            ));
        }
        let updated = state
            .leave_service()
            .decide_leave(
                payload.id,
                decision,
                payload.remarks.unwrap_or_default(),
                &current.name,
            )
            .await?;
        return Ok(Json(ApiResponse::success(LeaveSummary::from(updated))));
    }

    if !actor.can_cancel_leave(&leave) {
        return Err(ServiceError::Forbidden(
            "You cannot edit this leave request".into(),
        ));
    }
    let updated = state
        .leave_service()
        .update_pending(
            payload.id,
            UpdateLeave {
                reason: payload.reason,
                document: payload.document,
            },
        )
        .await?;
    Ok(Json(ApiResponse::success(LeaveSummary::from(updated))))
}

pub async fn approve_leave(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
    payload: Option<Json<DecisionRequest>>,
) -> ApiResult<LeaveSummary> {
    decide(state, current, id, LeaveDecision::Approve, payload).await
}

pub async fn reject_leave(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
    payload: Option<Json<DecisionRequest>>,
) -> ApiResult<LeaveSummary> {
    decide(state, current, id, LeaveDecision::Reject, payload).await
}

async fn decide(
    state: AppState,
    current: CurrentUser,
    id: Uuid,
    decision: LeaveDecision,
    payload: Option<Json<DecisionRequest>>,
) -> ApiResult<LeaveSummary> {
    let leave = state
        .leave_service()
        .get_leave(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Leave {} not found", id)))?;

    if !current.actor().can_decide_leave(&leave) {
        return Err(ServiceError::Forbidden(
            "You cannot review this leave request".into(),
        ));
    }

    let remarks = payload
        .and_then(|Json(body)| body.remarks)
        .unwrap_or_default();
    let updated = state
        .leave_service()
        .decide_leave(id, decision, remarks, &current.name)
        .await?;
    Ok(Json(ApiResponse::success(LeaveSummary::from(updated))))
}

pub async fn delete_leave(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(payload): Json<DeleteLeaveRequest>,
) -> ApiResult<serde_json::Value> {
    let leave = state
        .leave_service()
        .get_leave(payload.id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Leave {} not found", payload.id)))?;

    if !current.actor().can_cancel_leave(&leave) {
        return Err(ServiceError::Forbidden(
            "You cannot withdraw this leave request".into(),
        ));
    }
    state.leave_service().delete_leave(payload.id).await?;
    Ok(Json(ApiResponse::success(serde_json::json!({
        "deleted": payload.id
    }))))
}
