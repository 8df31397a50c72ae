use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    auth::{policy::Scope, CurrentUser},
    errors::ServiceError,
    models::leave_balance,
    services::balances::BalanceAllocation,
    ApiResponse, ApiResult, AppState,
};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSummary {
    pub user_id: Uuid,
    pub casual: i32,
    pub sick: i32,
    pub paid: i32,
    pub emergency: i32,
}

impl From<leave_balance::Model> for BalanceSummary {
    fn from(model: leave_balance::Model) -> Self {
        Self {
            user_id: model.user_id,
            casual: model.casual,
            sick: model.sick,
            paid: model.paid,
            emergency: model.emergency,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AllocateBalanceRequest {
    pub user_id: Uuid,
    pub balance: BalanceAllocation,
}

/// Balances visible to the caller: admins see every record, managers the
/// staff of their outlet, employees only their own.
pub async fn list_balances(
    State(state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<Vec<BalanceSummary>> {
    let records = match current.actor().user_scope() {
        Scope::All => state.balance_service().list().await?,
        Scope::Outlet(_) => {
            let staff = state
                .user_service()
                .list(current.actor().user_scope())
                .await?;
            let ids = staff.into_iter().map(|u| u.id).collect();
            state.balance_service().list_for_users(ids).await?
        }
        Scope::SelfOnly(user_id) => {
            vec![state.balance_service().get_or_default(user_id).await?]
        }
    };

    let items = records.into_iter().map(BalanceSummary::from).collect();
    Ok(Json(ApiResponse::success(items)))
}

pub async fn allocate_balance(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(payload): Json<AllocateBalanceRequest>,
) -> ApiResult<BalanceSummary> {
    if !current.actor().can_allocate_balance() {
        return Err(ServiceError::Forbidden(
            "Only admins can adjust leave balances".into(),
        ));
    }

    let updated = state
        .balance_service()
        .allocate(payload.user_id, payload.balance)
        .await?;
    Ok(Json(ApiResponse::success(BalanceSummary::from(updated))))
}
