use axum::{extract::State, response::Json};

use crate::{
    auth::CurrentUser, errors::ServiceError, services::stats::DashboardStats, ApiResponse,
    ApiResult, AppState,
};

/// Dashboard counters for managers and admins.
pub async fn dashboard_stats(
    State(state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<DashboardStats> {
    if !current.actor().can_view_stats() {
        return Err(ServiceError::Forbidden(
            "Dashboard statistics are restricted to managers and admins".into(),
        ));
    }
    let stats = state.stats_service().dashboard().await?;
    Ok(Json(ApiResponse::success(stats)))
}
