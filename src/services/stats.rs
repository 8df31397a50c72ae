use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{
    db::DbPool,
    errors::ServiceError,
    models::{leave, outlet, user, LeaveStatus, UserRole},
};

/// Aggregate counters for the admin dashboard.
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardStats {
    pub total_employees: u64,
    pub total_outlets: u64,
    pub pending_leaves: u64,
    pub approved_leaves: u64,
    pub rejected_leaves: u64,
}

#[derive(Clone)]
pub struct StatsService {
    db: Arc<DbPool>,
}

impl StatsService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    pub async fn dashboard(&self) -> Result<DashboardStats, ServiceError> {
        let db = &*self.db;

        let total_employees = user::Entity::find()
            .filter(user::Column::Role.eq(UserRole::Employee))
            .count(db)
            .await?;
        let total_outlets = outlet::Entity::find().count(db).await?;
        let pending_leaves = leave::Entity::find()
            .filter(leave::Column::Status.eq(LeaveStatus::Pending))
            .count(db)
            .await?;
        let approved_leaves = leave::Entity::find()
            .filter(leave::Column::Status.eq(LeaveStatus::Approved))
            .count(db)
            .await?;
        let rejected_leaves = leave::Entity::find()
            .filter(leave::Column::Status.eq(LeaveStatus::Rejected))
            .count(db)
            .await?;

        Ok(DashboardStats {
            total_employees,
            total_outlets,
            pending_leaves,
            approved_leaves,
            rejected_leaves,
        })
    }
}
