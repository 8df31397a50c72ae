use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    db::DbPool,
    errors::ServiceError,
    events::{Event, EventSender},
    models::leave_balance,
};

/// Default yearly allocation granted to every new employee.
pub const DEFAULT_CASUAL: i32 = 12;
pub const DEFAULT_SICK: i32 = 12;
pub const DEFAULT_PAID: i32 = 20;
pub const DEFAULT_EMERGENCY: i32 = 5;

/// A full set of per-type day counters, used both for admin allocation and
/// as the default grant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct BalanceAllocation {
    pub casual: i32,
    pub sick: i32,
    pub paid: i32,
    pub emergency: i32,
}

impl BalanceAllocation {
    pub fn default_allocation() -> Self {
        Self {
            casual: DEFAULT_CASUAL,
            sick: DEFAULT_SICK,
            paid: DEFAULT_PAID,
            emergency: DEFAULT_EMERGENCY,
        }
    }

    fn ensure_non_negative(&self) -> Result<(), ServiceError> {
        if self.casual < 0 || self.sick < 0 || self.paid < 0 || self.emergency < 0 {
            return Err(ServiceError::ValidationError(
                "allocation values must be non-negative".into(),
            ));
        }
        Ok(())
    }
}

/// Inserts the default allocation row for a freshly created employee.
/// Runs on the caller's connection so user creation and the grant commit
/// together.
pub async fn create_default<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
) -> Result<(), ServiceError> {
    leave_balance::ActiveModel {
        user_id: Set(user_id),
        casual: Set(DEFAULT_CASUAL),
        sick: Set(DEFAULT_SICK),
        paid: Set(DEFAULT_PAID),
        emergency: Set(DEFAULT_EMERGENCY),
        updated_at: Set(Utc::now()),
    }
    .insert(conn)
    .await?;
    Ok(())
}

/// Service for reading and (admin-)allocating leave balances. Decrements on
/// approval are owned by the leave lifecycle, not this service.
#[derive(Clone)]
pub struct BalanceService {
    db: Arc<DbPool>,
    event_sender: EventSender,
}

impl BalanceService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    pub async fn list(&self) -> Result<Vec<leave_balance::Model>, ServiceError> {
        Ok(leave_balance::Entity::find().all(&*self.db).await?)
    }

    pub async fn list_for_users(
        &self,
        user_ids: Vec<Uuid>,
    ) -> Result<Vec<leave_balance::Model>, ServiceError> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(leave_balance::Entity::find()
            .filter(leave_balance::Column::UserId.is_in(user_ids))
            .all(&*self.db)
            .await?)
    }

    /// Reads a balance, falling back to the default allocation when no row
    /// exists yet for the user.
    pub async fn get_or_default(
        &self,
        user_id: Uuid,
    ) -> Result<leave_balance::Model, ServiceError> {
        let found = leave_balance::Entity::find_by_id(user_id)
            .one(&*self.db)
            .await?;
        Ok(found.unwrap_or_else(|| leave_balance::Model {
            user_id,
            casual: DEFAULT_CASUAL,
            sick: DEFAULT_SICK,
            paid: DEFAULT_PAID,
            emergency: DEFAULT_EMERGENCY,
            updated_at: Utc::now(),
        }))
    }

    /// Unconditional overwrite of a user's balance row (admin operation).
    #[instrument(skip(self))]
    pub async fn allocate(
        &self,
        user_id: Uuid,
        allocation: BalanceAllocation,
    ) -> Result<leave_balance::Model, ServiceError> {
        allocation.ensure_non_negative()?;

        let now = Utc::now();
        let row = leave_balance::ActiveModel {
            user_id: Set(user_id),
            casual: Set(allocation.casual),
            sick: Set(allocation.sick),
            paid: Set(allocation.paid),
            emergency: Set(allocation.emergency),
            updated_at: Set(now),
        };

        leave_balance::Entity::insert(row)
            .on_conflict(
                OnConflict::column(leave_balance::Column::UserId)
                    .update_columns([
                        leave_balance::Column::Casual,
                        leave_balance::Column::Sick,
                        leave_balance::Column::Paid,
                        leave_balance::Column::Emergency,
                        leave_balance::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&*self.db)
            .await?;

        info!(user_id = %user_id, "Leave balance allocated");
        self.event_sender.send(Event::BalanceAllocated(user_id)).await;

        Ok(leave_balance::Model {
            user_id,
            casual: allocation.casual,
            sick: allocation.sick,
            paid: allocation.paid,
            emergency: allocation.emergency,
            updated_at: now,
        })
    }
}
