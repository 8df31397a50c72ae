use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::Scope,
    db::DbPool,
    errors::ServiceError,
    events::{Event, EventSender},
    models::{leave, leave_balance, LeaveStatus, LeaveType},
};

/// Inclusive day count between two calendar dates. Both endpoints count;
/// time of day is never recorded, so no rounding is involved.
pub fn day_count(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// Fields supplied when an employee applies for leave.
#[derive(Debug, Clone)]
pub struct NewLeave {
    pub employee_id: Uuid,
    pub employee_name: String,
    pub outlet_id: Uuid,
    pub outlet_name: String,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub document: Option<String>,
}

/// The two terminal outcomes of a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveDecision {
    Approve,
    Reject,
}

impl LeaveDecision {
    fn target_status(self) -> LeaveStatus {
        match self {
            Self::Approve => LeaveStatus::Approved,
            Self::Reject => LeaveStatus::Rejected,
        }
    }
}

/// Mutable fields of a still-pending leave (generic merge updates).
#[derive(Debug, Clone, Default)]
pub struct UpdateLeave {
    pub reason: Option<String>,
    pub document: Option<String>,
}

/// Service owning the leave request lifecycle: submission, the one-shot
/// approve/reject decision, and the balance decrement that rides on
/// approval.
#[derive(Clone)]
pub struct LeaveService {
    db: Arc<DbPool>,
    event_sender: EventSender,
}

impl LeaveService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    /// Records a new leave request with status pending. Balances are not
    /// touched until approval.
    #[instrument(skip(self, input))]
    pub async fn submit_leave(&self, input: NewLeave) -> Result<leave::Model, ServiceError> {
        if input.start_date > input.end_date {
            return Err(ServiceError::ValidationError(
                "start date must not be after end date".into(),
            ));
        }
        if input.reason.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "reason must not be empty".into(),
            ));
        }

        let request = leave::ActiveModel {
            id: Set(Uuid::new_v4()),
            employee_id: Set(input.employee_id),
            employee_name: Set(input.employee_name),
            outlet_id: Set(input.outlet_id),
            outlet_name: Set(input.outlet_name),
            leave_type: Set(input.leave_type),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            reason: Set(input.reason),
            status: Set(LeaveStatus::Pending),
            applied_on: Set(Utc::now().date_naive()),
            document: Set(input.document),
            remarks: Set(None),
            reviewed_by: Set(None),
            reviewed_on: Set(None),
        };

        let saved = request.insert(&*self.db).await?;
        info!(leave_id = %saved.id, employee_id = %saved.employee_id, "Leave request submitted");
        self.event_sender.send(Event::LeaveSubmitted(saved.id)).await;
        Ok(saved)
    }

    pub async fn get_leave(&self, leave_id: Uuid) -> Result<Option<leave::Model>, ServiceError> {
        Ok(leave::Entity::find_by_id(leave_id).one(&*self.db).await?)
    }

    /// Lists leaves visible under the caller's scope, newest first.
    pub async fn list_leaves(&self, scope: Scope) -> Result<Vec<leave::Model>, ServiceError> {
        let mut query = leave::Entity::find();
        match scope {
            Scope::All => {}
            Scope::Outlet(outlet_id) => {
                query = query.filter(leave::Column::OutletId.eq(outlet_id));
            }
            Scope::SelfOnly(user_id) => {
                query = query.filter(leave::Column::EmployeeId.eq(user_id));
            }
        }
        Ok(query
            .order_by_desc(leave::Column::AppliedOn)
            .all(&*self.db)
            .await?)
    }

    /// Applies the reviewer's decision. The status flip is a
    /// compare-and-swap keyed on (id, status=pending), so a leave is
    /// decided at most once even under concurrent reviewers; the decision
    /// fields and the balance decrement commit in one transaction.
    #[instrument(skip(self, remarks))]
    pub async fn decide_leave(
        &self,
        leave_id: Uuid,
        decision: LeaveDecision,
        remarks: String,
        reviewer_name: &str,
    ) -> Result<leave::Model, ServiceError> {
        let txn = self.db.begin().await?;

        let current = leave::Entity::find_by_id(leave_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Leave {} not found", leave_id)))?;

        if current.status != LeaveStatus::Pending {
            return Err(ServiceError::InvalidStatus(format!(
                "Leave {} has already been decided",
                leave_id
            )));
        }

        let target = decision.target_status();
        let today = Utc::now().date_naive();

        let updated = leave::Entity::update_many()
            .col_expr(leave::Column::Status, Expr::value(target))
            .col_expr(leave::Column::Remarks, Expr::value(Some(remarks.clone())))
            .col_expr(
                leave::Column::ReviewedBy,
                Expr::value(Some(reviewer_name.to_string())),
            )
            .col_expr(leave::Column::ReviewedOn, Expr::value(Some(today)))
            .filter(leave::Column::Id.eq(leave_id))
            .filter(leave::Column::Status.eq(LeaveStatus::Pending))
            .exec(&txn)
            .await?;

        if updated.rows_affected == 0 {
            return Err(ServiceError::Conflict(format!(
                "Leave {} was decided concurrently",
                leave_id
            )));
        }

        if decision == LeaveDecision::Approve {
            self.apply_decrement(&txn, &current).await?;
        }

        txn.commit().await?;

        let event = match decision {
            LeaveDecision::Approve => Event::LeaveApproved(leave_id),
            LeaveDecision::Reject => Event::LeaveRejected(leave_id),
        };
        self.event_sender.send(event).await;

        Ok(leave::Model {
            status: target,
            remarks: Some(remarks),
            reviewed_by: Some(reviewer_name.to_string()),
            reviewed_on: Some(today),
            ..current
        })
    }

    /// Decrements the balance for the leave's type by its inclusive day
    /// count, clamping at zero. The day count comes from the stored dates,
    /// not from anything re-validated at decision time. A missing balance
    /// row skips the decrement rather than failing the approval.
    async fn apply_decrement(
        &self,
        txn: &DatabaseTransaction,
        leave: &leave::Model,
    ) -> Result<(), ServiceError> {
        let days = day_count(leave.start_date, leave.end_date) as i32;

        let Some(balance) = leave_balance::Entity::find_by_id(leave.employee_id)
            .one(txn)
            .await?
        else {
            warn!(employee_id = %leave.employee_id, "No balance record for employee; skipping decrement");
            return Ok(());
        };

        let remaining = (balance.days_remaining(leave.leave_type) - days).max(0);
        let mut active: leave_balance::ActiveModel = balance.into();
        match leave.leave_type {
            LeaveType::Casual => active.casual = Set(remaining),
            LeaveType::Sick => active.sick = Set(remaining),
            LeaveType::Paid => active.paid = Set(remaining),
            LeaveType::Emergency => active.emergency = Set(remaining),
        }
        active.updated_at = Set(Utc::now());
        active.update(txn).await?;
        Ok(())
    }

    /// Merges the mutable fields of a still-pending leave. Decided leaves
    /// are immutable apart from their decision fields, which only
    /// `decide_leave` writes.
    pub async fn update_pending(
        &self,
        leave_id: Uuid,
        changes: UpdateLeave,
    ) -> Result<leave::Model, ServiceError> {
        let current = leave::Entity::find_by_id(leave_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Leave {} not found", leave_id)))?;

        if current.status != LeaveStatus::Pending {
            return Err(ServiceError::InvalidStatus(format!(
                "Leave {} is no longer pending and cannot be edited",
                leave_id
            )));
        }

        let mut active: leave::ActiveModel = current.into();
        if let Some(reason) = changes.reason {
            if reason.trim().is_empty() {
                return Err(ServiceError::ValidationError(
                    "reason must not be empty".into(),
                ));
            }
            active.reason = Set(reason);
        }
        if let Some(document) = changes.document {
            active.document = Set(Some(document));
        }

        Ok(active.update(&*self.db).await?)
    }

    /// Removes a leave record (employee withdrawing a pending request, or
    /// an admin cleanup).
    pub async fn delete_leave(&self, leave_id: Uuid) -> Result<(), ServiceError> {
        let result = leave::Entity::delete_by_id(leave_id).exec(&*self.db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Leave {} not found",
                leave_id
            )));
        }
        self.event_sender.send(Event::LeaveCancelled(leave_id)).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn day_count_is_inclusive_of_both_endpoints() {
        assert_eq!(day_count(date(2024, 1, 15), date(2024, 1, 16)), 2);
        assert_eq!(day_count(date(2024, 3, 10), date(2024, 3, 12)), 3);
    }

    #[test]
    fn single_day_leave_counts_one() {
        assert_eq!(day_count(date(2024, 2, 14), date(2024, 2, 14)), 1);
    }

    #[test]
    fn day_count_spans_month_boundaries() {
        assert_eq!(day_count(date(2024, 1, 30), date(2024, 2, 2)), 4);
    }
}
