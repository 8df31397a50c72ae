use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Leave category; each carries its own balance counter per employee.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum LeaveType {
    #[sea_orm(string_value = "casual")]
    Casual,
    #[sea_orm(string_value = "sick")]
    Sick,
    #[sea_orm(string_value = "paid")]
    Paid,
    #[sea_orm(string_value = "emergency")]
    Emergency,
}

/// Lifecycle state of a leave request. The only legal transitions are
/// `Pending -> Approved` and `Pending -> Rejected`, each taken at most once.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum LeaveStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

/// The `leaves` table. Rows are immutable after creation except for the
/// decision fields (status, remarks, reviewed_by, reviewed_on), which are
/// written together exactly once.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "leaves")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// References `users.id`.
    pub employee_id: Uuid,

    /// Denormalized for display alongside the request.
    pub employee_name: String,

    pub outlet_id: Uuid,

    pub outlet_name: String,

    pub leave_type: LeaveType,

    /// First day of leave, inclusive.
    pub start_date: Date,

    /// Last day of leave, inclusive.
    pub end_date: Date,

    #[sea_orm(column_type = "Text")]
    pub reason: String,

    pub status: LeaveStatus,

    /// Date-only; time of day is not recorded.
    pub applied_on: Date,

    /// Optional supporting document reference (e.g. a medical certificate).
    pub document: Option<String>,

    pub remarks: Option<String>,

    pub reviewed_by: Option<String>,

    pub reviewed_on: Option<Date>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
