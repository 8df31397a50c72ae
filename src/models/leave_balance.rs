use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::leave::LeaveType;

/// The `leave_balances` table: remaining allowed days per leave type, one
/// row per employee. Counters never go negative; decrements clamp at zero.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "leave_balances")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: Uuid,

    pub casual: i32,

    pub sick: i32,

    pub paid: i32,

    pub emergency: i32,

    pub updated_at: DateTimeUtc,
}

impl Model {
    /// Remaining days for the given leave type.
    pub fn days_remaining(&self, leave_type: LeaveType) -> i32 {
        match leave_type {
            LeaveType::Casual => self.casual,
            LeaveType::Sick => self.sick,
            LeaveType::Paid => self.paid,
            LeaveType::Emergency => self.emergency,
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
