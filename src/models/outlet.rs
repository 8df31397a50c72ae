use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The `outlets` table: one row per physical retail location. An outlet is
/// the unit of managerial scoping for leave decisions.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "outlets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub name: String,

    pub address: String,

    pub city: String,

    pub manager_id: Option<Uuid>,

    /// Denormalized head count, maintained by explicit admin edits rather
    /// than derived live.
    pub employee_count: i32,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
