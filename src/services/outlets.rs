use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    db::DbPool,
    errors::ServiceError,
    events::{Event, EventSender},
    models::outlet,
};

#[derive(Debug, Clone)]
pub struct NewOutlet {
    pub name: String,
    pub address: String,
    pub city: String,
    pub manager_id: Option<Uuid>,
    pub employee_count: i32,
}

/// Partial update; absent fields are left untouched. The manager assignment
/// uses a nested option so `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct UpdateOutlet {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub manager_id: Option<Option<Uuid>>,
    pub employee_count: Option<i32>,
}

/// Admin-facing outlet roster management.
#[derive(Clone)]
pub struct OutletService {
    db: Arc<DbPool>,
    event_sender: EventSender,
}

impl OutletService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: NewOutlet) -> Result<outlet::Model, ServiceError> {
        if input.name.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "outlet name must not be empty".into(),
            ));
        }

        let now = Utc::now();
        let created = outlet::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            address: Set(input.address),
            city: Set(input.city),
            manager_id: Set(input.manager_id),
            employee_count: Set(input.employee_count.max(0)),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.db)
        .await?;

        info!(outlet_id = %created.id, name = %created.name, "Outlet created");
        self.event_sender.send(Event::OutletCreated(created.id)).await;
        Ok(created)
    }

    pub async fn update(
        &self,
        outlet_id: Uuid,
        changes: UpdateOutlet,
    ) -> Result<outlet::Model, ServiceError> {
        let current = outlet::Entity::find_by_id(outlet_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Outlet {} not found", outlet_id)))?;

        let mut active: outlet::ActiveModel = current.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(address) = changes.address {
            active.address = Set(address);
        }
        if let Some(city) = changes.city {
            active.city = Set(city);
        }
        if let Some(manager_id) = changes.manager_id {
            active.manager_id = Set(manager_id);
        }
        if let Some(employee_count) = changes.employee_count {
            active.employee_count = Set(employee_count.max(0));
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(&*self.db).await?;
        self.event_sender.send(Event::OutletUpdated(outlet_id)).await;
        Ok(updated)
    }

    pub async fn delete(&self, outlet_id: Uuid) -> Result<(), ServiceError> {
        let result = outlet::Entity::delete_by_id(outlet_id).exec(&*self.db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Outlet {} not found",
                outlet_id
            )));
        }
        self.event_sender.send(Event::OutletDeleted(outlet_id)).await;
        Ok(())
    }

    pub async fn get(&self, outlet_id: Uuid) -> Result<Option<outlet::Model>, ServiceError> {
        Ok(outlet::Entity::find_by_id(outlet_id).one(&*self.db).await?)
    }

    pub async fn list(&self) -> Result<Vec<outlet::Model>, ServiceError> {
        Ok(outlet::Entity::find()
            .order_by_asc(outlet::Column::Name)
            .all(&*self.db)
            .await?)
    }
}
