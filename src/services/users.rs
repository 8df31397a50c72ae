use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set, TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::{AuthService, Scope},
    config::AppConfig,
    db::DbPool,
    errors::ServiceError,
    events::{Event, EventSender},
    models::{leave_balance, user, UserRole},
    services::balances,
};

/// Fields for an admin-created user of any role. The password arrives
/// already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: UserRole,
    pub employee_id: String,
    pub mobile: String,
    pub outlet_id: Option<Uuid>,
}

/// Partial update; absent fields are left untouched. The outlet assignment
/// uses a nested option so `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub name: Option<String>,
    pub mobile: Option<String>,
    pub role: Option<UserRole>,
    pub outlet_id: Option<Option<Uuid>>,
    pub active: Option<bool>,
}

/// Admin-facing staff roster management. Creating an employee also grants
/// the default leave balance in the same transaction.
#[derive(Clone)]
pub struct UserService {
    db: Arc<DbPool>,
    event_sender: EventSender,
}

impl UserService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: NewUser) -> Result<user::Model, ServiceError> {
        let email_taken = user::Entity::find()
            .filter(user::Column::Email.eq(input.email.clone()))
            .one(&*self.db)
            .await?
            .is_some();
        if email_taken {
            return Err(ServiceError::Conflict(format!(
                "A user with email {} already exists",
                input.email
            )));
        }

        let staff_id_taken = user::Entity::find()
            .filter(user::Column::EmployeeId.eq(input.employee_id.clone()))
            .one(&*self.db)
            .await?
            .is_some();
        if staff_id_taken {
            return Err(ServiceError::Conflict(format!(
                "Staff id {} is already assigned",
                input.employee_id
            )));
        }

        let txn = self.db.begin().await?;
        let now = Utc::now();
        let created = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(input.email),
            password_hash: Set(input.password_hash),
            name: Set(input.name),
            role: Set(input.role),
            employee_id: Set(input.employee_id),
            mobile: Set(input.mobile),
            outlet_id: Set(input.outlet_id),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        if created.role == UserRole::Employee {
            balances::create_default(&txn, created.id).await?;
        }
        txn.commit().await?;

        info!(user_id = %created.id, employee_id = %created.employee_id, "User created");
        self.event_sender.send(Event::UserCreated(created.id)).await;
        Ok(created)
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        changes: UpdateUser,
    ) -> Result<user::Model, ServiceError> {
        let current = user::Entity::find_by_id(user_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User {} not found", user_id)))?;

        let mut active: user::ActiveModel = current.into();
        if let Some(email) = changes.email {
            active.email = Set(email);
        }
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(mobile) = changes.mobile {
            active.mobile = Set(mobile);
        }
        if let Some(role) = changes.role {
            active.role = Set(role);
        }
        if let Some(outlet_id) = changes.outlet_id {
            active.outlet_id = Set(outlet_id);
        }
        if let Some(is_active) = changes.active {
            active.active = Set(is_active);
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(&*self.db).await?;
        self.event_sender.send(Event::UserUpdated(user_id)).await;
        Ok(updated)
    }

    /// Removes a user and the owned balance row together, so a balance
    /// never outlives its user.
    pub async fn delete(&self, user_id: Uuid) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;
        leave_balance::Entity::delete_by_id(user_id).exec(&txn).await?;
        let result = user::Entity::delete_by_id(user_id).exec(&txn).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "User {} not found",
                user_id
            )));
        }
        txn.commit().await?;

        self.event_sender.send(Event::UserDeleted(user_id)).await;
        Ok(())
    }

    pub async fn get(&self, user_id: Uuid) -> Result<Option<user::Model>, ServiceError> {
        Ok(user::Entity::find_by_id(user_id).one(&*self.db).await?)
    }

    pub async fn list(&self, scope: Scope) -> Result<Vec<user::Model>, ServiceError> {
        let mut query = user::Entity::find();
        match scope {
            Scope::All => {}
            Scope::Outlet(outlet_id) => {
                query = query.filter(user::Column::OutletId.eq(outlet_id));
            }
            Scope::SelfOnly(user_id) => {
                query = query.filter(user::Column::Id.eq(user_id));
            }
        }
        Ok(query.all(&*self.db).await?)
    }

    /// Seeds the configured admin account when the user table is empty,
    /// so a fresh deployment has a way in.
    pub async fn ensure_bootstrap_admin(
        &self,
        cfg: &AppConfig,
        auth: &AuthService,
    ) -> Result<(), ServiceError> {
        let (Some(email), Some(password)) = (
            cfg.bootstrap_admin_email.clone(),
            cfg.bootstrap_admin_password.clone(),
        ) else {
            return Ok(());
        };

        let existing = user::Entity::find().count(&*self.db).await?;
        if existing > 0 {
            return Ok(());
        }

        let password_hash = auth.hash_password(&password)?;
        let admin = self
            .create(NewUser {
                email,
                password_hash,
                name: cfg
                    .bootstrap_admin_name
                    .clone()
                    .unwrap_or_else(|| "Administrator".to_string()),
                role: UserRole::Admin,
                employee_id: "GS-ADMIN-001".to_string(),
                mobile: String::new(),
                outlet_id: None,
            })
            .await?;

        info!(user_id = %admin.id, "Bootstrap admin created");
        Ok(())
    }
}
