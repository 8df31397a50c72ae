use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    db::DbPool,
    errors::ServiceError,
    events::{Event, EventSender},
    models::{signup_request, user, SignupStatus, UserRole},
    services::balances,
};

/// Fields supplied by a prospective employee. The password arrives already
/// hashed; raw credentials never reach this layer.
#[derive(Debug, Clone)]
pub struct NewSignupRequest {
    pub full_name: String,
    pub email: String,
    pub mobile: String,
    pub password_hash: String,
    pub outlet_id: Uuid,
    pub department: String,
    pub designation: String,
}

/// Service for the self-registration workflow: pending requests that an
/// admin either approves (spawning an employee plus default balance) or
/// rejects with remarks.
#[derive(Clone)]
pub struct SignupService {
    db: Arc<DbPool>,
    event_sender: EventSender,
    employee_id_prefix: String,
    /// Serializes staff-id generation so racing approvals cannot mint the
    /// same sequence number.
    id_gen: Arc<Mutex<()>>,
}

impl SignupService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender, employee_id_prefix: String) -> Self {
        Self {
            db,
            event_sender,
            employee_id_prefix,
            id_gen: Arc::new(Mutex::new(())),
        }
    }

    #[instrument(skip(self, input))]
    pub async fn submit(
        &self,
        input: NewSignupRequest,
    ) -> Result<signup_request::Model, ServiceError> {
        let request = signup_request::ActiveModel {
            id: Set(Uuid::new_v4()),
            full_name: Set(input.full_name),
            email: Set(input.email),
            mobile: Set(input.mobile),
            password_hash: Set(input.password_hash),
            outlet_id: Set(input.outlet_id),
            department: Set(input.department),
            designation: Set(input.designation),
            status: Set(SignupStatus::Pending),
            applied_on: Set(Utc::now().date_naive()),
            remarks: Set(None),
        };

        let saved = request.insert(&*self.db).await?;
        info!(request_id = %saved.id, "Signup request submitted");
        self.event_sender.send(Event::SignupSubmitted(saved.id)).await;
        Ok(saved)
    }

    pub async fn list(&self) -> Result<Vec<signup_request::Model>, ServiceError> {
        Ok(signup_request::Entity::find()
            .order_by_desc(signup_request::Column::AppliedOn)
            .all(&*self.db)
            .await?)
    }

    pub async fn get(
        &self,
        request_id: Uuid,
    ) -> Result<Option<signup_request::Model>, ServiceError> {
        Ok(signup_request::Entity::find_by_id(request_id)
            .one(&*self.db)
            .await?)
    }

    /// Approves a pending request: flips its status (compare-and-swap on
    /// pending), mints the next staff id, and creates the employee User
    /// plus default LeaveBalance, all in one transaction under the
    /// id-generation lock.
    #[instrument(skip(self))]
    pub async fn approve(
        &self,
        request_id: Uuid,
    ) -> Result<(signup_request::Model, user::Model), ServiceError> {
        let _guard = self.id_gen.lock().await;
        let txn = self.db.begin().await?;

        let request = signup_request::Entity::find_by_id(request_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Signup request {} not found", request_id))
            })?;

        if request.status != SignupStatus::Pending {
            return Err(ServiceError::InvalidStatus(format!(
                "Signup request {} has already been decided",
                request_id
            )));
        }

        // The applicant's email must not already belong to a user.
        let existing = user::Entity::find()
            .filter(user::Column::Email.eq(request.email.clone()))
            .one(&txn)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "A user with email {} already exists",
                request.email
            )));
        }

        let updated = signup_request::Entity::update_many()
            .col_expr(
                signup_request::Column::Status,
                Expr::value(SignupStatus::Approved),
            )
            .filter(signup_request::Column::Id.eq(request_id))
            .filter(signup_request::Column::Status.eq(SignupStatus::Pending))
            .exec(&txn)
            .await?;
        if updated.rows_affected == 0 {
            return Err(ServiceError::Conflict(format!(
                "Signup request {} was decided concurrently",
                request_id
            )));
        }

        let employee_id = self.next_employee_id(&txn).await?;
        let now = Utc::now();
        let new_user = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(request.email.clone()),
            password_hash: Set(request.password_hash.clone()),
            name: Set(request.full_name.clone()),
            role: Set(UserRole::Employee),
            employee_id: Set(employee_id),
            mobile: Set(request.mobile.clone()),
            outlet_id: Set(Some(request.outlet_id)),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        balances::create_default(&txn, new_user.id).await?;

        txn.commit().await?;

        info!(
            request_id = %request_id,
            user_id = %new_user.id,
            employee_id = %new_user.employee_id,
            "Signup request approved"
        );
        self.event_sender
            .send(Event::SignupApproved {
                request_id,
                user_id: new_user.id,
            })
            .await;

        Ok((
            signup_request::Model {
                status: SignupStatus::Approved,
                ..request
            },
            new_user,
        ))
    }

    /// Rejects a pending request, recording the reviewer's remarks.
    /// Remarks are mandatory for rejections; no User is created.
    #[instrument(skip(self, remarks))]
    pub async fn reject(
        &self,
        request_id: Uuid,
        remarks: String,
    ) -> Result<signup_request::Model, ServiceError> {
        if remarks.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "remarks are required when rejecting a signup request".into(),
            ));
        }

        let request = signup_request::Entity::find_by_id(request_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Signup request {} not found", request_id))
            })?;

        if request.status != SignupStatus::Pending {
            return Err(ServiceError::InvalidStatus(format!(
                "Signup request {} has already been decided",
                request_id
            )));
        }

        let updated = signup_request::Entity::update_many()
            .col_expr(
                signup_request::Column::Status,
                Expr::value(SignupStatus::Rejected),
            )
            .col_expr(
                signup_request::Column::Remarks,
                Expr::value(Some(remarks.clone())),
            )
            .filter(signup_request::Column::Id.eq(request_id))
            .filter(signup_request::Column::Status.eq(SignupStatus::Pending))
            .exec(&*self.db)
            .await?;
        if updated.rows_affected == 0 {
            return Err(ServiceError::Conflict(format!(
                "Signup request {} was decided concurrently",
                request_id
            )));
        }

        self.event_sender.send(Event::SignupRejected(request_id)).await;

        Ok(signup_request::Model {
            status: SignupStatus::Rejected,
            remarks: Some(remarks),
            ..request
        })
    }

    /// Next staff id, `<prefix>-NNN`: one past the highest sequence number
    /// currently in use among employees. Callers hold `id_gen`.
    async fn next_employee_id<C: ConnectionTrait>(&self, conn: &C) -> Result<String, ServiceError> {
        let prefix = format!("{}-", self.employee_id_prefix);
        let employees = user::Entity::find()
            .filter(user::Column::Role.eq(UserRole::Employee))
            .all(conn)
            .await?;

        let highest = employees
            .iter()
            .filter_map(|u| u.employee_id.strip_prefix(&prefix))
            .filter_map(|suffix| suffix.parse::<u32>().ok())
            .max()
            .unwrap_or(0);

        Ok(format!("{}{:03}", prefix, highest + 1))
    }
}
