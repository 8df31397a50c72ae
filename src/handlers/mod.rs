pub mod auth;
pub mod leave_balances;
pub mod leaves;
pub mod outlets;
pub mod signup_requests;
pub mod stats;
pub mod users;

use std::sync::Arc;

use crate::auth::AuthService;
use crate::config::AppConfig;
use crate::db::DbPool;
use crate::events::EventSender;
use crate::services::{
    balances::BalanceService, leaves::LeaveService, outlets::OutletService,
    signups::SignupService, stats::StatsService, users::UserService,
};

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Deserializer for nullable fields of partial-update bodies. An absent key
/// deserializes to `None` (leave untouched, via `#[serde(default)]`), an
/// explicit `null` to `Some(None)` (clear the column).
pub(crate) fn nullable_field<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(deserializer).map(Some)
}

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub auth: Arc<AuthService>,
    pub leaves: Arc<LeaveService>,
    pub balances: Arc<BalanceService>,
    pub signups: Arc<SignupService>,
    pub users: Arc<UserService>,
    pub outlets: Arc<OutletService>,
    pub stats: Arc<StatsService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender, config: &AppConfig) -> Self {
        Self {
            auth: Arc::new(AuthService::new(
                db_pool.clone(),
                config.jwt_secret.clone(),
                config.jwt_expiration,
            )),
            leaves: Arc::new(LeaveService::new(db_pool.clone(), event_sender.clone())),
            balances: Arc::new(BalanceService::new(db_pool.clone(), event_sender.clone())),
            signups: Arc::new(SignupService::new(
                db_pool.clone(),
                event_sender.clone(),
                config.employee_id_prefix.clone(),
            )),
            users: Arc::new(UserService::new(db_pool.clone(), event_sender.clone())),
            outlets: Arc::new(OutletService::new(db_pool.clone(), event_sender)),
            stats: Arc::new(StatsService::new(db_pool)),
        }
    }
}
