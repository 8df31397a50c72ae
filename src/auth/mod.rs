pub mod policy;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    db::DbPool,
    errors::ServiceError,
    models::{user, UserRole},
    AppState,
};

pub use policy::{Actor, Scope};

/// JWT claims carried by every bearer token. The role and outlet ride along
/// so access checks do not need a user lookup per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub name: String,
    pub role: UserRole,
    pub outlet_id: Option<Uuid>,
    pub iat: usize,
    pub exp: usize,
}

/// Credential verification and token issuance.
///
/// The login identifier matches email, staff id or mobile interchangeably.
/// Passwords are stored as argon2 hashes only.
#[derive(Clone)]
pub struct AuthService {
    db: Arc<DbPool>,
    jwt_secret: String,
    jwt_expiration: usize,
}

impl AuthService {
    pub fn new(db: Arc<DbPool>, jwt_secret: String, jwt_expiration: usize) -> Self {
        Self {
            db,
            jwt_secret,
            jwt_expiration,
        }
    }

    pub fn hash_password(&self, password: &str) -> Result<String, ServiceError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| ServiceError::HashError(e.to_string()))
    }

    pub fn verify_password(hash: &str, password: &str) -> bool {
        PasswordHash::new(hash)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }

    pub fn issue_token(&self, user: &user::Model) -> Result<String, ServiceError> {
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: user.id,
            name: user.name.clone(),
            role: user.role,
            outlet_id: user.outlet_id,
            iat: now,
            exp: now + self.jwt_expiration,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| ServiceError::AuthError(format!("Failed to issue token: {}", e)))
    }

    pub fn decode_token(&self, token: &str) -> Result<Claims, ServiceError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| ServiceError::Unauthorized("Invalid or expired token".into()))
    }

    /// Verifies credentials and issues a token. The identifier is matched
    /// against email, employee id and mobile; lookup misses and password
    /// mismatches are indistinguishable to the caller.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<(String, user::Model), ServiceError> {
        let found = user::Entity::find()
            .filter(
                Condition::any()
                    .add(user::Column::Email.eq(identifier))
                    .add(user::Column::EmployeeId.eq(identifier))
                    .add(user::Column::Mobile.eq(identifier)),
            )
            .filter(user::Column::Active.eq(true))
            .one(&*self.db)
            .await?;

        let user = match found {
            Some(user) if Self::verify_password(&user.password_hash, password) => user,
            _ => return Err(ServiceError::AuthError("Invalid credentials".into())),
        };

        let token = self.issue_token(&user)?;
        Ok((token, user))
    }
}

/// Authenticated caller, extracted from the bearer token.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: Uuid,
    pub name: String,
    pub role: UserRole,
    pub outlet_id: Option<Uuid>,
}

impl CurrentUser {
    pub fn actor(&self) -> Actor {
        Actor {
            user_id: self.user_id,
            role: self.role,
            outlet_id: self.outlet_id,
        }
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ServiceError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ServiceError::Unauthorized("Missing authorization header".into()))?;

        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or_else(|| ServiceError::Unauthorized("Malformed authorization header".into()))?;

        let claims = state.services.auth.decode_token(token)?;
        Ok(CurrentUser {
            user_id: claims.sub,
            name: claims.name,
            role: claims.role,
            outlet_id: claims.outlet_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_round_trip() {
        let service = AuthService::new(
            Arc::new(sea_orm::DatabaseConnection::Disconnected),
            "test_secret_key_for_testing_purposes_only_32chars".into(),
            3600,
        );
        let hash = service.hash_password("emp123").unwrap();
        assert_ne!(hash, "emp123");
        assert!(AuthService::verify_password(&hash, "emp123"));
        assert!(!AuthService::verify_password(&hash, "wrong"));
    }

    #[test]
    fn token_round_trip_preserves_claims() {
        let service = AuthService::new(
            Arc::new(sea_orm::DatabaseConnection::Disconnected),
            "test_secret_key_for_testing_purposes_only_32chars".into(),
            3600,
        );
        let outlet = Uuid::new_v4();
        let user = user::Model {
            id: Uuid::new_v4(),
            email: "emp1@groversweets.example".into(),
            password_hash: "x".into(),
            name: "Rahul Gupta".into(),
            role: UserRole::Employee,
            employee_id: "GS-EMP-001".into(),
            mobile: "9876543220".into(),
            outlet_id: Some(outlet),
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let token = service.issue_token(&user).unwrap();
        let claims = service.decode_token(&token).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.role, UserRole::Employee);
        assert_eq!(claims.outlet_id, Some(outlet));
    }
}
