use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request},
    routing::get,
    Router,
};
use leavedesk_api::{
    config::AppConfig,
    db,
    events::{self, EventSender},
    handlers::AppServices,
    models::{user, UserRole},
    services::users::NewUser,
    AppState,
};
use tokio::sync::mpsc;
use tower::ServiceExt;
use uuid::Uuid;

/// Helper harness for spinning up an application state backed by an
/// in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "test_secret_key_for_testing_purposes_only_32chars".to_string(),
            3600,
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.auto_migrate = true;
        // A single connection keeps every query on the same in-memory db.
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db_arc = Arc::new(pool);
        let (event_tx, event_rx) = mpsc::channel(256);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let services = AppServices::new(db_arc.clone(), event_sender.clone(), &cfg);

        let state = AppState {
            db: db_arc,
            config: cfg,
            event_sender,
            services,
        };

        let router = Router::new()
            .route("/", get(|| async { "leavedesk-api up" }))
            .route("/health", get(leavedesk_api::health_check))
            .nest("/api/v1", leavedesk_api::api_v1_routes())
            .nest("/auth", leavedesk_api::handlers::auth::auth_routes())
            .with_state(state.clone());

        Self {
            router,
            state,
            _event_task: event_task,
        }
    }

    /// Creates an outlet and returns its id.
    pub async fn seed_outlet(&self, name: &str) -> Uuid {
        let outlet = self
            .state
            .outlet_service()
            .create(leavedesk_api::services::outlets::NewOutlet {
                name: name.to_string(),
                address: "1 Test Street".to_string(),
                city: "Testville".to_string(),
                manager_id: None,
                employee_count: 0,
            })
            .await
            .expect("seed outlet");
        outlet.id
    }

    /// Creates a user of the given role and returns the record together
    /// with a bearer token for it. Employees are granted the default leave
    /// balance as part of creation.
    pub async fn seed_user(
        &self,
        role: UserRole,
        outlet_id: Option<Uuid>,
        email: &str,
        employee_id: &str,
        mobile: &str,
    ) -> (user::Model, String) {
        let password_hash = self
            .state
            .auth_service()
            .hash_password("secret123")
            .expect("hash test password");

        let user = self
            .state
            .user_service()
            .create(NewUser {
                email: email.to_string(),
                password_hash,
                name: format!("Test {}", employee_id),
                role,
                employee_id: employee_id.to_string(),
                mobile: mobile.to_string(),
                outlet_id,
            })
            .await
            .expect("seed user");

        let token = self
            .state
            .auth_service()
            .issue_token(&user)
            .expect("issue test token");
        (user, token)
    }

    /// Send a request against the router with an optional bearer token.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<serde_json::Value>,
        token: Option<&str>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(tok) = token {
            builder = builder.header("authorization", format!("Bearer {}", tok));
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self._event_task.abort();
    }
}
