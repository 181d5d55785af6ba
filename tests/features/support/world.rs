//! Test world for Cucumber scenarios
//!
//! Each scenario gets its own database file and router; steps talk to the API
//! exactly as a client would.

use std::collections::HashMap;
use std::fmt;

use axum::{body::Body, http::Request, Router};
use chrono::Utc;
use cucumber::World;
use jsonwebtoken::{encode, EncodingKey, Header};
use tower::ServiceExt;
use uuid::Uuid;

use orgdesk::{
    api,
    config::{AppConfig, AuthConfig, DatabaseConfig, LoggingConfig, ServerConfig},
    db::{self, MemberRepository, UserRepository},
    middleware::auth::{Claims, TokenType},
    models::MemberRole,
    AppState,
};

const TEST_SECRET: &str = "cucumber_secret_key_that_is_at_least_32_bytes";

/// Test world that maintains state across scenario steps
#[derive(World)]
#[world(init = Self::new)]
pub struct TestWorld {
    app: Option<(Router, AppState)>,

    /// Seeded users by name
    pub users: HashMap<String, TestUser>,

    /// Organizations created during the scenario, by name
    pub organizations: HashMap<String, Uuid>,

    /// Response from last API call
    pub last_response: Option<TestResponse>,
}

impl fmt::Debug for TestWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestWorld")
            .field("users", &self.users)
            .field("organizations", &self.organizations)
            .field("last_response", &self.last_response)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Uuid,
    pub token: String,
}

#[derive(Debug, Clone)]
pub struct TestResponse {
    pub status: u16,
    pub body: serde_json::Value,
}

impl TestWorld {
    pub fn new() -> Self {
        Self {
            app: None,
            users: HashMap::new(),
            organizations: HashMap::new(),
            last_response: None,
        }
    }

    async fn app(&mut self) -> &(Router, AppState) {
        if self.app.is_none() {
            let db_path =
                std::env::temp_dir().join(format!("orgdesk_bdd_{}.db", Uuid::new_v4().simple()));
            let config = AppConfig {
                server: ServerConfig::default(),
                auth: AuthConfig {
                    jwt_secret: TEST_SECRET.to_string(),
                    token_expiry_hours: 1,
                },
                database: DatabaseConfig {
                    url: format!("sqlite://{}?mode=rwc", db_path.display()),
                    max_connections: 1,
                    min_connections: 1,
                    connect_timeout_secs: 30,
                    idle_timeout_secs: 600,
                },
                logging: LoggingConfig::default(),
            };

            let db = db::init_pool(&config.database)
                .await
                .expect("Failed to initialize scenario database");
            let state = AppState { config, db };
            self.app = Some((api::router(state.clone()), state));
        }

        self.app.as_ref().expect("app initialized above")
    }

    pub async fn create_user(&mut self, name: &str) {
        let (_, state) = self.app().await;
        let user = UserRepository::new(&state.db)
            .create(Some(name), &format!("{}@example.com", name.to_lowercase()))
            .await
            .expect("Failed to create user");

        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            name: user.name.clone(),
            iat: now,
            exp: now + 3600,
            nbf: now,
            jti: Uuid::new_v4().to_string(),
            token_type: TokenType::Access,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .expect("Failed to sign token");

        self.users
            .insert(name.to_string(), TestUser { id: user.id, token });
    }

    pub fn user(&self, name: &str) -> TestUser {
        self.users
            .get(name)
            .cloned()
            .unwrap_or_else(|| panic!("Unknown user {}", name))
    }

    pub fn organization(&self, name: &str) -> Uuid {
        *self
            .organizations
            .get(name)
            .unwrap_or_else(|| panic!("Unknown organization {}", name))
    }

    pub async fn add_member(&mut self, org: &str, user: &str, role: MemberRole) {
        let org_id = self.organization(org);
        let user_id = self.user(user).id;
        let (_, state) = self.app().await;
        MemberRepository::new(&state.db)
            .add(org_id, user_id, role)
            .await
            .expect("Failed to add member");
    }

    /// Send a request as `user` and remember the response
    pub async fn call(
        &mut self,
        user: &str,
        method: &str,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> &TestResponse {
        let token = self.user(user).token;
        let (router, _) = self.app().await;

        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("Authorization", format!("Bearer {}", token));
        if body.is_some() {
            builder = builder.header("Content-Type", "application/json");
        }
        let request = builder
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .expect("Failed to build request");

        let response = router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");
        let status = response.status().as_u16();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);

        self.last_response.insert(TestResponse { status, body })
    }

    pub fn response(&self) -> &TestResponse {
        self.last_response
            .as_ref()
            .expect("No response available")
    }
}
