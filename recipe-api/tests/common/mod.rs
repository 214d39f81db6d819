//! Common test utilities for HTTP tests
//!
//! Every test gets its own router backed by a fresh in-memory store, so
//! tests are independent and need no database.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use recipe_api::app::{build_router, AppState};
use recipe_api::config::{ApiConfig, Config, DatabaseConfig};
use recipe_shared::accounts::{issue_token, UserManager};
use recipe_shared::db::memory::MemoryStore;
use recipe_shared::models::user::{NewUserFields, User};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const CREATE_USER_URL: &str = "/api/user/create/";
pub const TOKEN_URL: &str = "/api/user/token/";
pub const ME_URL: &str = "/api/user/me/";
pub const TAGS_URL: &str = "/api/recipe/tags/";

/// Test context: the router plus direct access to its store
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub app: axum::Router,
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                ..Default::default()
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/unused".to_string(),
                max_connections: 1,
            },
        };

        let app = build_router(AppState::new(store.clone(), config));

        Self { store, app }
    }

    /// Creates a user directly through the manager
    pub async fn create_user(&self, email: &str, password: &str, name: &str) -> User {
        UserManager::new(self.store.as_ref())
            .create_user(Some(email), password, NewUserFields::named(name))
            .await
            .expect("user should be created")
    }

    /// Issues a token for existing credentials
    pub async fn token_for(&self, email: &str, password: &str) -> String {
        issue_token(self.store.as_ref(), email, password)
            .await
            .expect("token should be issued")
            .token
    }

    /// Creates a user and returns it with a valid token
    pub async fn authenticated_user(&self, email: &str) -> (User, String) {
        let user = self.create_user(email, "testpass123", "Test Name").await;
        let token = self.token_for(email, "testpass123").await;
        (user, token)
    }

    /// Sends a request through a clone of the router
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Token {}", token));
        }

        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap()
    }
}

/// Reads a response as (status, JSON body); empty bodies become `Null`
pub async fn read_json(response: Response<Body>) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, body)
}
