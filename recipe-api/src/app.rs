/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use recipe_api::{app::{build_router, AppState}, config::Config};
/// use recipe_shared::db::{pool::{create_pool, DatabaseConfig}, postgres::PgStore};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(DatabaseConfig {
///     url: config.database.url.clone(),
///     ..Default::default()
/// })
/// .await?;
/// let state = AppState::new(Arc::new(PgStore::new(pool)), config);
/// let app = build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::security::security_headers, routes};
use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use recipe_shared::{auth::middleware::token_auth_middleware, db::Store};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Persistence backend
    pub store: Arc<dyn Store>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET  /health                 # Health check (public)
/// ├── /api/user/
/// │   ├── POST  /create/           # Registration (public)
/// │   ├── POST  /token/            # Token issuance (public)
/// │   └── GET|PATCH /me/           # Own profile (token)
/// └── /api/recipe/
///     └── GET   /tags/             # Own tags (token)
/// ```
///
/// Token authentication wraps the protected routes including their
/// method fallback, so an anonymous `POST /api/user/me/` is a 401 and an
/// authenticated one is a 405.
///
/// # Middleware Stack
///
/// Applied in order (innermost first):
/// 1. Token authentication (protected routes only)
/// 2. Logging (tower-http TraceLayer)
/// 3. CORS (tower-http CorsLayer)
/// 4. Security headers
pub fn build_router(state: AppState) -> Router {
    let require_token = from_fn_with_state(state.store.clone(), token_auth_middleware);

    let profile_routes = Router::new()
        .route(
            "/me/",
            get(routes::users::get_profile).patch(routes::users::update_profile),
        )
        .layer(require_token.clone());

    let user_routes = Router::new()
        .route("/create/", post(routes::users::create_user))
        .route("/token/", post(routes::users::create_token))
        .merge(profile_routes);

    let recipe_routes = Router::new()
        .route("/tags/", get(routes::tags::list_tags))
        .layer(require_token);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api/user", user_routes)
        .nest("/api/recipe", recipe_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config))
        .layer(from_fn_with_state(state.config.api.production, security_headers))
        .with_state(state)
}

/// Permissive CORS when origins contain `*`, otherwise an explicit allow-list
fn cors_layer(config: &Config) -> CorsLayer {
    if config.allows_any_origin() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiConfig, DatabaseConfig};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use recipe_shared::db::memory::MemoryStore;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        AppState::new(
            Arc::new(MemoryStore::new()),
            Config {
                api: ApiConfig::default(),
                database: DatabaseConfig {
                    url: "postgresql://localhost/unused".to_string(),
                    max_connections: 1,
                },
            },
        )
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let response = build_router(test_state())
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_restricted_cors_answers_preflight() {
        let mut state = test_state();
        let mut config = (*state.config).clone();
        config.api.cors_origins = vec!["https://app.example".to_string()];
        state.config = Arc::new(config);

        let response = build_router(state)
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/user/token/")
                    .header("origin", "https://app.example")
                    .header("access-control-request-method", "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "https://app.example"
        );
    }
}
