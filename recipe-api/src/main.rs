//! # Recipe API Server
//!
//! Serves the user and recipe-tag endpoints over HTTP.
//!
//! ## Usage
//!
//! ```bash
//! # Run the server (default command)
//! cargo run -p recipe-api
//!
//! # Create an administrator account
//! cargo run -p recipe-api -- create-superuser --email admin@example.com --password secret
//! ```

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use recipe_api::{
    app::{build_router, AppState},
    config::Config,
};
use recipe_shared::{
    accounts::UserManager,
    db::{
        migrations::run_migrations,
        pool::{close_pool, create_pool, DatabaseConfig},
        postgres::PgStore,
    },
};
use sqlx::PgPool;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "recipe-api", version, about = "Recipe API server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve,

    /// Create a user with staff and superuser rights
    CreateSuperuser {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recipe_api=debug,recipe_shared=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let pool = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await
    .context("Failed to connect to database")?;

    run_migrations(&pool).await.context("Failed to run migrations")?;

    let result = match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(pool.clone(), config).await,
        Command::CreateSuperuser { email, password } => {
            create_superuser(pool.clone(), &email, &password).await
        }
    };

    close_pool(pool).await;
    result
}

async fn serve(pool: PgPool, config: Config) -> anyhow::Result<()> {
    tracing::info!("Recipe API Server v{} starting...", env!("CARGO_PKG_VERSION"));

    let bind_address = config.bind_address();
    let state = AppState::new(Arc::new(PgStore::new(pool)), config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn create_superuser(pool: PgPool, email: &str, password: &str) -> anyhow::Result<()> {
    let store = PgStore::new(pool);
    let user = UserManager::new(&store)
        .create_superuser(email, password)
        .await?;

    tracing::info!(user_id = %user.id, "Superuser {} created", user);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining connections...");
}
