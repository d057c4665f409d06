//! Fateweaver turn-engine API server entry point.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use fateweaver_api::error::AppError;
use fateweaver_api::routes;
use fateweaver_api::state::AppState;
use fateweaver_catalog::{PgEnemyCatalog, PgItemCatalog, PgLocaleDirectory};
use fateweaver_core::clock::SystemClock;
use fateweaver_core::rng::{DiceRng, SystemDice};
use fateweaver_engine::TurnEngine;
use fateweaver_proxy::interpreter::{
    DEFAULT_INTERPRETER_BASE_URL, DEFAULT_INTERPRETER_MODEL, HttpInterpreter,
};
use fateweaver_proxy::state_manager::{DEFAULT_STATE_MANAGER_BASE_URL, StateManagerClient};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Fateweaver turn engine");

    // Read configuration from environment.
    let database_url = std::env::var("DATABASE_URL").map_err(|_| {
        AppError::Config("DATABASE_URL environment variable must be set".to_string())
    })?;
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?;
    let state_manager_url = std::env::var("STATE_MANAGER_BASE_URL")
        .unwrap_or_else(|_| DEFAULT_STATE_MANAGER_BASE_URL.to_string());
    let interpreter_url = std::env::var("INTERPRETER_BASE_URL")
        .unwrap_or_else(|_| DEFAULT_INTERPRETER_BASE_URL.to_string());
    let interpreter_model = std::env::var("INTERPRETER_MODEL")
        .unwrap_or_else(|_| DEFAULT_INTERPRETER_MODEL.to_string());

    // Create database connection pool.
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await?;

    // Wire the engine with its production collaborators.
    let rng: Arc<Mutex<dyn DiceRng + Send>> = Arc::new(Mutex::new(SystemDice));
    let engine = TurnEngine::new(
        Arc::new(HttpInterpreter::new(&interpreter_url, &interpreter_model)),
        Arc::new(StateManagerClient::new(&state_manager_url)),
        Arc::new(PgItemCatalog::new(pool.clone())),
        Arc::new(PgEnemyCatalog::new(pool.clone())),
        Arc::new(PgLocaleDirectory::new(pool)),
        rng,
    );
    let app_state = AppState::new(engine, Arc::new(SystemClock));

    // Build router.
    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/play", routes::play::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server.
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
