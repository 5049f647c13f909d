use std::str::FromStr;

use axum::routing::get;
use axum::Router;
use reliefnet::config::Config;
use reliefnet::{auth, documents, messages, onboarding, organizations, professionals, training};
use reliefnet::AppState;
use sqlx::sqlite::SqlitePoolOptions;
use tower_http::cors::CorsLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer, cookie::SameSite};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::from_str("reliefnet=info,tower_http=info").unwrap_or_default()
        }))
        .init();

    let config = Config::load();

    let db_pool = SqlitePoolOptions::new()
        .max_connections(16)
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!("./migrations").run(&db_pool).await?;

    let secrets = std::fs::read_to_string(&config.client_secrets_path)?;
    let clients = auth::Clients::from_json(
        serde_json::Value::from_str(&secrets)?,
        &config.base_url,
    )
    .map_err(|e| anyhow::anyhow!("loading identity clients: {e}"))?;

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::hours(8)));

    let app_state = AppState { db_pool, clients };

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .merge(auth::router())
        .nest("/api/auth", auth::api_router())
        .nest("/api/professionals", professionals::router())
        .nest("/api/organizations", organizations::router())
        .nest("/api/messages", messages::router())
        .nest("/api/documents", documents::router())
        .nest("/api/training", training::router())
        .route("/api/onboarding", get(onboarding::progress))
        .layer(CorsLayer::permissive())
        .with_state(app_state)
        .layer(session_layer);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
