use anyhow::Context;
use clinic::{build_router, db, AppConfig, AppState, TokenConfig};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real environment variables take over
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clinic=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting clinic server");

    let config = AppConfig::from_env().context("Failed to load configuration")?;

    let pool = db::connect(&config.database)
        .await
        .context("Failed to connect to database")?;
    db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let app_state = AppState::postgres(pool, TokenConfig::new(config.jwt_secret.clone()));
    let app = build_router(app_state);

    let address = config.server.address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("Server running on http://{}", address);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
