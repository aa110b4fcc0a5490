use anyhow::Context;
use liftlink::{
    build_router,
    config::{validate_production_config, JwtConfig, ServerConfig},
    db,
    services::create_email_service,
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "liftlink=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    validate_production_config();

    let server_config = ServerConfig::from_env().context("Invalid server configuration")?;
    let jwt_config = JwtConfig::from_env();

    // Database connection
    let pool = db::create_pool()
        .await
        .context("Failed to connect to database")?;

    // Run migrations
    db::run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;

    let email_service = create_email_service(server_config.is_production())?;
    let state = AppState::new(
        pool,
        &jwt_config,
        email_service,
        &server_config.frontend_url,
    );

    let app = build_router(state, &server_config)?;

    let addr = server_config.socket_addr()?;
    tracing::info!(
        "Server running on http://{} ({})",
        addr,
        server_config.environment
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
