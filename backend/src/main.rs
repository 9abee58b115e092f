use exchange_backend::{
    config::Config,
    db::connection::{create_pool, run_migrations, DbPool},
    routes::build_router,
    state::{AppDependencies, AppState},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn mask_secret(s: &str) -> String {
    if s.is_empty() {
        return "<empty>".into();
    }
    let prefix = s.chars().take(4).collect::<String>();
    format!("{}*** (len={})", prefix, s.len())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "exchange_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    tracing::info!(
        bind_addr = %config.bind_addr,
        session_ttl_minutes = config.session_ttl.num_minutes(),
        cookie_secure = config.cookie_secure,
        exchange_api_url = %config.exchange_api_url,
        exchange_api_key = %mask_secret(&config.exchange_api_key),
        supported_currencies = ?config.supported_currencies,
        production_mode = config.production_mode,
        "Loaded configuration from environment/.env"
    );
    if config.production_mode && !config.cookie_secure {
        tracing::warn!("COOKIE_SECURE is disabled in production mode");
    }

    let pool: DbPool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;

    let addr = config.bind_addr;
    let deps = AppDependencies::postgres(pool, &config)?;
    let app = build_router(AppState::new(config, deps));

    tracing::info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
