use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use studio_api::config::ServerConfig;
use studio_api::router::build_app_router;
use studio_api::state::AppState;
use studio_db::{
    DbPool, DesignStore, InMemoryDesignStore, InMemoryPortalTokenStore, PgDesignStore,
    PgPortalTokenStore, PortalTokenStore,
};
use studio_events::{ApprovalNotifier, EventBus, LogSink};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Configuration ---
    let config = ServerConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Invalid configuration: {e}");
        std::process::exit(1);
    });

    // --- Tracing ---
    let json_logs = config.log_json;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "studio_api=debug,studio_events=info,tower_http=debug".into()),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(tracing_subscriber::fmt::layer))
        .init();

    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Storage ---
    let (designs, portal_tokens, pool) = connect_stores(&config).await;

    // --- Event bus ---
    let event_bus = Arc::new(EventBus::default());
    let notifier_handle =
        tokio::spawn(ApprovalNotifier::new(Arc::new(LogSink)).run(event_bus.subscribe()));
    tracing::info!("Event bus and approval notifier started");

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        designs,
        portal_tokens,
        event_bus: Arc::clone(&event_bus),
        pool,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    // The router (and its state clone of the bus) is gone; dropping the last
    // sender closes the channel and ends the notifier loop.
    drop(event_bus);
    let shutdown_timeout = Duration::from_secs(config.shutdown_timeout_secs);
    if tokio::time::timeout(shutdown_timeout, notifier_handle)
        .await
        .is_err()
    {
        tracing::warn!("Approval notifier did not stop in time");
    }

    tracing::info!("Graceful shutdown complete");
}

/// PostgreSQL stores when `DATABASE_URL` is set, in-memory stores otherwise.
async fn connect_stores(
    config: &ServerConfig,
) -> (
    Arc<dyn DesignStore>,
    Arc<dyn PortalTokenStore>,
    Option<DbPool>,
) {
    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set, using in-memory stores (data is not persisted)");
        return (
            Arc::new(InMemoryDesignStore::new()),
            Arc::new(InMemoryPortalTokenStore::new()),
            None,
        );
    };

    let pool = studio_db::create_pool(database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    studio_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    studio_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    (
        Arc::new(PgDesignStore::new(pool.clone())),
        Arc::new(PgPortalTokenStore::new(pool.clone())),
        Some(pool),
    )
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl-C, starting graceful shutdown"),
        () = terminate => tracing::info!("Received SIGTERM, starting graceful shutdown"),
    }
}
