//! Doctors portal HTTP server.

use doctors_portal::{
    auth::TokenSigner,
    config::Config,
    payments::{MockPaymentGateway, PaymentGateway, StripeGateway},
    server::{AppState, build_router},
    store::PgStore,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "doctors_portal=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // .env is optional; real deployments set the environment directly
    dotenvy::dotenv().ok();

    info!("Starting Doctors Portal HTTP Server");

    let config = Config::from_env();
    info!(
        host = %config.server.host,
        port = config.server.port,
        "Configuration loaded"
    );

    info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.postgres.max_connections)
        .connect(&config.postgres.url)
        .await?;
    let store = PgStore::new(pool);
    store.migrate().await?;
    info!("Database connected and migrated");

    let gateway: Arc<dyn PaymentGateway> = match config.stripe.secret_key {
        Some(key) => Arc::new(StripeGateway::new(key)),
        None => {
            warn!("STRIPE_SECRET_KEY not set, using mock payment gateway");
            Arc::new(MockPaymentGateway::new())
        }
    };

    let signer = TokenSigner::new(
        config.auth.token_secret,
        chrono::Duration::days(config.auth.token_ttl_days),
    );

    let state = AppState::new(store, gateway, signer);
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "Server listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        () = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully...");
        },
    }
}
