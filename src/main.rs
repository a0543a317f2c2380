use std::net::SocketAddr;
use std::sync::Arc;

use salesforce_lead_router::config::Config;
use salesforce_lead_router::handlers::AppState;
use salesforce_lead_router::routes;
use salesforce_lead_router::salesforce_client::SalesforceClient;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the application.
///
/// Initializes tracing and configuration, fetches the first Salesforce access
/// token and starts the Axum server. A failed initial refresh is logged and
/// retried on the first lead submission.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "salesforce_lead_router=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    let salesforce = SalesforceClient::new(&config.salesforce, config.http_timeout())?;
    tracing::info!(
        "✓ Salesforce client initialized: {}",
        config.salesforce.login_url
    );

    let app_state = Arc::new(AppState::new(config.clone(), salesforce));

    // Initial token; failures are logged and retried lazily
    app_state.credentials.refresh().await;

    let app = routes::router(app_state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
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
