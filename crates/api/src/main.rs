use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use fastlane_core::id::UuidV7Provider;
use fastlane_pipeline::clients::CloudClientFactory;
use fastlane_pipeline::config::PipelineConfig;
use fastlane_pipeline::Pipeline;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fastlane_api::config::ServerConfig;
use fastlane_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "fastlane_api=debug,fastlane_pipeline=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => fail("Invalid server configuration", &e),
    };
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    let pipeline_config = match PipelineConfig::from_env() {
        Ok(config) => config,
        Err(e) => fail("Invalid pipeline configuration", &e),
    };

    // --- Collaborators ---
    let clients = match CloudClientFactory::connect(&pipeline_config).await {
        Ok(clients) => clients,
        Err(e) => fail("Failed to prepare collaborator clients", &e),
    };
    let pipeline = Pipeline::new(Arc::new(clients), Arc::new(UuidV7Provider));

    // --- App state ---
    let state = AppState {
        pipeline: Arc::new(pipeline),
        config: Arc::new(config.clone()),
    };

    let app = fastlane_api::app(state);

    // --- Start server ---
    let host: IpAddr = match config.host.parse() {
        Ok(host) => host,
        Err(e) => fail("Invalid HOST address", &e),
    };
    let addr = SocketAddr::new(host, config.port);
    tracing::info!(%addr, "Starting server");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => fail("Failed to bind to address", &e),
    };

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        fail("Server error", &e);
    }

    tracing::info!("Graceful shutdown complete");
}

/// Log a fatal startup error and exit non-zero.
fn fail(context: &str, error: &dyn std::fmt::Display) -> ! {
    tracing::error!(error = %error, "{context}");
    std::process::exit(1);
}

/// Wait for SIGINT or SIGTERM.
///
/// In-flight requests finish before the server returns; Cloud Run sends
/// SIGTERM ahead of stopping an instance.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
