use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use intake_api::background::session_sweep;
use intake_api::config::ServerConfig;
use intake_api::router::build_app_router;
use intake_api::sessions::WizardSessions;
use intake_api::state::AppState;
use intake_api::upstream::{HttpSubmissionBackend, InMemorySubmissionBackend, SubmissionBackend};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "intake_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Submission backend ---
    let backend: Arc<dyn SubmissionBackend> = match &config.upstream.base_url {
        Some(base_url) => {
            let backend = HttpSubmissionBackend::new(base_url, &config.upstream)
                .expect("Failed to build upstream HTTP client");
            tracing::info!(%base_url, "Using upstream submission API");
            Arc::new(backend)
        }
        None => {
            tracing::warn!("UPSTREAM_API_URL not set; submissions are kept in memory");
            Arc::new(InMemorySubmissionBackend::new())
        }
    };

    // --- Wizard sessions ---
    let sessions = Arc::new(WizardSessions::with_idle_ttl(Duration::from_secs(
        config.session_idle_timeout_secs,
    )));

    let sweep_cancel = tokio_util::sync::CancellationToken::new();
    let sweep_handle = tokio::spawn(session_sweep::run(
        Arc::clone(&sessions),
        session_sweep::SWEEP_INTERVAL,
        sweep_cancel.clone(),
    ));

    // --- App state ---
    let state = AppState {
        sessions: Arc::clone(&sessions),
        backend,
    };

    // --- Router ---
    let app = build_app_router(state, &config).expect("Invalid router configuration");

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
    sweep_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), sweep_handle).await;
    tracing::info!(
        active_sessions = sessions.count().await,
        "Session sweep stopped"
    );

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
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
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
