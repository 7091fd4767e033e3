use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{self, TraceLayer};
use tracing::{info, warn, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod router;

use appointment_cell::services::ArchiveService;
use appointment_cell::AppointmentCellState;
use shared_config::ClinicConfig;

#[tokio::main]
async fn main() {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting clinic booking API server");

    // Load configuration
    let config = Arc::new(ClinicConfig::from_env());

    // Set up CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Periodic cleanup sweep: runs once at startup, then on the configured
    // interval, alongside user-initiated flows.
    spawn_cleanup_sweep(config.clone());

    let appointment_state = AppointmentCellState::new(config.clone());

    // Build the application router
    let app = router::create_router(config, appointment_state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors);

    // Run the server
    let addr = SocketAddr::from(([0, 0, 0, 0], 3000));
    info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

fn spawn_cleanup_sweep(config: Arc<ClinicConfig>) {
    tokio::spawn(async move {
        let service = ArchiveService::new(&config);
        let mut ticker =
            tokio::time::interval(Duration::from_secs(config.cleanup_interval_secs));

        loop {
            // The first tick fires immediately.
            ticker.tick().await;

            match service
                .run_sweep(Utc::now(), config.local_now().date())
                .await
            {
                Ok(summary) => info!(
                    "Cleanup sweep: {} expired, {} archived",
                    summary.expired, summary.archived
                ),
                Err(e) => warn!("Cleanup sweep failed: {}", e),
            }
        }
    });
}
