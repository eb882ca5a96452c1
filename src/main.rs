use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use faceoff::{auth::AdminConfig, catalog::Catalog, pages, state::AppState, ws};

#[tokio::main]
async fn main() {
    // Load .env file if present (before any env var reads)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist, only log if it's a different issue
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "faceoff=debug,tower_http=debug,axum=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting faceoff...");

    // Load the round catalog; refusing to start beats running with nothing
    // to vote on.
    let csv_path = std::env::var("QUIZ_DATA").unwrap_or_else(|_| "quiz_data.csv".to_string());
    let catalog = match Catalog::load(&csv_path) {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::error!("Failed to load round catalog from {}: {}", csv_path, e);
            std::process::exit(1);
        }
    };
    tracing::info!("Loaded {} rounds from {}", catalog.len(), csv_path);

    let admin = AdminConfig::from_env();
    let state = Arc::new(AppState::new(catalog, admin));

    let app = Router::new()
        .route("/ws", get(ws::ws_handler))
        .route("/admin", get(pages::serve_admin))
        .fallback_service(ServeDir::new("static"))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
