mod models;
mod handlers;
mod routes;
mod docs;
mod config;
mod db;
mod services;

use config::Config;
use db::draft_store::DraftStore;
use routes::create_app;
use std::panic;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() {

    // Set panic hook for better error messages
    panic::set_hook(Box::new(|info| {
        eprintln!("PANIC: {info}");
    }));

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "ecard_drafts=debug,tower_http=debug,axum::rejection=trace,info".into()
        }))
        .init();

    info!("Starting server...");

    // Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        warn!("Using default configuration");
        Config::default()
    });

    // Open the drafts file, creating its directory if needed
    let store = match DraftStore::open(config.storage_path()).await {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to open draft storage: {}", e);
            std::process::exit(1);
        }
    };
    info!("💾 Drafts stored in {}", store.path().display());

    let app_routes = create_app(store, &config);

    let listener = tokio::net::TcpListener::bind(config.server_address())
        .await
        .unwrap_or_else(|_| panic!("Failed to bind to {}", config.server_address()));

    info!("🚀 Server running on http://{}", config.server_address());
    info!("📚 Swagger UI available at http://{}/swagger", config.server_address());

    axum::serve(listener, app_routes)
        .await
        .expect("Server failed to start");
}
