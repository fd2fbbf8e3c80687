use crate::{
    db::draft_store::DraftStore,
    handlers::{get_draft, health_check, upsert_draft},
};
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

/// Create API routes
pub fn create_api_routes(store: DraftStore, cors_origins: Option<Vec<String>>) -> Router {
    Router::<DraftStore>::new()
        .route("/health", get(health_check))
        .route("/drafts", post(upsert_draft))
        .route("/drafts/:draft_id", get(get_draft))
        .layer(cors_layer(cors_origins))
        .with_state(store)
}

fn cors_layer(origins: Option<Vec<String>>) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match origins {
        None => layer.allow_origin(Any),
        Some(origins) => {
            let origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|o| match o.parse::<HeaderValue>() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!("Ignoring invalid CORS origin '{}'", o);
                        None
                    }
                })
                .collect();
            layer.allow_origin(origins)
        }
    }
}
