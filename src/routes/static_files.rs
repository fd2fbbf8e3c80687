use axum::Router;
use std::path::Path;
use tower_http::services::{ServeDir, ServeFile};

/// Entry page at `/` and the asset tree under `/assets`
pub fn create_static_routes(static_root: &Path) -> Router {
    Router::new()
        .route_service("/", ServeFile::new(static_root.join("index.html")))
        .nest_service("/assets", ServeDir::new(static_root.join("assets")))
}
