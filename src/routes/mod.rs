pub mod api;
pub mod static_files;

pub use api::*;
pub use static_files::*;

use crate::{config::Config, db::draft_store::DraftStore, docs::ApiDoc};
use axum::Router;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Assemble the full application router
pub fn create_app(store: DraftStore, config: &Config) -> Router {
    Router::new()
        // Mount API routes
        .nest("/api", create_api_routes(store, config.cors_origin_list()))
        // Entry page and template assets
        .merge(create_static_routes(&config.static_root))
        // Mount Swagger UI
        .merge(SwaggerUi::new("/swagger").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use axum::response::Response;
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    struct TestApp {
        dir: TempDir,
        store: DraftStore,
        config: Config,
    }

    impl TestApp {
        async fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let config = Config {
                data_dir: dir.path().join("data"),
                static_root: dir.path().to_path_buf(),
                ..Config::default()
            };
            let store = DraftStore::open(config.storage_path()).await.unwrap();
            Self { dir, store, config }
        }

        fn router(&self) -> Router {
            create_app(self.store.clone(), &self.config)
        }

        async fn send(&self, request: Request<Body>) -> Response {
            self.router().oneshot(request).await.unwrap()
        }

        async fn get(&self, uri: &str) -> Response {
            self.send(Request::get(uri).body(Body::empty()).unwrap()).await
        }

        async fn post_raw(&self, uri: &str, body: &str) -> Response {
            self.send(
                Request::builder()
                    .method(Method::POST)
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
        }

        async fn post_json(&self, uri: &str, body: Value) -> Response {
            self.post_raw(uri, &body.to_string()).await
        }

        async fn create(&self, body: Value) -> String {
            let response = self.post_json("/api/drafts", body).await;
            assert_eq!(response.status(), StatusCode::OK);
            body_json(response).await["id"].as_str().unwrap().to_string()
        }
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let app = TestApp::new().await;
        let response = app.get("/api/health").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "ok": true }));
    }

    #[tokio::test]
    async fn empty_object_gets_defaults() {
        let app = TestApp::new().await;
        let before = chrono::Utc::now().timestamp_millis();
        let id = app.create(json!({})).await;
        let after = chrono::Utc::now().timestamp_millis();

        let response = app.get(&format!("/api/drafts/{id}")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let draft = body_json(response).await;

        assert!(id.starts_with("d_"));
        assert_eq!(draft["id"], json!(id));
        assert_eq!(draft["title"], json!("Untitled ecard"));
        assert_eq!(draft["template"], Value::Null);
        assert_eq!(draft["canvasSize"], json!({ "w": 900, "h": 600 }));
        assert_eq!(draft["data"], json!({}));
        let updated_at = draft["updatedAt"].as_i64().unwrap();
        assert!(updated_at >= before && updated_at <= after);
    }

    #[tokio::test]
    async fn round_trip_returns_normalized_record() {
        let app = TestApp::new().await;
        let id = app
            .create(json!({
                "title": "Thank you",
                "template": "assets/template2.png",
                "canvasSize": { "w": "1024", "h": 768 },
                "data": { "version": "5.3.0", "objects": [{ "type": "textbox", "text": "Hi" }] }
            }))
            .await;

        let draft = body_json(app.get(&format!("/api/drafts/{id}")).await).await;

        assert_eq!(draft["id"], json!(id));
        assert_eq!(draft["title"], json!("Thank you"));
        assert_eq!(draft["template"], json!("assets/template2.png"));
        assert_eq!(draft["canvasSize"], json!({ "w": 1024, "h": 768 }));
        assert_eq!(
            draft["data"],
            json!({ "version": "5.3.0", "objects": [{ "type": "textbox", "text": "Hi" }] })
        );
    }

    #[tokio::test]
    async fn upsert_with_same_id_replaces_record() {
        let app = TestApp::new().await;
        let first = app
            .create(json!({ "id": "draft_123", "title": "First", "template": "a.png" }))
            .await;
        let second = app.create(json!({ "id": "draft_123", "title": "Second" })).await;

        assert_eq!(first, "draft_123");
        assert_eq!(second, "draft_123");

        let draft = body_json(app.get("/api/drafts/draft_123").await).await;
        assert_eq!(draft["title"], json!("Second"));
        assert_eq!(draft["template"], Value::Null);
    }

    #[tokio::test]
    async fn unknown_id_is_not_found_without_side_effects() {
        let app = TestApp::new().await;
        let response = app.get("/api/drafts/d_missing").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, json!({ "error": "Not found" }));
        assert!(!app.config.storage_path().exists());
    }

    #[tokio::test]
    async fn non_object_bodies_are_rejected() {
        let app = TestApp::new().await;
        let id = app.create(json!({ "title": "Keep me" })).await;
        let stored = std::fs::read(app.config.storage_path()).unwrap();

        for body in ["[1, 2, 3]", "\"just a string\"", "42", "{broken"] {
            let response = app.post_raw("/api/drafts", body).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(body_json(response).await, json!({ "error": "Invalid JSON" }));
        }

        assert_eq!(std::fs::read(app.config.storage_path()).unwrap(), stored);
        let draft = body_json(app.get(&format!("/api/drafts/{id}")).await).await;
        assert_eq!(draft["title"], json!("Keep me"));
    }

    #[tokio::test]
    async fn uncoercible_dimension_is_rejected() {
        let app = TestApp::new().await;
        let response = app
            .post_json("/api/drafts", json!({ "id": "d_x", "canvasSize": { "h": "tall" } }))
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Invalid canvasSize.h" })
        );
        assert_eq!(app.get("/api/drafts/d_x").await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn drafts_survive_a_new_store_instance() {
        let app = TestApp::new().await;
        let id = app
            .create(json!({ "title": "Persisted", "updatedAt": 1725360000000i64 }))
            .await;
        let original = body_json(app.get(&format!("/api/drafts/{id}")).await).await;

        let reopened = DraftStore::open(app.config.storage_path()).await.unwrap();
        let response = create_app(reopened, &app.config)
            .oneshot(
                Request::get(format!("/api/drafts/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(body_json(response).await, original);
        assert_eq!(original["updatedAt"], json!(1725360000000i64));
    }

    #[tokio::test]
    async fn storage_failure_is_an_opaque_server_error() {
        let app = TestApp::new().await;
        // A directory where the drafts file should be cannot be read
        std::fs::create_dir_all(app.config.storage_path()).unwrap();

        let response = app.get("/api/drafts/d_any").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Internal server error" })
        );

        let response = app.post_json("/api/drafts", json!({ "title": "Lost" })).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Internal server error" })
        );
    }

    #[tokio::test]
    async fn loosely_typed_fields_are_accepted() {
        let app = TestApp::new().await;
        let id = app
            .create(json!({
                "title": { "en": "Hi", "fr": "Salut" },
                "updatedAt": 18446744073709551615u64
            }))
            .await;

        let draft = body_json(app.get(&format!("/api/drafts/{id}")).await).await;
        assert_eq!(draft["title"], json!({ "en": "Hi", "fr": "Salut" }));
        assert_eq!(draft["updatedAt"], json!(18446744073709551615u64));
    }

    #[tokio::test]
    async fn hand_edited_sibling_survives_upsert() {
        let app = TestApp::new().await;
        std::fs::write(
            app.config.storage_path(),
            json!({ "drafts": { "legacy": { "id": "legacy", "title": 3 } } }).to_string(),
        )
        .unwrap();

        app.create(json!({ "id": "d_new" })).await;

        let legacy = app.get("/api/drafts/legacy").await;
        assert_eq!(legacy.status(), StatusCode::OK);
        assert_eq!(body_json(legacy).await, json!({ "id": "legacy", "title": 3 }));
    }

    #[tokio::test]
    async fn static_collaborators_are_served() {
        let app = TestApp::new().await;
        std::fs::write(app.dir.path().join("index.html"), "<html>editor</html>").unwrap();
        std::fs::create_dir_all(app.dir.path().join("assets")).unwrap();
        std::fs::write(app.dir.path().join("assets").join("template1.png"), [0x89, b'P']).unwrap();

        let index = app.get("/").await;
        assert_eq!(index.status(), StatusCode::OK);
        let bytes = to_bytes(index.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"<html>editor</html>");

        assert_eq!(app.get("/assets/template1.png").await.status(), StatusCode::OK);
        assert_eq!(app.get("/assets/missing.png").await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn api_allows_cross_origin_requests() {
        let app = TestApp::new().await;
        let response = app
            .send(
                Request::get("/api/health")
                    .header(header::ORIGIN, "http://example.test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }
}
