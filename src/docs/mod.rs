use utoipa::OpenApi;
use crate::models::*;

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
#[allow(dead_code)]
pub async fn health_check_doc() {}

/// Create a draft, or replace the draft named by `id`
#[utoipa::path(
    post,
    path = "/api/drafts",
    request_body = UpsertDraftRequest,
    responses(
        (status = 200, description = "Draft stored", body = UpsertDraftResponse),
        (status = 400, description = "Body is not a JSON object or a field cannot be coerced", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn upsert_draft_doc() {}

/// Fetch a draft by id
#[utoipa::path(
    get,
    path = "/api/drafts/{draft_id}",
    params(
        ("draft_id" = String, Path, description = "Draft identifier")
    ),
    responses(
        (status = 200, description = "Stored draft", body = DraftRecord),
        (status = 404, description = "No draft with this id", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn get_draft_doc() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check_doc,
        upsert_draft_doc,
        get_draft_doc,
    ),
    components(
        schemas(HealthResponse, UpsertDraftRequest, CanvasSizeInput, UpsertDraftResponse, DraftRecord, CanvasSize, ErrorResponse)
    ),
    tags(
        (name = "api", description = "API endpoints")
    )
)]
pub struct ApiDoc;
