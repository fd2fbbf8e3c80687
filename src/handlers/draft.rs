use crate::{
    db::draft_store::{DraftStore, UpsertOutcome},
    models::{ErrorResponse, UpsertDraftResponse},
    services::draft_service,
};
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use tracing::{info, warn};

/// Create a draft, or fully replace the one named by the body's `id`
pub async fn upsert_draft(
    State(store): State<DraftStore>,
    body: Bytes,
) -> Result<(StatusCode, Json<UpsertDraftResponse>), (StatusCode, Json<ErrorResponse>)> {
    let payload = draft_service::parse_draft_payload(&body).map_err(|e| {
        warn!("Rejected draft body: {}", e);
        e
    })?;

    let record = draft_service::normalize_draft(&payload, draft_service::now_ms()).map_err(|e| {
        warn!("Rejected draft: {}", e);
        e
    })?;

    let id = record.id.clone();
    match store.upsert(record).await? {
        UpsertOutcome::Created => info!("Draft '{}' created", id),
        UpsertOutcome::Updated => info!("Draft '{}' updated", id),
    }

    Ok((StatusCode::OK, Json(UpsertDraftResponse { id })))
}

/// Fetch a draft by id
pub async fn get_draft(
    State(store): State<DraftStore>,
    Path(draft_id): Path<String>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<ErrorResponse>)> {
    match store.get(&draft_id).await {
        Ok(record) => Ok((StatusCode::OK, Json(record))),
        Err(e) => {
            warn!("Draft lookup failed: {}", e);
            Err(e.into())
        }
    }
}
