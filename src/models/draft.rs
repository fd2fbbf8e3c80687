use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use utoipa::ToSchema;

/// Fallback title for drafts submitted without one
pub const DEFAULT_TITLE: &str = "Untitled ecard";
pub const DEFAULT_CANVAS_WIDTH: i64 = 900;
pub const DEFAULT_CANVAS_HEIGHT: i64 = 600;

/// Canvas dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CanvasSize {
    pub w: i64,
    pub h: i64,
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            w: DEFAULT_CANVAS_WIDTH,
            h: DEFAULT_CANVAS_HEIGHT,
        }
    }
}

/// A normalized e-card draft as stored and returned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DraftRecord {
    pub id: String,
    /// Usually a string; any other truthy value is stored as given
    #[schema(value_type = Value)]
    pub title: Value,
    /// Epoch milliseconds (UTC)
    #[schema(value_type = i64)]
    pub updated_at: Number,
    /// Opaque template reference, stored verbatim
    #[schema(value_type = Option<String>)]
    pub template: Value,
    pub canvas_size: CanvasSize,
    /// Opaque editor payload
    #[schema(value_type = Object)]
    pub data: Value,
}

/// Request body for upserting a draft. Every field is optional; the body is
/// accepted as free-form JSON and normalized server side.
#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertDraftRequest {
    /// Existing or caller chosen id; generated when absent or empty
    #[schema(value_type = Option<String>)]
    pub id: Option<Value>,
    #[schema(value_type = Option<Value>)]
    pub title: Option<Value>,
    /// Kept when an integer, otherwise replaced by server time
    #[schema(value_type = Option<Value>)]
    pub updated_at: Option<Value>,
    #[schema(value_type = Option<Value>)]
    pub template: Option<Value>,
    pub canvas_size: Option<CanvasSizeInput>,
    #[schema(value_type = Option<Value>)]
    pub data: Option<Value>,
}

/// Inbound canvas size; each side may be an integer, a number or an integer
/// string, and falls back to the default when missing or empty.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct CanvasSizeInput {
    #[schema(value_type = Option<Value>)]
    pub w: Option<Value>,
    #[schema(value_type = Option<Value>)]
    pub h: Option<Value>,
}

/// Response returned after upserting a draft
#[derive(Serialize, Deserialize, ToSchema)]
pub struct UpsertDraftResponse {
    pub id: String,
}
