use salvo::http::StatusCode;
use salvo::oapi::ToSchema;
use serde::Serialize;

use crate::impl_json_writer;

/// Outcome of a bulk upload. Failed rows are reported, never fatal.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[salvo(schema(example = json!({
    "success": false,
    "processed": 4,
    "total": 5,
    "errors": ["Row 3: score 22 exceeds total marks 20"]
})))]
pub struct UploadResponse {
    pub success: bool,
    pub processed: usize,
    pub total: usize,
    pub errors: Vec<String>,
}

impl UploadResponse {
    pub fn new(total: usize, errors: Vec<String>, failed: usize) -> Self {
        Self {
            success: errors.is_empty(),
            processed: total.saturating_sub(failed),
            total,
            errors,
        }
    }
}

impl_json_writer!(UploadResponse, StatusCode::OK, "OK");
