use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};

use crate::core::{
    dtos::upload::upload_rows_dto::UploadRowsDto,
    entities::models::RecordKind,
    types::{errors::upload_error::UploadError, responses::upload_response::UploadResponse},
    utils::{
        depot_utils::obtain,
        permissions::{Capability, authorize},
    },
};

use super::service::{DefaultUploadService, UploadService};

/// Mounted below `/meetings`, behind the meeting router's auth hoop.
pub fn get_upload_router() -> Router {
    Router::with_path("{meeting_id}/uploads/{kind}").post(upload_records)
}

/// Stores parsed spreadsheet rows for a meeting. Invalid rows are skipped and
/// reported; the rest are upserted.
#[endpoint(tags("upload"), status_codes(200, 400, 401, 403, 404, 500))]
async fn upload_records(
    meeting_id: PathParam<i32>,
    kind: PathParam<String>,
    data: JsonBody<UploadRowsDto>,
    depot: &mut Depot,
) -> Result<UploadResponse, UploadError> {
    authorize(depot, Capability::UploadRecords)?;
    let upload_service = obtain::<DefaultUploadService>(depot)?;

    let kind = kind
        .into_inner()
        .parse::<RecordKind>()
        .map_err(UploadError::InvalidKind)?;

    upload_service
        .upload_records(meeting_id.into_inner(), kind, data.into_inner().rows)
        .await
}
