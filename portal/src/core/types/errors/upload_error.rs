use salvo::http::StatusCode;
use salvo::oapi::{self, EndpointOutRegister};
use salvo::prelude::*;
use thiserror::Error;
use tracing::error;

use super::access_error::AccessError;
use super::general::GeneralError;
use super::{register_error_responses, render_error};

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Meeting with ID {0} not found")]
    MeetingNotFound(i32),

    #[error("No rows to upload")]
    EmptyUpload,

    #[error("{0}")]
    InvalidKind(String),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("General error: {0}")]
    General(#[from] GeneralError),
}

#[async_trait]
impl Writer for UploadError {
    async fn write(self, _req: &mut Request, _depot: &mut Depot, res: &mut Response) {
        let status = match &self {
            UploadError::MeetingNotFound(_) => StatusCode::NOT_FOUND,
            UploadError::EmptyUpload | UploadError::InvalidKind(_) => StatusCode::BAD_REQUEST,
            UploadError::Access(err) => err.status_code(),
            UploadError::General(_) => {
                error!("Upload failed: {}", self);
                return render_error(
                    res,
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                );
            }
        };

        render_error(res, status, self.to_string());
    }
}

impl EndpointOutRegister for UploadError {
    fn register(components: &mut oapi::Components, operation: &mut oapi::Operation) {
        AccessError::register(components, operation);
        register_error_responses(
            components,
            operation,
            &[
                (StatusCode::BAD_REQUEST, "Empty upload or unknown record kind"),
                (StatusCode::NOT_FOUND, "Meeting not found"),
                (StatusCode::INTERNAL_SERVER_ERROR, "Unexpected or general error"),
            ],
        );
    }
}
