use salvo::http::StatusCode;
use salvo::oapi::{self, EndpointOutRegister};
use salvo::prelude::*;
use thiserror::Error;
use tracing::error;

use super::access_error::AccessError;
use super::general::GeneralError;
use super::{register_error_responses, render_error};

#[derive(Debug, Error)]
pub enum MeetingError {
    #[error("Meeting with ID {0} not found")]
    MeetingNotFound(i32),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Invalid {field}: {value}")]
    InvalidField { field: &'static str, value: String },

    #[error("Meeting date cannot be in the past")]
    DateInPast,

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("General error: {0}")]
    General(#[from] GeneralError),
}

#[async_trait]
impl Writer for MeetingError {
    async fn write(self, _req: &mut Request, _depot: &mut Depot, res: &mut Response) {
        let status = match &self {
            MeetingError::MeetingNotFound(_) => StatusCode::NOT_FOUND,
            MeetingError::MissingField(_)
            | MeetingError::InvalidField { .. }
            | MeetingError::DateInPast => StatusCode::BAD_REQUEST,
            MeetingError::Access(err) => err.status_code(),
            MeetingError::General(_) => {
                error!("Meeting request failed: {}", self);
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

impl EndpointOutRegister for MeetingError {
    fn register(components: &mut oapi::Components, operation: &mut oapi::Operation) {
        AccessError::register(components, operation);
        register_error_responses(
            components,
            operation,
            &[
                (StatusCode::BAD_REQUEST, "Invalid meeting data"),
                (StatusCode::NOT_FOUND, "Meeting not found"),
                (StatusCode::INTERNAL_SERVER_ERROR, "Unexpected or general error"),
            ],
        );
    }
}
