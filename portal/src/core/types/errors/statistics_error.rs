use salvo::http::StatusCode;
use salvo::oapi::{self, EndpointOutRegister};
use salvo::prelude::*;
use thiserror::Error;
use tracing::error;

use super::access_error::AccessError;
use super::general::GeneralError;
use super::{register_error_responses, render_error};

#[derive(Debug, Error)]
pub enum StatisticsError {
    #[error("Meeting with ID {0} not found")]
    MeetingNotFound(i32),

    #[error("{0}")]
    InvalidKind(String),

    #[error("Failed to export records: {0}")]
    Export(String),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("General error: {0}")]
    General(#[from] GeneralError),
}

impl From<csv::Error> for StatisticsError {
    fn from(err: csv::Error) -> Self {
        StatisticsError::Export(err.to_string())
    }
}

#[async_trait]
impl Writer for StatisticsError {
    async fn write(self, _req: &mut Request, _depot: &mut Depot, res: &mut Response) {
        let status = match &self {
            StatisticsError::MeetingNotFound(_) => StatusCode::NOT_FOUND,
            StatisticsError::InvalidKind(_) => StatusCode::BAD_REQUEST,
            StatisticsError::Access(err) => err.status_code(),
            StatisticsError::Export(_) | StatisticsError::General(_) => {
                error!("Statistics request failed: {}", self);
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

impl EndpointOutRegister for StatisticsError {
    fn register(components: &mut oapi::Components, operation: &mut oapi::Operation) {
        AccessError::register(components, operation);
        register_error_responses(
            components,
            operation,
            &[
                (StatusCode::BAD_REQUEST, "Unknown record kind"),
                (StatusCode::NOT_FOUND, "Meeting not found"),
                (StatusCode::INTERNAL_SERVER_ERROR, "Unexpected or general error"),
            ],
        );
    }
}
