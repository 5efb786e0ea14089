use salvo::http::StatusCode;
use salvo::oapi::{self, EndpointOutRegister};
use salvo::prelude::*;
use thiserror::Error;
use tracing::error;

use super::access_error::AccessError;
use super::general::GeneralError;
use super::{register_error_responses, render_error};

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("General error: {0}")]
    General(#[from] GeneralError),
}

#[async_trait]
impl Writer for AnalyticsError {
    async fn write(self, _req: &mut Request, _depot: &mut Depot, res: &mut Response) {
        match self {
            AnalyticsError::Access(err) => render_error(res, err.status_code(), err.to_string()),
            AnalyticsError::General(err) => {
                error!("Analytics aggregation failed: {}", err);
                render_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

impl EndpointOutRegister for AnalyticsError {
    fn register(components: &mut oapi::Components, operation: &mut oapi::Operation) {
        AccessError::register(components, operation);
        register_error_responses(
            components,
            operation,
            &[(StatusCode::INTERNAL_SERVER_ERROR, "Unexpected or general error")],
        );
    }
}
