use salvo::http::StatusCode;
use salvo::oapi::{self, EndpointOutRegister};
use salvo::prelude::*;
use thiserror::Error;

use crate::core::utils::permissions::Capability;

use super::{register_error_responses, render_error};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AccessError {
    #[error("Missing bearer token")]
    MissingToken,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Access denied. {} required.", .0.requirement())]
    Forbidden(Capability),
}

impl AccessError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AccessError::MissingToken | AccessError::InvalidToken => StatusCode::UNAUTHORIZED,
            AccessError::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }
}

#[async_trait]
impl Writer for AccessError {
    async fn write(self, _req: &mut Request, _depot: &mut Depot, res: &mut Response) {
        render_error(res, self.status_code(), self.to_string());
    }
}

impl EndpointOutRegister for AccessError {
    fn register(components: &mut oapi::Components, operation: &mut oapi::Operation) {
        register_error_responses(
            components,
            operation,
            &[
                (StatusCode::UNAUTHORIZED, "Missing or invalid token"),
                (StatusCode::FORBIDDEN, "Role lacks the required capability"),
            ],
        );
    }
}
