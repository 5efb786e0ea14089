use salvo::http::StatusCode;
use salvo::oapi::{self, EndpointOutRegister};
use salvo::prelude::*;
use thiserror::Error;
use tracing::error;

use super::access_error::AccessError;
use super::general::GeneralError;
use super::{register_error_responses, render_error};

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User with ID {0} not found")]
    UserNotFound(i32),

    #[error("Email already registered")]
    EmailTaken,

    #[error("{0}")]
    InvalidInput(String),

    #[error("Failed to hash password")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("General error: {0}")]
    General(#[from] GeneralError),
}

#[async_trait]
impl Writer for UserError {
    async fn write(self, _req: &mut Request, _depot: &mut Depot, res: &mut Response) {
        let status = match &self {
            UserError::UserNotFound(_) => StatusCode::NOT_FOUND,
            UserError::EmailTaken => StatusCode::CONFLICT,
            UserError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            UserError::Access(err) => err.status_code(),
            UserError::PasswordHash(_) | UserError::General(_) => {
                error!("User request failed: {}", self);
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

impl EndpointOutRegister for UserError {
    fn register(components: &mut oapi::Components, operation: &mut oapi::Operation) {
        AccessError::register(components, operation);
        register_error_responses(
            components,
            operation,
            &[
                (StatusCode::BAD_REQUEST, "Invalid user data"),
                (StatusCode::NOT_FOUND, "User not found"),
                (StatusCode::CONFLICT, "Email already registered"),
                (StatusCode::INTERNAL_SERVER_ERROR, "Unexpected or general error"),
            ],
        );
    }
}
