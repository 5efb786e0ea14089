use salvo::http::StatusCode;
use salvo::oapi::{self, EndpointOutRegister};
use salvo::prelude::*;
use thiserror::Error;
use tracing::error;

use super::access_error::AccessError;
use super::general::GeneralError;
use super::{register_error_responses, render_error};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email and password are required")]
    MissingCredentials,

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid password")]
    InvalidPassword,

    #[error("Failed to issue token: {0}")]
    TokenError(#[from] jsonwebtoken::errors::Error),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("General error: {0}")]
    General(#[from] GeneralError),
}

#[async_trait]
impl Writer for AuthError {
    async fn write(self, _req: &mut Request, _depot: &mut Depot, res: &mut Response) {
        match self {
            AuthError::MissingCredentials | AuthError::InvalidEmail => {
                render_error(res, StatusCode::BAD_REQUEST, self.to_string())
            }
            AuthError::UserNotFound | AuthError::InvalidPassword => {
                render_error(res, StatusCode::UNAUTHORIZED, self.to_string())
            }
            AuthError::Access(err) => render_error(res, err.status_code(), err.to_string()),
            AuthError::TokenError(_) | AuthError::General(_) => {
                error!("Authentication failed unexpectedly: {}", self);
                render_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

impl EndpointOutRegister for AuthError {
    fn register(components: &mut oapi::Components, operation: &mut oapi::Operation) {
        register_error_responses(
            components,
            operation,
            &[
                (StatusCode::BAD_REQUEST, "Missing or malformed credentials"),
                (StatusCode::UNAUTHORIZED, "Unknown user or wrong password"),
                (StatusCode::INTERNAL_SERVER_ERROR, "Unexpected or general error"),
            ],
        );
    }
}
