use salvo::http::StatusCode;
use salvo::oapi::{self, ToSchema};
use salvo::prelude::*;
use serde::Serialize;

pub mod access_error;
pub mod analytics_error;
pub mod auth_error;
pub mod general;
pub mod meeting_error;
pub mod statistics_error;
pub mod upload_error;
pub mod user_error;

/// Body of every failed request.
#[derive(Debug, ToSchema, Serialize)]
#[salvo(schema(example = json!({"error": "Meeting with ID 7 not found"})))]
pub struct ErrorBody {
    pub error: String,
}

pub fn render_error(res: &mut Response, status: StatusCode, message: impl Into<String>) {
    res.status_code(status);
    res.render(Json(ErrorBody {
        error: message.into(),
    }));
}

/// Documents the given error statuses on an endpoint, all sharing [`ErrorBody`].
pub fn register_error_responses(
    components: &mut oapi::Components,
    operation: &mut oapi::Operation,
    statuses: &[(StatusCode, &str)],
) {
    for (status, description) in statuses {
        operation.responses.insert(
            status.as_str(),
            oapi::Response::new(*description)
                .add_content("application/json", ErrorBody::to_schema(components)),
        );
    }
}
