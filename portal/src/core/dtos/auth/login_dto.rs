use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

/// Both fields are optional on the wire so that a missing one is reported
/// as a validation error rather than a malformed body.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema, Clone)]
#[salvo(schema(example = json!({"email": "doctor@mediguru.com", "password": "doctor123"})))]
pub struct LoginDto {
    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub password: Option<String>,
}
