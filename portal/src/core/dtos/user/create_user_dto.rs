use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use validator_derive::Validate;

use crate::core::entities::models::Role;

#[derive(Debug, Serialize, Deserialize, ToSchema, Validate, Clone)]
#[serde(rename_all = "camelCase")]
#[salvo(schema(example = json!({
    "name": "Dr. Meera Joshi",
    "email": "meera@mediguru.com",
    "password": "meera123",
    "role": "doctor",
    "department": "Psychiatry",
    "registrationNumber": "CG/MED/2023/011"
})))]
pub struct CreateUserDto {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[serde(default = "default_role")]
    pub role: Role,

    pub department: Option<String>,

    pub registration_number: Option<String>,
}

fn default_role() -> Role {
    Role::Doctor
}
