use chrono::NaiveDateTime;
use salvo::http::StatusCode;
use salvo::oapi::ToSchema;
use serde::Serialize;

use crate::core::entities::models::{Role, User};
use crate::impl_json_writer;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[salvo(schema(example = json!({
    "id": 2,
    "name": "Dr. Rajesh Kumar",
    "email": "doctor@mediguru.com",
    "role": "doctor",
    "department": "General Medicine",
    "registrationNumber": "CG/MED/2019/001",
    "joinedDate": "2025-01-10T09:00:00",
    "lastLogin": "2025-01-15T08:30:00",
    "isActive": true,
    "profileImage": null,
    "token": "eyJ...",
    "refreshToken": "eyJ..."
})))]
pub struct LoginResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub department: String,
    pub registration_number: String,
    #[salvo(schema(value_type = String))]
    pub joined_date: NaiveDateTime,
    #[salvo(schema(value_type = String))]
    pub last_login: NaiveDateTime,
    pub is_active: bool,
    pub profile_image: Option<String>,
    pub token: String,
    pub refresh_token: String,
}

impl LoginResponse {
    pub fn new(user: User, logged_in_at: NaiveDateTime, token: String, refresh_token: String) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            department: user.department.unwrap_or_else(|| "General".to_string()),
            registration_number: user.registration_number.unwrap_or_default(),
            joined_date: user.created_at,
            last_login: logged_in_at,
            is_active: true,
            profile_image: None,
            token,
            refresh_token,
        }
    }
}

impl_json_writer!(LoginResponse, StatusCode::OK, "OK");

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
    pub refresh_token: String,
}

impl_json_writer!(TokenResponse, StatusCode::OK, "OK");
