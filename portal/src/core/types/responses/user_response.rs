use chrono::NaiveDateTime;
use salvo::http::{Method, StatusCode};
use salvo::oapi::{self, EndpointOutRegister, ToSchema};
use salvo::prelude::*;
use serde::Serialize;

use crate::core::entities::models::{Role, User};
use crate::impl_json_writer;

/// A user as exposed over the API. The password hash never leaves the server.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub department: Option<String>,
    pub registration_number: Option<String>,
    #[salvo(schema(value_type = String))]
    pub created_at: NaiveDateTime,
    #[salvo(schema(value_type = Option<String>))]
    pub last_login: Option<NaiveDateTime>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            department: user.department,
            registration_number: user.registration_number,
            created_at: user.created_at,
            last_login: user.last_login_at,
        }
    }
}

#[async_trait]
impl Writer for UserResponse {
    async fn write(self, req: &mut Request, _depot: &mut Depot, res: &mut Response) {
        if req.method() == Method::POST {
            res.status_code(StatusCode::CREATED);
        } else {
            res.status_code(StatusCode::OK);
        }
        res.render(Json(self));
    }
}

impl EndpointOutRegister for UserResponse {
    fn register(components: &mut oapi::Components, operation: &mut oapi::Operation) {
        operation.responses.insert(
            StatusCode::OK.as_str(),
            oapi::Response::new("OK")
                .add_content("application/json", UserResponse::to_schema(components)),
        );
        operation.responses.insert(
            StatusCode::CREATED.as_str(),
            oapi::Response::new("Created")
                .add_content("application/json", UserResponse::to_schema(components)),
        );
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub department: String,
    pub registration_number: Option<String>,
    #[salvo(schema(value_type = String))]
    pub created_at: NaiveDateTime,
    #[salvo(schema(value_type = Option<String>))]
    pub last_login: Option<NaiveDateTime>,
    pub status: String,
    pub trainings_completed: i64,
    pub average_score: f64,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, ToSchema)]
pub struct UserStatistics {
    pub total: usize,
    pub doctors: usize,
    pub admins: usize,
    pub monitoring: usize,
}

impl UserStatistics {
    pub fn from_roles(roles: impl IntoIterator<Item = Role>) -> Self {
        roles.into_iter().fold(Self::default(), |mut stats, role| {
            stats.total += 1;
            match role {
                Role::Doctor => stats.doctors += 1,
                Role::Admin => stats.admins += 1,
                Role::Monitoring => stats.monitoring += 1,
            }
            stats
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListUserResponse {
    pub users: Vec<UserSummary>,
    pub statistics: UserStatistics,
    pub message: String,
}

impl_json_writer!(ListUserResponse, StatusCode::OK, "OK");

/// The signed-in user's own training figures.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[salvo(schema(example = json!({
    "upcomingSessions": 3,
    "completedSessions": 15,
    "averageScore": 87.5
})))]
pub struct UserStatsResponse {
    pub upcoming_sessions: i64,
    pub completed_sessions: i64,
    pub average_score: f64,
}

impl_json_writer!(UserStatsResponse, StatusCode::OK, "OK");
