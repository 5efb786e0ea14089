use chrono::NaiveDateTime;
use salvo::http::StatusCode;
use salvo::oapi::ToSchema;
use serde::Serialize;

use crate::core::entities::models::{MeetingStatus, Role};
use crate::impl_json_writer;

use super::meeting_response::MeetingResponse;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total_users: i64,
    pub total_meetings: i64,
    pub active_sessions: i64,
    pub completion_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RoleShare {
    pub role: Role,
    pub count: i64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct StatusShare {
    pub status: MeetingStatus,
    pub count: i64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecentUser {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub department: Option<String>,
    #[salvo(schema(value_type = String))]
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecentActivity {
    pub meetings: Vec<MeetingResponse>,
    pub users: Vec<RecentUser>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyStats {
    pub new_users: i64,
    pub new_meetings: i64,
    pub completed_trainings: i64,
    pub average_attendance: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub overview: Overview,
    pub user_distribution: Vec<RoleShare>,
    pub meeting_distribution: Vec<StatusShare>,
    pub recent_activity: RecentActivity,
    pub monthly_stats: MonthlyStats,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AnalyticsResponse {
    pub analytics: Analytics,
    pub message: String,
}

impl_json_writer!(AnalyticsResponse, StatusCode::OK, "OK");
