use chrono::NaiveDateTime;
use salvo::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use salvo::http::{HeaderValue, StatusCode};
use salvo::oapi::{self, EndpointOutRegister, ToSchema};
use salvo::prelude::*;
use serde::Serialize;

use crate::core::entities::models::{AttendanceRecord, AttendanceStatus, TestScore};
use crate::core::utils::stats_utils::round1;
use crate::impl_json_writer;

use super::meeting_response::MeetingResponse;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRow {
    pub id: i32,
    pub name: String,
    pub department: String,
    pub score: f64,
    pub total_marks: f64,
    pub percentage: f64,
    #[salvo(schema(value_type = String))]
    pub recorded_at: NaiveDateTime,
}

impl From<&TestScore> for ScoreRow {
    fn from(score: &TestScore) -> Self {
        Self {
            id: score.id,
            name: score.name.clone(),
            department: score.department.clone(),
            score: score.score,
            total_marks: score.total_marks,
            percentage: round1(score.percentage()),
            recorded_at: score.recorded_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ScoreSummary {
    pub total: usize,
    pub average: f64,
    pub highest: Option<f64>,
    pub lowest: Option<f64>,
    pub records: Vec<ScoreRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRow {
    pub id: i32,
    pub name: String,
    pub department: String,
    pub status: AttendanceStatus,
    pub login_time: Option<String>,
    pub logout_time: Option<String>,
    #[salvo(schema(value_type = String))]
    pub recorded_at: NaiveDateTime,
}

impl From<&AttendanceRecord> for AttendanceRow {
    fn from(record: &AttendanceRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            department: record.department.clone(),
            status: record.status,
            login_time: record.login_time.clone(),
            logout_time: record.logout_time.clone(),
            recorded_at: record.recorded_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSummary {
    pub total: usize,
    pub present: usize,
    pub late: usize,
    pub absent: usize,
    pub attendance_rate: f64,
    pub records: Vec<AttendanceRow>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MeetingStatisticsResponse {
    pub meeting: MeetingResponse,
    pub pretest: ScoreSummary,
    pub posttest: ScoreSummary,
    pub attendance: AttendanceSummary,
    pub improvement: Option<f64>,
}

impl_json_writer!(MeetingStatisticsResponse, StatusCode::OK, "OK");

/// A record set rendered as a CSV attachment.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvExport {
    pub file_name: String,
    pub content: String,
}

#[async_trait]
impl Writer for CsvExport {
    async fn write(self, _req: &mut Request, _depot: &mut Depot, res: &mut Response) {
        let disposition = format!("attachment; filename=\"{}\"", self.file_name);

        res.status_code(StatusCode::OK);
        res.headers_mut().insert(
            CONTENT_TYPE,
            HeaderValue::from_static("text/csv; charset=utf-8"),
        );
        if let Ok(value) = HeaderValue::from_str(&disposition) {
            res.headers_mut().insert(CONTENT_DISPOSITION, value);
        }

        if let Err(e) = res.write_body(self.content) {
            tracing::error!("Failed to write CSV body: {}", e);
        }
    }
}

impl EndpointOutRegister for CsvExport {
    fn register(components: &mut oapi::Components, operation: &mut oapi::Operation) {
        operation.responses.insert(
            StatusCode::OK.as_str(),
            oapi::Response::new("CSV attachment")
                .add_content("text/csv", String::to_schema(components)),
        );
    }
}
