use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use salvo::http::StatusCode;
use salvo::oapi::ToSchema;
use serde::Serialize;

use crate::core::entities::models::{Meeting, MeetingStatus, RecordKind};
use crate::impl_json_writer;

#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
#[salvo(schema(example = json!({
    "id": 1,
    "name": "Pediatric Emergency Care Workshop",
    "date": "2025-01-15",
    "time": "14:00:00",
    "topic": "Emergency Medicine",
    "hosters": "Dr. Rajesh Kumar",
    "createdBy": 1,
    "createdByName": "Dr. Amit Verma",
    "status": "upcoming",
    "uploadStatus": {"preTest": "not-required", "attendance": "pending", "postTest": "not-required"},
    "createdAt": "2025-01-10T09:00:00"
})))]
pub struct MeetingResponse {
    pub id: i32,
    pub name: String,
    #[salvo(schema(value_type = String))]
    pub date: NaiveDate,
    #[salvo(schema(value_type = String))]
    pub time: NaiveTime,
    pub topic: String,
    pub hosters: String,
    pub created_by: i32,
    pub created_by_name: Option<String>,
    pub status: MeetingStatus,
    pub upload_status: UploadStatus,
    #[salvo(schema(value_type = String))]
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum UploadState {
    Pending,
    Uploaded,
    NotRequired,
}

/// Which spreadsheets a meeting has received. Attendance is mandatory, the
/// tests are optional.
#[derive(Debug, Clone, Copy, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UploadStatus {
    pub pre_test: UploadState,
    pub attendance: UploadState,
    pub post_test: UploadState,
}

impl UploadStatus {
    pub fn from_kinds(kinds: &[RecordKind]) -> Self {
        let optional = |kind| {
            if kinds.contains(&kind) {
                UploadState::Uploaded
            } else {
                UploadState::NotRequired
            }
        };

        Self {
            pre_test: optional(RecordKind::Pretest),
            attendance: if kinds.contains(&RecordKind::Attendance) {
                UploadState::Uploaded
            } else {
                UploadState::Pending
            },
            post_test: optional(RecordKind::Posttest),
        }
    }
}

impl MeetingResponse {
    pub fn new(meeting: Meeting, created_by_name: Option<String>, today: NaiveDate) -> Self {
        Self {
            status: MeetingStatus::derive(meeting.date, today),
            id: meeting.id,
            name: meeting.name,
            date: meeting.date,
            time: meeting.time,
            topic: meeting.topic,
            hosters: meeting.hosters,
            created_by: meeting.created_by,
            created_by_name,
            upload_status: UploadStatus::from_kinds(&[]),
            created_at: meeting.created_at,
        }
    }

    pub fn with_uploads(mut self, kinds: &[RecordKind]) -> Self {
        self.upload_status = UploadStatus::from_kinds(kinds);
        self
    }
}

impl_json_writer!(MeetingResponse, StatusCode::OK, "OK");

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedMeetingResponse {
    pub success: bool,
    pub message: String,
    pub meeting: MeetingResponse,
}

impl_json_writer!(CreatedMeetingResponse, StatusCode::CREATED, "Created");

#[derive(Debug, Serialize, ToSchema)]
pub struct ListMeetingResponse {
    pub meetings: Vec<MeetingResponse>,
    pub total: usize,
}

impl_json_writer!(ListMeetingResponse, StatusCode::OK, "OK");

#[derive(Debug, Serialize, ToSchema)]
pub struct DeletedMeetingResponse {
    pub success: bool,
    pub message: String,
}

impl_json_writer!(DeletedMeetingResponse, StatusCode::OK, "OK");
