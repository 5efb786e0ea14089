use chrono::{Local, NaiveDate, NaiveTime, Utc};
use salvo::async_trait;
use tracing::info;

use crate::core::{
    dtos::meeting::{create_meeting_dto::CreateMeetingDto, update_meeting_dto::UpdateMeetingDto},
    entities::models::{MeetingChanges, MeetingStatus, NewMeeting, RecordKind},
    types::{
        errors::{general::GeneralError, meeting_error::MeetingError},
        responses::meeting_response::{
            CreatedMeetingResponse, DeletedMeetingResponse, ListMeetingResponse, MeetingResponse,
        },
    },
};

use crate::features::records::repository::{RecordRepository, RecordRepositoryImpl};

use super::repository::{MeetingRepository, MeetingRepositoryImpl};

pub type DefaultMeetingService = MeetingServiceImpl<MeetingRepositoryImpl, RecordRepositoryImpl>;

#[async_trait]
pub trait MeetingService: Send + Sync {
    async fn create_meeting(
        &self,
        data: CreateMeetingDto,
        user_id: i32,
    ) -> Result<CreatedMeetingResponse, MeetingError>;

    async fn get_meetings(
        &self,
        status: Option<MeetingStatus>,
    ) -> Result<ListMeetingResponse, MeetingError>;

    async fn get_meeting_by_id(&self, meeting_id: i32) -> Result<MeetingResponse, MeetingError>;

    async fn update_meeting(
        &self,
        meeting_id: i32,
        data: UpdateMeetingDto,
    ) -> Result<MeetingResponse, MeetingError>;

    async fn delete_meeting(&self, meeting_id: i32)
    -> Result<DeletedMeetingResponse, MeetingError>;
}

#[derive(Debug, Clone)]
pub struct MeetingServiceImpl<R: MeetingRepository, Rec: RecordRepository> {
    repository: R,
    record_repository: Rec,
}

impl<R: MeetingRepository, Rec: RecordRepository> MeetingServiceImpl<R, Rec> {
    pub fn new(repository: R, record_repository: Rec) -> Self {
        Self {
            repository,
            record_repository,
        }
    }
}

/// Fills in `uploadStatus` from the records stored for each meeting.
pub async fn with_upload_status<Rec: RecordRepository>(
    records: &Rec,
    meetings: Vec<MeetingResponse>,
) -> Result<Vec<MeetingResponse>, GeneralError> {
    let ids = meetings.iter().map(|m| m.id).collect::<Vec<_>>();
    let uploaded = records.uploaded_kinds(&ids).await?;

    Ok(meetings
        .into_iter()
        .map(|meeting| {
            let kinds = uploaded
                .iter()
                .filter(|(id, _)| *id == meeting.id)
                .map(|(_, kind)| *kind)
                .collect::<Vec<RecordKind>>();
            meeting.with_uploads(&kinds)
        })
        .collect())
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, MeetingError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(MeetingError::MissingField(field));
    }
    Ok(value)
}

fn parse_date(value: &str) -> Result<NaiveDate, MeetingError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| MeetingError::InvalidField {
        field: "date",
        value: value.to_string(),
    })
}

fn parse_time(value: &str) -> Result<NaiveTime, MeetingError> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|_| MeetingError::InvalidField {
            field: "time",
            value: value.to_string(),
        })
}

fn ensure_not_past(date: NaiveDate, today: NaiveDate) -> Result<NaiveDate, MeetingError> {
    if date < today {
        return Err(MeetingError::DateInPast);
    }
    Ok(date)
}

#[async_trait]
impl<R: MeetingRepository, Rec: RecordRepository> MeetingService for MeetingServiceImpl<R, Rec> {
    async fn create_meeting(
        &self,
        data: CreateMeetingDto,
        user_id: i32,
    ) -> Result<CreatedMeetingResponse, MeetingError> {
        let today = today();

        let name = required("Meeting name", &data.name)?;
        let date = required("Meeting date", &data.date)?;
        let time = required("Meeting time", &data.time)?;
        let topic = required("Meeting topic", &data.topic)?;
        let hosters = required("Meeting host name", &data.hosters)?;

        let date = ensure_not_past(parse_date(date)?, today)?;
        let time = parse_time(time)?;

        let now = Utc::now().naive_utc();
        let new_meeting = NewMeeting {
            name,
            date,
            time,
            topic,
            hosters,
            created_by: user_id,
            created_at: now,
            updated_at: now,
        };

        let (meeting, created_by_name) = self.repository.create_meeting(new_meeting).await?;

        info!(meeting_id = meeting.id, user_id, "Meeting created");

        Ok(CreatedMeetingResponse {
            success: true,
            message: "Meeting created successfully".to_string(),
            meeting: MeetingResponse::new(meeting, Some(created_by_name), today),
        })
    }

    async fn get_meetings(
        &self,
        status: Option<MeetingStatus>,
    ) -> Result<ListMeetingResponse, MeetingError> {
        let today = today();

        let meetings = self
            .repository
            .find_all()
            .await?
            .into_iter()
            .map(|(meeting, creator)| MeetingResponse::new(meeting, Some(creator), today))
            .filter(|meeting| status.is_none_or(|status| meeting.status == status))
            .collect::<Vec<_>>();
        let mut meetings = with_upload_status(&self.record_repository, meetings).await?;

        meetings.sort_by(|a, b| (a.status, a.date, a.time).cmp(&(b.status, b.date, b.time)));

        Ok(ListMeetingResponse {
            total: meetings.len(),
            meetings,
        })
    }

    async fn get_meeting_by_id(&self, meeting_id: i32) -> Result<MeetingResponse, MeetingError> {
        let (meeting, creator) = self
            .repository
            .get_meeting_by_id(meeting_id)
            .await?
            .ok_or(MeetingError::MeetingNotFound(meeting_id))?;

        let meeting = MeetingResponse::new(meeting, Some(creator), today());
        let mut meetings = with_upload_status(&self.record_repository, vec![meeting]).await?;

        meetings.pop().ok_or(MeetingError::MeetingNotFound(meeting_id))
    }

    async fn update_meeting(
        &self,
        meeting_id: i32,
        data: UpdateMeetingDto,
    ) -> Result<MeetingResponse, MeetingError> {
        let today = today();

        let mut changes = MeetingChanges {
            updated_at: Some(Utc::now().naive_utc()),
            ..Default::default()
        };

        if let Some(name) = &data.name {
            changes.name = Some(required("Meeting name", name)?.to_string());
        }
        if let Some(date) = &data.date {
            let date = parse_date(required("Meeting date", date)?)?;
            changes.date = Some(ensure_not_past(date, today)?);
        }
        if let Some(time) = &data.time {
            changes.time = Some(parse_time(required("Meeting time", time)?)?);
        }
        if let Some(topic) = &data.topic {
            changes.topic = Some(required("Meeting topic", topic)?.to_string());
        }
        if let Some(hosters) = &data.hosters {
            changes.hosters = Some(required("Meeting host name", hosters)?.to_string());
        }

        let (meeting, creator) = self
            .repository
            .update_meeting(meeting_id, changes)
            .await?
            .ok_or(MeetingError::MeetingNotFound(meeting_id))?;

        let meeting = MeetingResponse::new(meeting, Some(creator), today);
        let mut meetings = with_upload_status(&self.record_repository, vec![meeting]).await?;

        meetings.pop().ok_or(MeetingError::MeetingNotFound(meeting_id))
    }

    async fn delete_meeting(
        &self,
        meeting_id: i32,
    ) -> Result<DeletedMeetingResponse, MeetingError> {
        if !self.repository.delete_meeting(meeting_id).await? {
            return Err(MeetingError::MeetingNotFound(meeting_id));
        }

        info!(meeting_id, "Meeting deleted");

        Ok(DeletedMeetingResponse {
            success: true,
            message: "Meeting deleted successfully".to_string(),
        })
    }
}
