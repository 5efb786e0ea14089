use chrono::{NaiveDateTime, Utc};
use salvo::async_trait;
use tracing::{info, warn};

use crate::core::{
    dtos::upload::upload_rows_dto::UploadRowDto,
    entities::models::{AttendanceStatus, NewAttendanceRecord, NewTestScore, RecordKind},
    types::{errors::upload_error::UploadError, responses::upload_response::UploadResponse},
};
use crate::features::{
    meeting::repository::{MeetingRepository, MeetingRepositoryImpl},
    records::repository::{RecordRepository, RecordRepositoryImpl},
};

pub type DefaultUploadService = UploadServiceImpl<MeetingRepositoryImpl, RecordRepositoryImpl>;

#[async_trait]
pub trait UploadService: Send + Sync {
    async fn upload_records(
        &self,
        meeting_id: i32,
        kind: RecordKind,
        rows: Vec<UploadRowDto>,
    ) -> Result<UploadResponse, UploadError>;
}

#[derive(Debug, Clone)]
pub struct UploadServiceImpl<M: MeetingRepository, R: RecordRepository> {
    meeting_repository: M,
    record_repository: R,
}

impl<M: MeetingRepository, R: RecordRepository> UploadServiceImpl<M, R> {
    pub fn new(meeting_repository: M, record_repository: R) -> Self {
        Self {
            meeting_repository,
            record_repository,
        }
    }
}

/// A row that passed validation and is ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidRow {
    Score(NewTestScore),
    Attendance(NewAttendanceRecord),
}

fn required_text(value: Option<&str>, label: &str) -> Result<String, String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| format!("{label} is required"))
}

fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn required_number(value: Option<f64>, label: &str) -> Result<f64, String> {
    match value {
        None => Err(format!("{label} is required")),
        Some(n) if !n.is_finite() => Err(format!("{label} must be a number")),
        Some(n) => Ok(n),
    }
}

/// Checks one uploaded row. The error is the reason shown to the uploader.
pub fn validate_row(
    meeting_id: i32,
    kind: RecordKind,
    row: &UploadRowDto,
    recorded_at: NaiveDateTime,
) -> Result<ValidRow, String> {
    let name = required_text(row.name.as_deref(), "Name")?;
    let department = required_text(row.department.as_deref(), "Department")?;

    match kind.test_kind() {
        Some(test_kind) => {
            let score = required_number(row.score, "Score")?;
            let total_marks = required_number(row.total_marks, "Total marks")?;

            if total_marks <= 0.0 {
                return Err(format!("Total marks must be greater than 0 (got {total_marks})"));
            }
            if score < 0.0 {
                return Err(format!("Score cannot be negative (got {score})"));
            }
            if score > total_marks {
                return Err(format!("Score {score} exceeds total marks {total_marks}"));
            }

            Ok(ValidRow::Score(NewTestScore {
                meeting_id,
                kind: test_kind,
                name,
                department,
                score,
                total_marks,
                recorded_at,
            }))
        }
        None => {
            let status = match optional_text(row.status.as_deref()) {
                Some(status) => status.parse::<AttendanceStatus>()?,
                None => AttendanceStatus::Present,
            };

            Ok(ValidRow::Attendance(NewAttendanceRecord {
                meeting_id,
                name,
                department,
                status,
                login_time: optional_text(row.login_time.as_deref()),
                logout_time: optional_text(row.logout_time.as_deref()),
                recorded_at,
            }))
        }
    }
}

#[async_trait]
impl<M: MeetingRepository, R: RecordRepository> UploadService for UploadServiceImpl<M, R> {
    async fn upload_records(
        &self,
        meeting_id: i32,
        kind: RecordKind,
        rows: Vec<UploadRowDto>,
    ) -> Result<UploadResponse, UploadError> {
        if rows.is_empty() {
            return Err(UploadError::EmptyUpload);
        }

        self.meeting_repository
            .get_meeting_by_id(meeting_id)
            .await?
            .ok_or(UploadError::MeetingNotFound(meeting_id))?;

        let recorded_at = Utc::now().naive_utc();
        let total = rows.len();
        let mut errors = Vec::new();

        for (index, row) in rows.iter().enumerate() {
            let row_number = index + 1;

            let stored = match validate_row(meeting_id, kind, row, recorded_at) {
                Ok(ValidRow::Score(score)) => self.record_repository.upsert_test_score(score).await,
                Ok(ValidRow::Attendance(record)) => {
                    self.record_repository.upsert_attendance(record).await
                }
                Err(reason) => {
                    errors.push(format!("Row {row_number}: {reason}"));
                    continue;
                }
            };

            if let Err(e) = stored {
                warn!(meeting_id, row = row_number, "Failed to store uploaded row: {}", e);
                errors.push(format!("Row {row_number}: Failed to save record"));
            }
        }

        let failed = errors.len();
        info!(
            meeting_id,
            kind = kind.as_str(),
            total,
            failed,
            "Processed record upload"
        );

        Ok(UploadResponse::new(total, errors, failed))
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;
    use crate::core::dtos::upload::upload_rows_dto::UploadRowsDto;
    use crate::core::entities::models::TestKind;
    use crate::features::meeting::service::{
        tests::{MockMeetingRepository, sample_meeting},
        today,
    };
    use crate::features::records::repository::tests::MockRecordRepository;

    fn epoch() -> NaiveDateTime {
        DateTime::from_timestamp(0, 0).unwrap().naive_utc()
    }

    fn test_row(name: &str, score: Option<f64>, total_marks: Option<f64>) -> UploadRowDto {
        UploadRowDto {
            name: Some(name.to_string()),
            department: Some("Emergency".to_string()),
            score,
            total_marks,
            ..Default::default()
        }
    }

    fn service(
        records: MockRecordRepository,
    ) -> UploadServiceImpl<MockMeetingRepository, MockRecordRepository> {
        UploadServiceImpl::new(
            MockMeetingRepository::with(vec![sample_meeting(1, today())]),
            records,
        )
    }

    #[test]
    fn test_validate_test_rows() {
        let ok = validate_row(
            1,
            RecordKind::Pretest,
            &test_row(" Dr. Amit ", Some(18.0), Some(20.0)),
            epoch(),
        )
        .unwrap();
        let ValidRow::Score(score) = ok else {
            panic!("expected a score row");
        };
        assert_eq!(score.name, "Dr. Amit");
        assert_eq!(score.kind, TestKind::Pretest);

        let reason = |row: UploadRowDto| {
            validate_row(1, RecordKind::Posttest, &row, epoch()).unwrap_err()
        };
        assert_eq!(reason(test_row("A", None, Some(20.0))), "Score is required");
        assert_eq!(
            reason(test_row("A", Some(22.0), Some(20.0))),
            "Score 22 exceeds total marks 20"
        );
        assert_eq!(
            reason(test_row("A", Some(1.0), Some(0.0))),
            "Total marks must be greater than 0 (got 0)"
        );
        assert_eq!(
            reason(test_row("A", Some(-1.0), Some(20.0))),
            "Score cannot be negative (got -1)"
        );
        assert_eq!(
            reason(test_row("A", Some(f64::NAN), Some(20.0))),
            "Score must be a number"
        );
        assert_eq!(
            reason(test_row("  ", Some(1.0), Some(20.0))),
            "Name is required"
        );
    }

    #[test]
    fn test_validate_attendance_rows() {
        let row = UploadRowDto {
            name: Some("Dr. Sana".to_string()),
            department: Some("Cardiology".to_string()),
            login_time: Some("09:05".to_string()),
            ..Default::default()
        };
        let ValidRow::Attendance(record) =
            validate_row(1, RecordKind::Attendance, &row, epoch()).unwrap()
        else {
            panic!("expected an attendance row");
        };
        assert_eq!(record.status, AttendanceStatus::Present);
        assert_eq!(record.login_time.as_deref(), Some("09:05"));
        assert_eq!(record.logout_time, None);

        let row = UploadRowDto {
            status: Some("sick".to_string()),
            ..row
        };
        assert!(
            validate_row(1, RecordKind::Attendance, &row, epoch())
                .unwrap_err()
                .starts_with("Invalid attendance status 'sick'")
        );
    }

    #[tokio::test]
    async fn test_upload_counts_failed_rows() {
        let service = service(MockRecordRepository::default());

        let response = service
            .upload_records(
                1,
                RecordKind::Pretest,
                vec![
                    test_row("Dr. A", Some(10.0), Some(20.0)),
                    test_row("Dr. B", Some(25.0), Some(20.0)),
                    test_row("Dr. C", Some(15.0), Some(20.0)),
                    test_row("Dr. D", None, Some(20.0)),
                    test_row("Dr. E", Some(20.0), Some(20.0)),
                ],
            )
            .await
            .unwrap();

        assert!(!response.success);
        assert_eq!(response.total, 5);
        assert_eq!(response.processed, 3);
        assert_eq!(
            response.errors,
            vec![
                "Row 2: Score 25 exceeds total marks 20".to_string(),
                "Row 4: Score is required".to_string(),
            ]
        );
        assert_eq!(service.record_repository.scores.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_upload_replaces_existing_rows_and_reports_storage_failures() {
        let records = MockRecordRepository {
            failing_names: ["Dr. Broken".to_string()].into_iter().collect(),
            ..Default::default()
        };
        let service = service(records);

        let response = service
            .upload_records(
                1,
                RecordKind::Posttest,
                vec![
                    test_row("Dr. A", Some(10.0), Some(20.0)),
                    test_row("Dr. A", Some(18.0), Some(20.0)),
                    test_row("Dr. Broken", Some(5.0), Some(20.0)),
                ],
            )
            .await
            .unwrap();

        assert_eq!(response.processed, 2);
        assert_eq!(response.errors, vec!["Row 3: Failed to save record".to_string()]);

        let scores = service.record_repository.scores.lock().unwrap();
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].score, 18.0);
    }

    #[tokio::test]
    async fn test_upload_rejects_empty_batches_and_unknown_meetings() {
        let service = service(MockRecordRepository::default());

        assert!(matches!(
            service.upload_records(1, RecordKind::Attendance, vec![]).await,
            Err(UploadError::EmptyUpload)
        ));
        assert!(matches!(
            service
                .upload_records(9, RecordKind::Attendance, vec![UploadRowDto::default()])
                .await,
            Err(UploadError::MeetingNotFound(9))
        ));
    }

    #[tokio::test]
    async fn test_upload_accepts_numeric_text_cells() {
        let service = service(MockRecordRepository::default());
        let body: UploadRowsDto = serde_json::from_str(
            r#"{"rows": [
                {"name": "Dr. A", "department": "Medicine", "status": "present"},
                {"name": "Dr. B", "department": 101, "status": "late", "loginTime": 0.375},
                {"name": 42, "department": "Surgery", "status": "unknown"}
            ]}"#,
        )
        .unwrap();

        let response = service
            .upload_records(1, RecordKind::Attendance, body.rows)
            .await
            .unwrap();

        assert_eq!(response.total, 3);
        assert_eq!(response.processed, 2);
        assert_eq!(response.errors.len(), 1);
        assert!(response.errors[0].starts_with("Row 3: Invalid attendance status"));

        let attendance = service.record_repository.attendance.lock().unwrap();
        assert!(attendance.iter().any(|r| r.name == "Dr. B" && r.department == "101"));
    }
}
