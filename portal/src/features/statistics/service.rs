use salvo::async_trait;

use crate::core::{
    entities::models::{AttendanceRecord, AttendanceStatus, RecordKind, TestKind, TestScore},
    types::{
        errors::statistics_error::StatisticsError,
        responses::{
            meeting_response::MeetingResponse,
            statistics_response::{
                AttendanceRow, AttendanceSummary, CsvExport, MeetingStatisticsResponse, ScoreRow,
                ScoreSummary,
            },
        },
    },
    utils::stats_utils::{mean, percentage, round1},
};
use crate::features::{
    meeting::{
        repository::{MeetingRepository, MeetingRepositoryImpl},
        service::today,
    },
    records::repository::{RecordRepository, RecordRepositoryImpl},
};

pub type DefaultStatisticsService =
    StatisticsServiceImpl<MeetingRepositoryImpl, RecordRepositoryImpl>;

#[async_trait]
pub trait StatisticsService: Send + Sync {
    async fn get_meeting_statistics(
        &self,
        meeting_id: i32,
        search: Option<String>,
    ) -> Result<MeetingStatisticsResponse, StatisticsError>;

    async fn export_records(
        &self,
        meeting_id: i32,
        kind: RecordKind,
    ) -> Result<CsvExport, StatisticsError>;
}

#[derive(Debug, Clone)]
pub struct StatisticsServiceImpl<M: MeetingRepository, R: RecordRepository> {
    meeting_repository: M,
    record_repository: R,
}

impl<M: MeetingRepository, R: RecordRepository> StatisticsServiceImpl<M, R> {
    pub fn new(meeting_repository: M, record_repository: R) -> Self {
        Self {
            meeting_repository,
            record_repository,
        }
    }

    async fn ensure_meeting(&self, meeting_id: i32) -> Result<MeetingResponse, StatisticsError> {
        let (meeting, creator) = self
            .meeting_repository
            .get_meeting_by_id(meeting_id)
            .await?
            .ok_or(StatisticsError::MeetingNotFound(meeting_id))?;

        Ok(MeetingResponse::new(meeting, Some(creator), today()))
    }
}

/// Lowercased search term, or `None` when the query is blank.
fn normalize_search(search: Option<String>) -> Option<String> {
    search
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
}

fn matches_search(search: Option<&str>, name: &str, department: &str) -> bool {
    search.is_none_or(|needle| {
        name.to_lowercase().contains(needle) || department.to_lowercase().contains(needle)
    })
}

/// Summary figures cover every row; `records` only lists rows matching `search`.
pub fn summarize_scores(scores: &[TestScore], search: Option<&str>) -> ScoreSummary {
    let percentages = scores.iter().map(TestScore::percentage).collect::<Vec<_>>();

    ScoreSummary {
        total: scores.len(),
        average: mean(percentages.iter().copied()).map(round1).unwrap_or(0.0),
        highest: percentages.iter().copied().reduce(f64::max).map(round1),
        lowest: percentages.iter().copied().reduce(f64::min).map(round1),
        records: scores
            .iter()
            .filter(|s| matches_search(search, &s.name, &s.department))
            .map(ScoreRow::from)
            .collect(),
    }
}

pub fn summarize_attendance(records: &[AttendanceRecord], search: Option<&str>) -> AttendanceSummary {
    let count = |status: AttendanceStatus| records.iter().filter(|r| r.status == status).count();

    let present = count(AttendanceStatus::Present);
    let late = count(AttendanceStatus::Late);
    let absent = count(AttendanceStatus::Absent);

    AttendanceSummary {
        total: records.len(),
        present,
        late,
        absent,
        attendance_rate: percentage((present + late) as i64, records.len() as i64),
        records: records
            .iter()
            .filter(|r| matches_search(search, &r.name, &r.department))
            .map(AttendanceRow::from)
            .collect(),
    }
}

/// Posttest average minus pretest average; `None` unless both sides have rows.
pub fn improvement(pretest: &ScoreSummary, posttest: &ScoreSummary) -> Option<f64> {
    (pretest.total > 0 && posttest.total > 0).then(|| round1(posttest.average - pretest.average))
}

fn scores_to_csv(scores: &[TestScore]) -> Result<String, StatisticsError> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["Name", "Department", "Score", "Total Marks", "Percentage"])?;

    for score in scores {
        writer.write_record([
            score.name.clone(),
            score.department.clone(),
            score.score.to_string(),
            score.total_marks.to_string(),
            format!("{:.1}", score.percentage()),
        ])?;
    }

    into_string(writer)
}

fn attendance_to_csv(records: &[AttendanceRecord]) -> Result<String, StatisticsError> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["Name", "Department", "Status", "Login Time", "Logout Time"])?;

    for record in records {
        writer.write_record([
            record.name.as_str(),
            record.department.as_str(),
            record.status.as_str(),
            record.login_time.as_deref().unwrap_or(""),
            record.logout_time.as_deref().unwrap_or(""),
        ])?;
    }

    into_string(writer)
}

fn into_string(writer: csv::Writer<Vec<u8>>) -> Result<String, StatisticsError> {
    let bytes = writer
        .into_inner()
        .map_err(|e| StatisticsError::Export(e.to_string()))?;

    String::from_utf8(bytes).map_err(|e| StatisticsError::Export(e.to_string()))
}

#[async_trait]
impl<M: MeetingRepository, R: RecordRepository> StatisticsService for StatisticsServiceImpl<M, R> {
    async fn get_meeting_statistics(
        &self,
        meeting_id: i32,
        search: Option<String>,
    ) -> Result<MeetingStatisticsResponse, StatisticsError> {
        let meeting = self.ensure_meeting(meeting_id).await?;
        let search = normalize_search(search);
        let search = search.as_deref();

        let pretest = self
            .record_repository
            .find_test_scores(meeting_id, TestKind::Pretest)
            .await?;
        let posttest = self
            .record_repository
            .find_test_scores(meeting_id, TestKind::Posttest)
            .await?;
        let attendance = self.record_repository.find_attendance(meeting_id).await?;

        let uploaded = [
            (RecordKind::Pretest, pretest.is_empty()),
            (RecordKind::Posttest, posttest.is_empty()),
            (RecordKind::Attendance, attendance.is_empty()),
        ]
        .into_iter()
        .filter_map(|(kind, empty)| (!empty).then_some(kind))
        .collect::<Vec<_>>();
        let meeting = meeting.with_uploads(&uploaded);

        let pretest = summarize_scores(&pretest, search);
        let posttest = summarize_scores(&posttest, search);

        Ok(MeetingStatisticsResponse {
            improvement: improvement(&pretest, &posttest),
            meeting,
            pretest,
            posttest,
            attendance: summarize_attendance(&attendance, search),
        })
    }

    async fn export_records(
        &self,
        meeting_id: i32,
        kind: RecordKind,
    ) -> Result<CsvExport, StatisticsError> {
        self.ensure_meeting(meeting_id).await?;

        let content = match kind.test_kind() {
            Some(test_kind) => {
                let scores = self
                    .record_repository
                    .find_test_scores(meeting_id, test_kind)
                    .await?;
                scores_to_csv(&scores)?
            }
            None => {
                let records = self.record_repository.find_attendance(meeting_id).await?;
                attendance_to_csv(&records)?
            }
        };

        Ok(CsvExport {
            file_name: format!("meeting-{}-{}.csv", meeting_id, kind.as_str()),
            content,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, NaiveDateTime};

    use super::*;
    use crate::core::entities::models::{NewAttendanceRecord, NewTestScore};
    use crate::core::types::responses::meeting_response::UploadStatus;
    use crate::features::meeting::service::tests::{MockMeetingRepository, sample_meeting};
    use crate::features::records::repository::tests::MockRecordRepository;

    fn epoch() -> NaiveDateTime {
        DateTime::from_timestamp(0, 0).unwrap().naive_utc()
    }

    fn score(kind: TestKind, name: &str, department: &str, score: f64) -> NewTestScore {
        NewTestScore {
            meeting_id: 1,
            kind,
            name: name.to_string(),
            department: department.to_string(),
            score,
            total_marks: 100.0,
            recorded_at: epoch(),
        }
    }

    fn attendance(name: &str, status: AttendanceStatus) -> NewAttendanceRecord {
        NewAttendanceRecord {
            meeting_id: 1,
            name: name.to_string(),
            department: "Pediatrics".to_string(),
            status,
            login_time: Some("09:00".to_string()),
            logout_time: None,
            recorded_at: epoch(),
        }
    }

    async fn service_with_records()
    -> StatisticsServiceImpl<MockMeetingRepository, MockRecordRepository> {
        let records = MockRecordRepository::default();
        for row in [
            score(TestKind::Pretest, "Dr. Anita Rao", "Pediatrics", 60.0),
            score(TestKind::Pretest, "Dr. Vikram Singh", "Cardiology", 70.0),
            score(TestKind::Posttest, "Dr. Anita Rao", "Pediatrics", 85.0),
            score(TestKind::Posttest, "Dr. Vikram Singh", "Cardiology", 90.0),
        ] {
            records.upsert_test_score(row).await.unwrap();
        }
        for row in [
            attendance("Dr. Anita Rao", AttendanceStatus::Present),
            attendance("Dr. Vikram Singh", AttendanceStatus::Late),
            attendance("Dr. Meera Nair", AttendanceStatus::Absent),
        ] {
            records.upsert_attendance(row).await.unwrap();
        }

        StatisticsServiceImpl::new(
            MockMeetingRepository::with(vec![sample_meeting(1, today())]),
            records,
        )
    }

    #[tokio::test]
    async fn test_meeting_statistics_summaries() {
        let service = service_with_records().await;

        let stats = service.get_meeting_statistics(1, None).await.unwrap();

        assert_eq!(stats.pretest.total, 2);
        assert_eq!(stats.pretest.average, 65.0);
        assert_eq!(stats.posttest.average, 87.5);
        assert_eq!(stats.posttest.highest, Some(90.0));
        assert_eq!(stats.posttest.lowest, Some(85.0));
        assert_eq!(stats.improvement, Some(22.5));

        assert_eq!(stats.attendance.total, 3);
        assert_eq!(stats.attendance.present, 1);
        assert_eq!(stats.attendance.late, 1);
        assert_eq!(stats.attendance.absent, 1);
        assert_eq!(stats.attendance.attendance_rate, 66.7);
        assert_eq!(
            stats.meeting.upload_status,
            UploadStatus::from_kinds(&[
                RecordKind::Pretest,
                RecordKind::Posttest,
                RecordKind::Attendance,
            ])
        );
    }

    #[tokio::test]
    async fn test_search_filters_records_only() {
        let service = service_with_records().await;

        let stats = service
            .get_meeting_statistics(1, Some("  CARDIO ".to_string()))
            .await
            .unwrap();

        assert_eq!(stats.pretest.total, 2);
        assert_eq!(stats.pretest.records.len(), 1);
        assert_eq!(stats.pretest.records[0].name, "Dr. Vikram Singh");
        assert!(stats.attendance.records.is_empty());
    }

    #[tokio::test]
    async fn test_statistics_for_unknown_meeting() {
        let service = service_with_records().await;

        assert!(matches!(
            service.get_meeting_statistics(42, None).await,
            Err(StatisticsError::MeetingNotFound(42))
        ));
        assert!(matches!(
            service.export_records(42, RecordKind::Pretest).await,
            Err(StatisticsError::MeetingNotFound(42))
        ));
    }

    #[test]
    fn test_empty_sides_have_no_improvement() {
        let empty = summarize_scores(&[], None);
        assert_eq!(empty.average, 0.0);
        assert_eq!(empty.highest, None);
        assert_eq!(improvement(&empty, &empty), None);
        assert_eq!(summarize_attendance(&[], None).attendance_rate, 0.0);
    }

    #[tokio::test]
    async fn test_export_attendance_csv() {
        let service = service_with_records().await;

        let export = service
            .export_records(1, RecordKind::Attendance)
            .await
            .unwrap();

        assert_eq!(export.file_name, "meeting-1-attendance.csv");
        let mut lines = export.content.lines();
        assert_eq!(
            lines.next(),
            Some("Name,Department,Status,Login Time,Logout Time")
        );
        assert_eq!(lines.next(), Some("Dr. Anita Rao,Pediatrics,present,09:00,"));
        assert_eq!(export.content.lines().count(), 4);
    }

    #[tokio::test]
    async fn test_export_posttest_csv() {
        let service = service_with_records().await;

        let export = service.export_records(1, RecordKind::Posttest).await.unwrap();

        assert!(
            export
                .content
                .contains("Dr. Vikram Singh,Cardiology,90,100,90.0")
        );
    }
}
