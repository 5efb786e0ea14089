use diesel::{
    ExpressionMethods, PgConnection, QueryDsl, RunQueryDsl, SelectableHelper,
    dsl::{count, count_star},
    expression_methods::AggregateExpressionMethods,
    insert_into,
    r2d2::{ConnectionManager, Pool, PooledConnection},
};
use salvo::async_trait;

use crate::core::{
    database::schema::{attendance_records, test_scores},
    entities::models::{
        AttendanceRecord, AttendanceStatus, NewAttendanceRecord, NewTestScore, RecordKind,
        TestKind, TestScore,
    },
    types::errors::general::GeneralError,
};

/// Attendance and test score rows collected per meeting.
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// Inserts or replaces the row keyed by (meeting, name, department).
    async fn upsert_attendance(&self, record: NewAttendanceRecord) -> Result<(), GeneralError>;

    /// Inserts or replaces the row keyed by (meeting, kind, name, department).
    async fn upsert_test_score(&self, score: NewTestScore) -> Result<(), GeneralError>;

    async fn find_attendance(&self, meeting_id: i32)
    -> Result<Vec<AttendanceRecord>, GeneralError>;

    async fn find_test_scores(
        &self,
        meeting_id: i32,
        kind: TestKind,
    ) -> Result<Vec<TestScore>, GeneralError>;

    /// Scores of one kind across every meeting.
    async fn find_scores_by_kind(&self, kind: TestKind) -> Result<Vec<TestScore>, GeneralError>;

    /// Distinct meetings each participant name attended (present or late).
    async fn count_attended_meetings(&self) -> Result<Vec<(String, i64)>, GeneralError>;

    /// `(total rows, non-absent rows)` across all meetings.
    async fn attendance_totals(&self) -> Result<(i64, i64), GeneralError>;

    /// Each `(meeting, kind)` pair that has at least one stored row.
    async fn uploaded_kinds(
        &self,
        meeting_ids: &[i32],
    ) -> Result<Vec<(i32, RecordKind)>, GeneralError>;
}

#[derive(Debug, Clone)]
pub struct RecordRepositoryImpl {
    pool: Pool<ConnectionManager<PgConnection>>,
}

impl RecordRepositoryImpl {
    pub fn new(pool: Pool<ConnectionManager<PgConnection>>) -> Self {
        Self { pool }
    }

    fn get_conn(&self) -> Result<PooledConnection<ConnectionManager<PgConnection>>, GeneralError> {
        self.pool.get().map_err(|_| GeneralError::DbConnectionError)
    }
}

#[async_trait]
impl RecordRepository for RecordRepositoryImpl {
    async fn upsert_attendance(&self, record: NewAttendanceRecord) -> Result<(), GeneralError> {
        let mut conn = self.get_conn()?;

        insert_into(attendance_records::table)
            .values(&record)
            .on_conflict((
                attendance_records::meeting_id,
                attendance_records::name,
                attendance_records::department,
            ))
            .do_update()
            .set(&record)
            .execute(&mut conn)?;

        Ok(())
    }

    async fn upsert_test_score(&self, score: NewTestScore) -> Result<(), GeneralError> {
        let mut conn = self.get_conn()?;

        insert_into(test_scores::table)
            .values(&score)
            .on_conflict((
                test_scores::meeting_id,
                test_scores::kind,
                test_scores::name,
                test_scores::department,
            ))
            .do_update()
            .set(&score)
            .execute(&mut conn)?;

        Ok(())
    }

    async fn find_attendance(
        &self,
        meeting_id: i32,
    ) -> Result<Vec<AttendanceRecord>, GeneralError> {
        let mut conn = self.get_conn()?;

        let records = attendance_records::table
            .filter(attendance_records::meeting_id.eq(meeting_id))
            .order((attendance_records::name.asc(), attendance_records::department.asc()))
            .select(AttendanceRecord::as_select())
            .load(&mut conn)?;

        Ok(records)
    }

    async fn find_test_scores(
        &self,
        meeting_id: i32,
        kind: TestKind,
    ) -> Result<Vec<TestScore>, GeneralError> {
        let mut conn = self.get_conn()?;

        let scores = test_scores::table
            .filter(test_scores::meeting_id.eq(meeting_id))
            .filter(test_scores::kind.eq(kind))
            .order((test_scores::name.asc(), test_scores::department.asc()))
            .select(TestScore::as_select())
            .load(&mut conn)?;

        Ok(scores)
    }

    async fn find_scores_by_kind(&self, kind: TestKind) -> Result<Vec<TestScore>, GeneralError> {
        let mut conn = self.get_conn()?;

        let scores = test_scores::table
            .filter(test_scores::kind.eq(kind))
            .select(TestScore::as_select())
            .load(&mut conn)?;

        Ok(scores)
    }

    async fn count_attended_meetings(&self) -> Result<Vec<(String, i64)>, GeneralError> {
        let mut conn = self.get_conn()?;

        let counts = attendance_records::table
            .filter(attendance_records::status.ne(AttendanceStatus::Absent))
            .group_by(attendance_records::name)
            .select((
                attendance_records::name,
                count(attendance_records::meeting_id).aggregate_distinct(),
            ))
            .load::<(String, i64)>(&mut conn)?;

        Ok(counts)
    }

    async fn attendance_totals(&self) -> Result<(i64, i64), GeneralError> {
        let mut conn = self.get_conn()?;

        let total = attendance_records::table
            .select(count_star())
            .get_result::<i64>(&mut conn)?;

        let attended = attendance_records::table
            .filter(attendance_records::status.ne(AttendanceStatus::Absent))
            .select(count_star())
            .get_result::<i64>(&mut conn)?;

        Ok((total, attended))
    }

    async fn uploaded_kinds(
        &self,
        meeting_ids: &[i32],
    ) -> Result<Vec<(i32, RecordKind)>, GeneralError> {
        let mut conn = self.get_conn()?;

        let tests = test_scores::table
            .filter(test_scores::meeting_id.eq_any(meeting_ids))
            .select((test_scores::meeting_id, test_scores::kind))
            .distinct()
            .load::<(i32, TestKind)>(&mut conn)?;

        let attendance = attendance_records::table
            .filter(attendance_records::meeting_id.eq_any(meeting_ids))
            .select(attendance_records::meeting_id)
            .distinct()
            .load::<i32>(&mut conn)?;

        Ok(tests
            .into_iter()
            .map(|(meeting_id, kind)| (meeting_id, RecordKind::from(kind)))
            .chain(attendance.into_iter().map(|id| (id, RecordKind::Attendance)))
            .collect())
    }
}
