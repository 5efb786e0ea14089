use diesel::{
    ExpressionMethods, OptionalExtension, PgConnection, QueryDsl, RunQueryDsl, SelectableHelper,
    delete, insert_into,
    r2d2::{ConnectionManager, Pool, PooledConnection},
    update,
};
use salvo::async_trait;

use crate::core::{
    database::schema::{meetings, users},
    entities::models::{Meeting, MeetingChanges, NewMeeting},
    types::errors::general::GeneralError,
};

/// A meeting together with its creator's display name.
pub type MeetingWithCreator = (Meeting, String);

#[async_trait]
pub trait MeetingRepository: Send + Sync {
    async fn create_meeting(
        &self,
        meeting: NewMeeting<'_>,
    ) -> Result<MeetingWithCreator, GeneralError>;

    async fn find_all(&self) -> Result<Vec<MeetingWithCreator>, GeneralError>;

    async fn get_meeting_by_id(
        &self,
        meeting_id: i32,
    ) -> Result<Option<MeetingWithCreator>, GeneralError>;

    async fn update_meeting(
        &self,
        meeting_id: i32,
        changes: MeetingChanges,
    ) -> Result<Option<MeetingWithCreator>, GeneralError>;

    async fn delete_meeting(&self, meeting_id: i32) -> Result<bool, GeneralError>;
}

#[derive(Debug, Clone)]
pub struct MeetingRepositoryImpl {
    pool: Pool<ConnectionManager<PgConnection>>,
}

impl MeetingRepositoryImpl {
    pub fn new(pool: Pool<ConnectionManager<PgConnection>>) -> Self {
        Self { pool }
    }

    fn get_conn(&self) -> Result<PooledConnection<ConnectionManager<PgConnection>>, GeneralError> {
        self.pool.get().map_err(|_| GeneralError::DbConnectionError)
    }

    fn find_with_creator(
        conn: &mut PgConnection,
        meeting_id: i32,
    ) -> Result<Option<MeetingWithCreator>, GeneralError> {
        let meeting = meetings::table
            .inner_join(users::table)
            .filter(meetings::id.eq(meeting_id))
            .select((Meeting::as_select(), users::name))
            .first::<MeetingWithCreator>(conn)
            .optional()?;

        Ok(meeting)
    }
}

#[async_trait]
impl MeetingRepository for MeetingRepositoryImpl {
    async fn create_meeting(
        &self,
        meeting: NewMeeting<'_>,
    ) -> Result<MeetingWithCreator, GeneralError> {
        let mut conn = self.get_conn()?;

        let meeting_id = insert_into(meetings::table)
            .values(&meeting)
            .returning(meetings::id)
            .get_result::<i32>(&mut conn)?;

        Self::find_with_creator(&mut conn, meeting_id)?
            .ok_or(GeneralError::DbQueryError(diesel::result::Error::NotFound))
    }

    async fn find_all(&self) -> Result<Vec<MeetingWithCreator>, GeneralError> {
        let mut conn = self.get_conn()?;

        let meetings = meetings::table
            .inner_join(users::table)
            .select((Meeting::as_select(), users::name))
            .order((meetings::date.asc(), meetings::time.asc()))
            .load::<MeetingWithCreator>(&mut conn)?;

        Ok(meetings)
    }

    async fn get_meeting_by_id(
        &self,
        meeting_id: i32,
    ) -> Result<Option<MeetingWithCreator>, GeneralError> {
        let mut conn = self.get_conn()?;

        Self::find_with_creator(&mut conn, meeting_id)
    }

    async fn update_meeting(
        &self,
        meeting_id: i32,
        changes: MeetingChanges,
    ) -> Result<Option<MeetingWithCreator>, GeneralError> {
        let mut conn = self.get_conn()?;

        let updated = update(meetings::table)
            .filter(meetings::id.eq(meeting_id))
            .set(&changes)
            .execute(&mut conn)?;

        if updated == 0 {
            return Ok(None);
        }

        Self::find_with_creator(&mut conn, meeting_id)
    }

    async fn delete_meeting(&self, meeting_id: i32) -> Result<bool, GeneralError> {
        let mut conn = self.get_conn()?;

        let deleted = delete(meetings::table.filter(meetings::id.eq(meeting_id)))
            .execute(&mut conn)?;

        Ok(deleted > 0)
    }
}
