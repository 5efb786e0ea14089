use chrono::{NaiveDate, NaiveDateTime};
use diesel::{
    ExpressionMethods, PgConnection, QueryDsl, RunQueryDsl, SelectableHelper,
    dsl::count_star,
    r2d2::{ConnectionManager, Pool, PooledConnection},
};
use salvo::async_trait;

use crate::core::{
    database::schema::{meetings, users},
    entities::models::{Meeting, Role, User},
    types::errors::general::GeneralError,
};
use crate::features::meeting::repository::MeetingWithCreator;

/// Read-only aggregate queries behind the dashboard.
#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
    async fn count_users_by_role(&self) -> Result<Vec<(Role, i64)>, GeneralError>;

    /// Dates of every meeting; statuses are derived from these.
    async fn meeting_dates(&self) -> Result<Vec<NaiveDate>, GeneralError>;

    async fn recent_meetings(&self, limit: i64) -> Result<Vec<MeetingWithCreator>, GeneralError>;

    async fn recent_users(&self, limit: i64) -> Result<Vec<User>, GeneralError>;

    async fn count_users_since(&self, since: NaiveDateTime) -> Result<i64, GeneralError>;

    async fn count_meetings_since(&self, since: NaiveDateTime) -> Result<i64, GeneralError>;
}

#[derive(Debug, Clone)]
pub struct AnalyticsRepositoryImpl {
    pool: Pool<ConnectionManager<PgConnection>>,
}

impl AnalyticsRepositoryImpl {
    pub fn new(pool: Pool<ConnectionManager<PgConnection>>) -> Self {
        Self { pool }
    }

    fn get_conn(&self) -> Result<PooledConnection<ConnectionManager<PgConnection>>, GeneralError> {
        self.pool.get().map_err(|_| GeneralError::DbConnectionError)
    }
}

#[async_trait]
impl AnalyticsRepository for AnalyticsRepositoryImpl {
    async fn count_users_by_role(&self) -> Result<Vec<(Role, i64)>, GeneralError> {
        let mut conn = self.get_conn()?;

        let counts = users::table
            .group_by(users::role)
            .select((users::role, count_star()))
            .load::<(Role, i64)>(&mut conn)?;

        Ok(counts)
    }

    async fn meeting_dates(&self) -> Result<Vec<NaiveDate>, GeneralError> {
        let mut conn = self.get_conn()?;

        let dates = meetings::table
            .select(meetings::date)
            .load::<NaiveDate>(&mut conn)?;

        Ok(dates)
    }

    async fn recent_meetings(&self, limit: i64) -> Result<Vec<MeetingWithCreator>, GeneralError> {
        let mut conn = self.get_conn()?;

        let meetings = meetings::table
            .inner_join(users::table)
            .select((Meeting::as_select(), users::name))
            .order(meetings::created_at.desc())
            .limit(limit)
            .load::<MeetingWithCreator>(&mut conn)?;

        Ok(meetings)
    }

    async fn recent_users(&self, limit: i64) -> Result<Vec<User>, GeneralError> {
        let mut conn = self.get_conn()?;

        let users = users::table
            .select(User::as_select())
            .order(users::created_at.desc())
            .limit(limit)
            .load(&mut conn)?;

        Ok(users)
    }

    async fn count_users_since(&self, since: NaiveDateTime) -> Result<i64, GeneralError> {
        let mut conn = self.get_conn()?;

        let count = users::table
            .filter(users::created_at.ge(since))
            .select(count_star())
            .get_result(&mut conn)?;

        Ok(count)
    }

    async fn count_meetings_since(&self, since: NaiveDateTime) -> Result<i64, GeneralError> {
        let mut conn = self.get_conn()?;

        let count = meetings::table
            .filter(meetings::created_at.ge(since))
            .select(count_star())
            .get_result(&mut conn)?;

        Ok(count)
    }
}
