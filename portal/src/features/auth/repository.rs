use chrono::NaiveDateTime;
use diesel::{
    ExpressionMethods, OptionalExtension, PgConnection, QueryDsl, RunQueryDsl, SelectableHelper,
    r2d2::{ConnectionManager, Pool, PooledConnection},
    update,
};
use salvo::async_trait;

use crate::core::{
    database::schema::users, entities::models::User, types::errors::general::GeneralError,
};

#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, GeneralError>;

    async fn get_user_by_id(&self, user_id: i32) -> Result<Option<User>, GeneralError>;

    /// Stamps `last_login_at` and `updated_at` on a successful login.
    async fn record_login(&self, user_id: i32, at: NaiveDateTime) -> Result<(), GeneralError>;
}

#[derive(Debug, Clone)]
pub struct AuthRepositoryImpl {
    pool: Pool<ConnectionManager<PgConnection>>,
}

impl AuthRepositoryImpl {
    pub fn new(pool: Pool<ConnectionManager<PgConnection>>) -> Self {
        Self { pool }
    }

    fn get_conn(&self) -> Result<PooledConnection<ConnectionManager<PgConnection>>, GeneralError> {
        self.pool.get().map_err(|_| GeneralError::DbConnectionError)
    }
}

#[async_trait]
impl AuthRepository for AuthRepositoryImpl {
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, GeneralError> {
        let mut conn = self.get_conn()?;

        let user = users::table
            .filter(users::email.eq(email))
            .select(User::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(user)
    }

    async fn get_user_by_id(&self, user_id: i32) -> Result<Option<User>, GeneralError> {
        let mut conn = self.get_conn()?;

        let user = users::table
            .find(user_id)
            .select(User::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(user)
    }

    async fn record_login(&self, user_id: i32, at: NaiveDateTime) -> Result<(), GeneralError> {
        let mut conn = self.get_conn()?;

        update(users::table.find(user_id))
            .set((users::last_login_at.eq(Some(at)), users::updated_at.eq(at)))
            .execute(&mut conn)?;

        Ok(())
    }
}
